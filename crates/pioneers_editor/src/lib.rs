//! Bevy integration for the Paragon Pioneers map editor
//!
//! [`MapEditorPlugin`] owns the map session as a resource and applies paint,
//! tool, load and export requests arriving as messages. Rendering and
//! viewport input are left to the host app.

pub mod config;
pub mod export;
pub mod render;
pub mod tools;

use bevy::prelude::*;
use pioneers_map::{MapSession, TerrainCategory};

pub use config::{ConfigError, EditorConfig};
pub use export::{ExportMap, ExportRejected, LoadFailed, LoadMap, MapExported};
pub use render::RenderState;
pub use tools::{PaintCell, SelectTool};

/// The map being edited
#[derive(Resource, Debug, Clone, Deref, DerefMut)]
pub struct EditorMap(pub MapSession);

impl EditorMap {
    /// Blank map sized and filled from the config
    pub fn from_config(config: &EditorConfig) -> Self {
        let mut session = match MapSession::filled(config.map.width, config.map.height, config.map.fill) {
            Ok(session) => session,
            Err(e) => {
                warn!("{}, starting with open water", e);
                MapSession::blank(config.map.width, config.map.height, TerrainCategory::Water)
            }
        };
        session.select_tool(config.editor.default_tool);
        session.take_changed();
        Self(session)
    }
}

/// Main editor plugin
pub struct MapEditorPlugin;

impl Plugin for MapEditorPlugin {
    fn build(&self, app: &mut App) {
        let config = match app.world().get_resource::<EditorConfig>() {
            Some(config) => config.clone(),
            None => {
                app.insert_resource(EditorConfig::default());
                EditorConfig::default()
            }
        };

        app.insert_resource(EditorMap::from_config(&config))
            .init_resource::<RenderState>()
            .add_message::<SelectTool>()
            .add_message::<PaintCell>()
            .add_message::<LoadMap>()
            .add_message::<LoadFailed>()
            .add_message::<ExportMap>()
            .add_message::<MapExported>()
            .add_message::<ExportRejected>()
            .add_systems(
                Update,
                (
                    tools::handle_tool_selection,
                    tools::handle_paint_requests,
                    export::handle_load_requests,
                    export::handle_export_requests,
                )
                    .chain(),
            );

        app.world_mut().resource_mut::<RenderState>().request_rebuild();
        info!(
            "Map editor ready: {}x{} map, {} tool",
            config.map.width,
            config.map.height,
            config.editor.default_tool.label()
        );
    }
}
