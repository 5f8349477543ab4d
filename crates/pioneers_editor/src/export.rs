//! Loading and exporting maps in the character-grid format

use bevy::prelude::*;
use pioneers_map::{GridPos, MapError, MapSession};

use crate::render::RenderState;
use crate::EditorMap;

/// Replace the current map with one parsed from `text`
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct LoadMap {
    pub text: String,
}

/// Serialize the current map
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportMap;

/// Export succeeded
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct MapExported {
    pub text: String,
}

/// Export refused; the listed cells have no valid sprite
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ExportRejected {
    pub malformed: Vec<GridPos>,
}

/// A load request could not be parsed; the current map is kept
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct LoadFailed {
    pub reason: String,
}

pub fn handle_load_requests(
    mut requests: MessageReader<LoadMap>,
    mut map: ResMut<EditorMap>,
    mut render_state: ResMut<RenderState>,
    mut failures: MessageWriter<LoadFailed>,
) {
    for request in requests.read() {
        match MapSession::from_text(&request.text) {
            Ok(mut session) => {
                session.select_tool(map.tool());
                session.take_changed();
                map.0 = session;
                render_state.request_rebuild();
            }
            Err(e) => {
                error!("Failed to load map: {}", e);
                failures.write(LoadFailed {
                    reason: e.to_string(),
                });
            }
        }
    }
}

pub fn handle_export_requests(
    mut requests: MessageReader<ExportMap>,
    map: Res<EditorMap>,
    mut exported: MessageWriter<MapExported>,
    mut rejected: MessageWriter<ExportRejected>,
) {
    for _ in requests.read() {
        match map.export() {
            Ok(text) => {
                info!("Exported {}x{} map", map.width(), map.height());
                exported.write(MapExported { text });
            }
            Err(MapError::NotExportable { malformed }) => {
                rejected.write(ExportRejected { malformed });
            }
            Err(e) => error!("Export failed: {}", e),
        }
    }
}
