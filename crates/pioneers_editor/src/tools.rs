//! Editor tools: tool selection and painting
//!
//! The viewport turns pointer input into [`PaintCell`] messages with grid
//! coordinates; these systems apply them to the map session.

use bevy::prelude::*;
use pioneers_map::{PaintOutcome, PlaceOutcome, Tool};

use crate::render::RenderState;
use crate::EditorMap;

/// Apply the active tool at a grid cell
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintCell {
    pub x: u32,
    pub y: u32,
}

/// Switch the active tool
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectTool(pub Tool);

pub fn handle_tool_selection(
    mut requests: MessageReader<SelectTool>,
    mut map: ResMut<EditorMap>,
    mut render_state: ResMut<RenderState>,
) {
    for SelectTool(tool) in requests.read() {
        if map.select_tool(*tool) {
            info!("Discarded open mountain ring");
        }
        let changed = map.take_changed();
        render_state.mark(changed);
    }
}

pub fn handle_paint_requests(
    mut requests: MessageReader<PaintCell>,
    mut map: ResMut<EditorMap>,
    mut render_state: ResMut<RenderState>,
) {
    for request in requests.read() {
        match map.paint(request.x, request.y) {
            Ok(PaintOutcome::Ring(PlaceOutcome::Closed)) => {
                info!("Mountain ring closed at ({}, {})", request.x, request.y);
            }
            Ok(PaintOutcome::Ring(PlaceOutcome::Rejected)) => {
                debug!("Mountain step at ({}, {}) rejected", request.x, request.y);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Paint request ignored: {}", e);
                continue;
            }
        }
        let changed = map.take_changed();
        render_state.mark(changed);
    }
}
