//! 2D fixture layout.

use crate::input::RoomDimensions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placement rectangle in room coordinates (metres, origin at a corner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub depth: f64,
    pub clearances: BTreeMap<String, f64>,
}

impl Placement {
    pub fn area(&self) -> f64 {
        self.width * self.depth
    }

    /// Whether the footprint lies inside the room.
    pub fn fits_within(&self, room: &RoomDimensions) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= room.length
            && self.y + self.depth <= room.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    Compliant,
    OutOfBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedAssembly {
    pub assembly_code: String,
    pub assembly_name: String,
    pub position: Placement,
    pub compliance_status: PlacementStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub room_dimensions: RoomDimensions,
    pub positioned_assemblies: Vec<PositionedAssembly>,
    /// Share of placed assemblies inside the room, 0-100.
    pub compliance_score: f64,
    /// Placed footprint area over room area, 0-100.
    pub layout_efficiency: f64,
    pub clearance_zones: Vec<String>,
    /// Codes of assemblies left out because their geometry could not be read.
    #[serde(default)]
    pub skipped_assemblies: Vec<String>,
}
