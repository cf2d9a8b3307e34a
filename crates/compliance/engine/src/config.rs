//! Engine configuration: input defaults and layout parameters.

use serde::{Deserialize, Serialize};

/// Tunables for a [`WorkflowOrchestrator`](crate::WorkflowOrchestrator).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub input: InputDefaults,

    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Values used for building parameters the caller leaves out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDefaults {
    #[serde(default = "default_building_type")]
    pub building_type: String,

    #[serde(default = "default_room_length")]
    pub room_length: f64,

    #[serde(default = "default_room_width")]
    pub room_width: f64,

    #[serde(default = "default_room_height")]
    pub room_height: f64,

    #[serde(default = "default_occupancy_load")]
    pub occupancy_load: i64,

    #[serde(default = "default_accessibility_level")]
    pub accessibility_level: String,

    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
}

fn default_building_type() -> String {
    "office".to_string()
}

fn default_room_length() -> f64 {
    10.0
}

fn default_room_width() -> f64 {
    8.0
}

fn default_room_height() -> f64 {
    3.0
}

fn default_occupancy_load() -> i64 {
    50
}

fn default_accessibility_level() -> String {
    "basic".to_string()
}

fn default_jurisdiction() -> String {
    "NBC".to_string()
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            building_type: default_building_type(),
            room_length: default_room_length(),
            room_width: default_room_width(),
            room_height: default_room_height(),
            occupancy_load: default_occupancy_load(),
            accessibility_level: default_accessibility_level(),
            jurisdiction: default_jurisdiction(),
        }
    }
}

/// Linear placement parameters, in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_start")]
    pub start_x: f64,

    #[serde(default = "default_start")]
    pub start_y: f64,

    /// A new row starts once the cursor passes `room length - wrap_margin`.
    #[serde(default = "default_wrap_margin")]
    pub wrap_margin: f64,

    #[serde(default = "default_footprint_width")]
    pub default_width: f64,

    #[serde(default = "default_footprint_depth")]
    pub default_depth: f64,

    #[serde(default = "default_approach_space")]
    pub default_approach_space: f64,
}

fn default_start() -> f64 {
    1.0
}

fn default_wrap_margin() -> f64 {
    2.0
}

fn default_footprint_width() -> f64 {
    1.2
}

fn default_footprint_depth() -> f64 {
    1.8
}

fn default_approach_space() -> f64 {
    0.6
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_x: default_start(),
            start_y: default_start(),
            wrap_margin: default_wrap_margin(),
            default_width: default_footprint_width(),
            default_depth: default_footprint_depth(),
            default_approach_space: default_approach_space(),
        }
    }
}
