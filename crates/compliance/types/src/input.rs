//! Normalized building parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Interior room dimensions in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl RoomDimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Floor area (length × width).
    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}

/// Accessibility tier requested for the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessibilityLevel {
    Basic,
    Enhanced,
}

impl AccessibilityLevel {
    /// Maps a raw level onto a tier. `universal` folds into enhanced and
    /// anything unrecognised falls back to basic.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "enhanced" | "universal" => AccessibilityLevel::Enhanced,
            _ => AccessibilityLevel::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessibilityLevel::Basic => "basic",
            AccessibilityLevel::Enhanced => "enhanced",
        }
    }
}

/// Building parameters after defaulting, coercion and derivation.
///
/// Created once per workflow run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInput {
    pub occupancy_type: String,
    pub building_type: String,
    pub room_dimensions: RoomDimensions,
    pub total_occupants: i64,
    pub accessibility_required: bool,
    pub accessibility_level: AccessibilityLevel,
    pub jurisdiction: String,
    pub room_area: f64,
    pub occupancy_density: f64,
    #[serde(default)]
    pub special_requirements: Vec<String>,
    #[serde(default)]
    pub fixture_preferences: Map<String, Value>,
}

impl NormalizedInput {
    /// Resolves a condition key against the normalized values.
    ///
    /// Raw parameter names (`occupancy_load`, `room_length`, ...) resolve to
    /// the same values as their normalized counterparts.
    pub fn field(&self, key: &str) -> Option<Value> {
        let value = match key {
            "occupancy_type" => Value::from(self.occupancy_type.as_str()),
            "building_type" => Value::from(self.building_type.as_str()),
            "total_occupants" | "occupancy_load" => Value::from(self.total_occupants),
            "accessibility_required" => Value::Bool(self.accessibility_required),
            "accessibility_level" => Value::from(self.accessibility_level.as_str()),
            "jurisdiction" => Value::from(self.jurisdiction.as_str()),
            "room_area" => Value::from(self.room_area),
            "occupancy_density" => Value::from(self.occupancy_density),
            "room_length" => Value::from(self.room_dimensions.length),
            "room_width" => Value::from(self.room_dimensions.width),
            "room_height" => Value::from(self.room_dimensions.height),
            "special_requirements" => Value::from(self.special_requirements.clone()),
            "fixture_preferences" => Value::Object(self.fixture_preferences.clone()),
            _ => return None,
        };
        Some(value)
    }
}
