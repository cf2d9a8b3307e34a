//! Input normalizer: turns loosely-typed building parameters into a
//! [`NormalizedInput`].
//!
//! Absent or null keys take the configured defaults. Present values are
//! coerced (numbers may arrive as numeric text) and anything that cannot be
//! coerced fails with [`ComplianceError::InvalidInput`] instead of being
//! replaced by a default.

use crate::config::InputDefaults;
use compliance_types::{
    AccessibilityLevel, ComplianceError, ComplianceResult, NormalizedInput, RoomDimensions,
};
use serde_json::{Map, Value};

/// Raw caller-supplied parameters.
pub type RawParameters = Map<String, Value>;

/// Applies defaults, coercion and derivation to raw parameters.
#[derive(Clone, Debug, Default)]
pub struct InputNormalizer {
    defaults: InputDefaults,
}

impl InputNormalizer {
    pub fn new(defaults: InputDefaults) -> Self {
        Self { defaults }
    }

    /// Normalize a raw JSON value, which must be an object.
    pub fn normalize_value(&self, raw: &Value) -> ComplianceResult<NormalizedInput> {
        match raw {
            Value::Object(map) => self.normalize(map),
            other => Err(ComplianceError::InvalidInput(format!(
                "parameters must be an object, found {}",
                kind_of(other)
            ))),
        }
    }

    /// Normalize raw parameters. Pure: no store access, no side effects.
    pub fn normalize(&self, raw: &RawParameters) -> ComplianceResult<NormalizedInput> {
        let d = &self.defaults;

        let building_type = text(raw, "building_type", &d.building_type)?.to_lowercase();
        let length = dimension(raw, "room_length", d.room_length)?;
        let width = dimension(raw, "room_width", d.room_width)?;
        let height = dimension(raw, "room_height", d.room_height)?;
        let total_occupants = occupants(raw, "occupancy_load", d.occupancy_load)?;
        let raw_level = text(raw, "accessibility_level", &d.accessibility_level)?;
        let jurisdiction = text(raw, "jurisdiction", &d.jurisdiction)?;

        let room_dimensions = RoomDimensions::new(length, width, height);
        let room_area = room_dimensions.area();
        let occupancy_density = if room_area > 0.0 {
            total_occupants as f64 / room_area
        } else {
            0.0
        };

        let normalized = NormalizedInput {
            occupancy_type: building_type.clone(),
            building_type,
            room_dimensions,
            total_occupants,
            accessibility_required: raw_level != "basic",
            accessibility_level: AccessibilityLevel::from_raw(&raw_level),
            jurisdiction,
            room_area,
            occupancy_density,
            special_requirements: string_list(raw, "special_requirements")?,
            fixture_preferences: object(raw, "fixture_preferences")?,
        };

        tracing::debug!(
            occupancy_type = %normalized.occupancy_type,
            jurisdiction = %normalized.jurisdiction,
            occupants = normalized.total_occupants,
            room_area = normalized.room_area,
            density = normalized.occupancy_density,
            "Input normalized"
        );
        Ok(normalized)
    }
}

fn present<'a>(raw: &'a RawParameters, key: &str) -> Option<&'a Value> {
    raw.get(key).filter(|v| !v.is_null())
}

fn invalid(key: &str, expected: &str, found: &Value) -> ComplianceError {
    ComplianceError::InvalidInput(format!("{} must be {}, got {}", key, expected, found))
}

fn text(raw: &RawParameters, key: &str, default: &str) -> ComplianceResult<String> {
    match present(raw, key) {
        None => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(invalid(key, "a string", other)),
    }
}

fn dimension(raw: &RawParameters, key: &str, default: f64) -> ComplianceResult<f64> {
    let value = match present(raw, key) {
        None => default,
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| invalid(key, "a number", &Value::Number(n.clone())))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(key, "a number", &Value::String(s.clone())))?,
        Some(other) => return Err(invalid(key, "a number", other)),
    };
    if !value.is_finite() || value < 0.0 {
        return Err(ComplianceError::InvalidInput(format!(
            "{} must be a non-negative finite number, got {}",
            key, value
        )));
    }
    Ok(value)
}

fn occupants(raw: &RawParameters, key: &str, default: i64) -> ComplianceResult<i64> {
    let value = match present(raw, key) {
        None => default,
        Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            // Fractional loads truncate toward zero.
            (None, Some(f)) if f.is_finite() && f.abs() < i64::MAX as f64 => f.trunc() as i64,
            _ => return Err(invalid(key, "an integer", &Value::Number(n.clone()))),
        },
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(key, "an integer", &Value::String(s.clone())))?,
        Some(other) => return Err(invalid(key, "an integer", other)),
    };
    if value < 0 {
        return Err(ComplianceError::InvalidInput(format!(
            "{} must not be negative, got {}",
            key, value
        )));
    }
    Ok(value)
}

fn string_list(raw: &RawParameters, key: &str) -> ComplianceResult<Vec<String>> {
    match present(raw, key) {
        None => Ok(Vec::new()),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| match entry {
                Value::String(s) => Ok(s.clone()),
                other => Err(invalid(key, "a list of strings", other)),
            })
            .collect(),
        Some(other) => Err(invalid(key, "a list of strings", other)),
    }
}

fn object(raw: &RawParameters, key: &str) -> ComplianceResult<Map<String, Value>> {
    match present(raw, key) {
        None => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(invalid(key, "an object", other)),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
