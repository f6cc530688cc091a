use crate::error::{Error, Result};
use crate::geom::{Size, Vector, half_diagonal, size, vector};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Largest distance a floating node strays from its base position (6px + 3px oscillators).
pub const MAX_FLOAT_AMPLITUDE: f64 = 9.0;

/// Tunables shared by both solver variants.
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```json
/// { "nodeWidth": 96, "nodeHeight": 144, "randomSeed": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Footprint of one item marker (poster card).
    pub node_width: f64,
    pub node_height: f64,
    /// Footprint of the center-anchored source marker.
    pub anchor_width: f64,
    pub anchor_height: f64,
    /// Gap kept between the anchor footprint and the innermost ring.
    pub exclusion_margin: f64,
    /// Gap kept between a floating node and the canvas edge or the dock.
    pub safety_margin: f64,
    /// `minNodeDistance = min_distance_factor × node diagonal`.
    pub min_distance_factor: f64,
    pub stretch_x: f64,
    pub stretch_y: f64,
    pub center_max_attempts: usize,
    pub corner_max_attempts: usize,
    pub corner_inner_radius: f64,
    pub corner_outer_radius_cap: f64,
    pub corner_angle_step_deg: f64,
    pub corner_jitter_deg: f64,
    pub corner_radius_fallback: f64,
    pub float_speed_min: f64,
    pub float_speed_max: f64,
    /// Fixed seed for reproducible layouts; `None` draws a fresh seed per solver instance.
    pub random_seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 80.0,
            node_height: 120.0,
            anchor_width: 120.0,
            anchor_height: 180.0,
            exclusion_margin: 20.0,
            safety_margin: 10.0,
            min_distance_factor: 1.1,
            stretch_x: 1.15,
            stretch_y: 0.82,
            center_max_attempts: 50,
            corner_max_attempts: 150,
            corner_inner_radius: 200.0,
            corner_outer_radius_cap: 900.0,
            corner_angle_step_deg: 3.0,
            corner_jitter_deg: 15.0,
            corner_radius_fallback: 80.0,
            float_speed_min: 0.001,
            float_speed_max: 0.0025,
            random_seed: None,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deep-merges a (possibly partial) JSON object over the current values.
    pub fn apply_overrides(&mut self, overrides: &Value) -> Result<()> {
        let mut merged = serde_json::to_value(&*self)?;
        deep_merge_value(&mut merged, overrides);
        let next: Self = serde_json::from_value(merged)?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("nodeWidth", self.node_width),
            ("nodeHeight", self.node_height),
            ("anchorWidth", self.anchor_width),
            ("anchorHeight", self.anchor_height),
            ("stretchX", self.stretch_x),
            ("stretchY", self.stretch_y),
            ("cornerInnerRadius", self.corner_inner_radius),
            ("cornerAngleStepDeg", self.corner_angle_step_deg),
            ("floatSpeedMin", self.float_speed_min),
        ];
        for (key, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig {
                    key,
                    message: format!("expected a positive number, got {v}"),
                });
            }
        }
        let non_negative = [
            ("exclusionMargin", self.exclusion_margin),
            ("safetyMargin", self.safety_margin),
            ("cornerJitterDeg", self.corner_jitter_deg),
            ("cornerRadiusFallback", self.corner_radius_fallback),
        ];
        for (key, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::InvalidConfig {
                    key,
                    message: format!("expected a non-negative number, got {v}"),
                });
            }
        }
        if !(self.min_distance_factor.is_finite() && self.min_distance_factor >= 1.0) {
            return Err(Error::InvalidConfig {
                key: "minDistanceFactor",
                message: format!("must be at least 1.0, got {}", self.min_distance_factor),
            });
        }
        if !(self.corner_outer_radius_cap >= self.corner_inner_radius) {
            return Err(Error::InvalidConfig {
                key: "cornerOuterRadiusCap",
                message: "must not be smaller than cornerInnerRadius".to_string(),
            });
        }
        if !(self.float_speed_max.is_finite() && self.float_speed_max >= self.float_speed_min) {
            return Err(Error::InvalidConfig {
                key: "floatSpeedMax",
                message: "must not be smaller than floatSpeedMin".to_string(),
            });
        }
        Ok(())
    }

    pub fn node_size(&self) -> Size {
        size(self.node_width, self.node_height)
    }

    pub fn anchor_size(&self) -> Size {
        size(self.anchor_width, self.anchor_height)
    }

    pub fn min_node_distance(&self) -> f64 {
        2.0 * half_diagonal(self.node_size()) * self.min_distance_factor
    }

    /// Per-axis distance a node center must keep from the canvas edge.
    pub fn edge_clearance(&self) -> Vector {
        vector(
            self.node_width / 2.0 + MAX_FLOAT_AMPLITUDE + self.safety_margin,
            self.node_height / 2.0 + MAX_FLOAT_AMPLITUDE + self.safety_margin,
        )
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
