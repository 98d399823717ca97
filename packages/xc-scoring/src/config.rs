//! config.rs — tunable scoring constants
//!
//! Deserialized from the `[scoring]` table of the scorer config file. Missing
//! keys fall back to the defaults below; environment variables win over both.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::optimizer::DEFAULT_MIN_TURNPOINT_DISTANCE_M;

/// Heading difference beyond which a LINE goal counts as crossed (degrees).
pub const DEFAULT_GOAL_LINE_TOLERANCE_DEG: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Centers closer than this are treated as concentric (meters)
    pub min_turnpoint_distance_m: f64,
    pub goal_line_tolerance_deg: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_turnpoint_distance_m: DEFAULT_MIN_TURNPOINT_DISTANCE_M,
            goal_line_tolerance_deg: DEFAULT_GOAL_LINE_TOLERANCE_DEG,
        }
    }
}

impl ScoringConfig {
    /// Apply `XC_MIN_TURNPOINT_DISTANCE_M` / `XC_GOAL_LINE_TOLERANCE_DEG`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_f64("XC_MIN_TURNPOINT_DISTANCE_M") {
            self.min_turnpoint_distance_m = v;
        }
        if let Some(v) = env_f64("XC_GOAL_LINE_TOLERANCE_DEG") {
            self.goal_line_tolerance_deg = v;
        }
        self
    }
}

fn env_f64(key: &str) -> Option<f64> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => {
            warn!("Ignoring {key}={raw:?}: expected a non-negative number");
            None
        }
    }
}
