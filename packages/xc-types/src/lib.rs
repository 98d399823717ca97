//! # xc-types
//!
//! Shared value types for competition task scoring.
//!
//! These types are used by:
//! - `xc-scoring`: route optimization, flight validation, task format adapters
//! - `scorer`: JSON output of optimized routes and validation results
//!
//! ## Conventions
//!
//! - **Coordinates**: WGS84 latitude / longitude in decimal degrees
//! - **Distances**: meters on the WGS84 ellipsoid
//! - **Headings**: degrees clockwise from true north
//! - **Timestamps**: UTC time of day (`chrono::NaiveTime`), one task per day

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ── Turnpoint Role ────────────────────────────────────────────────────────────

/// Role of a cylinder within the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnpointRole {
    Takeoff,
    /// Start of speed section
    Sss,
    #[default]
    Turnpoint,
    /// End of speed section
    Ess,
    Goal,
}

impl TurnpointRole {
    /// Lenient parse used by task adapters. Unknown labels are plain turnpoints.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "TAKEOFF" | "TO" => Self::Takeoff,
            "SSS" | "SS" => Self::Sss,
            "ESS" | "ES" => Self::Ess,
            "GOAL" => Self::Goal,
            _ => Self::Turnpoint,
        }
    }
}

/// Start gate direction, only meaningful on the SSS cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartDirection {
    Enter,
    Exit,
}

impl StartDirection {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "ENTER" => Some(Self::Enter),
            "EXIT" => Some(Self::Exit),
            _ => None,
        }
    }
}

// ── Goal Style ────────────────────────────────────────────────────────────────

/// How the final cylinder is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStyle {
    /// Radius containment, like any other turnpoint
    Cylinder,
    /// Heading-difference test against the last leg of the optimized course
    Line,
}

impl FromStr for GoalStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CYLINDER" => Ok(Self::Cylinder),
            "LINE" => Ok(Self::Line),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for GoalStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cylinder => write!(f, "CYLINDER"),
            Self::Line => write!(f, "LINE"),
        }
    }
}

// ── Geographic Types ──────────────────────────────────────────────────────────

/// Bare coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and inside the WGS84 coordinate ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// One cylinder of the task. Immutable once the task is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turnpoint {
    pub lat: f64,
    pub lon: f64,
    /// Cylinder radius in meters (≥ 0)
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub role: TurnpointRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<StartDirection>,
}

impl Turnpoint {
    /// Bare cylinder with no metadata.
    pub fn new(lat: f64, lon: f64, radius: f64) -> Self {
        Self {
            lat,
            lon,
            radius,
            altitude: None,
            name: String::new(),
            description: String::new(),
            role: TurnpointRole::Turnpoint,
            direction: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_role(mut self, role: TurnpointRole) -> Self {
        self.role = role;
        self
    }

    pub fn center(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

/// Position fix sampled from a track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
    /// GPS altitude in meters
    #[serde(default)]
    pub altitude: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64, altitude: f64) -> Self {
        Self { lat, lon, altitude }
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }

    pub fn is_valid(&self) -> bool {
        self.position().is_valid()
    }
}

// ── Optimized Route ───────────────────────────────────────────────────────────

/// Result of one route optimization.
///
/// `points`, `legs` and `headings` hold one entry per remaining cylinder; the
/// final entry is the straight leg into the last cylinder's center.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Opti {
    /// Total route length, meters. Always the sum of `legs`.
    pub distance: f64,
    pub legs: Vec<f64>,
    /// Pivot ("fast") points actually used by the route
    pub points: Vec<LatLon>,
    /// Pivot heading used on each cylinder, degrees
    pub headings: Vec<f64>,
}

// ── Flight ────────────────────────────────────────────────────────────────────

/// A recorded flight: pilot identifier plus time-ordered fixes.
///
/// A `None` fix is a record whose coordinates could not be read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub pilot_id: String,
    pub points: BTreeMap<NaiveTime, Option<Point>>,
}

impl Flight {
    pub fn new(pilot_id: impl Into<String>) -> Self {
        Self {
            pilot_id: pilot_id.into(),
            points: BTreeMap::new(),
        }
    }

    /// Insert a fix. An existing fix at the same timestamp is kept.
    pub fn push(&mut self, timestamp: NaiveTime, point: Option<Point>) {
        self.points.entry(timestamp).or_insert(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ── Validation Result ─────────────────────────────────────────────────────────

/// Output of validating one flight against one task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub pilot_id: String,
    /// Remaining optimized distance to goal per fix, meters.
    /// `None` marks a malformed fix that was skipped.
    pub goal_distances: BTreeMap<NaiveTime, Option<f64>>,
    /// Tag time of each turnpoint reached, in task order
    pub tag_times: Vec<NaiveTime>,
}

impl ValidationResult {
    pub fn reached_goal(&self, turnpoint_count: usize) -> bool {
        turnpoint_count > 0 && self.tag_times.len() == turnpoint_count
    }
}
