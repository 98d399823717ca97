//! task.rs — immutable competition task
//!
//! Built once from a [`TaskDefinition`] (any task file format), then shared
//! read-only by every flight validation. Construction checks the time window
//! and turnpoint geometry, and precomputes the full-course optimization from
//! takeoff.

use std::path::Path;

use chrono::{NaiveTime, TimeDelta};
use tracing::{info, warn};
use xc_types::{Flight, GoalStyle, Opti, Turnpoint, TurnpointRole, ValidationResult};

use crate::config::ScoringConfig;
use crate::error::{ConfigurationError, TaskLoadError};
use crate::formats;
use crate::geodesic::{normalize_heading, GeodesicProvider, Wgs84};
use crate::optimizer::RouteOptimizer;
use crate::validator::FlightValidator;

/// Stop time used when a task has none, or an unreadable one.
pub const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(t) => t,
    None => panic!("23:59:59 is a valid time"),
};

// ── Definition ────────────────────────────────────────────────────────────────

/// Format-independent task description, as produced by the task adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDefinition {
    pub date: Option<String>,
    pub open: Option<NaiveTime>,
    pub start: Option<NaiveTime>,
    pub stop: Option<NaiveTime>,
    /// Defaults to the first cylinder when absent
    pub takeoff: Option<Turnpoint>,
    pub turnpoints: Vec<Turnpoint>,
    pub goal_style: String,
}

impl Default for TaskDefinition {
    fn default() -> Self {
        Self {
            date: None,
            open: None,
            start: None,
            stop: None,
            takeoff: None,
            turnpoints: Vec::new(),
            goal_style: GoalStyle::Line.to_string(),
        }
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Task<G = Wgs84> {
    date: Option<String>,
    open: Option<NaiveTime>,
    start: Option<NaiveTime>,
    stop: NaiveTime,
    takeoff: Turnpoint,
    turnpoints: Vec<Turnpoint>,
    sss: Option<usize>,
    ess: Option<usize>,
    goal_style: GoalStyle,
    last_leg_heading: f64,
    opti: Opti,
    optimizer: RouteOptimizer<G>,
    config: ScoringConfig,
}

impl Task<Wgs84> {
    pub fn new(def: TaskDefinition, config: ScoringConfig) -> Result<Self, ConfigurationError> {
        Self::with_provider(def, config, Wgs84)
    }

    /// Sniff the task format of a JSON document and build the task.
    pub fn from_json(text: &str, config: ScoringConfig) -> Result<Self, TaskLoadError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let def = formats::parse_task(&value)?;
        Ok(Self::new(def, config)?)
    }

    pub fn from_file(path: impl AsRef<Path>, config: ScoringConfig) -> Result<Self, TaskLoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TaskLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, config)
    }
}

impl<G: GeodesicProvider> Task<G> {
    pub fn with_provider(
        def: TaskDefinition,
        config: ScoringConfig,
        geodesic: G,
    ) -> Result<Self, ConfigurationError> {
        if def.turnpoints.is_empty() {
            return Err(ConfigurationError::EmptyTask);
        }
        for (index, tp) in def.turnpoints.iter().enumerate() {
            check_turnpoint(index, tp)?;
        }

        let goal_style = def
            .goal_style
            .parse::<GoalStyle>()
            .map_err(ConfigurationError::UnknownGoalStyle)?;
        let stop = check_window(def.open, def.start, def.stop)?;

        let takeoff = match def.takeoff {
            Some(tp) => {
                if !tp.center().is_valid() {
                    return Err(ConfigurationError::InvalidTurnpoint {
                        index: 0,
                        name: tp.name,
                        reason: "takeoff coordinates out of range",
                    });
                }
                tp
            }
            None => {
                warn!("Task has no takeoff, measuring the course from the first cylinder");
                def.turnpoints[0].clone().with_role(TurnpointRole::Takeoff)
            }
        };

        let sss = def.turnpoints.iter().position(|tp| tp.role == TurnpointRole::Sss);
        let ess = def.turnpoints.iter().position(|tp| tp.role == TurnpointRole::Ess);

        let optimizer = RouteOptimizer::with_provider(geodesic, config.min_turnpoint_distance_m);
        let opti = optimizer.optimize(takeoff.center(), &def.turnpoints, None)?;
        let last_leg_heading = opti.headings.last().copied().map(normalize_heading).unwrap_or(0.0);

        info!(
            "Task built: {} turnpoints, {:.0} m optimized, {} goal, window {:?}-{}",
            def.turnpoints.len(),
            opti.distance,
            goal_style,
            def.start,
            stop
        );

        Ok(Self {
            date: def.date,
            open: def.open,
            start: def.start,
            stop,
            takeoff,
            turnpoints: def.turnpoints,
            sss,
            ess,
            goal_style,
            last_leg_heading,
            opti,
            optimizer,
            config,
        })
    }

    /// Replay `flight` against this task.
    pub fn validate(&self, flight: &Flight) -> ValidationResult {
        FlightValidator::new(self).run(flight)
    }

    /// Every second of the race window, from start (or open, or midnight)
    /// up to but excluding stop.
    pub fn timerange(&self) -> impl Iterator<Item = NaiveTime> {
        let first = self.start.or(self.open).unwrap_or_default();
        let seconds = (self.stop - first).num_seconds();
        (0..seconds).map(move |s| first + TimeDelta::seconds(s))
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn open(&self) -> Option<NaiveTime> {
        self.open
    }

    pub fn start(&self) -> Option<NaiveTime> {
        self.start
    }

    pub fn stop(&self) -> NaiveTime {
        self.stop
    }

    pub fn takeoff(&self) -> &Turnpoint {
        &self.takeoff
    }

    /// Ordered cylinder sequence, takeoff excluded.
    pub fn turnpoints(&self) -> &[Turnpoint] {
        &self.turnpoints
    }

    /// Index of the start-of-speed-section cylinder.
    pub fn sss(&self) -> Option<usize> {
        self.sss
    }

    /// Index of the end-of-speed-section cylinder.
    pub fn ess(&self) -> Option<usize> {
        self.ess
    }

    pub fn goal_style(&self) -> GoalStyle {
        self.goal_style
    }

    /// Heading of the final leg of the full-course route, degrees.
    pub fn last_leg_heading(&self) -> f64 {
        self.last_leg_heading
    }

    /// Full-course optimization from takeoff.
    pub fn opti(&self) -> &Opti {
        &self.opti
    }

    pub fn optimizer(&self) -> &RouteOptimizer<G> {
        &self.optimizer
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

// ── Checks ────────────────────────────────────────────────────────────────────

fn check_turnpoint(index: usize, tp: &Turnpoint) -> Result<(), ConfigurationError> {
    let reason = if !tp.center().is_valid() {
        "coordinates out of range"
    } else if !tp.radius.is_finite() || tp.radius < 0.0 {
        "radius must be finite and non-negative"
    } else {
        return Ok(());
    };
    Err(ConfigurationError::InvalidTurnpoint {
        index,
        name: tp.name.clone(),
        reason,
    })
}

/// Returns the effective stop time.
fn check_window(
    open: Option<NaiveTime>,
    start: Option<NaiveTime>,
    stop: Option<NaiveTime>,
) -> Result<NaiveTime, ConfigurationError> {
    let effective = stop.unwrap_or(END_OF_DAY);
    let invalid = |reason| ConfigurationError::InvalidTimeWindow {
        reason,
        open,
        start,
        stop: effective,
    };

    if let (Some(open), Some(start)) = (open, start) {
        if open > start {
            return Err(invalid("open is after start"));
        }
    }
    if let (Some(start), Some(stop)) = (start, stop) {
        if stop <= start {
            return Err(invalid("stop is not after start"));
        }
    }
    Ok(effective)
}
