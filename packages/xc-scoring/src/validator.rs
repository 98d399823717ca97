//! validator.rs — fix-by-fix replay of a flight against a task
//!
//! State machine over the task's cylinder sequence:
//!
//!   NotStarted ──(first fix at or after start)──▶ Racing { next: 0 }
//!   Racing { next } ──(tag)──▶ Racing { next + 1 }
//!   Racing { last } ──(goal tag)──▶ InGoal
//!
//! Every fix produces one [`StepResult`]; at most one cylinder is tagged per
//! fix. The remaining distance recorded on a tagging fix is the one computed
//! before the tag.

use chrono::NaiveTime;
use tracing::{debug, warn};
use xc_types::{Flight, GoalStyle, LatLon, Opti, Point, ValidationResult};

use crate::geodesic::{heading_delta, GeodesicProvider, Wgs84};
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceState {
    /// Before the start time; distance is measured against the whole course
    NotStarted,
    /// Index of the next cylinder to tag
    Racing { next: usize },
    InGoal,
}

/// Outcome of feeding one fix to the validator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepResult {
    /// Malformed fix, nothing computed
    Skipped,
    /// Remaining optimized distance to goal, meters
    Distance(f64),
    /// Cylinder `index` was tagged on this fix
    Tagged { index: usize, distance: f64 },
}

impl StepResult {
    pub fn distance(&self) -> Option<f64> {
        match self {
            Self::Skipped => None,
            Self::Distance(d) | Self::Tagged { distance: d, .. } => Some(*d),
        }
    }
}

/// Goal line test: the heading to the goal center has swung past the
/// tolerance relative to the last leg of the course.
pub fn crosses_goal_line(heading_to_goal: f64, last_leg_heading: f64, tolerance_deg: f64) -> bool {
    heading_delta(heading_to_goal, last_leg_heading) > tolerance_deg
}

pub struct FlightValidator<'t, G = Wgs84> {
    task: &'t Task<G>,
    state: RaceState,
    warm_start: Option<Opti>,
}

impl<'t, G: GeodesicProvider> FlightValidator<'t, G> {
    pub fn new(task: &'t Task<G>) -> Self {
        let state = if task.start().is_some() {
            RaceState::NotStarted
        } else {
            RaceState::Racing { next: 0 }
        };
        Self {
            task,
            state,
            warm_start: None,
        }
    }

    pub fn state(&self) -> RaceState {
        self.state
    }

    /// Replay every fix of `flight` in timestamp order.
    pub fn run(mut self, flight: &Flight) -> ValidationResult {
        let mut result = ValidationResult {
            pilot_id: flight.pilot_id.clone(),
            ..Default::default()
        };

        for (&timestamp, fix) in &flight.points {
            let step = self.step(timestamp, fix.as_ref());
            if let StepResult::Tagged { index, .. } = step {
                debug!(
                    "{} tagged turnpoint {index} at {timestamp}, {} remaining",
                    flight.pilot_id,
                    self.task.turnpoints().len() - index - 1
                );
                result.tag_times.push(timestamp);
            }
            result.goal_distances.insert(timestamp, step.distance());
        }

        result
    }

    /// Advance the state machine by one fix.
    pub fn step(&mut self, timestamp: NaiveTime, fix: Option<&Point>) -> StepResult {
        let Some(point) = fix.filter(|p| p.is_valid()) else {
            return StepResult::Skipped;
        };
        let position = point.position();

        let next = match self.state {
            RaceState::InGoal => return StepResult::Distance(0.0),
            RaceState::Racing { next } => next,
            RaceState::NotStarted => {
                if self.task.start().is_some_and(|start| timestamp < start) {
                    return StepResult::Distance(self.remaining(position, 0));
                }
                self.state = RaceState::Racing { next: 0 };
                0
            }
        };

        let distance = self.remaining(position, next);
        if !self.tags(position, next) {
            return StepResult::Distance(distance);
        }

        self.state = if next + 1 == self.task.turnpoints().len() {
            RaceState::InGoal
        } else {
            RaceState::Racing { next: next + 1 }
        };
        StepResult::Tagged { index: next, distance }
    }

    /// Optimized distance from `position` through `cylinders[from..]`.
    fn remaining(&mut self, position: LatLon, from: usize) -> f64 {
        let cylinders = self.task.turnpoints().get(from..).unwrap_or_default();
        match self
            .task
            .optimizer()
            .optimize(position, cylinders, self.warm_start.as_ref())
        {
            Ok(opti) => {
                let distance = opti.distance;
                self.warm_start = Some(opti);
                distance
            }
            Err(e) => {
                warn!("No route from cylinder {from} ({e}), recording 0 m");
                0.0
            }
        }
    }

    fn tags(&self, position: LatLon, index: usize) -> bool {
        let cylinders = self.task.turnpoints();
        let Some(tp) = cylinders.get(index) else {
            return false;
        };
        let geodesic = self.task.optimizer().geodesic();

        if index + 1 == cylinders.len() && self.task.goal_style() == GoalStyle::Line {
            let to_goal = geodesic.inverse_or_estimate(position, tp.center());
            // No heading on the center itself, so it never counts as crossed
            to_goal.distance > 0.0
                && crosses_goal_line(
                    to_goal.heading,
                    self.task.last_leg_heading(),
                    self.task.config().goal_line_tolerance_deg,
                )
        } else {
            geodesic.distance(position, tp.center()) <= tp.radius
        }
    }
}
