//! optimizer.rs — pivot-point route optimizer
//!
//! Approximates the shortest route from a position through an ordered list
//! of cylinders. Each cylinder is touched at a single "pivot" point found by
//! bisecting the turn between the incoming and outgoing legs:
//!
//!   pivot_heading  = in_heading + angle / 2
//!   pivot_distance = 2 · d_in · d_out · cos(angle / 2) / (d_in + d_out)
//!
//! capped at the cylinder radius. One pass, no iteration to convergence: the
//! route is slightly longer than the true optimum but cheap enough to run on
//! every fix of every flight.
//!
//! The final cylinder is always reached by a straight leg to its center.

use tracing::{trace, Level};
use xc_types::{LatLon, Opti, Turnpoint};

use crate::error::ConfigurationError;
use crate::geodesic::{normalize_heading, signed_angle, GeodesicProvider, Wgs84};

/// Centers closer than this are treated as the same cylinder (meters).
pub const DEFAULT_MIN_TURNPOINT_DISTANCE_M: f64 = 5.0;

// ── Pivot geometry ────────────────────────────────────────────────────────────

/// Length of the turn bisector between the incoming and outgoing legs.
///
/// `angle` is the signed turn in degrees between the heading back to the
/// previous pivot and the heading to the next center.
pub fn pivot_distance(in_distance: f64, out_distance: f64, angle: f64) -> f64 {
    let total = in_distance + out_distance;
    if total <= 0.0 {
        return 0.0;
    }
    (2.0 * in_distance * out_distance * (angle / 2.0).to_radians().cos()) / total
}

/// Offset actually flown from the cylinder center. Never beyond the boundary.
pub fn capped_offset(pivot_distance: f64, radius: f64) -> f64 {
    // f64::min ignores a NaN operand, so a degenerate bisector falls back to the radius
    pivot_distance.min(radius).max(0.0)
}

// ── Optimizer ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RouteOptimizer<G = Wgs84> {
    geodesic: G,
    min_turnpoint_distance: f64,
}

impl RouteOptimizer<Wgs84> {
    pub fn new(min_turnpoint_distance: f64) -> Self {
        Self::with_provider(Wgs84, min_turnpoint_distance)
    }
}

impl Default for RouteOptimizer<Wgs84> {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TURNPOINT_DISTANCE_M)
    }
}

impl<G: GeodesicProvider> RouteOptimizer<G> {
    pub fn with_provider(geodesic: G, min_turnpoint_distance: f64) -> Self {
        Self {
            geodesic,
            min_turnpoint_distance,
        }
    }

    pub fn geodesic(&self) -> &G {
        &self.geodesic
    }

    /// Optimize the route from `position` through `turnpoints`, in order.
    ///
    /// `warm_start` is the previous result for the same flight. It only keeps
    /// the reported pivot headings on the same 360° branch between calls;
    /// distances and pivot points do not depend on it.
    pub fn optimize(
        &self,
        position: LatLon,
        turnpoints: &[Turnpoint],
        warm_start: Option<&Opti>,
    ) -> Result<Opti, ConfigurationError> {
        let goal = turnpoints.last().ok_or(ConfigurationError::EmptyRoute)?;

        let n = turnpoints.len();
        let mut legs = Vec::with_capacity(n);
        let mut points = Vec::with_capacity(n);
        let mut headings = Vec::with_capacity(n);
        let mut last = position;

        for (i, pair) in turnpoints.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            let center = current.center();

            // Incoming leg as seen from the cylinder: heading back to the last pivot
            let incoming = self.geodesic.inverse_or_estimate(center, last);
            let outgoing = self.geodesic.inverse_or_estimate(center, next.center());

            let (heading, distance) = if outgoing.distance < self.min_turnpoint_distance {
                // Concentric: no usable bisector, touch the boundary facing the pilot
                if tracing::enabled!(Level::TRACE) {
                    let distinct = self.next_distinct(turnpoints, i);
                    trace!(
                        "Turnpoint {i} concentric with {} following cylinder(s)",
                        distinct.unwrap_or(n) - i - 1
                    );
                }
                (incoming.heading, current.radius)
            } else {
                let angle = signed_angle(incoming.heading, outgoing.heading);
                (
                    incoming.heading + angle / 2.0,
                    pivot_distance(incoming.distance, outgoing.distance, angle),
                )
            };

            let offset = capped_offset(distance, current.radius);
            let pivot = if offset > 0.0 {
                self.geodesic.direct_or_estimate(center, heading, offset)
            } else {
                center
            };

            legs.push(self.geodesic.distance(last, pivot));
            points.push(pivot);
            headings.push(normalize_heading(heading));
            last = pivot;
        }

        // Straight finish into the last center, no cap
        let finish = self.geodesic.inverse_or_estimate(last, goal.center());
        legs.push(finish.distance);
        points.push(goal.center());
        headings.push(finish.heading);

        if let Some(previous) = warm_start {
            unwrap_headings(&mut headings, previous);
        }

        Ok(Opti {
            distance: legs.iter().sum(),
            legs,
            points,
            headings,
        })
    }

    /// Index of the first cylinder after `index` whose center is distinct.
    fn next_distinct(&self, turnpoints: &[Turnpoint], index: usize) -> Option<usize> {
        let center = turnpoints[index].center();
        turnpoints
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, tp)| self.geodesic.distance(center, tp.center()) >= self.min_turnpoint_distance)
            .map(|(i, _)| i)
    }
}

/// Put each heading on the branch nearest to the previous call's heading for
/// the same cylinder. The previous result covered the same tail or a longer one.
fn unwrap_headings(headings: &mut [f64], previous: &Opti) {
    let Some(offset) = previous.headings.len().checked_sub(headings.len()) else {
        return;
    };
    for (h, prev) in headings.iter_mut().zip(&previous.headings[offset..]) {
        if prev.is_finite() {
            *h = prev + signed_angle(*prev, *h);
        }
    }
}
