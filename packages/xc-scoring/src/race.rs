//! race.rs — validate a whole field of flights against one task
//!
//! Flights are independent, so validation fans out over the rayon pool.
//! Earliest tag time per cylinder is merged afterwards on the calling thread.

use std::path::Path;

use chrono::NaiveTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use xc_types::{Flight, ValidationResult};

use crate::error::TrackError;
use crate::geodesic::{GeodesicProvider, Wgs84};
use crate::igc;
use crate::task::Task;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceResults {
    pub results: Vec<ValidationResult>,
    /// Earliest tag of each cylinder across all flights, `None` if untagged
    pub first_tags: Vec<Option<NaiveTime>>,
}

impl RaceResults {
    /// Pilots who tagged every cylinder.
    pub fn in_goal(&self) -> impl Iterator<Item = &ValidationResult> + '_ {
        let n = self.first_tags.len();
        self.results.iter().filter(move |r| r.reached_goal(n))
    }
}

pub struct Race<'t, G = Wgs84> {
    task: &'t Task<G>,
}

impl<'t, G: GeodesicProvider> Race<'t, G> {
    pub fn new(task: &'t Task<G>) -> Self {
        Self { task }
    }

    pub fn validate_all(&self, flights: &[Flight]) -> RaceResults {
        let results: Vec<ValidationResult> = flights
            .par_iter()
            .map(|flight| self.task.validate(flight))
            .collect();

        let first_tags = first_tags(&results, self.task.turnpoints().len());
        let race = RaceResults { results, first_tags };

        info!(
            "Race validated: {} flights, {} in goal",
            race.results.len(),
            race.in_goal().count()
        );
        race
    }
}

/// Min-merge of per-flight tag times, one slot per cylinder.
pub fn first_tags(results: &[ValidationResult], turnpoint_count: usize) -> Vec<Option<NaiveTime>> {
    let mut first = vec![None; turnpoint_count];
    for result in results {
        for (slot, &tag) in first.iter_mut().zip(&result.tag_times) {
            *slot = Some(slot.map_or(tag, |current: NaiveTime| current.min(tag)));
        }
    }
    first
}

/// Read every `*.igc` file in `dir`. Unreadable tracks are logged and skipped.
pub fn load_tracks(dir: impl AsRef<Path>) -> Result<Vec<Flight>, TrackError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|source| TrackError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("igc"))
        })
        .collect();
    paths.sort();

    let flights: Vec<Flight> = paths
        .par_iter()
        .filter_map(|path| match igc::read_flight(path) {
            Ok(flight) => Some(flight),
            Err(e) => {
                warn!("Skipping track {}: {e}", path.display());
                None
            }
        })
        .collect();

    info!("Loaded {} of {} tracks from {}", flights.len(), paths.len(), dir.display());
    Ok(flights)
}
