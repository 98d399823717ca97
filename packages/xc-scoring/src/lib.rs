//! # xc-scoring
//!
//! Scoring core for paragliding / hang-gliding race-to-goal tasks.
//!
//! - [`optimizer`]: pivot-point shortest-route heuristic through cylinders
//! - [`validator`]: fix-by-fix replay of a flight against a task
//! - [`task`]: immutable task with its full-course optimization
//! - [`formats`]: XCTrack, PWCA, native and raw task adapters
//! - [`igc`]: flight recorder track reader
//! - [`race`]: parallel validation of a field of flights
//!
//! All distances are meters on the WGS84 ellipsoid, through [`geodesic`].

pub mod config;
pub mod error;
pub mod formats;
pub mod geodesic;
pub mod igc;
pub mod optimizer;
pub mod race;
pub mod task;
pub mod validator;

pub use config::ScoringConfig;
pub use error::{ConfigurationError, FormatError, GeometryError, TaskLoadError, TrackError};
pub use geodesic::{GeodesicProvider, Inverse, Wgs84};
pub use optimizer::RouteOptimizer;
pub use race::{Race, RaceResults};
pub use task::{Task, TaskDefinition};
pub use validator::{FlightValidator, RaceState, StepResult};
