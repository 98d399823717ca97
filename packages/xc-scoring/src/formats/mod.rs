//! formats — task file adapters
//!
//! Each adapter reads one task file dialect into a [`TaskDefinition`] or
//! refuses it with a [`FormatError`]. [`parse_task`] tries them in priority
//! order and reports every refusal when none fits.

pub mod native;
pub mod pwca;
pub mod raw;
pub mod xctrack;

use chrono::NaiveTime;
use serde_json::Value;
use tracing::{debug, warn};
use xc_types::{Turnpoint, TurnpointRole};

use crate::error::{ConfigurationError, FormatError};
use crate::task::TaskDefinition;

type Adapter = fn(&Value) -> Result<TaskDefinition, FormatError>;

const ADAPTERS: [Adapter; 4] = [xctrack::parse, pwca::parse, native::parse, raw::parse];

/// Sniff the dialect of a task document.
pub fn parse_task(value: &Value) -> Result<TaskDefinition, ConfigurationError> {
    let mut failures = Vec::with_capacity(ADAPTERS.len());
    for adapter in ADAPTERS {
        match adapter(value) {
            Ok(def) => return Ok(def),
            Err(e) => {
                debug!("Task adapter refused document: {e}");
                failures.push(e);
            }
        }
    }
    Err(ConfigurationError::UnrecognizedFormat(failures))
}

/// Deserialize `value` into an adapter's document type.
pub(crate) fn document<T: serde::de::DeserializeOwned>(
    format: &'static str,
    value: &Value,
) -> Result<T, FormatError> {
    T::deserialize(value).map_err(|e| FormatError::new(format, e.to_string()))
}

/// Parse a time of day with the first matching pattern. Unreadable times are
/// logged and dropped.
pub(crate) fn parse_time(field: &str, raw: Option<&str>, patterns: &[&str]) -> Option<NaiveTime> {
    let raw = raw?.trim();
    let parsed = patterns
        .iter()
        .find_map(|p| NaiveTime::parse_from_str(raw, p).ok());
    if parsed.is_none() {
        warn!("Ignoring unreadable {field} time {raw:?}");
    }
    parsed
}

/// A trailing plain turnpoint is the goal.
pub(crate) fn promote_goal(turnpoints: &mut [Turnpoint]) {
    if let Some(last) = turnpoints.last_mut().filter(|tp| tp.role == TurnpointRole::Turnpoint) {
        last.role = TurnpointRole::Goal;
    }
}
