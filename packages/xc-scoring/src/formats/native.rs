//! native.rs — this crate's own task document
//!
//! ```json
//! {"date": "2024-06-01", "open": "11:00", "start": "12:00", "stop": "18:00",
//!  "goal_style": "LINE",
//!  "takeoff": {"lat": 45.0, "lon": 6.0, "radius": 400},
//!  "turnpoints": [{"lat": 45.1, "lon": 6.1, "radius": 1000, "role": "SSS"}]}
//! ```

use serde::Deserialize;
use serde_json::Value;
use xc_types::{GoalStyle, Turnpoint};

use super::{document, parse_time};
use crate::error::FormatError;
use crate::task::TaskDefinition;

const FORMAT: &str = "native";
const TIME_PATTERNS: &[&str] = &["%H:%M:%S", "%H:%M"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NativeTask {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    open: Option<String>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    stop: Option<String>,
    #[serde(default)]
    goal_style: Option<String>,
    #[serde(default)]
    takeoff: Option<Turnpoint>,
    turnpoints: Vec<Turnpoint>,
}

pub fn parse(value: &Value) -> Result<TaskDefinition, FormatError> {
    let doc: NativeTask = document(FORMAT, value)?;

    Ok(TaskDefinition {
        date: doc.date,
        open: parse_time("open", doc.open.as_deref(), TIME_PATTERNS),
        start: parse_time("start", doc.start.as_deref(), TIME_PATTERNS),
        stop: parse_time("stop", doc.stop.as_deref(), TIME_PATTERNS),
        takeoff: doc.takeoff,
        turnpoints: doc.turnpoints,
        goal_style: doc.goal_style.unwrap_or_else(|| GoalStyle::Line.to_string()),
    })
}
