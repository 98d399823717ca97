//! xctrack.rs — XCTrack `.xctsk` task files

use chrono::{NaiveTime, TimeDelta};
use serde::Deserialize;
use serde_json::Value;
use xc_types::{GoalStyle, StartDirection, Turnpoint, TurnpointRole};

use super::{document, parse_time, promote_goal};
use crate::error::FormatError;
use crate::task::TaskDefinition;

const FORMAT: &str = "xctrack";
const TIME_PATTERNS: &[&str] = &["%H:%M:%SZ", "%H:%M:%S", "%H:%MZ"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct XcTask {
    turnpoints: Vec<XcTurnpoint>,
    #[serde(default)]
    sss: Option<XcStart>,
    #[serde(default)]
    goal: Option<XcGoal>,
}

#[derive(Debug, Deserialize)]
struct XcTurnpoint {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    radius: f64,
    waypoint: XcWaypoint,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct XcWaypoint {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    alt_smoothed: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct XcStart {
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    time_gates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct XcGoal {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    deadline: Option<String>,
}

pub fn parse(value: &Value) -> Result<TaskDefinition, FormatError> {
    let doc: XcTask = document(FORMAT, value)?;
    if doc.turnpoints.iter().all(|tp| tp.kind.as_deref() == Some("TAKEOFF")) {
        return Err(FormatError::new(FORMAT, "no turnpoints besides takeoff"));
    }

    let direction = doc
        .sss
        .as_ref()
        .and_then(|s| s.direction.as_deref())
        .and_then(StartDirection::from_label);

    let mut takeoff = None;
    let mut turnpoints = Vec::with_capacity(doc.turnpoints.len());
    for tp in doc.turnpoints {
        let role = tp.kind.as_deref().map(TurnpointRole::from_label).unwrap_or_default();
        let mut cylinder = Turnpoint {
            altitude: tp.waypoint.alt_smoothed,
            description: tp.waypoint.description,
            role,
            ..Turnpoint::new(tp.waypoint.lat, tp.waypoint.lon, tp.radius).with_name(tp.waypoint.name)
        };
        match role {
            TurnpointRole::Takeoff => takeoff = Some(cylinder),
            TurnpointRole::Sss => {
                cylinder.direction = direction;
                turnpoints.push(cylinder);
            }
            _ => turnpoints.push(cylinder),
        }
    }
    promote_goal(&mut turnpoints);

    let start = parse_time(
        "start",
        doc.sss.as_ref().and_then(|s| s.time_gates.first()).map(String::as_str),
        TIME_PATTERNS,
    );
    let stop = parse_time(
        "deadline",
        doc.goal.as_ref().and_then(|g| g.deadline.as_deref()),
        TIME_PATTERNS,
    );
    let goal_style = doc
        .goal
        .and_then(|g| g.kind)
        .unwrap_or_else(|| GoalStyle::Cylinder.to_string());

    Ok(TaskDefinition {
        date: None,
        open: start.map(hour_before),
        start,
        stop,
        takeoff,
        turnpoints,
        goal_style,
    })
}

/// Window opens an hour before the first start gate, never before midnight.
fn hour_before(start: NaiveTime) -> NaiveTime {
    match start.overflowing_sub_signed(TimeDelta::hours(1)) {
        (open, 0) => open,
        _ => NaiveTime::default(),
    }
}
