//! pwca.rs — PWCA task board JSON
//!
//! Coordinates come as `center: [lat, lon, ...]`, sometimes as strings.
//! The takeoff is the point with id `TO`; speed section limits are tagged
//! with `ss: "SS" | "ES"`. Goals are always lines.

use serde::Deserialize;
use serde_json::Value;
use xc_types::{GoalStyle, Turnpoint, TurnpointRole};

use super::{document, parse_time, promote_goal};
use crate::error::FormatError;
use crate::task::TaskDefinition;

const FORMAT: &str = "pwca";
const TIME_PATTERNS: &[&str] = &["%H:%M", "%H:%M:%S"];

#[derive(Debug, Deserialize)]
struct PwcaDocument {
    task: PwcaTask,
}

#[derive(Debug, Deserialize)]
struct PwcaTask {
    details: PwcaDetails,
    points: Vec<PwcaPoint>,
}

#[derive(Debug, Deserialize)]
struct PwcaDetails {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    open: Option<String>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PwcaPoint {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    ss: Option<String>,
    center: Vec<Value>,
    radius: Value,
}

pub fn parse(value: &Value) -> Result<TaskDefinition, FormatError> {
    let doc: PwcaDocument = document(FORMAT, value)?;
    let details = doc.task.details;

    let mut takeoff = None;
    let mut turnpoints = Vec::with_capacity(doc.task.points.len());
    for (index, point) in doc.task.points.into_iter().enumerate() {
        let (lat, lon) = match point.center.as_slice() {
            [lat, lon, ..] => (number(lat), number(lon)),
            _ => (None, None),
        };
        let (Some(lat), Some(lon), Some(radius)) = (lat, lon, number(&point.radius)) else {
            return Err(FormatError::new(
                FORMAT,
                format!("point {index} ('{}') has no usable center or radius", point.name),
            ));
        };

        let role = if point.id.as_deref() == Some("TO") {
            TurnpointRole::Takeoff
        } else {
            point.ss.as_deref().map(TurnpointRole::from_label).unwrap_or_default()
        };
        let cylinder = Turnpoint::new(lat, lon, radius)
            .with_name(point.name)
            .with_role(role);

        if role == TurnpointRole::Takeoff {
            takeoff = Some(cylinder);
        } else {
            turnpoints.push(cylinder);
        }
    }
    if turnpoints.is_empty() {
        return Err(FormatError::new(FORMAT, "no turnpoints besides takeoff"));
    }
    promote_goal(&mut turnpoints);

    Ok(TaskDefinition {
        date: details.date.map(|d| d.trim().to_string()),
        open: parse_time("open", details.open.as_deref(), TIME_PATTERNS),
        start: parse_time("start", details.start.as_deref(), TIME_PATTERNS),
        stop: parse_time("end", details.end.as_deref(), TIME_PATTERNS),
        takeoff,
        turnpoints,
        goal_style: GoalStyle::Line.to_string(),
    })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "task": {
                "details": {"date": " 2019-07-14 ", "open": "11:30", "start": "12:45", "end": "18:00"},
                "points": [
                    {"id": "TO", "name": "Launch", "center": ["45.0", "6.0", 1800], "radius": 400},
                    {"id": "A01", "name": "Start", "ss": "SS", "center": [45.02, 6.0, 1500], "radius": 3000},
                    {"id": "B02", "name": "Bridge", "center": [45.1, 6.05], "radius": "1000"},
                    {"id": "E03", "name": "End", "ss": "ES", "center": [45.1, 6.2], "radius": 1000},
                    {"id": "G04", "name": "Goal", "center": [45.1, 6.21], "radius": 200}
                ]
            }
        })
    }

    #[test]
    fn test_parse_pwca_task() {
        let def = parse(&sample()).unwrap();

        assert_eq!(def.date.as_deref(), Some("2019-07-14"));
        assert_eq!(def.open, NaiveTime::from_hms_opt(11, 30, 0));
        assert_eq!(def.start, NaiveTime::from_hms_opt(12, 45, 0));
        assert_eq!(def.stop, NaiveTime::from_hms_opt(18, 0, 0));
        assert_eq!(def.goal_style, "LINE");

        let takeoff = def.takeoff.unwrap();
        assert_eq!((takeoff.lat, takeoff.lon), (45.0, 6.0));
        assert_eq!(def.turnpoints.len(), 4);
        assert_eq!(def.turnpoints[0].role, TurnpointRole::Sss);
        assert_eq!(def.turnpoints[1].radius, 1000.0);
        assert_eq!(def.turnpoints[2].role, TurnpointRole::Ess);
        assert_eq!(def.turnpoints[3].role, TurnpointRole::Goal);
    }

    #[test]
    fn test_marked_last_point_keeps_its_role() {
        let mut doc = sample();
        doc["task"]["points"][4]["ss"] = json!("ES");
        let def = parse(&doc).unwrap();
        assert_eq!(def.turnpoints[3].role, TurnpointRole::Ess);
    }

    #[test]
    fn test_malformed_end_time_is_dropped() {
        let mut doc = sample();
        doc["task"]["details"]["end"] = json!("late");
        assert_eq!(parse(&doc).unwrap().stop, None);
    }

    #[test]
    fn test_point_without_center_is_refused() {
        let mut doc = sample();
        doc["task"]["points"][2]["center"] = json!([45.1]);
        let err = parse(&doc).unwrap_err();
        assert!(err.message.contains("Bridge"), "{err}");
    }
}
