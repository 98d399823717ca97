//! raw.rs — bare list of cylinders
//!
//! `[{"lat": .., "lon": .., "radius": ..}, ...]`. The first entry is the
//! takeoff; no time window; LINE goal.

use serde::Deserialize;
use serde_json::Value;
use xc_types::{GoalStyle, Turnpoint, TurnpointRole};

use super::document;
use crate::error::FormatError;
use crate::task::TaskDefinition;

const FORMAT: &str = "raw";

#[derive(Debug, Deserialize)]
struct RawCylinder {
    lat: f64,
    lon: f64,
    radius: f64,
}

pub fn parse(value: &Value) -> Result<TaskDefinition, FormatError> {
    let cylinders: Vec<RawCylinder> = document(FORMAT, value)?;
    if cylinders.len() < 2 {
        return Err(FormatError::new(FORMAT, "need a takeoff and at least one turnpoint"));
    }

    let mut turnpoints: Vec<Turnpoint> = cylinders
        .into_iter()
        .map(|c| Turnpoint::new(c.lat, c.lon, c.radius))
        .collect();
    let takeoff = turnpoints.remove(0).with_role(TurnpointRole::Takeoff);

    Ok(TaskDefinition {
        takeoff: Some(takeoff),
        turnpoints,
        goal_style: GoalStyle::Line.to_string(),
        ..Default::default()
    })
}
