//! Shared builders for integration tests: synthetic courses, fixes and
//! IGC text.
#![allow(dead_code)]

use chrono::NaiveTime;
use xc_scoring::{GeodesicProvider, ScoringConfig, Task, TaskDefinition, Wgs84};
use xc_types::{Flight, LatLon, Point, Turnpoint, TurnpointRole};

pub const TAKEOFF: LatLon = LatLon { lat: 45.0, lon: 6.0 };

pub fn offset(from: LatLon, heading: f64, distance: f64) -> LatLon {
    Wgs84.direct(from, heading, distance).unwrap()
}

/// Seconds after noon.
pub fn at(seconds: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(12 * 3600 + seconds, 0).unwrap()
}

pub fn fix(p: LatLon) -> Option<Point> {
    Some(Point::new(p.lat, p.lon, 1_200.0))
}

pub fn cylinder(p: LatLon, radius: f64) -> Turnpoint {
    Turnpoint::new(p.lat, p.lon, radius)
}

/// Takeoff, 5 km north, 6 km east, 4 km south into goal.
pub fn course() -> Vec<Turnpoint> {
    let c1 = offset(TAKEOFF, 0.0, 5_000.0);
    let c2 = offset(c1, 90.0, 6_000.0);
    let goal = offset(c2, 180.0, 4_000.0);
    vec![
        cylinder(c1, 1_000.0).with_name("B01").with_role(TurnpointRole::Sss),
        cylinder(c2, 1_000.0).with_name("B02").with_role(TurnpointRole::Ess),
        cylinder(goal, 400.0).with_name("GOAL").with_role(TurnpointRole::Goal),
    ]
}

pub fn course_task(goal_style: &str, start: Option<NaiveTime>) -> Task {
    let def = TaskDefinition {
        start,
        takeoff: Some(cylinder(TAKEOFF, 400.0).with_role(TurnpointRole::Takeoff)),
        turnpoints: course(),
        goal_style: goal_style.to_string(),
        ..Default::default()
    };
    Task::new(def, ScoringConfig::default()).unwrap()
}

pub fn flight(pilot: &str, fixes: impl IntoIterator<Item = (NaiveTime, Option<Point>)>) -> Flight {
    let mut flight = Flight::new(pilot);
    for (t, p) in fixes {
        flight.push(t, p);
    }
    flight
}

/// Fixes through every cylinder center, across the goal line, then 60 s
/// of loitering after goal.
pub fn goal_flight(task: &Task, pilot: &str, first_second: u32) -> Flight {
    let cylinders = task.turnpoints();
    let goal = cylinders[cylinders.len() - 1].center();
    let heading = task.last_leg_heading();

    let mut positions = vec![TAKEOFF];
    positions.extend(cylinders[..cylinders.len() - 1].iter().map(|tp| tp.center()));
    positions.push(offset(goal, heading + 180.0, 100.0));
    positions.push(offset(goal, heading, 100.0));
    positions.extend((0..60).map(|i| offset(goal, heading, 150.0 + i as f64)));

    flight(
        pilot,
        positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| (at(first_second + i as u32), fix(p))),
    )
}

/// One IGC B record for `p` at `t`.
pub fn b_record(t: NaiveTime, p: LatLon) -> String {
    let (lat_hemi, lat) = if p.lat < 0.0 { ('S', -p.lat) } else { ('N', p.lat) };
    let (lon_hemi, lon) = if p.lon < 0.0 { ('W', -p.lon) } else { ('E', p.lon) };
    format!(
        "B{}{:02}{:05}{}{:03}{:05}{}A0100001000",
        t.format("%H%M%S"),
        lat.trunc() as u32,
        (lat.fract() * 60_000.0).round() as u32,
        lat_hemi,
        lon.trunc() as u32,
        (lon.fract() * 60_000.0).round() as u32,
        lon_hemi,
    )
}

pub fn igc_text(pilot: &str, flight: &Flight) -> String {
    let mut text = format!("AXXXTEST\r\nHFDTE010624\r\nHFPLTPILOTINCHARGE:{pilot}\r\n");
    for (t, p) in &flight.points {
        if let Some(p) = p {
            text.push_str(&b_record(*t, p.position()));
            text.push_str("\r\n");
        }
    }
    text
}
