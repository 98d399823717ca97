use chrono::NaiveTime;
use xc_scoring::task::END_OF_DAY;
use xc_scoring::{ConfigurationError, ScoringConfig, Task, TaskLoadError};
use xc_types::{GoalStyle, TurnpointRole};

const XCTSK: &str = r#"{
  "taskType": "CLASSIC",
  "version": 1,
  "earthModel": "WGS84",
  "turnpoints": [
    {"type": "TAKEOFF", "radius": 400,
     "waypoint": {"name": "D01", "description": "Launch", "lat": 45.0, "lon": 6.0, "altSmoothed": 1800}},
    {"type": "SSS", "radius": 3000,
     "waypoint": {"name": "B02", "description": "Start", "lat": 45.03, "lon": 6.0, "altSmoothed": 1500}},
    {"radius": 1500,
     "waypoint": {"name": "B03", "description": "Ridge", "lat": 45.12, "lon": 6.08, "altSmoothed": 1300}},
    {"type": "ESS", "radius": 2000,
     "waypoint": {"name": "B04", "description": "Valley", "lat": 45.05, "lon": 6.25, "altSmoothed": 600}},
    {"radius": 400,
     "waypoint": {"name": "A05", "description": "Landing", "lat": 45.04, "lon": 6.26, "altSmoothed": 580}}
  ],
  "sss": {"type": "RACE", "direction": "EXIT", "timeGates": ["12:30:00Z"]},
  "goal": {"type": "LINE", "deadline": "19:00:00Z"}
}"#;

const PWCA: &str = r#"{
  "task": {
    "details": {"date": "2019-07-14", "open": "11:30", "start": "12:30", "end": "18:00"},
    "points": [
      {"id": "TO", "name": "Launch", "center": [45.0, 6.0, 1800], "radius": 400},
      {"id": "B02", "name": "Start", "ss": "SS", "center": [45.03, 6.0, 1500], "radius": 3000},
      {"id": "B03", "name": "Ridge", "center": [45.12, 6.08, 1300], "radius": 1500},
      {"id": "B04", "name": "Valley", "ss": "ES", "center": [45.05, 6.25, 600], "radius": 2000},
      {"id": "A05", "name": "Landing", "center": [45.04, 6.26, 580], "radius": 400}
    ]
  }
}"#;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_xctrack_task_end_to_end() {
    let task = Task::from_json(XCTSK, ScoringConfig::default()).unwrap();

    assert_eq!(task.takeoff().name, "D01");
    assert_eq!(task.turnpoints().len(), 4);
    assert_eq!(task.sss(), Some(0));
    assert_eq!(task.ess(), Some(2));
    assert_eq!(task.turnpoints()[3].role, TurnpointRole::Goal);
    assert_eq!(task.goal_style(), GoalStyle::Line);
    assert_eq!(task.open(), Some(t(11, 30)));
    assert_eq!(task.start(), Some(t(12, 30)));
    assert_eq!(task.stop(), t(19, 0));
    assert!(task.opti().distance > 0.0);
}

#[test]
fn test_pwca_and_xctrack_agree_on_geometry() {
    let xc = Task::from_json(XCTSK, ScoringConfig::default()).unwrap();
    let pwca = Task::from_json(PWCA, ScoringConfig::default()).unwrap();

    assert_eq!(pwca.date(), Some("2019-07-14"));
    assert_eq!(pwca.stop(), t(18, 0));
    let roles = |task: &Task| task.turnpoints().iter().map(|tp| tp.role).collect::<Vec<_>>();
    assert_eq!(roles(&pwca), roles(&xc));
    assert_eq!(xc.opti().distance, pwca.opti().distance);
    assert_eq!(xc.last_leg_heading(), pwca.last_leg_heading());
}

#[test]
fn test_native_task_without_stop_runs_until_end_of_day() {
    let text = r#"{
        "date": "2024-06-01",
        "start": "12:00",
        "goal_style": "CYLINDER",
        "takeoff": {"lat": 45.0, "lon": 6.0, "radius": 400},
        "turnpoints": [
            {"lat": 45.1, "lon": 6.0, "radius": 1000, "role": "SSS"},
            {"lat": 45.1, "lon": 6.1, "radius": 400, "role": "GOAL"}
        ]
    }"#;

    let task = Task::from_json(text, ScoringConfig::default()).unwrap();

    assert_eq!(task.stop(), END_OF_DAY);
    assert_eq!(task.goal_style(), GoalStyle::Cylinder);
    assert_eq!(task.timerange().count(), 12 * 3600 - 1);
}

#[test]
fn test_unparseable_json_is_a_load_error() {
    let err = Task::from_json("{ not json", ScoringConfig::default()).unwrap_err();
    assert!(matches!(err, TaskLoadError::Json(_)));
}

#[test]
fn test_unknown_document_reports_every_format() {
    let err = Task::from_json(r#"{"route": []}"#, ScoringConfig::default()).unwrap_err();
    match err {
        TaskLoadError::Configuration(ConfigurationError::UnrecognizedFormat(failures)) => {
            assert_eq!(failures.len(), 4);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_inverted_window_is_rejected() {
    let text = PWCA.replace(r#""end": "18:00""#, r#""end": "12:00""#);
    let err = Task::from_json(&text, ScoringConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        TaskLoadError::Configuration(ConfigurationError::InvalidTimeWindow { .. })
    ));
}

#[test]
fn test_task_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("task.xctsk");
    std::fs::write(&path, XCTSK).unwrap();

    let task = Task::from_file(&path, ScoringConfig::default()).unwrap();
    assert_eq!(task.turnpoints().len(), 4);

    let missing = Task::from_file(dir.path().join("nope.xctsk"), ScoringConfig::default());
    assert!(matches!(missing, Err(TaskLoadError::Io { .. })));
}
