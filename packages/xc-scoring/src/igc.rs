//! igc.rs — flight recorder (IGC) track reader
//!
//! Only the records needed for scoring are read:
//!
//! - `HFDTE` date header, either `HFDTEDDMMYY` or `HFDTEDATE:DDMMYY,NN`
//! - `HFPLT` pilot header (`HFPLTPILOTINCHARGE:Name`)
//! - `B` fixes: `B HHMMSS DDMMmmmN DDDMMmmmE V PPPPP GGGGG`
//!
//! Reference: https://xp-soaring.github.io/igc_file_format/igc_format_2008.html

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;
use xc_types::{Flight, Point};

use crate::error::TrackError;

/// Parsed IGC file.
#[derive(Debug, Clone, PartialEq)]
pub struct IgcTrack {
    pub date: Option<NaiveDate>,
    pub pilot: Option<String>,
    pub flight: Flight,
}

/// Read a track file. The pilot id is the file stem.
pub fn read_flight(path: impl AsRef<Path>) -> Result<Flight, TrackError> {
    let path = path.as_ref();
    let text = std::fs::read(path).map_err(|source| TrackError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Recorders are not consistent about encoding; headers may be Latin-1
    let text = String::from_utf8_lossy(&text);
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned());

    Ok(parse_igc(&text, stem.as_deref())?.flight)
}

/// Parse IGC text. `pilot_id` wins over the `HFPLT` header.
pub fn parse_igc(text: &str, pilot_id: Option<&str>) -> Result<IgcTrack, TrackError> {
    let mut date = None;
    let mut pilot = None;
    let mut fixes = Vec::new();

    for line in text.lines().map(str::trim_end) {
        if let Some(rest) = line.strip_prefix("HFDTE") {
            date = date.or_else(|| parse_date(rest));
        } else if let Some(rest) = line.strip_prefix("HFPLT") {
            pilot = pilot.or_else(|| parse_pilot(rest));
        } else if line.starts_with('B') {
            match parse_b_record(line) {
                Some(fix) => fixes.push(fix),
                None => debug!("Dropping B record without a readable time: {line:?}"),
            }
        }
    }

    let pilot_id = pilot_id
        .map(str::to_string)
        .or_else(|| pilot.clone())
        .unwrap_or_else(|| "unknown".to_string());
    if fixes.is_empty() {
        return Err(TrackError::NoFixes(pilot_id));
    }

    let mut flight = Flight::new(pilot_id);
    for (timestamp, point) in fixes {
        flight.push(timestamp, point);
    }

    Ok(IgcTrack { date, pilot, flight })
}

fn parse_date(rest: &str) -> Option<NaiveDate> {
    let digits = rest.strip_prefix("DATE:").unwrap_or(rest);
    let ddmmyy = digits.get(0..6)?;
    NaiveDate::parse_from_str(ddmmyy, "%d%m%y").ok()
}

fn parse_pilot(rest: &str) -> Option<String> {
    let name = match rest.split_once(':') {
        Some((_, name)) => name,
        None => rest,
    }
    .trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// A record with an unreadable time is dropped (`None`); unreadable
/// coordinates still yield the timestamp with no fix.
fn parse_b_record(line: &str) -> Option<(NaiveTime, Option<Point>)> {
    let timestamp = NaiveTime::parse_from_str(line.get(1..7)?, "%H%M%S").ok()?;
    Some((timestamp, parse_position(line)))
}

fn parse_position(line: &str) -> Option<Point> {
    let lat = coordinate(line.get(7..9)?, line.get(9..14)?, line.get(14..15)?, 'S')?;
    let lon = coordinate(line.get(15..18)?, line.get(18..23)?, line.get(23..24)?, 'W')?;

    let pressure = line.get(25..30).and_then(|s| s.trim().parse::<i32>().ok());
    let gps = line.get(30..35).and_then(|s| s.trim().parse::<i32>().ok());
    let altitude = match (gps, pressure) {
        (Some(g), _) if g != 0 => g,
        (_, Some(p)) => p,
        (Some(g), None) => g,
        (None, None) => 0,
    };

    let point = Point::new(lat, lon, altitude as f64);
    point.is_valid().then_some(point)
}

/// Degrees + minutes×1000 + hemisphere letter to signed decimal degrees.
fn coordinate(degrees: &str, milli_minutes: &str, hemisphere: &str, negative: char) -> Option<f64> {
    if !degrees.bytes().chain(milli_minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let degrees: f64 = degrees.parse().ok()?;
    let minutes: f64 = milli_minutes.parse::<f64>().ok()? / 1000.0;
    if minutes >= 60.0 {
        return None;
    }
    let value = degrees + minutes / 60.0;
    match hemisphere.chars().next()? {
        c if c == negative => Some(-value),
        'N' | 'E' => Some(value),
        _ => None,
    }
}
