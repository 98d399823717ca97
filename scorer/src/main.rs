//! main.rs — xc-scorer entry point
//!
//! Commands over one task file (XCTrack, PWCA, native or raw JSON):
//!   optimize  full-course optimized route from takeoff
//!   validate  one IGC track against the task
//!   race      every IGC track in a directory, plus earliest tag per cylinder
//!
//! Results are printed as JSON on stdout; logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xc_scoring::race::load_tracks;
use xc_scoring::{igc, Race, ScoringConfig, Task};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "xc-scorer", about = "Race-to-goal competition task scorer")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the optimized full-course route
    Optimize {
        #[arg(long)]
        task: PathBuf,
    },
    /// Validate a single track
    Validate {
        #[arg(long)]
        task: PathBuf,
        #[arg(long)]
        track: PathBuf,
    },
    /// Validate every *.igc file in a directory
    Race {
        #[arg(long)]
        task: PathBuf,
        #[arg(long)]
        tracks: PathBuf,
        /// Write results here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FullConfig {
    scoring: ScoringConfig,
    output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OutputConfig {
    pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

fn load_config(path: &str) -> Result<FullConfig> {
    let text = std::fs::read_to_string(path).unwrap_or_else(|_| {
        debug!("No config at {path}, using built-in defaults");
        include_str!("../config.toml").to_string()
    });
    toml::from_str(&text).with_context(|| format!("invalid config file {path}"))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xc_scorer=info,xc_scoring=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = load_config(&args.config)?;
    let scoring = cfg.scoring.with_env_overrides();

    match args.command {
        Command::Optimize { task } => {
            let task = load_task(&task, scoring)?;
            emit(task.opti(), &cfg.output, None)
        }
        Command::Validate { task, track } => {
            let task = load_task(&task, scoring)?;
            let flight = igc::read_flight(&track)
                .with_context(|| format!("failed to load track {}", track.display()))?;
            let result = task.validate(&flight);
            info!(
                "{}: {} of {} turnpoints tagged",
                result.pilot_id,
                result.tag_times.len(),
                task.turnpoints().len()
            );
            emit(&result, &cfg.output, None)
        }
        Command::Race { task, tracks, output } => {
            let task = load_task(&task, scoring)?;
            if let Some(first) = task.timerange().next() {
                info!(
                    "Race window {first} to {} ({} s)",
                    task.stop(),
                    task.timerange().count()
                );
            }
            let flights = load_tracks(&tracks)
                .with_context(|| format!("failed to list tracks in {}", tracks.display()))?;
            let results = Race::new(&task).validate_all(&flights);
            emit(&results, &cfg.output, output.as_deref())
        }
    }
}

fn load_task(path: &Path, scoring: ScoringConfig) -> Result<Task> {
    Task::from_file(path, scoring).with_context(|| format!("failed to load task {}", path.display()))
}

fn emit<T: Serialize>(value: &T, output: &OutputConfig, path: Option<&Path>) -> Result<()> {
    let json = if output.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Results written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config_parses() {
        let cfg: FullConfig = toml::from_str(include_str!("../config.toml")).unwrap();
        assert_eq!(cfg.scoring, ScoringConfig::default());
        assert!(cfg.output.pretty);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: FullConfig = toml::from_str("[output]\npretty = false\n").unwrap();
        assert!(!cfg.output.pretty);
        assert_eq!(cfg.scoring.goal_line_tolerance_deg, 95.0);
    }

    #[test]
    fn test_cli_parses_race_command() {
        let args = Args::parse_from([
            "xc-scorer", "race", "--task", "task.xctsk", "--tracks", "tracks", "-o", "out.json",
        ]);
        assert_eq!(args.config, "config.toml");
        assert!(matches!(args.command, Command::Race { output: Some(_), .. }));
    }
}
