mod config;
mod day_type;
mod hour_grouping;
mod queries;
mod records;
mod stops;
mod store;
#[cfg(test)]
mod test_fixtures;
mod time;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{debug, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use config::Config;
use day_type::{DayType, list_day_types};
use queries::MergeStrategy;
use store::ScheduleStore;
use time::Time;
use utils::write_json_file;

const DEFAULT_CONFIG: &str = "config/timetables.toml";

#[derive(Parser)]
#[clap(about = "Tram timetables and departure boards from route schedule files")]
struct Args {
    /// TOML file listing the schedule files to load [default: config/timetables.toml]
    #[clap(long)]
    config: Option<PathBuf>,
    /// Schedule file to load instead of the configured ones, may be repeated
    #[clap(long = "schedule")]
    schedules: Vec<PathBuf>,
    #[clap(long, value_enum)]
    merge_strategy: Option<MergeStrategy>,
    #[clap(long, value_enum, default_value = "text")]
    format: OutputFormat,
    /// Write JSON reports to `<dir>/<report>.json` instead of stdout
    #[clap(long)]
    output_directory: Option<String>,
    #[clap(subcommand)]
    query: Query,
}

#[derive(Subcommand)]
enum Query {
    /// Every departure of a tram, stop by stop, in both directions
    Full {
        #[clap(long)]
        tram: u32,
        #[clap(long, value_enum, default_value = "workday")]
        day: DayType,
    },
    /// Departures of one tram from one stop, grouped by hour
    Stop {
        #[clap(long)]
        tram: u32,
        #[clap(long)]
        stop: String,
        #[clap(long, value_enum, default_value = "workday")]
        day: DayType,
    },
    /// The next ten departures from a stop across all trams
    Departures {
        #[clap(long)]
        stop: String,
        #[clap(long, value_enum, default_value = "workday")]
        day: DayType,
        /// H:MM
        #[clap(long)]
        after: Time,
    },
    /// Loaded tram numbers
    Trams,
    /// Stops served by any loaded tram
    Stops,
    /// Day types a timetable can be requested for
    Days,
}

#[derive(Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let merge_strategy = args.merge_strategy.unwrap_or(config.merge_strategy);

    let mut store = ScheduleStore::default();
    if args.schedules.is_empty() {
        if config.schedules.is_empty() {
            warn!("No schedule files configured, every query will come back empty");
        }
        load_configured(&mut store, &config.schedules);
    } else {
        // Files named on the command line must all load
        for path in &args.schedules {
            let tram = store.add_tram(path)?;
            debug!("Loaded tram {} from {}", tram, path.display());
        }
    }

    match &args.query {
        Query::Full { tram, day } => {
            let report = queries::full_timetable(&store, *tram, *day)?;
            emit(&args, "full_timetable", &report, report.to_string())
        }
        Query::Stop { tram, stop, day } => {
            let report = queries::stop_timetable(&store, *tram, stop, *day)?;
            emit(&args, "stop_timetable", &report, report.to_string())
        }
        Query::Departures { stop, day, after } => {
            let report = queries::departures_after(&store, stop, *day, *after, merge_strategy);
            emit(&args, "departures", &report, report.to_string())
        }
        Query::Trams => {
            let trams = store.list_trams();
            emit(&args, "trams", &trams, lines(&trams))
        }
        Query::Stops => {
            let stops = store.list_stops();
            emit(&args, "stops", &stops, lines(&stops))
        }
        Query::Days => {
            let days = list_day_types();
            emit(&args, "days", &days, lines(&days))
        }
    }
}

/// Configured files that fail to load are skipped. Returns how many were.
fn load_configured(store: &mut ScheduleStore, schedules: &[PathBuf]) -> usize {
    let failures = store.load_all(schedules);
    if !failures.is_empty() {
        warn!(
            "{} of {} configured schedule files failed to load",
            failures.len(),
            schedules.len()
        );
    }
    failures.len()
}

/// An explicit `--config` must load. The default one is optional.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(Path::new(DEFAULT_CONFIG)),
        None => {
            debug!("No {} found, using defaults", DEFAULT_CONFIG);
            Ok(Config::default())
        }
    }
}

fn lines(items: &[String]) -> String {
    items.iter().map(|item| format!("{}\n", item)).collect()
}

fn emit<T: Serialize>(args: &Args, name: &str, report: &T, text: String) -> Result<()> {
    match (args.format, &args.output_directory) {
        (OutputFormat::Text, _) => print!("{}", text),
        (OutputFormat::Json, Some(output_directory)) => {
            write_json_file(name, output_directory, report)?;
        }
        (OutputFormat::Json, None) => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
