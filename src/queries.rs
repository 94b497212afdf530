use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::day_type::DayType;
use super::hour_grouping::{HourRow, group_by_hour};
use super::stops::{Direction, Tram};
use super::store::ScheduleStore;
use super::time::Time;

/// Departures per printed block in a full timetable.
const DEPARTURES_PER_BLOCK: usize = 10;
/// Rows listed by a departures board.
const DEPARTURES_SHOWN: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("No such tram {0}")]
    NoSuchTram(u32),
}

/// How `departures_after` picks candidates from each tram.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Walks both directions of a tram by matching index and stops at ten candidates.
    /// An early arrival far down one list can be missed while the other list is
    /// still being walked.
    #[default]
    LockStep,
    /// Considers every arrival in both directions of every tram.
    Exact,
}

#[derive(Debug, Serialize)]
pub struct StopRow {
    pub stop: String,
    pub arrivals: Vec<Time>,
}

#[derive(Debug, Serialize)]
pub struct DirectionTimetable {
    pub towards: String,
    pub blocks: Vec<Vec<StopRow>>,
}

#[derive(Debug, Serialize)]
pub struct FullTimetable {
    pub tram: u32,
    pub day: DayType,
    pub directions: Vec<DirectionTimetable>,
    #[serde(skip)]
    stop_column_width: usize,
}

pub fn full_timetable(
    store: &ScheduleStore,
    tram_number: u32,
    day: DayType,
) -> Result<FullTimetable, QueryError> {
    let tram = store
        .tram(tram_number)
        .ok_or(QueryError::NoSuchTram(tram_number))?;

    let directions = Direction::BOTH
        .iter()
        .map(|&direction| DirectionTimetable {
            towards: tram.destination(direction).to_string(),
            blocks: tram
                .departures(direction, day)
                .chunks(DEPARTURES_PER_BLOCK)
                .map(|block| {
                    tram.stops_in_order(direction)
                        .filter(|(_, offset)| offset.is_reachable())
                        .map(|(stop, offset)| StopRow {
                            stop: stop.to_string(),
                            arrivals: block
                                .iter()
                                .filter_map(|departure| offset.arrival(*departure))
                                .collect(),
                        })
                        .collect()
                })
                .collect(),
        })
        .collect();

    Ok(FullTimetable {
        tram: tram_number,
        day,
        directions,
        stop_column_width: store.stop_column_width(),
    })
}

impl fmt::Display for FullTimetable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tram {}, {}", self.tram, self.day)?;
        for direction in &self.directions {
            writeln!(f, "Direction: {}", direction.towards)?;
            for block in &direction.blocks {
                for row in block {
                    write!(f, "{:<width$}", row.stop, width = self.stop_column_width)?;
                    for arrival in &row.arrivals {
                        write!(f, "\t{}", arrival)?;
                    }
                    writeln!(f)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct StopDirection {
    pub towards: String,
    pub hours: Vec<HourRow>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StopTimetable {
    /// The tram does not call at the stop in either direction.
    NotServed { tram: u32, stop: String },
    Served {
        tram: u32,
        stop: String,
        day: DayType,
        directions: Vec<StopDirection>,
    },
}

pub fn stop_timetable(
    store: &ScheduleStore,
    tram_number: u32,
    stop: &str,
    day: DayType,
) -> Result<StopTimetable, QueryError> {
    let tram = store
        .tram(tram_number)
        .ok_or(QueryError::NoSuchTram(tram_number))?;
    if !tram.serves(stop) {
        return Ok(StopTimetable::NotServed {
            tram: tram_number,
            stop: stop.to_string(),
        });
    }

    let directions = Direction::BOTH
        .iter()
        .filter(|&&direction| tram.offset(stop, direction).is_reachable())
        .map(|&direction| {
            let offset = tram.offset(stop, direction);
            let arrivals = tram
                .departures(direction, day)
                .iter()
                .filter_map(|departure| offset.arrival(*departure));
            StopDirection {
                towards: tram.destination(direction).to_string(),
                hours: group_by_hour(arrivals),
            }
        })
        .collect();

    Ok(StopTimetable::Served {
        tram: tram_number,
        stop: stop.to_string(),
        day,
        directions,
    })
}

impl fmt::Display for StopTimetable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopTimetable::NotServed { tram, stop } => {
                writeln!(f, "Tram {} does not stop at {}", tram, stop)
            }
            StopTimetable::Served {
                tram,
                stop,
                day,
                directions,
            } => {
                writeln!(f, "Tram: {}, Stop: {}, {}", tram, stop, day)?;
                for direction in directions {
                    writeln!(f, "Direction: {}", direction.towards)?;
                    writeln!(f, "Hour\tMinute")?;
                    for hour in &direction.hours {
                        writeln!(f, "{}", hour)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepartureRow {
    pub time: Time,
    pub tram: u32,
    pub towards: String,
}

#[derive(Debug, Serialize)]
pub struct Departures {
    pub stop: String,
    pub day: DayType,
    pub after: Time,
    pub rows: Vec<DepartureRow>,
}

/// The next departures from `stop` at or after `after` across every tram calling there.
pub fn departures_after(
    store: &ScheduleStore,
    stop: &str,
    day: DayType,
    after: Time,
    strategy: MergeStrategy,
) -> Departures {
    let mut rows: Vec<DepartureRow> = store
        .trams_at_stop(stop)
        .flat_map(|tram| match strategy {
            MergeStrategy::LockStep => lock_step_candidates(tram, stop, day, after),
            MergeStrategy::Exact => all_candidates(tram, stop, day, after),
        })
        .collect();
    // Stable, so equal times keep tram then direction order
    rows.sort_by_key(|row| row.time);
    rows.truncate(DEPARTURES_SHOWN);

    Departures {
        stop: stop.to_string(),
        day,
        after,
        rows,
    }
}

fn candidate(
    tram: &Tram,
    stop: &str,
    direction: Direction,
    departure: Time,
    after: Time,
) -> Option<DepartureRow> {
    tram.offset(stop, direction)
        .arrival(departure)
        .filter(|arrival| *arrival >= after)
        .map(|arrival| DepartureRow {
            time: arrival,
            tram: tram.number,
            towards: tram.destination(direction).to_string(),
        })
}

fn lock_step_candidates(tram: &Tram, stop: &str, day: DayType, after: Time) -> Vec<DepartureRow> {
    let longest = Direction::BOTH
        .iter()
        .map(|&direction| tram.departures(direction, day).len())
        .max()
        .unwrap_or(0);

    let mut candidates: Vec<DepartureRow> = Vec::new();
    for index in 0..longest {
        if candidates.len() >= DEPARTURES_SHOWN {
            break;
        }
        for direction in Direction::BOTH {
            if let Some(&departure) = tram.departures(direction, day).get(index) {
                candidates.extend(candidate(tram, stop, direction, departure, after));
            }
        }
    }
    candidates
}

fn all_candidates(tram: &Tram, stop: &str, day: DayType, after: Time) -> Vec<DepartureRow> {
    Direction::BOTH
        .iter()
        .flat_map(|&direction| {
            tram.departures(direction, day)
                .iter()
                .filter_map(move |&departure| candidate(tram, stop, direction, departure, after))
        })
        .collect()
}

impl fmt::Display for Departures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "No departures from {} after {}", self.stop, self.after);
        }
        writeln!(f, "Time\tTram\tDirection")?;
        for row in &self.rows {
            writeln!(f, "{}\t{}\t{}", row.time, row.tram, row.towards)?;
        }
        Ok(())
    }
}
