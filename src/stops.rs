use serde::Serialize;

use super::day_type::DayType;
use super::time::{Offset, Time};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteStop {
    pub name: String,
    pub from_a: Offset,
    pub from_b: Offset,
}

/// Departure times from one terminus, one ordered list per day type.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DayDepartures {
    pub workday: Vec<Time>,
    pub saturday: Vec<Time>,
    pub sunday: Vec<Time>,
}

impl DayDepartures {
    pub fn for_day(&self, day: DayType) -> &[Time] {
        match day {
            DayType::Workday => &self.workday,
            DayType::Saturday => &self.saturday,
            DayType::Sunday => &self.sunday,
        }
    }

    pub fn set(&mut self, day: DayType, times: Vec<Time>) {
        match day {
            DayType::Workday => self.workday = times,
            DayType::Saturday => self.saturday = times,
            DayType::Sunday => self.sunday = times,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Direction {
    FromA,
    FromB,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::FromA, Direction::FromB];
}

/// One tram line: two termini and the stops between them, in order from `start_a`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tram {
    pub number: u32,
    pub start_a: String,
    pub start_b: String,
    pub stops: Vec<RouteStop>,
    pub departures_a: DayDepartures,
    pub departures_b: DayDepartures,
}

impl Tram {
    /// The terminus a tram travelling in `direction` is heading to.
    pub fn destination(&self, direction: Direction) -> &str {
        match direction {
            Direction::FromA => &self.start_b,
            Direction::FromB => &self.start_a,
        }
    }

    pub fn departures(&self, direction: Direction, day: DayType) -> &[Time] {
        match direction {
            Direction::FromA => self.departures_a.for_day(day),
            Direction::FromB => self.departures_b.for_day(day),
        }
    }

    pub fn stop(&self, name: &str) -> Option<&RouteStop> {
        self.stops.iter().find(|stop| stop.name == name)
    }

    /// Offset to `name` in `direction`, `Unreachable` when the stop is not on this route.
    pub fn offset(&self, name: &str, direction: Direction) -> Offset {
        match self.stop(name) {
            Some(stop) => stop.offset(direction),
            None => Offset::Unreachable,
        }
    }

    pub fn serves(&self, name: &str) -> bool {
        Direction::BOTH
            .iter()
            .any(|direction| self.offset(name, *direction).is_reachable())
    }

    /// Stops in travel order for `direction`, with their offset in that direction.
    pub fn stops_in_order(
        &self,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = (&str, Offset)> + '_> {
        match direction {
            Direction::FromA => Box::new(
                self.stops
                    .iter()
                    .map(move |stop| (stop.name.as_str(), stop.offset(direction))),
            ),
            Direction::FromB => Box::new(
                self.stops
                    .iter()
                    .rev()
                    .map(move |stop| (stop.name.as_str(), stop.offset(direction))),
            ),
        }
    }

    pub fn longest_stop_name(&self) -> usize {
        self.stops
            .iter()
            .map(|stop| stop.name.chars().count())
            .max()
            .unwrap_or(0)
    }
}

impl RouteStop {
    pub fn offset(&self, direction: Direction) -> Offset {
        match direction {
            Direction::FromA => self.from_a,
            Direction::FromB => self.from_b,
        }
    }
}
