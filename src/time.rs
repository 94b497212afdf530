use serde::{Deserialize, Serialize};
use std::{fmt, ops::Add, str::FromStr};

/// A time of day as hours and minutes.
/// Hours are not wrapped at 24, so a late arrival may read 24:05.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Time {
    pub hours: u32,
    pub minutes: u32,
}

impl Time {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Time { hours, minutes }
    }

    /// Renders `H:MM`, or only the zero padded `MM` part when grouping under an hour heading.
    pub fn format(&self, only_minutes: bool) -> String {
        if only_minutes {
            format!("{:02}", self.minutes)
        } else {
            format!("{}:{:02}", self.hours, self.minutes)
        }
    }
}

impl Add for Time {
    type Output = Time;

    // Carries at most one hour. Both operands are expected to hold minutes below 60.
    fn add(self, other: Time) -> Time {
        let mut minutes = self.minutes + other.minutes;
        let mut hours = self.hours + other.hours;
        if minutes >= 60 {
            minutes -= 60;
            hours += 1;
        }
        Time { hours, minutes }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

impl FromStr for Time {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hours, minutes) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("Invalid time (expected H:MM): {}", s))?;
        let hours = hours
            .parse::<u32>()
            .map_err(|_| format!("Invalid hours in time: {}", s))?;
        let minutes = minutes
            .parse::<u32>()
            .ok()
            .filter(|minutes| *minutes < 60)
            .ok_or_else(|| format!("Invalid minutes in time: {}", s))?;
        Ok(Time { hours, minutes })
    }
}

/// Travel time from a terminus to a stop.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Offset {
    Reachable(u32),
    /// The tram does not call at the stop in this direction.
    Unreachable,
}

impl Offset {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Offset::Reachable(_))
    }

    /// Arrival at the stop for a tram leaving its terminus at `departure`.
    pub fn arrival(&self, departure: Time) -> Option<Time> {
        match self {
            Offset::Reachable(minutes) => Some(departure + Time::new(minutes / 60, minutes % 60)),
            Offset::Unreachable => None,
        }
    }
}

impl FromStr for Offset {
    type Err = String;

    // `x` marks a stop that is skipped in this direction
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" => Ok(Offset::Unreachable),
            minutes => minutes
                .parse::<u32>()
                .map(Offset::Reachable)
                .map_err(|_| format!("Invalid offset: {}", s)),
        }
    }
}
