use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Workday,
    Saturday,
    Sunday,
}

impl DayType {
    /// In the order the departure lines appear in a schedule file.
    pub const ALL: [DayType; 3] = [DayType::Workday, DayType::Saturday, DayType::Sunday];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Workday => "workday",
            DayType::Saturday => "saturday",
            DayType::Sunday => "sunday",
        }
    }
}

impl FromStr for DayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workday" => Ok(DayType::Workday),
            "saturday" => Ok(DayType::Saturday),
            "sunday" => Ok(DayType::Sunday),
            _ => Err(format!("Invalid day type: {}", s)),
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn list_day_types() -> Vec<String> {
    DayType::ALL.iter().map(|day| day.to_string()).collect()
}
