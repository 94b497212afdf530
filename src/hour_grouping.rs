use itertools::Itertools;
use serde::Serialize;
use std::fmt;

use super::time::Time;

/// Arrivals sharing one hour of the day, printed as `H\tMM\tMM...`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HourRow {
    pub hour: u32,
    pub arrivals: Vec<Time>,
}

/// Buckets consecutive arrivals by hour. A new row starts whenever the hour changes,
/// so unsorted input yields one row per run rather than one per distinct hour.
pub fn group_by_hour<I>(arrivals: I) -> Vec<HourRow>
where
    I: IntoIterator<Item = Time>,
{
    let chunks = arrivals.into_iter().chunk_by(|arrival| arrival.hours);
    chunks
        .into_iter()
        .map(|(hour, arrivals)| HourRow {
            hour,
            arrivals: arrivals.collect(),
        })
        .collect()
}

impl fmt::Display for HourRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hour)?;
        for arrival in &self.arrivals {
            write!(f, "\t{}", arrival.format(true))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_hour() {
        let rows = group_by_hour(vec![
            Time::new(6, 5),
            Time::new(6, 35),
            Time::new(7, 5),
            Time::new(9, 0),
            Time::new(9, 59),
        ]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].hour, 6);
        assert_eq!(rows[0].arrivals, vec![Time::new(6, 5), Time::new(6, 35)]);
        assert_eq!(rows[1].arrivals, vec![Time::new(7, 5)]);
        assert_eq!(rows[2].to_string(), "9\t00\t59");
    }

    #[test]
    fn test_group_by_hour_empty() {
        assert!(group_by_hour(Vec::new()).is_empty());
    }

    #[test]
    fn test_last_hour_is_kept() {
        let rows = group_by_hour(vec![Time::new(23, 50), Time::new(24, 10)]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].to_string(), "24\t10");
    }
}
