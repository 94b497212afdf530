use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use super::day_type::DayType;
use super::stops::{DayDepartures, RouteStop, Tram};
use super::time::{Offset, Time};

/// Departures may run past midnight as 24:00..47:59, never later.
const SERVICE_DAY_HOURS: u32 = 48;

/// A schedule file that does not follow the expected layout.
/// `line` is 1-based and points at the offending line (or one past the end).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: expected {expected}, found {found:?}")]
pub struct ParseError {
    pub line: usize,
    pub expected: String,
    pub found: String,
}

pub fn read_file(file_path: &Path) -> std::io::Result<String> {
    fs_err::read_to_string(file_path)
}

/// Parses one tram schedule file:
///
/// ```text
/// 8
/// Centre
/// North
///
/// Centre;0;15
/// Park;5;10
/// North;15;0
///
/// 06:00 06:20      <- from Centre, workday
/// 07:00            <- saturday
/// 08:00            <- sunday
///
/// 06:10 06:30      <- from North, workday
/// 07:10
/// 08:10
/// ```
pub fn parse(raw_text: &str) -> Result<Tram, ParseError> {
    // Remove carriage returns so files written on Windows parse the same
    let text = raw_text.replace('\r', "");
    let mut lines = Lines::new(&text);

    let (line, number) = lines.next_line("tram number")?;
    let number = number
        .trim()
        .parse::<u32>()
        .map_err(|_| ParseError::at(line, "tram number", number))?;
    let start_a = lines.next_name("name of terminus A")?;
    let start_b = lines.next_name("name of terminus B")?;
    lines.expect_blank("blank line after termini")?;

    let stops = parse_stops(&mut lines)?;
    let departures_a = parse_departures(&mut lines)?;
    lines.expect_blank("blank line between departures from A and B")?;
    let departures_b = parse_departures(&mut lines)?;
    lines.expect_end()?;

    Ok(Tram {
        number,
        start_a,
        start_b,
        stops,
        departures_a,
        departures_b,
    })
}

fn parse_stops(lines: &mut Lines) -> Result<Vec<RouteStop>, ParseError> {
    let mut stops = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    loop {
        let (line, content) = lines.next_line("stop line or blank line")?;
        if content.trim().is_empty() {
            if stops.is_empty() {
                return Err(ParseError::at(line, "at least one stop", content));
            }
            return Ok(stops);
        }
        let stop = parse_stop(line, content)?;
        if !seen.insert(stop.name.clone()) {
            return Err(ParseError::at(line, "stop listed only once", content));
        }
        stops.push(stop);
    }
}

fn parse_stop(line: usize, content: &str) -> Result<RouteStop, ParseError> {
    let fields: Vec<&str> = content.split(';').collect();
    let [name, from_a, from_b] = fields.as_slice() else {
        return Err(ParseError::at(line, "stop;timeFromA;timeFromB", content));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::at(line, "stop name", content));
    }
    let from_a = Offset::from_str(from_a)
        .map_err(|_| ParseError::at(line, "minutes or x for time from A", from_a))?;
    let from_b = Offset::from_str(from_b)
        .map_err(|_| ParseError::at(line, "minutes or x for time from B", from_b))?;
    if !from_a.is_reachable() && !from_b.is_reachable() {
        return Err(ParseError::at(line, "stop served in at least one direction", content));
    }
    Ok(RouteStop {
        name: name.to_string(),
        from_a,
        from_b,
    })
}

/// Three lines of departures, one per day type in file order.
fn parse_departures(lines: &mut Lines) -> Result<DayDepartures, ParseError> {
    let mut departures = DayDepartures::default();
    for day in DayType::ALL {
        let expected = format!("{} departures", day);
        let (line, content) = lines.next_line(&expected)?;
        departures.set(day, parse_times(line, content)?);
    }
    Ok(departures)
}

fn parse_times(line: usize, content: &str) -> Result<Vec<Time>, ParseError> {
    content
        .split_whitespace()
        .map(|token| {
            Time::from_str(token)
                .ok()
                .filter(|time| time.hours < SERVICE_DAY_HOURS)
                .ok_or_else(|| ParseError::at(line, "departure time HH:MM", token))
        })
        .collect()
}

impl ParseError {
    fn at(line: usize, expected: &str, found: &str) -> Self {
        ParseError {
            line,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Numbered lines with a cursor, so every failure can name its line.
struct Lines<'a> {
    lines: Vec<&'a str>,
    position: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        let mut lines = text.split('\n').collect::<Vec<&str>>();
        // Drop the empty string following the final newline
        if lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        Lines { lines, position: 0 }
    }

    fn next_line(&mut self, expected: &str) -> Result<(usize, &'a str), ParseError> {
        let line = self.position + 1;
        let content = self
            .lines
            .get(self.position)
            .copied()
            .ok_or_else(|| ParseError::at(line, expected, "end of file"))?;
        self.position += 1;
        Ok((line, content))
    }

    fn next_name(&mut self, expected: &str) -> Result<String, ParseError> {
        let (line, content) = self.next_line(expected)?;
        let name = content.trim();
        if name.is_empty() {
            return Err(ParseError::at(line, expected, content));
        }
        Ok(name.to_string())
    }

    fn expect_blank(&mut self, expected: &str) -> Result<(), ParseError> {
        let (line, content) = self.next_line(expected)?;
        if !content.trim().is_empty() {
            return Err(ParseError::at(line, expected, content));
        }
        Ok(())
    }

    // Trailing blank lines are tolerated, anything else is not
    fn expect_end(&mut self) -> Result<(), ParseError> {
        while let Some(content) = self.lines.get(self.position) {
            if !content.trim().is_empty() {
                return Err(ParseError::at(self.position + 1, "end of file", content));
            }
            self.position += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stops::Direction;
    use crate::test_fixtures::{TRAM_8, tram_8};

    #[test]
    fn test_parse_well_formed_file() {
        let tram = parse(TRAM_8).unwrap();
        assert_eq!(tram, tram_8());
        assert_eq!(tram.number, 8);
        assert_eq!(tram.start_a, "Centre");
        assert_eq!(tram.start_b, "North");
        let names: Vec<&str> = tram.stops.iter().map(|stop| stop.name.as_str()).collect();
        assert_eq!(names, vec!["Centre", "Park", "Market", "North"]);
        assert_eq!(tram.departures(Direction::FromA, DayType::Workday).len(), 12);
        assert_eq!(tram.departures(Direction::FromA, DayType::Saturday).len(), 3);
        assert_eq!(tram.departures(Direction::FromA, DayType::Sunday).len(), 2);
        assert_eq!(tram.departures(Direction::FromB, DayType::Workday).len(), 4);
        assert_eq!(tram.departures(Direction::FromB, DayType::Saturday).len(), 2);
        assert_eq!(tram.departures(Direction::FromB, DayType::Sunday).len(), 2);
    }

    #[test]
    fn test_departure_tokens_read_hours_first() {
        let tram = parse(TRAM_8).unwrap();
        assert_eq!(
            tram.departures(Direction::FromA, DayType::Workday)[0],
            Time::new(6, 0)
        );
        assert_eq!(
            tram.departures(Direction::FromB, DayType::Sunday)[1],
            Time::new(9, 40)
        );
    }

    #[test]
    fn test_parse_accepts_carriage_returns_and_trailing_blank_lines() {
        let text = format!("{}\n\n", TRAM_8.replace('\n', "\r\n"));
        assert_eq!(parse(&text).unwrap(), tram_8());
    }

    #[test]
    fn test_parse_rejects_bad_tram_number() {
        let text = TRAM_8.replacen("8", "eight", 1);
        let err = parse(&text).unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.found, "eight");
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let text = TRAM_8.replace("Park;5;10", "Park;5");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.line, 6);
        assert_eq!(err.expected, "stop;timeFromA;timeFromB");
    }

    #[test]
    fn test_parse_rejects_bad_offset() {
        let text = TRAM_8.replace("Park;5;10", "Park;five;10");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.line, 6);
        assert_eq!(err.found, "five");
    }

    #[test]
    fn test_parse_rejects_stop_unreachable_both_ways() {
        let text = TRAM_8.replace("Park;5;10", "Park;x;x");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.line, 6);
        assert_eq!(err.expected, "stop served in at least one direction");
    }

    #[test]
    fn test_parse_rejects_duplicate_stop() {
        let text = TRAM_8.replace("Market;8;x", "Park;8;x");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.line, 7);
    }

    #[test]
    fn test_parse_rejects_bad_departure_token() {
        let text = TRAM_8.replace("06:00 06:10", "06:00 6h10");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.line, 10);
        assert_eq!(err.found, "6h10");
    }

    #[test]
    fn test_parse_rejects_departure_beyond_service_day() {
        let text = TRAM_8.replace("06:00 06:10", "4294967295:59 06:10");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.line, 10);
        assert_eq!(err.found, "4294967295:59");

        let text = TRAM_8.replace("06:00 06:10", "48:00 06:10");
        assert_eq!(parse(&text).unwrap_err().found, "48:00");
    }

    #[test]
    fn test_parse_accepts_departures_after_midnight() {
        let text = TRAM_8.replace("08:00 09:00\n\n", "08:00 47:59\n\n");
        let tram = parse(&text).unwrap();
        assert_eq!(
            tram.departures(Direction::FromA, DayType::Sunday)[1],
            Time::new(47, 59)
        );
    }

    #[test]
    fn test_parse_reports_truncated_file() {
        let truncated: String = TRAM_8.lines().take(12).collect::<Vec<_>>().join("\n");
        let err = parse(&truncated).unwrap_err();
        assert_eq!(err.line, 13);
        assert_eq!(err.found, "end of file");
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        let text = TRAM_8.replacen("North\n\n", "North\n", 1);
        let err = parse(&text).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(err.expected, "blank line after termini");
    }

    #[test]
    fn test_parse_rejects_trailing_content() {
        let text = format!("{}\nunexpected\n", TRAM_8);
        let err = parse(&text).unwrap_err();
        assert_eq!(err.expected, "end of file");
        assert_eq!(err.found, "unexpected");
    }

    #[test]
    fn test_error_message_names_line() {
        let err = ParseError::at(5, "stop name", ";1;2");
        assert_eq!(err.to_string(), "line 5: expected stop name, found \";1;2\"");
    }
}
