use crate::stops::{DayDepartures, RouteStop, Tram};
use crate::store::ScheduleStore;
use crate::time::{Offset, Time};

pub const TRAM_8: &str = "8
Centre
North

Centre;0;15
Park;5;10
Market;8;x
North;15;0

06:00 06:10 06:20 06:30 06:40 06:50 07:00 07:10 07:20 07:30 07:40 07:50
07:00 08:00 09:00
08:00 09:00

06:05 06:35 07:05 07:35
07:30 08:30
08:40 09:40
";

pub const TRAM_3: &str = "3
Harbour
Stadium Gate

Harbour;0;12
Park;4;8
Stadium Gate;12;0

05:58 06:30 07:02
08:00
09:00

06:15 06:45
08:15
09:15
";

fn times(values: &[(u32, u32)]) -> Vec<Time> {
    values
        .iter()
        .map(|(hours, minutes)| Time::new(*hours, *minutes))
        .collect()
}

fn stop(name: &str, from_a: Offset, from_b: Offset) -> RouteStop {
    RouteStop {
        name: name.to_string(),
        from_a,
        from_b,
    }
}

/// `TRAM_8` built by hand.
pub fn tram_8() -> Tram {
    Tram {
        number: 8,
        start_a: "Centre".to_string(),
        start_b: "North".to_string(),
        stops: vec![
            stop("Centre", Offset::Reachable(0), Offset::Reachable(15)),
            stop("Park", Offset::Reachable(5), Offset::Reachable(10)),
            stop("Market", Offset::Reachable(8), Offset::Unreachable),
            stop("North", Offset::Reachable(15), Offset::Reachable(0)),
        ],
        departures_a: DayDepartures {
            workday: times(&[
                (6, 0),
                (6, 10),
                (6, 20),
                (6, 30),
                (6, 40),
                (6, 50),
                (7, 0),
                (7, 10),
                (7, 20),
                (7, 30),
                (7, 40),
                (7, 50),
            ]),
            saturday: times(&[(7, 0), (8, 0), (9, 0)]),
            sunday: times(&[(8, 0), (9, 0)]),
        },
        departures_b: DayDepartures {
            workday: times(&[(6, 5), (6, 35), (7, 5), (7, 35)]),
            saturday: times(&[(7, 30), (8, 30)]),
            sunday: times(&[(8, 40), (9, 40)]),
        },
    }
}

/// A one-stop route matching the scenario of a single early departure.
pub fn single_departure_tram() -> Tram {
    Tram {
        number: 8,
        start_a: "Centre".to_string(),
        start_b: "North".to_string(),
        stops: vec![stop("Park", Offset::Reachable(5), Offset::Reachable(10))],
        departures_a: DayDepartures {
            workday: times(&[(6, 0)]),
            ..DayDepartures::default()
        },
        departures_b: DayDepartures::default(),
    }
}

pub fn store_with(texts: &[&str]) -> ScheduleStore {
    let mut store = ScheduleStore::default();
    for text in texts {
        store.insert(crate::records::parse(text).unwrap());
    }
    store
}
