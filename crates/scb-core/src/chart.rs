use crate::games::Game;
use crate::{Error, Result};

/// Marker the site shows until a result is published.
pub const RESULT_PENDING: &str = "XX";

/// Calendar month as used in callback data and chart URLs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Capitalized display label ("January").
    pub fn label(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Lowercase name used in callback tokens ("january").
    pub fn token_name(&self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
            Month::July => "july",
            Month::August => "august",
            Month::September => "september",
            Month::October => "october",
            Month::November => "november",
            Month::December => "december",
        }
    }

    /// 1-based month number.
    pub fn number(&self) -> u32 {
        Month::ALL
            .iter()
            .position(|m| m == self)
            .map(|i| i as u32 + 1)
            .unwrap_or(1)
    }

    pub fn from_token_name(name: &str) -> Option<Month> {
        Month::ALL.into_iter().find(|m| m.token_name() == name)
    }

    pub fn from_number(n: u32) -> Option<Month> {
        Month::ALL.get(n.checked_sub(1)? as usize).copied()
    }
}

/// One parsed day of the monthly chart: the date cell plus the per-game
/// result strings in column order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartRow {
    pub date: String,
    pub values: Vec<String>,
}

/// One month's chart: the header row and the kept data rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthChart {
    pub header: Vec<String>,
    pub rows: Vec<ChartRow>,
}

/// Raw today/yesterday cells for one game on the live results page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LiveSnapshot {
    pub today: Option<String>,
    pub yesterday: Option<String>,
    pub result_time: Option<String>,
}

/// The number reported to the user for one game, derived per request from a
/// live scrape. Never cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prediction {
    pub game: Game,
    pub number: String,
    /// True when today's value was published; false when we fell back to
    /// yesterday's settled result.
    pub is_today: bool,
    pub result_time: Option<String>,
}

/// Today's value is authoritative unless it is missing or still the "XX"
/// placeholder; results are blanked until published, so a placeholder means
/// yesterday's number is the most recent settled one.
pub fn resolve_prediction(game: Game, snapshot: LiveSnapshot) -> Result<Prediction> {
    match snapshot.today {
        Some(today) if today != RESULT_PENDING => Ok(Prediction {
            game,
            number: today,
            is_today: true,
            result_time: snapshot.result_time,
        }),
        _ => match snapshot.yesterday {
            Some(yesterday) => Ok(Prediction {
                game,
                number: yesterday,
                is_today: false,
                result_time: snapshot.result_time,
            }),
            None => Err(Error::Parse(format!(
                "No published result for {}",
                game.display_name()
            ))),
        },
    }
}
