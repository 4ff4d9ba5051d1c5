use crate::chart::Month;
use crate::games::Game;

/// Parsed callback-button token.
///
/// Anything that does not parse is ignored by the dispatcher: no transition,
/// no error to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Callback {
    Chart,
    Predict,
    CheckMyNumber,
    Close,
    BackToStart,
    Year(i32),
    Month { month: Month, year: i32 },
    PredictGame(Game),
    ShowLatestNumber,
    /// Multi-month export keyed on the remembered latest result number.
    Months(u32),
    /// Multi-month export keyed on the user-entered number.
    NumberMonths(u32),
    BackToYearSelection,
}

/// Valid interval selections: multiples of 6 in [6, 120].
fn parse_interval(raw: &str) -> Option<u32> {
    let n = raw.parse::<u32>().ok()?;
    if n >= 6 && n <= 120 && n % 6 == 0 {
        Some(n)
    } else {
        None
    }
}

impl Callback {
    pub fn parse(data: &str) -> Option<Callback> {
        match data {
            "chart" => return Some(Callback::Chart),
            "predict" => return Some(Callback::Predict),
            "checkmynumber" => return Some(Callback::CheckMyNumber),
            "close" => return Some(Callback::Close),
            "back_to_start" => return Some(Callback::BackToStart),
            "show_latest_number" => return Some(Callback::ShowLatestNumber),
            "back_to_year_selection" => return Some(Callback::BackToYearSelection),
            _ => {}
        }

        if let Some(rest) = data.strip_prefix("year_") {
            return rest.parse::<i32>().ok().map(Callback::Year);
        }
        if let Some(rest) = data.strip_prefix("month_") {
            let (name, year) = rest.split_once('_')?;
            let month = Month::from_token_name(name)?;
            let year = year.parse::<i32>().ok()?;
            return Some(Callback::Month { month, year });
        }
        if let Some(rest) = data.strip_prefix("predict_") {
            return Game::from_code(rest).map(Callback::PredictGame);
        }
        if let Some(rest) = data.strip_prefix("number_months_") {
            return parse_interval(rest).map(Callback::NumberMonths);
        }
        if let Some(rest) = data.strip_prefix("months_") {
            return parse_interval(rest).map(Callback::Months);
        }

        None
    }
}
