use chrono::{DateTime, Datelike, Duration, FixedOffset};

use crate::chart::{Month, Prediction};
use crate::games::Game;
use crate::messaging::types::{InlineButton, InlineKeyboard};

pub const EMOJI_CALENDAR: &str = "📅";
pub const EMOJI_ROBOT: &str = "🤖";
pub const EMOJI_BACK: &str = "↩️";
pub const EMOJI_STOP: &str = "🛑";

/// First year with chart data on the site.
const FIRST_CHART_YEAR: i32 = 2015;

fn back_button(data: &str) -> InlineButton {
    InlineButton::new(format!("{EMOJI_BACK} Back"), data)
}

fn close_button() -> InlineButton {
    InlineButton::new(format!("{EMOJI_STOP} Close"), "close")
}

pub fn start_text(first_name: &str, now: DateTime<FixedOffset>) -> String {
    let ts = now.format("%d %B %Y %I:%M:%S %p");
    format!(
        "👋 Hello <b>{first_name}</b>! {EMOJI_ROBOT}\n\n\
         Welcome to the <b>Satta King Bot</b>! ✅\n\n\
         {EMOJI_CALENDAR} Current Date &amp; Time: \n<b>{ts}</b>\n\n\
         Use the buttons below to get started:"
    )
}

pub fn start_keyboard() -> InlineKeyboard {
    InlineKeyboard::chunked(
        vec![
            InlineButton::new("Get Chart 📊", "chart"),
            InlineButton::new("Get Prediction 🔮", "predict"),
            InlineButton::new("Check My Number 🔍", "checkmynumber"),
            InlineButton::new(format!("Close {EMOJI_STOP}"), "close"),
        ],
        2,
    )
}

pub fn year_menu_text(now: DateTime<FixedOffset>) -> String {
    let ts = now.format("%Y-%m-%d %H:%M:%S");
    format!(
        "<b>{EMOJI_ROBOT} Welcome to the Satta King Chart Section.</b>\n\n\
         {EMOJI_CALENDAR} Current Date &amp; Time: \n<b>{ts}</b>\n\n\
         Please select the year for\nwhich you want the chart data:"
    )
}

pub fn year_menu_keyboard(now: DateTime<FixedOffset>) -> InlineKeyboard {
    let years = (FIRST_CHART_YEAR..=now.year())
        .map(|year| InlineButton::new(year.to_string(), format!("year_{year}")))
        .collect();
    InlineKeyboard::chunked(years, 3).with_row(vec![back_button("back_to_start"), close_button()])
}

pub fn month_menu_text(year: i32) -> String {
    format!("Select the month for {year}:")
}

pub fn month_menu_keyboard(year: i32) -> InlineKeyboard {
    let months = Month::ALL
        .iter()
        .map(|m| InlineButton::new(m.label(), format!("month_{}_{year}", m.token_name())))
        .collect();
    InlineKeyboard::chunked(months, 3).with_row(vec![
        InlineButton::new(
            format!("{EMOJI_BACK} Back to Year Selection"),
            "back_to_year_selection",
        ),
        close_button(),
    ])
}

pub fn chart_result_text(month: Month, year: i32, aligned: &str) -> String {
    format!(
        "Here is the Satta King Chart for {} {year}:\n\n{aligned}",
        month.label()
    )
}

pub fn chart_result_keyboard() -> InlineKeyboard {
    InlineKeyboard::default().with_row(vec![
        InlineButton::new(
            format!("{EMOJI_BACK} Back to Year Selection"),
            "back_to_year_selection",
        ),
        close_button(),
    ])
}

pub fn predict_menu_text(now: DateTime<FixedOffset>) -> String {
    let date = now.format("%d %B %Y");
    let time = now.format("%I:%M:%S %p");
    format!(
        "{EMOJI_ROBOT} Welcome to the Satta King Prediction Section.\n\n\
         {EMOJI_CALENDAR} Current Date: {date}\n\
         {EMOJI_CALENDAR} Current Time (IST): {time}\n\n\
         Please select which game's prediction you want:"
    )
}

pub fn predict_menu_keyboard() -> InlineKeyboard {
    let games = Game::ALL
        .iter()
        .map(|g| InlineButton::new(g.display_name(), format!("predict_{}", g.code())))
        .collect();
    InlineKeyboard::chunked(games, 2).with_row(vec![back_button("back_to_start"), close_button()])
}

pub fn prediction_text(prediction: &Prediction, now: DateTime<FixedOffset>) -> String {
    let game = prediction.game;
    let today_date = now.format("%d %B %Y");
    let today_time = now.format("%I:%M:%S %p");
    let yesterday_date = (now - Duration::days(1)).format("%d %B %Y");
    let result_time = prediction.result_time.as_deref().unwrap_or("unknown");

    if prediction.is_today {
        format!(
            "Today's number for {} ({}) is:\n{} {}\n\n\
             {EMOJI_CALENDAR} Today's Date: {today_date}\n\
             {EMOJI_CALENDAR} Today's Time (IST): {today_time}\n\n\
             {EMOJI_CALENDAR} Yesterday's Date: {yesterday_date}\n\
             {EMOJI_CALENDAR} Yesterday's Time (IST): {result_time}",
            game.display_name(),
            game.code(),
            prediction.number,
            game.emoji(),
        )
    } else {
        format!(
            "Yesterday's number for {} ({}) was:\n{} {}\n\n\
             {EMOJI_CALENDAR} Yesterday's Date: {yesterday_date}\n\
             {EMOJI_CALENDAR} Yesterday's Time (IST): {result_time}\n\n\
             {EMOJI_CALENDAR} Today's Date: {today_date}\n\
             {EMOJI_CALENDAR} Today's Time (IST): {today_time}",
            game.display_name(),
            game.code(),
            prediction.number,
            game.emoji(),
        )
    }
}

pub fn prediction_keyboard(latest_number: &str) -> InlineKeyboard {
    InlineKeyboard::chunked(
        vec![
            InlineButton::new(
                format!("Check Chart {latest_number} 🎲"),
                "show_latest_number",
            ),
            back_button("back_to_start"),
        ],
        2,
    )
    .with_row(vec![close_button()])
}

pub const NUMBER_PROMPT: &str = "Tell me your number (between 00 and 99):";

pub fn number_prompt_keyboard() -> InlineKeyboard {
    InlineKeyboard::default().with_row(vec![back_button("back_to_start"), close_button()])
}

/// Interval menu; `prefix` is `months` or `number_months` depending on which
/// remembered number the export should highlight.
pub fn interval_keyboard(prefix: &str, with_back: bool) -> InlineKeyboard {
    let buttons = (1..=20)
        .map(|i| i * 6)
        .map(|n| InlineButton::new(format!("{n} months"), format!("{prefix}_{n}")))
        .collect();
    let mut kb = InlineKeyboard::chunked(buttons, 3);
    if with_back {
        kb = kb.with_row(vec![back_button("back_to_start")]);
    } else {
        kb = kb.with_row(vec![close_button()]);
    }
    kb
}

pub const RANGE_PROMPT_LATEST: &str = "Select the range for chart data:";
pub const RANGE_PROMPT_NUMBER: &str = "Select range for chart detail:";

pub const SKIP_NOTICE: &str =
    "Invalid number provided. Skipping this task. You can try again using the buttons below.";

pub const PREPARING_FILE: &str = "Please wait, preparing your file...";
