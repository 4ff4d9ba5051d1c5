use std::path::Path;

use chrono::{DateTime, Datelike, Duration, FixedOffset};
use rust_xlsxwriter::{Color, Format, Workbook};

use crate::chart::Month;
use crate::clock::Clock;
use crate::games::Game;
use crate::scrape::ChartClient;
use crate::Result;

const HEADER_FILL: u32 = 0x_FF_C7_CE;
const HIGHLIGHT_FILL: u32 = 0x_FF_FF_00;
const COLUMN_WIDTH: f64 = 15.0;
const ROW_HEIGHT: f64 = 17.0;

/// The trailing months covered by a multi-month export, newest first.
///
/// Steps back in fixed 30-day decrements from `now` and takes each landing
/// date's calendar month. Deliberately not calendar-month arithmetic; the
/// original behaves this way and the approximation is preserved.
pub fn month_steps(now: DateTime<FixedOffset>, months: u32) -> Vec<(Month, i32)> {
    (0..months)
        .map(|i| {
            let d = now - Duration::days(i64::from(i) * 30);
            let month = Month::from_number(d.month()).expect("chrono month is 1..=12");
            (month, d.year())
        })
        .collect()
}

/// Build the styled multi-month workbook at `path`.
///
/// One fetch+parse cycle per step; a single failed month aborts the entire
/// export. Each month contributes a label row followed by one row per kept
/// day. The first cell in a row whose value equals `highlight` is filled
/// yellow.
pub async fn write_months_workbook(
    client: &ChartClient,
    clock: &dyn Clock,
    months: u32,
    highlight: Option<&str>,
    path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(format!("Last {months} Months"))?;

    let header_format = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_background_color(Color::RGB(HEADER_FILL));
    let highlight_format = Format::new().set_background_color(Color::RGB(HIGHLIGHT_FILL));

    sheet.write_string_with_format(0, 0, "DATE", &header_format)?;
    for (col, game) in Game::ALL.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16 + 1, game.display_name(), &header_format)?;
    }
    for col in 0..=Game::ALL.len() as u16 {
        sheet.set_column_width(col, COLUMN_WIDTH)?;
    }

    let mut row: u32 = 1;
    for (month, year) in month_steps(clock.now(), months) {
        let chart = client.month_chart(month, year).await?;

        sheet.write_string(row, 0, format!("{}-{year}", month.label()))?;
        row += 1;

        for day in &chart.rows {
            sheet.write_string(row, 0, &day.date)?;
            for (idx, value) in day.values.iter().enumerate() {
                sheet.write_string(row, idx as u16 + 1, value)?;
            }

            if let Some(number) = highlight {
                if let Some(idx) = day.values.iter().position(|v| v == number) {
                    sheet.write_string_with_format(
                        row,
                        idx as u16 + 1,
                        &day.values[idx],
                        &highlight_format,
                    )?;
                }
            }

            sheet.set_row_height(row, ROW_HEIGHT)?;
            row += 1;
        }
    }

    workbook.save(path)?;
    Ok(())
}
