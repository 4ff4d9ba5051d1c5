use scraper::{ElementRef, Html, Selector};

use crate::chart::{ChartRow, LiveSnapshot, Month, MonthChart};
use crate::games::Game;
use crate::{Error, Result};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

fn cell_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Parse one month's `table.chart-table`.
///
/// The first two rows are a caption/header pair; data begins at row index 2.
/// A data row is kept only if its cell count equals the header's — holiday
/// rows and other short rows are silently dropped.
pub fn parse_month_chart(html: &str, month: Month, year: i32) -> Result<MonthChart> {
    let document = Html::parse_document(html);

    let table = document
        .select(&selector("table.chart-table"))
        .next()
        .ok_or_else(|| Error::Parse(format!("No data found for {} {year}", month.label())))?;

    let rows: Vec<ElementRef<'_>> = table.select(&selector("tr")).collect();
    if rows.len() < 3 {
        return Err(Error::Parse(format!(
            "No data available in the table for {} {year}",
            month.label()
        )));
    }

    let cells_sel = selector("th, td");
    let header: Vec<String> = rows[1].select(&cells_sel).map(cell_text).collect();

    let mut data = Vec::new();
    for row in &rows[2..] {
        let cells: Vec<String> = row.select(&cells_sel).map(cell_text).collect();
        if cells.len() != header.len() {
            continue;
        }
        let mut cells = cells.into_iter();
        let date = cells.next().unwrap_or_default();
        data.push(ChartRow {
            date,
            values: cells.collect(),
        });
    }

    if data.is_empty() {
        return Err(Error::Parse(format!(
            "No data rows found for {} {year}",
            month.label()
        )));
    }

    Ok(MonthChart { header, rows: data })
}

/// Extract one game's live cells from the landing page.
///
/// The page interleaves `h3.game-name` headings with result cells, so we walk
/// the relevant elements in document order: find the heading matching the
/// game's display name, then take the nearest-following today cell,
/// yesterday cell, and result-time heading.
pub fn parse_live_snapshot(html: &str, game: Game) -> Result<LiveSnapshot> {
    let document = Html::parse_document(html);

    let walk_sel = selector("h3.game-name, td.today-number, td.yesterday-number, h3.game-time");
    let name_sel = selector("h3");

    fn has_class(el: ElementRef<'_>, class: &str) -> bool {
        el.value().classes().any(|c| c == class)
    }

    let mut elements = document.select(&walk_sel);

    let found = elements
        .by_ref()
        .any(|el| has_class(el, "game-name") && cell_text(el) == game.display_name());
    if !found {
        return Err(Error::Parse(format!(
            "{} not found on the results page",
            game.display_name()
        )));
    }

    let mut snapshot = LiveSnapshot::default();
    for el in elements {
        if has_class(el, "game-name") {
            // Next game's section; stop before picking up its cells.
            break;
        }

        if snapshot.today.is_none() && has_class(el, "today-number") {
            snapshot.today = el.select(&name_sel).next().map(cell_text);
        } else if snapshot.yesterday.is_none() && has_class(el, "yesterday-number") {
            snapshot.yesterday = el.select(&name_sel).next().map(cell_text);
        } else if snapshot.result_time.is_none() && has_class(el, "game-time") {
            snapshot.result_time = Some(cell_text(el));
        }

        if snapshot.today.is_some()
            && snapshot.yesterday.is_some()
            && snapshot.result_time.is_some()
        {
            break;
        }
    }

    Ok(snapshot)
}
