use crate::chart::{LiveSnapshot, Month, MonthChart};
use crate::games::Game;
use crate::scrape::parser;
use crate::{Error, Result};

/// HTTP client for the results site.
///
/// Two URL shapes: a per-month chart page (`/chart.php?month=MM&year=YYYY`)
/// and the "latest results" landing page. Failures are terminal for the
/// request; there are no retries.
pub struct ChartClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChartClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn chart_url(&self, month: Month, year: i32) -> String {
        format!(
            "{}/chart.php?month={:02}&year={}",
            self.base_url,
            month.number(),
            year
        )
    }

    /// Fetch and parse one calendar month's chart table.
    pub async fn month_chart(&self, month: Month, year: i32) -> Result<MonthChart> {
        let html = self.fetch(&self.chart_url(month, year)).await?;
        parser::parse_month_chart(&html, month, year)
    }

    /// Fetch the landing page and extract one game's today/yesterday cells.
    pub async fn live_snapshot(&self, game: Game) -> Result<LiveSnapshot> {
        let html = self.fetch(&format!("{}/", self.base_url)).await?;
        parser::parse_live_snapshot(&html, game)
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{url} returned {status}")));
        }

        resp.text()
            .await
            .map_err(|e| Error::Fetch(format!("reading body from {url} failed: {e}")))
    }
}
