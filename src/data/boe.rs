//! Bank of England Statistical Interactive Database feed.
//!
//! Fetching is deliberately thin: this module owns the HTTP plumbing and
//! returns raw CSV text; all parsing lives in `io::feed` so it can be tested
//! without a network.

use chrono::{Duration, Local, NaiveDate};
use reqwest::blocking::Client;

use crate::error::AppError;

const BASE_URL: &str =
    "https://www.bankofengland.co.uk/boeapps/database/_iadb-fromshowcolumns.asp";

// The IADB endpoint rejects requests without a browser-like User-Agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub struct BoeClient {
    client: Client,
}

impl BoeClient {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch the trailing window of daily observations as raw CSV text.
    pub fn fetch_csv(&self, series_code: &str, lookback_days: i64) -> Result<String, AppError> {
        let end = Local::now().date_naive();
        let start = end - Duration::days(lookback_days);
        self.fetch_csv_range(series_code, start, end)
    }

    pub fn fetch_csv_range(
        &self,
        series_code: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<String, AppError> {
        // The endpoint expects dates like "26/Feb/2026".
        let date_from = from.format("%d/%b/%Y").to_string();
        let date_to = to.format("%d/%b/%Y").to_string();

        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("csv.x", "yes"),
                ("Datefrom", date_from.as_str()),
                ("Dateto", date_to.as_str()),
                ("SeriesCodes", series_code),
                ("CSVF", "TN"),
                ("UsingCodes", "Y"),
                ("VPD", "Y"),
                ("VFD", "N"),
            ])
            .header("User-Agent", USER_AGENT)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .map_err(|e| AppError::new(4, format!("Failed to fetch feed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::new(4, format!("Feed request rejected: {e}")))?;

        response
            .text()
            .map_err(|e| AppError::new(4, format!("Failed to read feed body: {e}")))
    }
}
