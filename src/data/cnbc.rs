//! Live benchmark quote from the CNBC quote service.
//!
//! The quote is strictly optional: any failure here (network, schema drift,
//! missing fields) degrades the run to series-only mode with a warning rather
//! than failing it. Decoding quirks handled below:
//!
//! - yields arrive as percent strings (`"5.129%"`)
//! - 52-week dates arrive as `MM/DD/YY`
//! - the timestamp looks like `2026-02-26T09:22:08.000+0000`

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::LiveQuote;
use crate::error::AppError;

const QUOTE_URL: &str = "https://quote.cnbc.com/quote-html-webservice/restQuote/symbolType/symbol";
const SYMBOL: &str = "GB30Y-GB";

#[derive(Debug, Deserialize)]
struct RestQuoteResponse {
    #[serde(rename = "FormattedQuoteResult")]
    result: Option<FormattedQuoteResult>,
}

#[derive(Debug, Deserialize)]
struct FormattedQuoteResult {
    #[serde(rename = "FormattedQuote", default)]
    quotes: Vec<FormattedQuote>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FormattedQuote {
    last: Option<String>,
    change: Option<String>,
    name: Option<String>,
    last_time: Option<String>,
    yrhiprice: Option<String>,
    yrloprice: Option<String>,
    yrhidate: Option<String>,
    yrlodate: Option<String>,
    maturity_date: Option<String>,
    coupon: Option<String>,
}

pub struct QuoteClient {
    client: Client,
}

impl QuoteClient {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch the live quote; `Err` here is informational and callers degrade
    /// to series-only mode.
    pub fn fetch_quote(&self) -> Result<LiveQuote, AppError> {
        let response = self
            .client
            .get(QUOTE_URL)
            .query(&[
                ("symbols", SYMBOL),
                ("requestMethod", "itv"),
                ("no498", "1"),
                ("partnerId", "2"),
                ("fund", "1"),
                ("exthrs", "1"),
                ("output", "json"),
                ("events", "1"),
            ])
            .header("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .header("Accept", "application/json")
            .send()
            .map_err(|e| AppError::new(4, format!("Failed to fetch live quote: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::new(4, format!("Live quote request rejected: {e}")))?;

        let decoded: RestQuoteResponse = response
            .json()
            .map_err(|e| AppError::new(4, format!("Invalid live quote JSON: {e}")))?;

        let quote = decoded
            .result
            .and_then(|r| r.quotes.into_iter().next())
            .ok_or_else(|| AppError::new(4, "Live quote response contained no quote data."))?;

        quote_from_fields(&quote)
    }
}

fn quote_from_fields(quote: &FormattedQuote) -> Result<LiveQuote, AppError> {
    let value = quote
        .last
        .as_deref()
        .and_then(parse_pct)
        .ok_or_else(|| AppError::new(4, "Live quote has no parsable last yield."))?;

    Ok(LiveQuote {
        value,
        as_of: quote.last_time.as_deref().and_then(parse_quote_timestamp),
        change: quote.change.as_deref().and_then(|c| c.trim().parse().ok()),
        period_high: quote.yrhiprice.as_deref().and_then(parse_pct),
        period_low: quote.yrloprice.as_deref().and_then(parse_pct),
        period_high_date: quote.yrhidate.as_deref().and_then(parse_quote_date),
        period_low_date: quote.yrlodate.as_deref().and_then(parse_quote_date),
        name: quote.name.clone(),
        coupon: none_if_empty(&quote.coupon),
        maturity: none_if_empty(&quote.maturity_date),
    })
}

/// Parse a percent string like `"5.129%"` into `5.129`.
fn parse_pct(text: &str) -> Option<f64> {
    let trimmed = text.trim().trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Parse a quote timestamp like `2026-02-26T09:22:08.000+0000`.
///
/// The fractional seconds and offset are dropped; the quote service reports
/// GMT and the feed dates are calendar days anyway.
fn parse_quote_timestamp(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.split('.').next().unwrap_or(text);
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S").ok()
}

/// Parse the 52-week high/low dates, reported as `MM/DD/YY`.
fn parse_quote_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%m/%d/%y").ok()
}

fn none_if_empty(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_strings_are_parsed() {
        assert_eq!(parse_pct("5.129%"), Some(5.129));
        assert_eq!(parse_pct(" 4.50 % "), Some(4.5));
        assert_eq!(parse_pct(""), None);
        assert_eq!(parse_pct("n/a"), None);
    }

    #[test]
    fn quote_timestamp_fraction_and_offset_are_dropped() {
        let ts = parse_quote_timestamp("2026-02-26T09:22:08.000+0000").unwrap();
        assert_eq!(ts.to_string(), "2026-02-26 09:22:08");
        assert!(parse_quote_timestamp("yesterday").is_none());
    }

    #[test]
    fn us_style_period_dates_are_parsed() {
        let d = parse_quote_date("01/09/25").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
    }

    #[test]
    fn decodes_a_quote_payload() {
        let body = r#"{
            "FormattedQuoteResult": {
                "FormattedQuote": [{
                    "last": "5.129%",
                    "change": "0.042",
                    "name": "British 30 Year Gilt",
                    "last_time": "2026-02-26T09:22:08.000+0000",
                    "yrhiprice": "5.720%",
                    "yrloprice": "4.987%",
                    "yrhidate": "01/09/25",
                    "yrlodate": "12/04/24",
                    "maturity_date": "2054-07-31",
                    "coupon": "4.375%"
                }]
            }
        }"#;
        let decoded: RestQuoteResponse = serde_json::from_str(body).unwrap();
        let quote = decoded.result.unwrap().quotes.into_iter().next().unwrap();
        let live = quote_from_fields(&quote).unwrap();
        assert_eq!(live.value, 5.129);
        assert_eq!(live.change, Some(0.042));
        assert_eq!(live.period_high, Some(5.72));
        assert_eq!(
            live.period_high_date,
            Some(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap())
        );
        assert_eq!(live.coupon.as_deref(), Some("4.375%"));
        assert!(live.as_of.is_some());
    }

    #[test]
    fn quote_without_last_yield_is_an_error() {
        let quote = FormattedQuote {
            name: Some("British 30 Year Gilt".to_string()),
            ..FormattedQuote::default()
        };
        assert!(quote_from_fields(&quote).is_err());
    }
}
