//! Alpha Vantage time series adapter.
//!
//! Issues one GET per fetch against the configured query endpoint with a bounded
//! request timeout, retrying once on transport failures and 5xx responses.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::error::{FetchError, StockChartError};
use crate::domain::query::{series_key, SeriesFunction, SeriesQuery};
use crate::domain::settings::UpstreamSettings;
use crate::domain::time_series::{PriceBar, TimeSeriesTable};
use crate::ports::price_data_port::PriceDataPort;

/// Body fields the provider uses to explain why no series was sent.
const NOTICE_FIELDS: [&str; 3] = ["Error Message", "Note", "Information"];

#[derive(Debug, Deserialize)]
struct RawBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

pub struct AlphaVantageAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    retries: u32,
}

impl AlphaVantageAdapter {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, StockChartError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| StockChartError::HttpClient {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            retries: settings.retries,
        })
    }

    fn query_params(&self, query: &SeriesQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("function", query.function.as_str().to_string()),
            ("symbol", query.symbol.clone()),
            ("interval", query.interval.as_str().to_string()),
            ("apikey", self.api_key.clone()),
        ];
        if query.function == SeriesFunction::Daily {
            params.push(("outputsize", "full".to_string()));
        }
        params
    }

    async fn fetch_once(&self, query: &SeriesQuery) -> Result<TimeSeriesTable, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| FetchError::UnexpectedSchema(format!("body is not JSON: {e}")))?;

        parse_series(&json, &series_key(query.function, query.interval))
    }
}

#[async_trait]
impl PriceDataPort for AlphaVantageAdapter {
    async fn fetch_series(&self, query: &SeriesQuery) -> Result<TimeSeriesTable, FetchError> {
        let mut attempt = 0;
        loop {
            debug!(symbol = %query.symbol, function = %query.function, attempt, "requesting series");
            match self.fetch_once(query).await {
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    warn!(symbol = %query.symbol, error = %e, "upstream request failed, retrying");
                }
                Err(e) => {
                    warn!(symbol = %query.symbol, error = %e, "upstream request failed");
                    return Err(e);
                }
                Ok(table) => return Ok(table),
            }
        }
    }
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, FetchError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|_| FetchError::MalformedData(format!("invalid timestamp {value:?}")))
}

fn parse_number(value: &str, column: &str, timestamp: &str) -> Result<f64, FetchError> {
    value.trim().parse::<f64>().map_err(|_| {
        FetchError::MalformedData(format!("non-numeric {column} {value:?} at {timestamp}"))
    })
}

/// Turn a provider body into a table, reading the series under `key`.
pub fn parse_series(body: &Value, key: &str) -> Result<TimeSeriesTable, FetchError> {
    let series = match body.get(key).and_then(Value::as_object) {
        Some(series) => series,
        None => {
            let notice = NOTICE_FIELDS
                .iter()
                .find_map(|f| body.get(*f).and_then(Value::as_str))
                .map(|msg| format!(": {msg}"))
                .unwrap_or_default();
            return Err(FetchError::UnexpectedSchema(format!("missing {key:?}{notice}")));
        }
    };

    let mut rows = Vec::with_capacity(series.len());
    for (timestamp, entry) in series {
        let raw: RawBar = serde_json::from_value(entry.clone()).map_err(|e| {
            FetchError::MalformedData(format!("bad entry at {timestamp}: {e}"))
        })?;
        rows.push(PriceBar {
            timestamp: parse_timestamp(timestamp)?,
            open: parse_number(&raw.open, "open", timestamp)?,
            high: parse_number(&raw.high, "high", timestamp)?,
            low: parse_number(&raw.low, "low", timestamp)?,
            close: parse_number(&raw.close, "close", timestamp)?,
            volume: parse_number(&raw.volume, "volume", timestamp)?,
        });
    }

    Ok(TimeSeriesTable::new(rows))
}
