//! Chart query parameters and their validation.

use chrono::NaiveDate;
use std::fmt;

use crate::domain::error::{FetchError, RequestError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesFunction {
    Intraday,
    Daily,
}

impl SeriesFunction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "TIME_SERIES_INTRADAY" => Some(SeriesFunction::Intraday),
            "TIME_SERIES_DAILY" => Some(SeriesFunction::Daily),
            _ => None,
        }
    }

    /// Upstream `function` query value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesFunction::Intraday => "TIME_SERIES_INTRADAY",
            SeriesFunction::Daily => "TIME_SERIES_DAILY",
        }
    }
}

impl fmt::Display for SeriesFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intraday bar granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    #[default]
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    SixtyMinutes,
}

impl Interval {
    /// Blank input selects the default granularity.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "1min" => Some(Interval::OneMinute),
            "5min" => Some(Interval::FiveMinutes),
            "15min" => Some(Interval::FifteenMinutes),
            "30min" => Some(Interval::ThirtyMinutes),
            "60min" => Some(Interval::SixtyMinutes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1min",
            Interval::FiveMinutes => "5min",
            Interval::FifteenMinutes => "15min",
            Interval::ThirtyMinutes => "30min",
            Interval::SixtyMinutes => "60min",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartType {
    Line,
    Bar,
    /// Anything else draws empty axes.
    Unrecognized(String),
}

impl ChartType {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "line" => ChartType::Line,
            "bar" => ChartType::Bar,
            other => ChartType::Unrecognized(other.to_string()),
        }
    }
}

/// Key of the series object in the upstream JSON body.
pub fn series_key(function: SeriesFunction, interval: Interval) -> String {
    match function {
        SeriesFunction::Intraday => format!("Time Series ({})", interval.as_str()),
        SeriesFunction::Daily => "Time Series (Daily)".to_string(),
    }
}

/// What the DataFetcher needs to query the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesQuery {
    pub symbol: String,
    pub function: SeriesFunction,
    pub interval: Interval,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    pub series: SeriesQuery,
    pub chart_type: ChartType,
}

/// Raw submitted strings, exactly as they arrive from the form.
#[derive(Debug, Clone, Default)]
pub struct RawQuery<'a> {
    pub symbol: &'a str,
    pub function: &'a str,
    pub interval: &'a str,
    pub chart_type: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
}

fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>, RequestError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| RequestError::InvalidDateFormat)
}

impl QueryParameters {
    /// Validate a submission. Dates are checked before anything else, so a bad
    /// date wins over an unknown function.
    pub fn parse(raw: &RawQuery<'_>) -> Result<Self, RequestError> {
        let start_date = parse_optional_date(raw.start_date)?;
        let end_date = parse_optional_date(raw.end_date)?;

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(RequestError::InvalidDateRange);
            }
        }

        let function = SeriesFunction::parse(raw.function).ok_or_else(|| {
            RequestError::Fetch(FetchError::UnsupportedFunction(raw.function.to_string()))
        })?;
        let interval = Interval::parse(raw.interval).ok_or_else(|| {
            RequestError::Fetch(FetchError::UnsupportedFunction(format!(
                "{} with interval {}",
                function, raw.interval
            )))
        })?;

        Ok(Self {
            series: SeriesQuery {
                symbol: raw.symbol.trim().to_uppercase(),
                function,
                interval,
                start_date,
                end_date,
            },
            chart_type: ChartType::parse(raw.chart_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw<'a>(start: &'a str, end: &'a str) -> RawQuery<'a> {
        RawQuery {
            symbol: "aapl",
            function: "TIME_SERIES_DAILY",
            interval: "",
            chart_type: "line",
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn parses_valid_submission() {
        let params = QueryParameters::parse(&raw("2024-01-01", "2024-01-31")).unwrap();
        assert_eq!(params.series.symbol, "AAPL");
        assert_eq!(params.series.function, SeriesFunction::Daily);
        assert_eq!(params.series.interval, Interval::OneMinute);
        assert_eq!(params.series.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(params.series.end_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(params.chart_type, ChartType::Line);
    }

    #[test]
    fn empty_dates_are_absent() {
        let params = QueryParameters::parse(&raw("", "")).unwrap();
        assert_eq!(params.series.start_date, None);
        assert_eq!(params.series.end_date, None);
    }

    #[test]
    fn malformed_date_is_format_error() {
        assert_eq!(
            QueryParameters::parse(&raw("2024-13-40", "")),
            Err(RequestError::InvalidDateFormat)
        );
        assert_eq!(
            QueryParameters::parse(&raw("2024-01-01", "01/31/2024")),
            Err(RequestError::InvalidDateFormat)
        );
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert_eq!(
            QueryParameters::parse(&raw("2024-02-01", "2024-01-01")),
            Err(RequestError::InvalidDateRange)
        );
    }

    #[test]
    fn same_day_range_is_allowed() {
        assert!(QueryParameters::parse(&raw("2024-01-05", "2024-01-05")).is_ok());
    }

    #[test]
    fn date_errors_take_precedence_over_unknown_function() {
        let mut r = raw("2024-02-01", "2024-01-01");
        r.function = "TIME_SERIES_WEEKLY";
        assert_eq!(QueryParameters::parse(&r), Err(RequestError::InvalidDateRange));
    }

    #[test]
    fn unknown_function_is_fetch_error() {
        let mut r = raw("", "");
        r.function = "TIME_SERIES_WEEKLY";
        assert!(matches!(
            QueryParameters::parse(&r),
            Err(RequestError::Fetch(FetchError::UnsupportedFunction(_)))
        ));
    }

    #[test]
    fn chart_type_passes_unknown_values_through() {
        assert_eq!(ChartType::parse("bar"), ChartType::Bar);
        assert_eq!(
            ChartType::parse("candlestick"),
            ChartType::Unrecognized("candlestick".into())
        );
    }

    #[test]
    fn series_keys_match_provider_format() {
        assert_eq!(
            series_key(SeriesFunction::Intraday, Interval::OneMinute),
            "Time Series (1min)"
        );
        assert_eq!(
            series_key(SeriesFunction::Intraday, Interval::FifteenMinutes),
            "Time Series (15min)"
        );
        assert_eq!(
            series_key(SeriesFunction::Daily, Interval::FiveMinutes),
            "Time Series (Daily)"
        );
    }
}
