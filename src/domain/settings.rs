//! Process-wide configuration built once at startup.
//!
//! Every key is optional; missing keys fall back to the defaults below. The API
//! key can be overridden with the `STOCKCHART_API_KEY` environment variable.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::error::StockChartError;
use crate::ports::config_port::ConfigPort;

pub const API_KEY_ENV: &str = "STOCKCHART_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
pub const DEFAULT_SYMBOLS: [&str; 6] = ["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "META"];

#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub retries: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub upstream: UpstreamSettings,
    pub listen: SocketAddr,
    /// Verbose logging for local development.
    pub debug: bool,
    pub chart: ChartSettings,
    pub symbols: Vec<String>,
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> StockChartError {
    StockChartError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Integer setting; a present but non-numeric value is an error, not the default.
fn int_setting(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, StockChartError> {
    if let Some(raw) = config.get_string(section, key) {
        if raw.trim().parse::<i64>().is_err() {
            return Err(invalid(section, key, format!("{key} must be an integer, got {raw:?}")));
        }
    }
    Ok(config.get_int(section, key, default))
}

fn positive_u32(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<u32, StockChartError> {
    let value = int_setting(config, section, key, default)?;
    if value <= 0 || value > u32::MAX as i64 {
        return Err(invalid(section, key, format!("{key} must be a positive integer")));
    }
    Ok(value as u32)
}

impl AppConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, StockChartError> {
        Self::from_port_with_env(config, std::env::var(API_KEY_ENV).ok())
    }

    /// Same as [`AppConfig::from_port`] with the environment override passed in.
    pub fn from_port_with_env(
        config: &dyn ConfigPort,
        env_api_key: Option<String>,
    ) -> Result<Self, StockChartError> {
        let base_url = config
            .get_string("upstream", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(invalid("upstream", "base_url", "base_url must be an http(s) URL"));
        }

        let api_key = env_api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| config.get_string("upstream", "api_key"))
            .unwrap_or_else(|| "demo".to_string());

        let timeout_secs = positive_u32(config, "upstream", "timeout_secs", 10)?;
        let retries = int_setting(config, "upstream", "retries", 1)?;
        if !(0..=5).contains(&retries) {
            return Err(invalid("upstream", "retries", "retries must be between 0 and 5"));
        }

        let listen_str = config
            .get_string("web", "listen")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen: SocketAddr = listen_str
            .parse()
            .map_err(|_| invalid("web", "listen", format!("not a socket address: {listen_str}")))?;

        let width = positive_u32(config, "chart", "width", 1000)?;
        let height = positive_u32(config, "chart", "height", 500)?;
        let font_path = match config.get_string("chart", "font_path") {
            Some(p) if p.trim().is_empty() || p.trim().eq_ignore_ascii_case("none") => None,
            Some(p) => Some(PathBuf::from(p)),
            None => Some(PathBuf::from(DEFAULT_FONT_PATH)),
        };

        let symbols = config
            .get_list("chart", "symbols")
            .unwrap_or_else(|| DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect());
        if symbols.is_empty() {
            return Err(invalid("chart", "symbols", "symbol list must not be empty"));
        }

        Ok(Self {
            upstream: UpstreamSettings {
                base_url,
                api_key,
                timeout: Duration::from_secs(timeout_secs as u64),
                retries: retries as u32,
            },
            listen,
            debug: config.get_bool("web", "debug", false),
            chart: ChartSettings {
                width,
                height,
                font_path,
            },
            symbols,
        })
    }
}
