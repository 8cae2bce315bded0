//! INI file configuration adapter.

use crate::domain::error::StockChartError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StockChartError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| StockChartError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, StockChartError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| StockChartError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// No file given: every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[upstream]
base_url = https://www.alphavantage.co/query
api_key = ABC123

[web]
listen = 0.0.0.0:8080
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("upstream", "base_url"),
            Some("https://www.alphavantage.co/query".to_string())
        );
        assert_eq!(
            adapter.get_string("web", "listen"),
            Some("0.0.0.0:8080".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[chart]\nwidth = 100\n").unwrap();
        assert_eq!(adapter.get_string("chart", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[chart]\nwidth = 800\n").unwrap();
        assert_eq!(adapter.get_int("chart", "width", 0), 800);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[chart]\n").unwrap();
        assert_eq!(adapter.get_int("chart", "missing", 42), 42);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[upstream]\ntimeout_secs = abc\n").unwrap();
        assert_eq!(adapter.get_int("upstream", "timeout_secs", 42), 42);
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[web]\na = true\nb = yes\nc = 1\nd = on\n").unwrap();
        assert!(adapter.get_bool("web", "a", false));
        assert!(adapter.get_bool("web", "b", false));
        assert!(adapter.get_bool("web", "c", false));
        assert!(adapter.get_bool("web", "d", false));
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[web]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("web", "a", true));
        assert!(!adapter.get_bool("web", "b", true));
        assert!(!adapter.get_bool("web", "c", true));
    }

    #[test]
    fn get_list_splits_and_trims() {
        let adapter =
            FileConfigAdapter::from_string("[chart]\nsymbols = AAPL, MSFT ,,NVDA\n").unwrap();
        assert_eq!(
            adapter.get_list("chart", "symbols"),
            Some(vec!["AAPL".to_string(), "MSFT".to_string(), "NVDA".to_string()])
        );
        assert_eq!(adapter.get_list("chart", "missing"), None);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[chart]\nfont_path = /fonts/Inter.ttf\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("chart", "font_path"),
            Some("/fonts/Inter.ttf".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/stockchart.ini");
        match result {
            Err(StockChartError::ConfigParse { file, .. }) => {
                assert_eq!(file, "/nonexistent/path/stockchart.ini")
            }
            _ => panic!("expected ConfigParse error"),
        }
    }

    #[test]
    fn empty_adapter_returns_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("upstream", "api_key"), None);
        assert_eq!(adapter.get_int("chart", "width", 1000), 1000);
        assert!(!adapter.get_bool("web", "debug", false));
    }
}
