#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, NaiveDate};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stockchart::adapters::file_config_adapter::FileConfigAdapter;
use stockchart::adapters::plotters_chart_adapter::PlottersChartAdapter;
use stockchart::adapters::web::{build_router, AppState};
use stockchart::domain::chart::ChartImage;
use stockchart::domain::error::{FetchError, RenderError};
use stockchart::domain::query::{ChartType, SeriesQuery};
use stockchart::domain::settings::AppConfig;
use stockchart::domain::time_series::{PriceBar, TimeSeriesTable};
use stockchart::ports::chart_port::ChartPort;
use stockchart::ports::price_data_port::PriceDataPort;

/// Price source returning a fixed table or error, recording each query.
pub struct MockPriceDataPort {
    pub result: Result<TimeSeriesTable, FetchError>,
    pub calls: Arc<AtomicUsize>,
    pub last_query: Arc<Mutex<Option<SeriesQuery>>>,
}

impl MockPriceDataPort {
    pub fn with_table(table: TimeSeriesTable) -> Self {
        Self {
            result: Ok(table),
            calls: Arc::new(AtomicUsize::new(0)),
            last_query: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_error(err: FetchError) -> Self {
        Self {
            result: Err(err),
            calls: Arc::new(AtomicUsize::new(0)),
            last_query: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl PriceDataPort for MockPriceDataPort {
    async fn fetch_series(&self, query: &SeriesQuery) -> Result<TimeSeriesTable, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        self.result.clone()
    }
}

/// Chart renderer that always fails.
pub struct FailingChartPort;

impl ChartPort for FailingChartPort {
    fn render(&self, _table: &TimeSeriesTable, _chart_type: &ChartType) -> Result<ChartImage, RenderError> {
        Err(RenderError::Encoding("test failure".into()))
    }
}

pub fn bar(timestamp: &str, close: f64) -> PriceBar {
    let timestamp = chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").unwrap();
    PriceBar {
        timestamp,
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000.0,
    }
}

/// One bar per calendar day starting at `start`, closing at `base + i`.
pub fn daily_bars(start: &str, count: i64, base: f64) -> TimeSeriesTable {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    TimeSeriesTable::new(
        (0..count)
            .map(|i| PriceBar {
                timestamp: (start + Duration::days(i)).and_hms_opt(0, 0, 0).unwrap(),
                open: base + i as f64,
                high: base + i as f64 + 2.0,
                low: base + i as f64 - 2.0,
                close: base + i as f64,
                volume: 1_000_000.0,
            })
            .collect(),
    )
}

pub fn test_config() -> AppConfig {
    let adapter = FileConfigAdapter::from_string(
        "[chart]\nwidth = 320\nheight = 200\nfont_path = none\nsymbols = AAPL,MSFT,GOOGL\n",
    )
    .unwrap();
    AppConfig::from_port_with_env(&adapter, None).unwrap()
}

pub fn create_test_app(data_port: MockPriceDataPort) -> Router {
    let config = test_config();
    let chart_port = PlottersChartAdapter::new(&config.chart);
    build_router(AppState {
        config: Arc::new(config),
        data_port: Arc::new(data_port),
        chart_port: Arc::new(chart_port),
    })
}

pub fn create_failing_render_app(data_port: MockPriceDataPort) -> Router {
    build_router(AppState {
        config: Arc::new(test_config()),
        data_port: Arc::new(data_port),
        chart_port: Arc::new(FailingChartPort),
    })
}
