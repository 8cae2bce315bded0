//! Single chart request: validate, fetch, render.
//!
//! Every failure is caught here and turned into a [`ChartOutcome::Failed`]; nothing
//! propagates to the HTTP layer as a fault.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::chart::ChartImage;
use crate::domain::error::{FetchError, RenderError, RequestError};
use crate::domain::query::{ChartType, QueryParameters, RawQuery, SeriesQuery};
use crate::domain::time_series::TimeSeriesTable;
use crate::ports::chart_port::ChartPort;
use crate::ports::price_data_port::PriceDataPort;

/// Terminal state of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    /// Nothing submitted yet.
    Idle,
    Failed(RequestError),
    Success(ChartImage),
}

impl ChartOutcome {
    pub fn chart(&self) -> Option<&ChartImage> {
        match self {
            ChartOutcome::Success(image) => Some(image),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            ChartOutcome::Failed(err) => Some(err.user_message()),
            _ => None,
        }
    }
}

/// Fetch a series and restrict it to the query's date bounds.
pub async fn fetch_table(
    port: &(dyn PriceDataPort + Send + Sync),
    query: &SeriesQuery,
) -> Result<TimeSeriesTable, FetchError> {
    let table = port.fetch_series(query).await?;
    let total = table.len();
    let table = table.filter_dates(query.start_date, query.end_date);
    debug!(
        symbol = %query.symbol,
        function = %query.function,
        total,
        kept = table.len(),
        "series filtered to date range"
    );
    Ok(table)
}

/// Render on the blocking pool so drawing and PNG encoding stay off the async workers.
pub async fn render_table(
    charts: Arc<dyn ChartPort + Send + Sync>,
    table: TimeSeriesTable,
    chart_type: ChartType,
) -> Result<ChartImage, RenderError> {
    tokio::task::spawn_blocking(move || charts.render(&table, &chart_type))
        .await
        .map_err(|e| RenderError::Drawing(format!("render task failed: {e}")))?
}

/// Run a parsed query through fetch and render.
pub async fn run_query(
    params: &QueryParameters,
    data: &(dyn PriceDataPort + Send + Sync),
    charts: Arc<dyn ChartPort + Send + Sync>,
) -> Result<ChartImage, RequestError> {
    let table = fetch_table(data, &params.series).await.map_err(|e| {
        warn!(symbol = %params.series.symbol, error = %e, "could not fetch price series");
        RequestError::Fetch(e)
    })?;

    render_table(charts, table, params.chart_type.clone())
        .await
        .map_err(|e| {
            warn!(symbol = %params.series.symbol, error = %e, "could not render chart");
            RequestError::Render(e)
        })
}

/// Handle one form submission end to end.
pub async fn process(
    raw: &RawQuery<'_>,
    data: &(dyn PriceDataPort + Send + Sync),
    charts: Arc<dyn ChartPort + Send + Sync>,
) -> ChartOutcome {
    let params = match QueryParameters::parse(raw) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "submission rejected");
            return ChartOutcome::Failed(e);
        }
    };

    match run_query(&params, data, charts).await {
        Ok(image) => ChartOutcome::Success(image),
        Err(e) => ChartOutcome::Failed(e),
    }
}
