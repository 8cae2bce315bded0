//! Price series access port trait.

use async_trait::async_trait;

use crate::domain::error::FetchError;
use crate::domain::query::SeriesQuery;
use crate::domain::time_series::TimeSeriesTable;

#[async_trait]
pub trait PriceDataPort {
    /// Fetch the full series for `query`, sorted ascending by timestamp.
    ///
    /// Date bounds on the query are applied by the caller, so implementations may
    /// return rows outside them.
    async fn fetch_series(&self, query: &SeriesQuery) -> Result<TimeSeriesTable, FetchError>;
}
