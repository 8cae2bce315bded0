//! Chart rendering port trait.

use crate::domain::chart::ChartImage;
use crate::domain::error::RenderError;
use crate::domain::query::ChartType;
use crate::domain::time_series::TimeSeriesTable;

pub trait ChartPort {
    fn render(&self, table: &TimeSeriesTable, chart_type: &ChartType)
    -> Result<ChartImage, RenderError>;
}
