//! Web server adapter.
//!
//! One route serves the chart form: GET renders it empty, POST runs a chart
//! request and renders the same page with the chart or an error message.
//! Requests sent by HTMX get only the result fragment back.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::settings::AppConfig;
use crate::ports::chart_port::ChartPort;
use crate::ports::price_data_port::PriceDataPort;

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub data_port: Arc<dyn PriceDataPort + Send + Sync>,
    pub chart_port: Arc<dyn ChartPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
