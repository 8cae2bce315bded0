//! HTTP request handlers for web adapter.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    Form,
};
use askama::Template;
use std::sync::Arc;

use crate::domain::chart_request::{self, ChartOutcome};
use crate::domain::query::RawQuery;

use super::templates::IndexTemplate;
use super::{is_htmx_request, AppState, WebError};

/// Submitted chart form. Missing fields arrive as empty strings.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ChartFormData {
    pub symbol: String,
    pub chart_type: String,
    pub function: String,
    pub interval: String,
    pub start_date: String,
    pub end_date: String,
}

impl ChartFormData {
    fn as_raw(&self) -> RawQuery<'_> {
        RawQuery {
            symbol: &self.symbol,
            function: &self.function,
            interval: &self.interval,
            chart_type: &self.chart_type,
            start_date: &self.start_date,
            end_date: &self.end_date,
        }
    }
}

fn render_page(
    state: &AppState,
    headers: &HeaderMap,
    form: &ChartFormData,
    outcome: &ChartOutcome,
) -> Result<Response, WebError> {
    let template = IndexTemplate::new(&state.config.symbols, form, outcome);

    if is_htmx_request(headers) {
        Ok(Html(template.fragment()).into_response())
    } else {
        Ok(Html(template.render()?).into_response())
    }
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    render_page(&state, &headers, &ChartFormData::default(), &ChartOutcome::Idle)
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ChartFormData>,
) -> Result<Response, WebError> {
    let outcome =
        chart_request::process(&form.as_raw(), &*state.data_port, state.chart_port.clone()).await;

    render_page(&state, &headers, &form, &outcome)
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
