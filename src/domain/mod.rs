//! Core domain types and logic.

pub mod chart;
pub mod chart_request;
pub mod error;
pub mod query;
pub mod settings;
pub mod time_series;
