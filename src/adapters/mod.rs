//! Concrete adapter implementations for ports.

pub mod alpha_vantage_adapter;
pub mod file_config_adapter;
pub mod plotters_chart_adapter;
pub mod web;
