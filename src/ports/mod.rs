//! Port traits implemented by the adapters.

pub mod chart_port;
pub mod config_port;
pub mod price_data_port;
