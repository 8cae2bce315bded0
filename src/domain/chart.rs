//! Encoded chart image and the fixed chart labels.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

pub const CHART_TITLE: &str = "Stock Price Over Time";
pub const X_AXIS_LABEL: &str = "Time";
pub const Y_AXIS_LABEL: &str = "Stock Price (USD)";
pub const LEGEND_LABEL: &str = "Close Price";

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Base64 text of a PNG, ready to drop into an `<img src>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    encoded: String,
}

impl ChartImage {
    pub fn from_png(bytes: &[u8]) -> Self {
        Self {
            encoded: BASE64.encode(bytes),
        }
    }

    pub fn as_base64(&self) -> &str {
        &self.encoded
    }

    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.encoded)
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.encoded)
    }
}
