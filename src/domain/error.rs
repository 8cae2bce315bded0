//! Domain error types.

/// Failure to obtain a price series from the upstream provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("unexpected response schema: {0}")]
    UnexpectedSchema(String),

    #[error("malformed series data: {0}")]
    MalformedData(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unsupported series function: {0}")]
    UnsupportedFunction(String),
}

impl FetchError {
    /// Whether a second attempt at the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::UpstreamStatus(code) => (500..600).contains(code),
            _ => false,
        }
    }
}

/// Failure to turn a table into an encoded chart.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("chart drawing failed: {0}")]
    Drawing(String),

    #[error("image encoding failed: {0}")]
    Encoding(String),
}

/// Terminal failure states of a chart request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("invalid date format")]
    InvalidDateFormat,

    #[error("end date before start date")]
    InvalidDateRange,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl RequestError {
    /// The fixed text shown to the user on the page.
    pub fn user_message(&self) -> &'static str {
        match self {
            RequestError::InvalidDateFormat => "Invalid date format. Please use YYYY-MM-DD.",
            RequestError::InvalidDateRange => "End date cannot be before the start date.",
            RequestError::Fetch(_) => {
                "Error: Could not fetch data for the selected symbol or date range."
            }
            RequestError::Render(_) => "Error: Could not generate chart image.",
        }
    }
}

/// Top-level error type for process-level failures.
#[derive(Debug, thiserror::Error)]
pub enum StockChartError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("http client error: {reason}")]
    HttpClient { reason: String },

    #[error("server error: {reason}")]
    Server { reason: String },

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockChartError> for std::process::ExitCode {
    fn from(err: &StockChartError) -> Self {
        let code: u8 = match err {
            StockChartError::Io(_) => 1,
            StockChartError::ConfigParse { .. }
            | StockChartError::ConfigInvalid { .. } => 2,
            StockChartError::HttpClient { .. } | StockChartError::Server { .. } => 3,
            StockChartError::Request(RequestError::InvalidDateFormat)
            | StockChartError::Request(RequestError::InvalidDateRange) => 4,
            StockChartError::Request(RequestError::Fetch(_)) => 5,
            StockChartError::Request(RequestError::Render(_)) => 6,
        };
        std::process::ExitCode::from(code)
    }
}
