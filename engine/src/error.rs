use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Missing credential or unusable setting. The message is shown verbatim.
    #[error("{0}")]
    ConfigError(String),

    #[error("{0}")]
    DataUnavailable(String),

    /// The model answered, but not with a usable decision. `detail` is for
    /// logs only; callers always see the fixed message.
    #[error("Model returned invalid JSON")]
    ValidationError { detail: String },

    #[error("{0}")]
    ProviderError(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    pub fn validation(detail: impl Into<String>) -> Self {
        EngineError::ValidationError { detail: detail.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EngineError::BadRequest(_) => StatusCode::BAD_REQUEST,
            EngineError::DataUnavailable(_)
            | EngineError::ValidationError { .. }
            | EngineError::ProviderError(_) => StatusCode::BAD_GATEWAY,
            EngineError::ConfigError(_)
            | EngineError::CsvSystemError { .. }
            | EngineError::IoError { .. }
            | EngineError::CsvDataFormatError(_)
            | EngineError::AnyhowError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => EngineError::ProviderError(format!(
                "HTTP request failed with status {}: {}",
                status, err
            )),
            None => EngineError::ProviderError(format!("HTTP request failed: {}", err)),
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:?}", self);
        (self.status_code(), self.to_string()).into_response()
    }
}
