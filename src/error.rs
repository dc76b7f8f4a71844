use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::wav::SampleRejected;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("clone sample rejected: {0}")]
    SampleRejected(#[from] SampleRejected),
    #[error("speech api error: {0}")]
    UpstreamTransport(#[from] reqwest::Error),
    #[error("speech api returned {status}: {message}")]
    UpstreamStatus { status: u16, message: String },
    #[error("serde json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("config error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Body shape for every error response.
#[derive(Debug, serde::Serialize)]
struct ErrorBody {
    error: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::SampleRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::UpstreamTransport(_) | Error::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            Error::SerdeJsonError(_) | Error::IoError(_) | Error::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::WavError;

    #[test]
    fn sample_rejection_maps_to_unprocessable_entity() {
        let err = Error::from(SampleRejected::from(WavError::NotRiffWave));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn upstream_failure_maps_to_bad_gateway() {
        let err = Error::UpstreamStatus {
            status: 429,
            message: "quota exceeded".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
