//! Relay error types and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ajax::OutboundError;
use crate::Config;

/// Every way a webhook invocation can fail.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Non-POST request.
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Request body is not valid JSON.
    #[error("Bad Request - Invalid JSON")]
    MalformedBody(#[source] serde_json::Error),

    /// Required Ajax settings are absent at call time.
    #[error("Missing required environment variables: {}", .0.join(", "))]
    ConfigurationMissing(Vec<&'static str>),

    /// The disarm call failed at the transport level or returned non-200.
    #[error(transparent)]
    OutboundCallFailure(#[from] OutboundError),

    /// Anything else raised while handling the request.
    #[error("{0}")]
    Internal(String),
}

/// Configuration identifiers echoed on 500 responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<String>,
}

impl ErrorDetails {
    /// Details for `config`, or `None` when the echo is disabled.
    pub fn from_config(config: &Config) -> Option<Self> {
        config.expose_error_details.then(|| Self {
            base_url: config.ajax_base_url.clone(),
            integration_id: config.ajax_integration_id.clone(),
        })
    }
}

/// JSON body of a 500 response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::ConfigurationMissing(_)
            | Self::OutboundCallFailure(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error for the inbound caller.
    ///
    /// Client errors are plain text. Server errors are JSON and carry the
    /// configuration identifiers from `config` when the echo is enabled.
    pub fn into_response_with(self, config: &Config) -> Response {
        let status = self.status();
        match self {
            Self::MethodNotAllowed | Self::MalformedBody(_) => {
                (status, self.to_string()).into_response()
            }
            _ => {
                let body = Json(ErrorResponse {
                    error: self.to_string(),
                    details: ErrorDetails::from_config(config),
                });
                (status, body).into_response()
            }
        }
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
