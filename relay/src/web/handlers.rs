//! Webhook endpoint handlers.
//!
//! The Parakey handler is a straight line:
//! 1. Reject anything but POST
//! 2. Decode the JSON body
//! 3. Disarm Ajax if the event is `door_unlocked`, waiting for the result
//! 4. Answer `200 OK`, or map the failure to a response

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::ajax::SecurityPanel;
use crate::error::{RelayError, RelayResult};
use crate::web::event::InboundBody;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub panel: Arc<dyn SecurityPanel>,
}

impl AppState {
    pub fn new(config: Arc<Config>, panel: Arc<dyn SecurityPanel>) -> Self {
        Self { config, panel }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Parakey Webhook
// =============================================================================

/// Run one webhook invocation against `state`.
///
/// Every `door_unlocked` event triggers its own disarm call; repeated
/// deliveries are not deduplicated.
pub async fn process_webhook(
    state: &AppState,
    method: &Method,
    body: InboundBody,
) -> RelayResult<()> {
    if *method != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    let event = body.decode()?;

    if event.payload().is_null() {
        return Err(RelayError::Internal(
            "Cannot read properties of null (reading 'event')".to_string(),
        ));
    }

    info!(event = ?event.kind(), "webhook_received");

    if event.is_door_unlocked() {
        info!(payload = %event.payload(), "door_unlocked_received");
        let response = state.panel.unarm().await?;
        info!(response = %response, "ajax_unarm_succeeded");
    }

    Ok(())
}

/// Parakey webhook endpoint. Mounted for every method.
pub async fn parakey_webhook(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    match process_webhook(&state, &method, InboundBody::Raw(body)).await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            match &e {
                RelayError::MethodNotAllowed => {
                    warn!(method = %method, "webhook_method_not_allowed")
                }
                RelayError::MalformedBody(source) => {
                    warn!(error = %source, "webhook_invalid_json")
                }
                _ => error!(error = %e, "webhook_failed"),
            }
            e.into_response_with(&state.config)
        }
    }
}

/// Render a panic raised while handling a request as a 500.
pub fn panic_response(config: &Config, panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Unknown panic".to_string()
    };

    error!(panic = %message, "webhook_panicked");

    RelayError::Internal(message).into_response_with(config)
}
