//! Web server module for handling inbound Parakey webhooks.
//!
//! One handler, mounted at `/` and at the legacy serverless path
//! `/api/parakey-webhook`. It answers every method so that non-POST requests
//! get the relay's own 405 body.

pub mod event;
pub mod handlers;

use std::any::Any;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use event::{InboundBody, InboundEvent, DOOR_UNLOCKED};
pub use handlers::{
    health, panic_response, parakey_webhook, process_webhook, AppState, HealthResponse,
};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/", any(parakey_webhook))
        .route("/api/parakey-webhook", any(parakey_webhook))
        .route("/health", get(health))
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
            panic_response(&config, panic)
        }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
