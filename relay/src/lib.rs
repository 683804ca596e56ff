//! lockrelay - Parakey to Ajax webhook relay.
//!
//! Parakey calls the relay when a door event happens. For `door_unlocked`
//! the relay disarms the Ajax integration and then acknowledges the webhook.
//!
//! ## Flow
//!
//! ```text
//! Parakey → POST / → WebhookHandler → POST {AJAX_BASE_URL}/v1/integrations/{id}/control/unarm
//! ```
//!
//! Inbound webhooks are not signature-checked. `PARAKEY_WEBHOOK_SECRET` is
//! loaded only so its presence can be reported at startup.

pub mod ajax;
pub mod config;
pub mod error;
pub mod web;

// Re-export commonly used types
pub use ajax::{AjaxClient, SecurityPanel};
pub use config::Config;
pub use error::{RelayError, RelayResult};
pub use web::{router, AppState};
