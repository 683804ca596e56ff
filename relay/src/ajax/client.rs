//! reqwest-backed Ajax client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{error, info};

use super::{OutboundError, SecurityPanel};
use crate::error::{RelayError, RelayResult};
use crate::Config;

/// Header carrying the Ajax API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Disarms an Ajax integration through its REST control endpoint.
///
/// Configuration is checked on every call rather than at construction, so a
/// misconfigured deployment still starts and answers non-unlock events.
#[derive(Clone)]
pub struct AjaxClient {
    http: Client,
    config: Arc<Config>,
}

impl AjaxClient {
    pub fn new(http: Client, config: Arc<Config>) -> Self {
        Self { http, config }
    }

    async fn send_unarm(&self) -> RelayResult<Value> {
        let target = self
            .config
            .ajax_target()
            .map_err(RelayError::ConfigurationMissing)?;

        let url = target.unarm_url();
        info!(url = %url, "ajax_unarm_request");

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, target.api_key)
            .json(&json!({}))
            .send()
            .await
            .map_err(OutboundError::from)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(OutboundError::Status(status).into());
        }

        let body = response.bytes().await.map_err(OutboundError::from)?;
        Ok(decode_payload(&body))
    }
}

#[async_trait]
impl SecurityPanel for AjaxClient {
    async fn unarm(&self) -> RelayResult<Value> {
        let result = self.send_unarm().await;

        if let Err(e) = &result {
            error!(
                error = %e,
                url = %self.config.unarm_url(),
                base_url = ?self.config.ajax_base_url,
                integration_id = ?self.config.ajax_integration_id,
                "ajax_unarm_failed"
            );
        }

        result
    }
}

/// Interpret the response body: JSON when it parses, raw text otherwise.
fn decode_payload(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
