//! Outbound calls to the Ajax security-system API.
//!
//! The webhook handler only sees the [`SecurityPanel`] trait; [`AjaxClient`]
//! is the production implementation.

pub mod client;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::error::RelayResult;

pub use client::{AjaxClient, API_KEY_HEADER};

/// A remote security system that can be disarmed.
#[async_trait]
pub trait SecurityPanel: Send + Sync {
    /// Disarm the system. Returns whatever payload the remote side sent back.
    async fn unarm(&self) -> RelayResult<Value>;
}

/// Failure of the outbound unarm request itself.
#[derive(Debug, Error)]
pub enum OutboundError {
    /// The API answered with anything other than 200.
    #[error("Failed to unarm Ajax system: {}", .0.canonical_reason().unwrap_or_default())]
    Status(StatusCode),

    /// Connection, TLS or body read failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
