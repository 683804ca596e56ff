//! lockrelay web server.
//!
//! Receives Parakey webhooks and disarms the configured Ajax integration on
//! `door_unlocked`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lockrelay::{router, AjaxClient, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    let config = Arc::new(Config::from_env());
    info!(
        port = config.port,
        ajax_base_url = ?config.ajax_base_url,
        ajax_integration_id = ?config.ajax_integration_id,
        ajax_api_key_set = config.ajax_api_key.is_some(),
        webhook_secret_set = config.webhook_secret_configured(),
        expose_error_details = config.expose_error_details,
        "config_loaded"
    );
    report_config_problems(&config);

    let http = reqwest::Client::builder()
        .user_agent(concat!("lockrelay/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let panel = Arc::new(AjaxClient::new(http, config.clone()));
    let state = AppState::new(config.clone(), panel);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Warn about configuration that will make unlock events fail.
///
/// Startup continues either way; the unarm call reports the same problems
/// when it runs.
fn report_config_problems(config: &Config) {
    let missing = config.missing_required();
    if !missing.is_empty() {
        warn!(missing = ?missing, "ajax_config_incomplete");
    }

    if let Some(base_url) = &config.ajax_base_url {
        if let Err(e) = url::Url::parse(base_url) {
            warn!(ajax_base_url = %base_url, error = %e, "ajax_base_url_invalid");
        }
    }

    if config.webhook_secret_configured() {
        warn!("webhook_signature_verification_not_implemented");
    }
}

/// Resolve once SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let received = wait_for_signal().await;
    info!(signal = received, "web_server_shutting_down");
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use signal::unix::SignalKind;

    let mut terminate = match signal::unix::signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "sigterm_handler_unavailable");
            return wait_for_ctrl_c().await;
        }
    };

    tokio::select! {
        name = wait_for_ctrl_c() => name,
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    wait_for_ctrl_c().await
}

/// Never resolves if the Ctrl+C handler cannot be installed.
async fn wait_for_ctrl_c() -> &'static str {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "ctrl_c_handler_unavailable");
        std::future::pending::<()>().await;
    }
    "SIGINT"
}
