//! Configuration module for environment variable parsing.
//!
//! Configuration is read once at startup and handed to the web state as an
//! `Arc<Config>`. Nothing else reads the environment.

use std::env;
use tracing::warn;

/// Name of the Ajax base URL variable.
pub const AJAX_BASE_URL: &str = "AJAX_BASE_URL";
/// Name of the Ajax integration id variable.
pub const AJAX_INTEGRATION_ID: &str = "AJAX_INTEGRATION_ID";
/// Name of the Ajax API key variable.
pub const AJAX_API_KEY: &str = "AJAX_API_KEY";
/// Name of the Parakey webhook secret variable.
pub const PARAKEY_WEBHOOK_SECRET: &str = "PARAKEY_WEBHOOK_SECRET";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ajax API base URL, e.g. `https://api.ajax.systems/api`
    pub ajax_base_url: Option<String>,

    /// Ajax integration identifier used in the control path
    pub ajax_integration_id: Option<String>,

    /// Ajax API key sent as `X-Api-Key`
    pub ajax_api_key: Option<String>,

    /// Parakey webhook secret. Loaded but not used to verify requests.
    pub parakey_webhook_secret: Option<String>,

    /// Port for the web server to listen on
    pub port: u16,

    /// Whether 500 responses echo the base URL and integration id
    pub expose_error_details: bool,
}

/// Validated view of the values needed for one unarm call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AjaxTarget<'a> {
    pub base_url: &'a str,
    pub integration_id: &'a str,
    pub api_key: &'a str,
}

impl AjaxTarget<'_> {
    /// `{base_url}/v1/integrations/{integration_id}/control/unarm`
    ///
    /// A trailing `/` on the base URL is dropped, so `https://x/` does not
    /// yield `https://x//v1/...` as plain interpolation would.
    pub fn unarm_url(&self) -> String {
        unarm_url(self.base_url, self.integration_id)
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        Config {
            ajax_base_url: non_empty(AJAX_BASE_URL),
            ajax_integration_id: non_empty(AJAX_INTEGRATION_ID),
            ajax_api_key: non_empty(AJAX_API_KEY),
            parakey_webhook_secret: non_empty(PARAKEY_WEBHOOK_SECRET),

            port: parse_or("PORT", lookup("PORT"), 8080),

            expose_error_details: parse_bool(
                "EXPOSE_ERROR_DETAILS",
                lookup("EXPOSE_ERROR_DETAILS"),
                true,
            ),
        }
    }

    /// Names of every required variable that is absent, in declaration order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            (AJAX_BASE_URL, &self.ajax_base_url),
            (AJAX_INTEGRATION_ID, &self.ajax_integration_id),
            (AJAX_API_KEY, &self.ajax_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// The unarm target, or the list of missing variable names.
    pub fn ajax_target(&self) -> Result<AjaxTarget<'_>, Vec<&'static str>> {
        match (
            self.ajax_base_url.as_deref(),
            self.ajax_integration_id.as_deref(),
            self.ajax_api_key.as_deref(),
        ) {
            (Some(base_url), Some(integration_id), Some(api_key)) => Ok(AjaxTarget {
                base_url,
                integration_id,
                api_key,
            }),
            _ => Err(self.missing_required()),
        }
    }

    /// Unarm URL for log context. Missing parts are left empty.
    pub fn unarm_url(&self) -> String {
        unarm_url(
            self.ajax_base_url.as_deref().unwrap_or_default(),
            self.ajax_integration_id.as_deref().unwrap_or_default(),
        )
    }

    pub fn webhook_secret_configured(&self) -> bool {
        self.parakey_webhook_secret.is_some()
    }
}

fn unarm_url(base_url: &str, integration_id: &str) -> String {
    format!(
        "{}/v1/integrations/{}/control/unarm",
        base_url.trim_end_matches('/'),
        integration_id
    )
}

/// Parse a value, falling back to the default with a warning.
fn parse_or<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

/// Parse a boolean flag. Accepts true/false, 1/0, yes/no, on/off.
fn parse_bool(name: &str, raw: Option<String>, default: bool) -> bool {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean, using default");
            default
        }
    }
}
