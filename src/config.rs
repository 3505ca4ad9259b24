// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Client configuration.
//!
//! The library never reads the environment on its own; callers either build
//! a [`ClientConfig`] directly or opt in with [`ClientConfig::from_env`].
//!
//! # Environment Variables
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `VALET_ENDPOINT` | `https://route53.amazonaws.com` | Service base URL |
//! | `AWS_ACCESS_KEY_ID` | unset | Access key; signing is disabled without it |
//! | `AWS_SECRET_ACCESS_KEY` | unset | Secret key, required with the access key |
//! | `VALET_REQUEST_TIMEOUT_SECS` | `30` | Per-request HTTP timeout |
//! | `VALET_RETRY_BUDGET_SECS` | `120` | Time a request may spend retrying 429 and 5xx answers |
//! | `VALET_POLL_INTERVAL_SECS` | `2` | Interval between change status polls |
//! | `VALET_MAX_WAIT_SECS` | unset | Convergence deadline; unset waits until cancelled |
//! | `VALET_MAX_PAGES` | `1000` | Record listing page limit |

use anyhow::{bail, Context, Result};
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::constants::{
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_BUDGET_SECS,
    DEFAULT_ROUTE53_ENDPOINT, MAX_RECORD_PAGES,
};
use crate::convergence::WaitOptions;

/// AWS access key pair used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Settings for [`crate::client::Route53Client`] and [`crate::transport::HttpTransport`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL; API paths are appended to it
    pub endpoint: Url,
    /// Signing credentials; requests go out unsigned when `None`
    pub credentials: Option<Credentials>,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Time a request may spend retrying; zero disables retries
    pub retry_budget: Duration,
    /// Interval between change status polls
    pub poll_interval: Duration,
    /// Convergence deadline; `None` waits until INSYNC or cancellation
    pub max_wait: Option<Duration>,
    /// Record listing page limit
    pub max_pages: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ROUTE53_ENDPOINT).expect("default endpoint is a valid URL"),
            credentials: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry_budget: Duration::from_secs(DEFAULT_RETRY_BUDGET_SECS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_wait: None,
            max_pages: MAX_RECORD_PAGES,
        }
    }
}

impl ClientConfig {
    /// Build a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value, or if
    /// only one half of the access key pair is set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(endpoint) = var("VALET_ENDPOINT") {
            config.endpoint = Url::parse(endpoint.trim())
                .with_context(|| format!("VALET_ENDPOINT is not a valid URL: {endpoint}"))?;
        }

        config.credentials = match (var("AWS_ACCESS_KEY_ID"), var("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => Some(Credentials {
                access_key_id: access_key_id.trim().to_string(),
                secret_access_key: secret_access_key.trim().to_string(),
            }),
            (None, None) => None,
            (Some(_), None) => bail!("AWS_ACCESS_KEY_ID is set but AWS_SECRET_ACCESS_KEY is not"),
            (None, Some(_)) => bail!("AWS_SECRET_ACCESS_KEY is set but AWS_ACCESS_KEY_ID is not"),
        };

        if let Some(secs) = var("VALET_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = parse_secs("VALET_REQUEST_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = var("VALET_RETRY_BUDGET_SECS") {
            config.retry_budget = parse_secs("VALET_RETRY_BUDGET_SECS", &secs)?;
        }
        if let Some(secs) = var("VALET_POLL_INTERVAL_SECS") {
            config.poll_interval = parse_secs("VALET_POLL_INTERVAL_SECS", &secs)?;
        }
        if let Some(secs) = var("VALET_MAX_WAIT_SECS") {
            config.max_wait = Some(parse_secs("VALET_MAX_WAIT_SECS", &secs)?);
        }
        if let Some(pages) = var("VALET_MAX_PAGES") {
            config.max_pages = pages
                .trim()
                .parse()
                .with_context(|| format!("VALET_MAX_PAGES must be a positive integer, got '{pages}'"))?;
            if config.max_pages == 0 {
                bail!("VALET_MAX_PAGES must be at least 1");
            }
        }

        Ok(config)
    }

    /// Convergence wait options derived from this configuration.
    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            poll_interval: self.poll_interval,
            max_wait: self.max_wait,
            cancel: None,
        }
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a whole number of seconds, got '{value}'"))?;
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
