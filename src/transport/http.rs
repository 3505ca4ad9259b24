// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Route53 transport over HTTPS using `reqwest`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client as HttpClient, Method, StatusCode};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, warn};
use url::Url;

use super::retry::{is_retryable_http_status, RetryPolicy};
use super::signing::sign;
use super::Route53Transport;
use crate::config::{ClientConfig, Credentials};
use crate::constants::{AMZN_AUTHORIZATION_HEADER, ROUTE53_API_VERSION};

/// HTTP error with status code for retry logic.
///
/// This error type preserves the HTTP status code so we can determine
/// if the error is retryable (429, 5xx) without parsing error strings.
#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl std::error::Error for HttpError {}

/// Marker for failures before a response arrived (connect, timeout).
#[derive(Debug)]
struct SendError(reqwest::Error);

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to send request: {}", self.0)
    }
}

impl std::error::Error for SendError {}

/// [`Route53Transport`] that talks to the service over HTTPS.
///
/// Requests are signed with AWS3-HTTPS when credentials are configured.
/// Throttling (429), server errors (5xx) and send failures are retried
/// within the configured retry budget. Any other response body is handed
/// back to the caller so the codecs can decode service error documents.
///
/// # Examples
///
/// ```rust,no_run
/// use valet::config::ClientConfig;
/// use valet::transport::HttpTransport;
///
/// # fn example() -> anyhow::Result<()> {
/// let transport = HttpTransport::new(&ClientConfig::from_env()?)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<HttpClient>,
    endpoint: Url,
    credentials: Option<Credentials>,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Create a transport from client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
            endpoint: config.endpoint.clone(),
            credentials: config.credentials.clone(),
            retry: RetryPolicy::from_config(config),
        })
    }

    /// Build the URL of an API resource.
    ///
    /// `path` is relative to the API version, e.g. `hostedzone/Z1/rrset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL is invalid.
    pub fn api_url(&self, path: &str, query: &str) -> Result<Url> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!(
            "{base}/{ROUTE53_API_VERSION}/{}",
            path.trim_start_matches('/')
        ))
        .with_context(|| format!("Invalid Route53 URL for path '{path}'"))?;

        if !query.is_empty() {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    /// Execute a request, retrying 429, 5xx and send failures until the
    /// retry budget is spent. Any other response body goes to the caller.
    async fn request(&self, method: Method, url: Url, body: Option<&str>) -> Result<String> {
        let mut schedule = self.retry.start();
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let err = match self.request_once(method.clone(), url.clone(), body).await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!(
                            method = %method,
                            url = %url,
                            attempt = attempt,
                            elapsed = ?start_time.elapsed(),
                            "Route53 call succeeded after retries"
                        );
                    }
                    return Ok(response);
                }
                Err(e) => e,
            };

            let is_retryable = if let Some(http_err) = err.downcast_ref::<HttpError>() {
                is_retryable_http_status(http_err.status)
            } else {
                err.downcast_ref::<SendError>().is_some()
            };

            if !is_retryable {
                error!(
                    method = %method,
                    url = %url,
                    error = %err,
                    "Non-retryable Route53 transport error, failing immediately"
                );
                return Err(err);
            }

            match schedule.next_delay() {
                Some(duration) => {
                    warn!(
                        method = %method,
                        url = %url,
                        attempt = attempt,
                        retry_after = ?duration,
                        error = %err,
                        "Retryable Route53 transport error, will retry"
                    );
                    tokio::time::sleep(duration).await;
                }
                None => {
                    error!(
                        method = %method,
                        url = %url,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        error = %err,
                        budget = ?self.retry.budget(),
                        "Retry budget spent, giving up"
                    );
                    return Err(err.context(format!("Retry budget spent after {attempt} attempts")));
                }
            }
        }
    }

    /// Single request without retry.
    async fn request_once(&self, method: Method, url: Url, body: Option<&str>) -> Result<String> {
        debug!(method = %method, url = %url, body = ?body, "Route53 request");

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header("Content-Type", "text/xml; charset=UTF-8");

        if let Some(credentials) = &self.credentials {
            let signed = sign(credentials, Utc::now());
            request = request
                .header("Date", signed.date)
                .header(AMZN_AUTHORIZATION_HEADER, signed.authorization);
        }

        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request.send().await.map_err(SendError)?;
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {method} {url}"))?;

        debug!(method = %method, url = %url, status = %status, body = %text, "Route53 response");

        if status.is_success() {
            return Ok(text);
        }

        // Error documents are decoded by the caller; only empty or retryable failures stop here
        if is_retryable_http_status(status) || text.trim().is_empty() {
            return Err(HttpError {
                status,
                message: text,
            }
            .into());
        }

        Ok(text)
    }
}

#[async_trait]
impl Route53Transport for HttpTransport {
    async fn post_change_batch(&self, zone_id: &str, payload: &str) -> Result<String> {
        let url = self.api_url(&format!("hostedzone/{zone_id}/rrset"), "")?;
        self.request(Method::POST, url, Some(payload)).await
    }

    async fn get_change_info(&self, change_id: &str) -> Result<String> {
        let url = self.api_url(&format!("change/{change_id}"), "")?;
        self.request(Method::GET, url, None).await
    }

    async fn get_resource_record_sets(&self, zone_id: &str, query: &str) -> Result<String> {
        let url = self.api_url(&format!("hostedzone/{zone_id}/rrset"), query)?;
        self.request(Method::GET, url, None).await
    }

    async fn get_hosted_zone(&self, zone_id: &str) -> Result<String> {
        let path = if zone_id.is_empty() {
            "hostedzone".to_string()
        } else {
            format!("hostedzone/{zone_id}")
        };
        let url = self.api_url(&path, "")?;
        self.request(Method::GET, url, None).await
    }

    async fn post_hosted_zone(&self, payload: &str) -> Result<String> {
        let url = self.api_url("hostedzone", "")?;
        self.request(Method::POST, url, Some(payload)).await
    }

    async fn delete_hosted_zone(&self, zone_id: &str, comment: &str) -> Result<String> {
        debug!(zone_id = %zone_id, comment = %comment, "Deleting hosted zone");
        let url = self.api_url(&format!("hostedzone/{zone_id}"), "")?;
        self.request(Method::DELETE, url, None).await
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
