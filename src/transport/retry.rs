// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Retry schedule for Route53 requests.
//!
//! Route53 answers bursts with 429 and transient outages with 5xx. Those
//! answers, and requests that never got a response, are retried with a
//! doubling, jittered delay until the request's retry budget is spent. Every
//! other answer carries a document the caller must see and is never retried.

use rand::Rng;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::Instant;

use crate::config::ClientConfig;
use crate::constants::{RETRY_FIRST_DELAY_MILLIS, RETRY_MAX_DELAY_SECS};

/// Spread applied to each delay (±10%) so concurrent clients drift apart
const JITTER: f64 = 0.1;

/// How long and how often a single request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    first_delay: Duration,
    max_delay: Duration,
    budget: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(first_delay: Duration, max_delay: Duration, budget: Duration) -> Self {
        Self {
            first_delay,
            max_delay: max_delay.max(first_delay),
            budget,
        }
    }

    /// Policy with the standard delays and the configured retry budget.
    ///
    /// Delays run 50ms, 100ms, 200ms ... up to 10s; a zero budget disables
    /// retries altogether.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Duration::from_millis(RETRY_FIRST_DELAY_MILLIS),
            Duration::from_secs(RETRY_MAX_DELAY_SECS),
            config.retry_budget,
        )
    }

    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Start the schedule for one request. The budget is counted from now.
    #[must_use]
    pub fn start(&self) -> RetrySchedule {
        RetrySchedule {
            next: self.first_delay,
            max_delay: self.max_delay,
            deadline: Instant::now() + self.budget,
        }
    }
}

/// Delays for the retries of one request.
#[derive(Debug)]
pub struct RetrySchedule {
    next: Duration,
    max_delay: Duration,
    deadline: Instant,
}

impl RetrySchedule {
    /// Delay before the next attempt, or `None` once the budget is spent.
    ///
    /// The last delay is cut short so no attempt starts after the deadline.
    pub fn next_delay(&mut self) -> Option<Duration> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return None;
        }

        let delay = jittered(self.next).min(remaining);
        self.next = self.next.saturating_mul(2).min(self.max_delay);
        Some(delay)
    }
}

fn jittered(delay: Duration) -> Duration {
    let secs = delay.as_secs_f64();
    let spread = secs * JITTER;
    Duration::from_secs_f64(rand::thread_rng().gen_range(secs - spread..=secs + spread))
}

/// Whether a response status is worth another attempt.
///
/// Throttling can also arrive as 400 `Throttling`; that body is an error
/// document and goes back to the caller like any other 4xx.
#[must_use]
pub fn is_retryable_http_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
