// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Change propagation state machine.
//!
//! A submitted change starts `PENDING` and is polled until the service
//! reports `INSYNC`. Each wait is an independent future: many zones can
//! converge concurrently without sharing a lock, and every wait can be
//! bounded by a deadline or interrupted through a [`CancellationToken`].
//!
//! ```text
//! PENDING --sleep(poll_interval)--> query --PENDING--> PENDING
//!                                         \--INSYNC--> InSync
//! any wait --cancel--> Cancelled(last known status)
//! any wait --deadline--> ConvergenceTimeout
//! ```

use futures::future::join_all;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::Route53Client;
use crate::constants::DEFAULT_POLL_INTERVAL_SECS;
use crate::errors::Route53Error;
use crate::types::ChangeStatus;

/// How long and how often to poll a change.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Sleep between status queries
    pub poll_interval: Duration,
    /// Give up with [`Route53Error::ConvergenceTimeout`] after this long
    pub max_wait: Option<Duration>,
    /// Stop waiting and return [`Convergence::Cancelled`] when triggered
    pub cancel: Option<CancellationToken>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_wait: None,
            cancel: None,
        }
    }
}

impl WaitOptions {
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Outcome of a convergence wait that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Convergence {
    /// The service reported the change as propagated
    InSync(ChangeStatus),
    /// The wait was cancelled; carries the last status observed
    Cancelled(ChangeStatus),
}

impl Convergence {
    /// Last known status, whichever way the wait ended.
    #[must_use]
    pub fn status(&self) -> &ChangeStatus {
        match self {
            Self::InSync(status) | Self::Cancelled(status) => status,
        }
    }

    #[must_use]
    pub fn into_status(self) -> ChangeStatus {
        match self {
            Self::InSync(status) | Self::Cancelled(status) => status,
        }
    }

    #[must_use]
    pub fn is_in_sync(&self) -> bool {
        matches!(self, Self::InSync(_))
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Poll `status` until it is `INSYNC`, cancelled, or past its deadline.
///
/// Performs no query at all when `status` is already `INSYNC`.
///
/// # Errors
///
/// Returns [`Route53Error::ConvergenceTimeout`] when `max_wait` elapses, or
/// the error of a failed status query.
pub(crate) async fn poll_until_in_sync(
    client: &Route53Client,
    mut status: ChangeStatus,
    options: &WaitOptions,
) -> Result<Convergence, Route53Error> {
    let start = Instant::now();
    let cancel = options.cancel.clone().unwrap_or_else(CancellationToken::new);
    let deadline = async {
        match options.max_wait {
            Some(max_wait) => sleep_until(start + max_wait).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let timeout = |status: &ChangeStatus| {
        warn!(
            zone_id = %status.zone_id,
            change_id = %status.change_id,
            waited = ?start.elapsed(),
            "Change did not converge before the deadline"
        );
        Route53Error::ConvergenceTimeout {
            change_id: status.change_id.clone(),
            waited: start.elapsed(),
        }
    };

    let mut polls: u32 = 0;
    while !status.is_in_sync() {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(change_id = %status.change_id, polls, "Convergence wait cancelled");
                return Ok(Convergence::Cancelled(status));
            }
            () = &mut deadline => return Err(timeout(&status)),
            () = sleep(options.poll_interval) => {}
        }

        polls += 1;
        let current = status.clone();
        let fresh = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(change_id = %status.change_id, polls, "Convergence wait cancelled");
                return Ok(Convergence::Cancelled(status));
            }
            () = &mut deadline => return Err(timeout(&status)),
            result = client.query_status(&current) => result?,
        };

        debug!(
            zone_id = %fresh.zone_id,
            change_id = %fresh.change_id,
            status = %fresh.status,
            poll = polls,
            "Polled change status"
        );
        status = fresh;
    }

    info!(
        zone_id = %status.zone_id,
        change_id = %status.change_id,
        polls,
        elapsed = ?start.elapsed(),
        "Change is INSYNC"
    );
    Ok(Convergence::InSync(status))
}

/// Await many changes at once, one independent wait per status.
///
/// Results are returned in the order of `statuses`.
pub async fn await_all(
    client: &Route53Client,
    statuses: Vec<ChangeStatus>,
    options: &WaitOptions,
) -> Vec<Result<Convergence, Route53Error>> {
    join_all(
        statuses
            .into_iter()
            .map(|status| client.await_convergence(status, options)),
    )
    .await
}

/// Run a convergence wait as its own task.
///
/// Cancel it through the token in `options`; aborting the handle drops the
/// wait without reporting the last known status.
#[must_use]
pub fn spawn_convergence(
    client: Route53Client,
    status: ChangeStatus,
    options: WaitOptions,
) -> JoinHandle<Result<Convergence, Route53Error>> {
    tokio::spawn(async move { client.await_convergence(status, &options).await })
}

#[cfg(test)]
#[path = "convergence_tests.rs"]
mod convergence_tests;
