// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for Route53 zone and change-batch operations.
//!
//! Every failure of the driver is reported to the immediate caller as a
//! [`Route53Error`]. Nothing is swallowed and nothing is retried at this
//! layer except transport failures, which the transport itself may retry.
//!
//! Cancelling a convergence wait is not an error; see
//! [`crate::convergence::Convergence::Cancelled`].

use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`crate::client::Route53Client`] and the XML codecs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Route53Error {
    /// The service rejected the request
    ///
    /// Decoded from an `Error` element in the response body. A change batch is
    /// atomic: a rejected batch applied none of its changes.
    #[error("Route53 rejected the request: {code}: {message}")]
    Service {
        /// Service error code (e.g. `InvalidInput`)
        code: String,
        /// Human-readable message from the service
        message: String,
    },

    /// A response could not be decoded into the expected shape
    ///
    /// Returned for unknown status values, unparseable timestamps, unknown
    /// record types and missing required elements. Indicates a protocol
    /// mismatch, so it is never retried.
    #[error("Malformed Route53 response ({context}): {reason}")]
    MalformedResponse {
        /// Which document or element was being decoded
        context: String,
        /// What was wrong with it
        reason: String,
    },

    /// Domain name rejected before any request was sent
    #[error("Domain name '{name}' is invalid to create. Name can not start with a period and must end with a period.")]
    InvalidDomainName {
        /// The rejected name
        name: String,
    },

    /// A hosted zone with exactly this name already exists
    #[error("Domain name '{name}' is already hosted by Route53")]
    DuplicateZone {
        /// The name that is already hosted
        name: String,
    },

    /// No hosted zone matches the requested domain name
    #[error("No hosted zone found for domain name '{name}'")]
    ZoneNotFound {
        /// The domain name that was looked up
        name: String,
    },

    /// Two change actions with different identities were merged
    #[error("Cannot merge change action {left} with {right}: action, name, type and set identifier must match")]
    IncompatibleMerge {
        /// Identity of the first operand
        left: String,
        /// Identity of the second operand
        right: String,
    },

    /// The change did not reach INSYNC before the caller's deadline
    #[error("Change '{change_id}' was not INSYNC after {waited:?}")]
    ConvergenceTimeout {
        /// The change that was being awaited
        change_id: String,
        /// How long the caller waited
        waited: Duration,
    },

    /// Record listing kept reporting truncation past the page limit
    #[error("Record listing for zone '{zone_id}' still truncated after {pages} pages")]
    TooManyPages {
        /// The zone being listed
        zone_id: String,
        /// Number of pages fetched before giving up
        pages: usize,
    },

    /// The transport could not deliver the request or read the response
    #[error("Route53 transport failure: {0}")]
    Transport(String),
}

impl Route53Error {
    /// Shorthand for a [`Route53Error::MalformedResponse`].
    pub(crate) fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the operation may succeed when issued again unchanged.
    ///
    /// Only transport failures qualify. Service rejections, malformed responses
    /// and local precondition failures are permanent.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,

            Self::Service { .. }
            | Self::MalformedResponse { .. }
            | Self::InvalidDomainName { .. }
            | Self::DuplicateZone { .. }
            | Self::ZoneNotFound { .. }
            | Self::IncompatibleMerge { .. }
            | Self::ConvergenceTimeout { .. }
            | Self::TooManyPages { .. } => false,
        }
    }

    /// Returns a stable reason code for this error, suitable for logs and metrics labels.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Service { .. } => "ServiceError",
            Self::MalformedResponse { .. } | Self::TooManyPages { .. } => "MalformedResponse",
            Self::InvalidDomainName { .. } => "InvalidDomainName",
            Self::DuplicateZone { .. } => "DuplicateZone",
            Self::ZoneNotFound { .. } => "ZoneNotFound",
            Self::IncompatibleMerge { .. } => "IncompatibleMerge",
            Self::ConvergenceTimeout { .. } => "ConvergenceTimeout",
            Self::Transport(_) => "TransportFailure",
        }
    }
}

// Transport implementations report failures through anyhow
impl From<anyhow::Error> for Route53Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Transport(format!("{err:#}"))
    }
}

impl From<quick_xml::DeError> for Route53Error {
    fn from(err: quick_xml::DeError) -> Self {
        Self::malformed("xml", err.to_string())
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
