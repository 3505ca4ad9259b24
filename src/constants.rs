// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Valet Route53 driver.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Wire Protocol Constants
// ============================================================================

/// XML namespace placed on every request root element
pub const ROUTE53_XML_NAMESPACE: &str = "https://route53.amazonaws.com/doc/2010-10-01/";

/// API version path segment for every request URL
pub const ROUTE53_API_VERSION: &str = "2010-10-01";

/// Default public Route53 endpoint
pub const DEFAULT_ROUTE53_ENDPOINT: &str = "https://route53.amazonaws.com";

/// Prefix the service puts in front of hosted zone ids
pub const HOSTED_ZONE_ID_PREFIX: &str = "/hostedzone/";

/// Prefix the service puts in front of change ids
pub const CHANGE_ID_PREFIX: &str = "/change/";

/// Timestamp layout of `ChangeInfo/SubmittedAt` (always UTC, millisecond precision)
pub const SUBMITTED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Change id reported for a batch that was never sent because it had no actions
pub const NO_CHANGE_SUBMITTED_ID: &str = "no-change-submitted";

/// Prefix of every generated hosted zone caller reference
pub const CALLER_REFERENCE_PREFIX: &str = "Created by Valet53";

// ============================================================================
// Record Constants
// ============================================================================

/// Default TTL for record sets built without an explicit TTL (10 minutes)
pub const DEFAULT_RECORD_TTL_SECS: u32 = 600;

// ============================================================================
// Convergence Constants
// ============================================================================

/// Interval between change status polls while waiting for INSYNC
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

// ============================================================================
// Pagination Constants
// ============================================================================

/// Upper bound on record listing pages fetched for a single zone.
///
/// The service returns at most 100 record sets per page, so this allows
/// zones of up to 100,000 record sets before the listing is abandoned.
pub const MAX_RECORD_PAGES: usize = 1000;

// ============================================================================
// HTTP Constants
// ============================================================================

/// Default timeout for a single HTTP request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Delay before the first retry of a throttled or failed request
pub const RETRY_FIRST_DELAY_MILLIS: u64 = 50;

/// Retry delays double up to this ceiling
pub const RETRY_MAX_DELAY_SECS: u64 = 10;

/// Default time a request may spend retrying before giving up (2 minutes)
pub const DEFAULT_RETRY_BUDGET_SECS: u64 = 120;

/// Header carrying the AWS3-HTTPS request signature
pub const AMZN_AUTHORIZATION_HEADER: &str = "X-Amzn-Authorization";
