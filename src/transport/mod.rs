// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Transport seam between the driver and the Route53 HTTP API.
//!
//! The driver only needs six request/response round trips, each taking and
//! returning XML text. [`Route53Transport`] names them; [`HttpTransport`] is
//! the production implementation over `reqwest`, and tests substitute a
//! scripted implementation.
//!
//! A transport returns the response body whether or not the service accepted
//! the request: error documents are decoded by the codecs, not here. An `Err`
//! means the exchange itself failed (connection, timeout, unreadable body).

pub mod http;
pub mod retry;
pub mod signing;

pub use http::HttpTransport;

use anyhow::Result;
use async_trait::async_trait;

/// The six XML exchanges the driver performs against the service.
#[async_trait]
pub trait Route53Transport: Send + Sync {
    /// POST a change batch document for `zone_id`.
    async fn post_change_batch(&self, zone_id: &str, payload: &str) -> Result<String>;

    /// GET the propagation state of `change_id`.
    async fn get_change_info(&self, change_id: &str) -> Result<String>;

    /// GET one page of `zone_id`'s record sets; `query` is empty for the first page.
    async fn get_resource_record_sets(&self, zone_id: &str, query: &str) -> Result<String>;

    /// GET one hosted zone, or the zone listing when `zone_id` is empty.
    async fn get_hosted_zone(&self, zone_id: &str) -> Result<String>;

    /// POST a hosted zone creation document.
    async fn post_hosted_zone(&self, payload: &str) -> Result<String>;

    /// DELETE the hosted zone `zone_id`.
    async fn delete_hosted_zone(&self, zone_id: &str, comment: &str) -> Result<String>;
}
