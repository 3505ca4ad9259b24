// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Route53 client: change submission, zone lifecycle, record listing and
//! change propagation against an abstract [`Route53Transport`].
//!
//! The client holds no entity state. Every value it returns is an immutable
//! snapshot, so one client can be cloned and shared freely between tasks.
//!
//! # Example
//!
//! ```rust,no_run
//! use valet::client::Route53Client;
//! use valet::config::ClientConfig;
//! use valet::records::ChangeAction;
//! use valet::record_type::RecordType;
//! use valet::types::Zone;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let client = Route53Client::from_config(&config)?;
//!
//! let zone = Zone::with_id("Z1PA6795UKMFR9");
//! let www = ChangeAction::builder("www.example.com.", RecordType::A)
//!     .value("192.0.2.1")
//!     .build_create();
//!
//! let status = client.submit_batch(&zone, "", vec![www]).await?;
//! client.await_convergence(status, &config.wait_options()).await?;
//! # Ok(())
//! # }
//! ```

use anyhow::Result as AnyResult;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, Instrument, Span};
use url::form_urlencoded;
use uuid::Uuid;

use crate::codec::{
    decode_change_status, decode_record_set_page, decode_zone, decode_zone_list,
    encode_change_batch, encode_create_zone,
};
use crate::config::ClientConfig;
use crate::constants::{CALLER_REFERENCE_PREFIX, MAX_RECORD_PAGES, NO_CHANGE_SUBMITTED_ID};
use crate::convergence::{poll_until_in_sync, Convergence, WaitOptions};
use crate::errors::Route53Error;
use crate::record_type::RecordType;
use crate::records::{normalize_batch, ChangeAction, ResourceRecordSet};
use crate::transport::{HttpTransport, Route53Transport};
use crate::types::{ChangeStatus, Zone};

/// Check that `name` is a fully qualified domain name.
///
/// # Errors
///
/// Returns [`Route53Error::InvalidDomainName`] if the name is blank, starts
/// with a dot, or does not end with one.
pub fn validate_domain_name(name: &str) -> Result<(), Route53Error> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.starts_with('.') || !trimmed.ends_with('.') {
        return Err(Route53Error::InvalidDomainName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Route53 client over a shared transport.
///
/// All operations log through the span given to [`Route53Client::with_span`].
#[derive(Clone)]
pub struct Route53Client {
    transport: Arc<dyn Route53Transport>,
    span: Span,
    max_pages: usize,
}

impl std::fmt::Debug for Route53Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Client")
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

impl Route53Client {
    #[must_use]
    pub fn new(transport: Arc<dyn Route53Transport>) -> Self {
        Self {
            transport,
            span: Span::current(),
            max_pages: MAX_RECORD_PAGES,
        }
    }

    /// Client over an [`HttpTransport`] built from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> AnyResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport)).with_max_pages(config.max_pages))
    }

    /// Route all diagnostics of this client through `span`.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Upper bound on pages fetched by [`Route53Client::list_records`].
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Submit a change batch against `zone`.
    ///
    /// An empty batch is a no-op: nothing is sent and an already converged
    /// status with change id `no-change-submitted` is returned. Otherwise the
    /// actions go on the wire in the given order, so a `DELETE` followed by a
    /// `CREATE` of the same record set replaces it. Use
    /// [`crate::records::normalize_batch`] first for a canonical order. A blank
    /// `comment` becomes `"Modify {n} records."`.
    ///
    /// # Errors
    ///
    /// Returns [`Route53Error::Service`] if the service rejects the batch.
    /// The batch is atomic: no part of it is applied in that case.
    pub async fn submit_batch(
        &self,
        zone: &Zone,
        comment: &str,
        actions: Vec<ChangeAction>,
    ) -> Result<ChangeStatus, Route53Error> {
        async {
            if actions.is_empty() {
                debug!(zone_id = %zone.id, "Empty change batch, nothing to submit");
                return Ok(ChangeStatus::no_change(&zone.id));
            }

            let payload = encode_change_batch(comment, &actions)?;
            debug!(zone_id = %zone.id, changes = actions.len(), payload = %payload, "Submitting change batch");

            let body = self.transport.post_change_batch(&zone.id, &payload).await?;
            let status = decode_change_status(&zone.id, &body)?;

            info!(
                zone_id = %status.zone_id,
                change_id = %status.change_id,
                status = %status.status,
                changes = actions.len(),
                "Change batch accepted"
            );
            Ok::<_, Route53Error>(status)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Fetch a fresh status for a submitted change.
    ///
    /// Idempotent. The synthetic status of an empty batch is returned as is.
    ///
    /// # Errors
    ///
    /// Returns a service, malformed response or transport error.
    pub async fn query_status(&self, status: &ChangeStatus) -> Result<ChangeStatus, Route53Error> {
        async {
            if status.change_id == NO_CHANGE_SUBMITTED_ID {
                return Ok(status.clone());
            }

            let body = self.transport.get_change_info(&status.change_id).await?;
            decode_change_status(&status.zone_id, &body)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Poll until the change is `INSYNC`.
    ///
    /// Sleeps `poll_interval` before every query and performs no query at all
    /// when `status` is already `INSYNC`. Cancellation through
    /// `options.cancel` returns [`Convergence::Cancelled`] with the last
    /// status observed.
    ///
    /// # Errors
    ///
    /// Returns [`Route53Error::ConvergenceTimeout`] once `options.max_wait`
    /// has elapsed, or the error of a failed status query.
    pub async fn await_convergence(
        &self,
        status: ChangeStatus,
        options: &WaitOptions,
    ) -> Result<Convergence, Route53Error> {
        poll_until_in_sync(self, status, options)
            .instrument(self.span.clone())
            .await
    }

    /// Create a hosted zone.
    ///
    /// Creation and the first change status come back in one response.
    ///
    /// # Errors
    ///
    /// Returns [`Route53Error::InvalidDomainName`] before any request if the
    /// name is not fully qualified, and [`Route53Error::DuplicateZone`] if a
    /// zone with exactly that name is already hosted.
    pub async fn create_zone(&self, domain_name: &str, comment: &str) -> Result<ChangeStatus, Route53Error> {
        async {
            validate_domain_name(domain_name)?;

            let existing = self.list_zones().await?;
            if existing.iter().any(|zone| zone.domain_name == domain_name) {
                return Err(Route53Error::DuplicateZone {
                    name: domain_name.to_string(),
                });
            }

            let caller_reference = format!("{CALLER_REFERENCE_PREFIX} ({})", Uuid::new_v4());
            let payload = encode_create_zone(domain_name, &caller_reference, comment)?;
            debug!(domain = %domain_name, payload = %payload, "Creating hosted zone");

            let body = self.transport.post_hosted_zone(&payload).await?;
            let zone = decode_zone(&body)?;
            let status = decode_change_status(&zone.id, &body)?;

            info!(
                zone_id = %zone.id,
                domain = %zone.domain_name,
                change_id = %status.change_id,
                name_servers = ?zone.name_servers,
                "Created hosted zone"
            );
            Ok::<_, Route53Error>(status)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Delete a hosted zone. The zone must hold only its SOA and NS records.
    ///
    /// # Errors
    ///
    /// Returns a service error if the zone does not exist or is not empty.
    pub async fn delete_zone(&self, zone: &Zone, comment: &str) -> Result<ChangeStatus, Route53Error> {
        async {
            let body = self.transport.delete_hosted_zone(&zone.id, comment).await?;
            let status = decode_change_status(&zone.id, &body)?;

            info!(zone_id = %zone.id, change_id = %status.change_id, "Deleted hosted zone");
            Ok::<_, Route53Error>(status)
        }
        .instrument(self.span.clone())
        .await
    }

    /// List hosted zones (single page).
    ///
    /// # Errors
    ///
    /// Returns a service, malformed response or transport error.
    pub async fn list_zones(&self) -> Result<Vec<Zone>, Route53Error> {
        async {
            let body = self.transport.get_hosted_zone("").await?;
            let zones = decode_zone_list(&body)?;
            debug!(count = zones.len(), "Listed hosted zones");
            Ok::<_, Route53Error>(zones)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Fetch one hosted zone, including its delegation name servers.
    ///
    /// # Errors
    ///
    /// Returns a service error if the zone does not exist.
    pub async fn zone_details(&self, zone_id: &str) -> Result<Zone, Route53Error> {
        async {
            let body = self.transport.get_hosted_zone(zone_id).await?;
            decode_zone(&body)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Look up a hosted zone by domain name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Route53Error::ZoneNotFound`] if no zone has that name.
    pub async fn zone_details_for_domain(&self, domain_name: &str) -> Result<Zone, Route53Error> {
        let zone = self
            .list_zones()
            .await?
            .into_iter()
            .find(|zone| zone.domain_name.eq_ignore_ascii_case(domain_name))
            .ok_or_else(|| Route53Error::ZoneNotFound {
                name: domain_name.to_string(),
            })?;

        self.zone_details(&zone.id).await
    }

    /// True if a zone with this domain name is hosted (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Route53Error::InvalidDomainName`] before any request if the
    /// name is not fully qualified.
    pub async fn zone_exists(&self, domain_name: &str) -> Result<bool, Route53Error> {
        validate_domain_name(domain_name)?;
        let zones = self.list_zones().await?;
        Ok(zones
            .iter()
            .any(|zone| zone.domain_name.eq_ignore_ascii_case(domain_name)))
    }

    /// List every record set in a zone, following pagination.
    ///
    /// Each next page starts at the name of the last record of the previous
    /// page, so the boundary record may come back twice; it is kept once.
    /// Record sets are compared structurally, so siblings sharing the
    /// boundary name survive.
    ///
    /// # Errors
    ///
    /// Returns [`Route53Error::MalformedResponse`] if a truncated page adds no
    /// new records, and [`Route53Error::TooManyPages`] once the page limit is
    /// reached while the listing is still truncated.
    pub async fn list_records(&self, zone_id: &str) -> Result<Vec<ResourceRecordSet>, Route53Error> {
        async {
            let mut records: Vec<ResourceRecordSet> = Vec::new();
            let mut seen: HashSet<ResourceRecordSet> = HashSet::new();
            let mut query = String::new();
            let mut page_count = 0;

            loop {
                if page_count == self.max_pages {
                    return Err(Route53Error::TooManyPages {
                        zone_id: zone_id.to_string(),
                        pages: page_count,
                    });
                }
                page_count += 1;

                let body = self.transport.get_resource_record_sets(zone_id, &query).await?;
                let page = decode_record_set_page(&body)?;

                let mut added = 0;
                for record in &page.records {
                    if seen.insert(record.clone()) {
                        records.push(record.clone());
                        added += 1;
                    }
                }

                debug!(
                    zone_id = %zone_id,
                    page = page_count,
                    items_in_page = page.records.len(),
                    new_items = added,
                    total_items = records.len(),
                    truncated = page.is_truncated,
                    "Fetched record set page"
                );

                if !page.is_truncated {
                    break;
                }

                let cursor = match page.last_name() {
                    Some(name) if added > 0 => name,
                    _ => {
                        return Err(Route53Error::malformed(
                            "ListResourceRecordSetsResponse",
                            format!("truncated page {page_count} did not advance the listing"),
                        ))
                    }
                };
                query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("name", cursor)
                    .finish();
            }

            debug!(
                zone_id = %zone_id,
                total_pages = page_count,
                total_items = records.len(),
                "Completed record set listing"
            );
            Ok::<_, Route53Error>(records)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Delete every record set of a zone except the apex SOA and NS.
    ///
    /// This leaves the zone in the only state in which the service lets it be
    /// deleted. Weighted members are deleted individually. A zone that already
    /// holds nothing else gets the no-op status of an empty batch.
    ///
    /// # Errors
    ///
    /// Returns any error of listing the records or submitting the batch.
    pub async fn delete_zone_records(&self, zone: &Zone, comment: &str) -> Result<ChangeStatus, Route53Error> {
        let zone = if zone.domain_name.is_empty() {
            self.zone_details(&zone.id).await?
        } else {
            zone.clone()
        };

        let actions: Vec<ChangeAction> = self
            .list_records(&zone.id)
            .await?
            .iter()
            .filter(|record| !is_apex_authority(record, &zone))
            .map(ResourceRecordSet::to_delete)
            .collect();
        let actions = normalize_batch(actions);

        self.span.in_scope(|| {
            info!(zone_id = %zone.id, records = actions.len(), "Deleting zone records");
        });

        self.submit_batch(&zone, comment, actions).await
    }
}

fn is_apex_authority(record: &ResourceRecordSet, zone: &Zone) -> bool {
    matches!(record.record_type, RecordType::SOA | RecordType::NS)
        && record.name.eq_ignore_ascii_case(&zone.domain_name)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;
