// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # Valet - Route53 DNS client
//!
//! Valet drives the Route53 `2010-10-01` XML API: it builds change batches,
//! encodes them for the wire, decodes the service's responses and follows
//! submitted changes until they have propagated.
//!
//! ## Modules
//!
//! - [`records`] - Change actions and published record sets
//! - [`codec`] - XML encoding and decoding of requests and responses
//! - [`client`] - Change submission, zone lifecycle and record listing
//! - [`convergence`] - Cancellable waits for change propagation
//! - [`transport`] - Transport seam and the HTTPS implementation
//! - [`config`] - Client configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use valet::{ChangeAction, ClientConfig, RecordType, Route53Client};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let client = Route53Client::from_config(&config)?;
//!
//! let zone = client.zone_details_for_domain("example.com.").await?;
//! let mx = ChangeAction::relative("", &zone, RecordType::MX)
//!     .value("10 mail.example.com.")
//!     .build_create();
//!
//! let status = client.submit_batch(&zone, "", vec![mx]).await?;
//! let outcome = client.await_convergence(status, &config.wait_options()).await?;
//! assert!(outcome.is_in_sync());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod constants;
pub mod convergence;
pub mod errors;
pub mod record_type;
pub mod records;
pub mod transport;
pub mod types;

#[cfg(test)]
mod mock_transport;

pub use client::Route53Client;
pub use config::{ClientConfig, Credentials};
pub use convergence::{Convergence, WaitOptions};
pub use errors::Route53Error;
pub use record_type::RecordType;
pub use records::{AliasTarget, ChangeAction, ChangeKind, ResourceRecordSet};
pub use types::{ChangeState, ChangeStatus, Zone};
