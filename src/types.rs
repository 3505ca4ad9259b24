// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hosted zone and change propagation value types.
//!
//! Both types are immutable snapshots decoded from service responses. The
//! client never caches them; a [`ChangeStatus`] is only as fresh as the poll
//! that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::NO_CHANGE_SUBMITTED_ID;

/// A DNS domain hosted by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Opaque zone id with the `/hostedzone/` prefix removed
    pub id: String,
    /// Fully qualified domain name, including the trailing dot
    pub domain_name: String,
    /// Caller reference supplied when the zone was created
    pub caller_reference: String,
    /// Free-text comment from the zone config (empty when absent)
    pub comment: String,
    /// Authoritative name servers in service order
    pub name_servers: Vec<String>,
}

impl Zone {
    /// Zone descriptor that only knows its id, used to address calls by id.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain_name: String::new(),
            caller_reference: String::new(),
            comment: String::new(),
            name_servers: Vec::new(),
        }
    }
}

/// Propagation state of a submitted change.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeState {
    /// Accepted by the service, not yet authoritative everywhere
    PENDING,
    /// Fully propagated (terminal)
    INSYNC,
}

impl fmt::Display for ChangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PENDING => f.write_str("PENDING"),
            Self::INSYNC => f.write_str("INSYNC"),
        }
    }
}

impl FromStr for ChangeState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "PENDING" => Ok(Self::PENDING),
            "INSYNC" => Ok(Self::INSYNC),
            other => Err(format!("unknown change status '{other}'")),
        }
    }
}

/// State token of the propagation state machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatus {
    /// Zone the change was submitted against
    pub zone_id: String,
    /// Change id with the `/change/` prefix removed
    pub change_id: String,
    /// Last state reported by the service
    pub status: ChangeState,
    /// When the service accepted the change
    pub submitted_at: DateTime<Utc>,
}

impl ChangeStatus {
    /// Synthetic status for a batch with no actions; nothing was sent.
    #[must_use]
    pub fn no_change(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            change_id: NO_CHANGE_SUBMITTED_ID.to_string(),
            status: ChangeState::INSYNC,
            submitted_at: Utc::now(),
        }
    }

    /// True once the service reports the change as propagated.
    #[must_use]
    pub fn is_in_sync(&self) -> bool {
        self.status == ChangeState::INSYNC
    }
}
