// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Change batch requests and change status responses.
//!
//! # Request shape
//!
//! ```text
//! ChangeResourceRecordSetsRequest
//!   ChangeBatch
//!     Comment
//!     Changes
//!       Change*
//!         Action                       CREATE | DELETE
//!         ResourceRecordSet
//!           Name, Type
//!           SetIdentifier, Weight      weighted members only
//!           TTL                        literal record sets only
//!           AliasTarget                alias record sets only
//!             HostedZoneId, DNSName
//!           ResourceRecords            literal record sets only
//!             ResourceRecord*
//!               Value
//! ```
//!
//! The element order is fixed by the service schema and follows the field
//! order of the structs below.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{decode, encode, strip_id_prefix};
use crate::constants::{CHANGE_ID_PREFIX, ROUTE53_XML_NAMESPACE, SUBMITTED_AT_FORMAT};
use crate::errors::Route53Error;
use crate::records::ChangeAction;
use crate::types::{ChangeState, ChangeStatus};

#[derive(Debug, Serialize)]
#[serde(rename = "ChangeResourceRecordSetsRequest")]
struct ChangeResourceRecordSetsRequest<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "ChangeBatch")]
    change_batch: ChangeBatchXml<'a>,
}

#[derive(Debug, Serialize)]
struct ChangeBatchXml<'a> {
    #[serde(rename = "Comment")]
    comment: &'a str,
    #[serde(rename = "Changes")]
    changes: ChangesXml<'a>,
}

#[derive(Debug, Serialize)]
struct ChangesXml<'a> {
    #[serde(rename = "Change")]
    change: Vec<ChangeXml<'a>>,
}

#[derive(Debug, Serialize)]
struct ChangeXml<'a> {
    #[serde(rename = "Action")]
    action: &'static str,
    #[serde(rename = "ResourceRecordSet")]
    resource_record_set: RecordSetXml<'a>,
}

#[derive(Debug, Serialize)]
struct RecordSetXml<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Type")]
    record_type: &'static str,
    #[serde(rename = "SetIdentifier", skip_serializing_if = "Option::is_none")]
    set_identifier: Option<&'a str>,
    #[serde(rename = "Weight", skip_serializing_if = "Option::is_none")]
    weight: Option<u32>,
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    #[serde(rename = "AliasTarget", skip_serializing_if = "Option::is_none")]
    alias_target: Option<AliasTargetXml<'a>>,
    #[serde(rename = "ResourceRecords", skip_serializing_if = "Option::is_none")]
    resource_records: Option<ResourceRecordsXml<'a>>,
}

#[derive(Debug, Serialize)]
struct AliasTargetXml<'a> {
    #[serde(rename = "HostedZoneId")]
    hosted_zone_id: &'a str,
    #[serde(rename = "DNSName")]
    dns_name: &'a str,
}

#[derive(Debug, Serialize)]
struct ResourceRecordsXml<'a> {
    #[serde(rename = "ResourceRecord")]
    resource_record: Vec<ResourceRecordXml<'a>>,
}

#[derive(Debug, Serialize)]
struct ResourceRecordXml<'a> {
    #[serde(rename = "Value")]
    value: &'a str,
}

impl<'a> From<&'a ChangeAction> for ChangeXml<'a> {
    fn from(action: &'a ChangeAction) -> Self {
        let (set_identifier, weight) = if action.is_weighted() {
            (action.set_identifier(), Some(action.weight()))
        } else {
            (None, None)
        };

        let (ttl, alias_target, resource_records) = match action.alias_target() {
            Some(target) => (
                None,
                Some(AliasTargetXml {
                    hosted_zone_id: &target.hosted_zone_id,
                    dns_name: &target.dns_name,
                }),
                None,
            ),
            None => (
                Some(action.ttl()),
                None,
                Some(ResourceRecordsXml {
                    resource_record: action
                        .values()
                        .iter()
                        .map(|value| ResourceRecordXml { value })
                        .collect(),
                }),
            ),
        };

        Self {
            action: action.kind().as_str(),
            resource_record_set: RecordSetXml {
                name: action.name(),
                record_type: action.record_type().as_str(),
                set_identifier,
                weight,
                ttl,
                alias_target,
                resource_records,
            },
        }
    }
}

/// Comment used when the caller supplies a blank one.
#[must_use]
pub fn default_comment(action_count: usize) -> String {
    format!("Modify {action_count} records.")
}

/// Encode a change batch request document.
///
/// Actions are written in the given order; callers sort them first. A blank
/// `comment` is replaced by [`default_comment`]. Callers must not encode an
/// empty batch, the service rejects it.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn encode_change_batch(comment: &str, actions: &[ChangeAction]) -> Result<String, Route53Error> {
    let comment = if comment.trim().is_empty() {
        default_comment(actions.len())
    } else {
        comment.to_string()
    };

    let request = ChangeResourceRecordSetsRequest {
        xmlns: ROUTE53_XML_NAMESPACE,
        change_batch: ChangeBatchXml {
            comment: &comment,
            changes: ChangesXml {
                change: actions.iter().map(ChangeXml::from).collect(),
            },
        },
    };

    encode(&request, "ChangeResourceRecordSetsRequest")
}

#[derive(Debug, Deserialize)]
struct ChangeInfoResponseXml {
    #[serde(rename = "ChangeInfo")]
    change_info: ChangeInfoXml,
}

#[derive(Debug, Deserialize)]
struct ChangeInfoXml {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "SubmittedAt")]
    submitted_at: String,
}

/// Parse a `SubmittedAt` timestamp (`yyyy-MM-ddTHH:mm:ss.SSSZ`, UTC).
///
/// # Errors
///
/// Returns [`Route53Error::MalformedResponse`] if the text does not match.
pub fn parse_submitted_at(text: &str) -> Result<DateTime<Utc>, Route53Error> {
    NaiveDateTime::parse_from_str(text.trim(), SUBMITTED_AT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| Route53Error::malformed("ChangeInfo/SubmittedAt", format!("'{text}': {e}")))
}

/// Decode the `ChangeInfo` element of any change-carrying response.
///
/// Works for change batch, get change, create zone and delete zone
/// responses, which all embed the same `ChangeInfo` element.
///
/// # Errors
///
/// Returns [`Route53Error::Service`] for error documents and
/// [`Route53Error::MalformedResponse`] if `ChangeInfo` is missing, the status
/// is neither PENDING nor INSYNC, or the timestamp does not parse.
pub fn decode_change_status(zone_id: &str, xml: &str) -> Result<ChangeStatus, Route53Error> {
    let response: ChangeInfoResponseXml = decode(xml, "ChangeInfo")?;
    let info = response.change_info;

    let status = info
        .status
        .parse::<ChangeState>()
        .map_err(|reason| Route53Error::malformed("ChangeInfo/Status", reason))?;

    Ok(ChangeStatus {
        zone_id: zone_id.to_string(),
        change_id: strip_id_prefix(&info.id, CHANGE_ID_PREFIX).to_string(),
        status,
        submitted_at: parse_submitted_at(&info.submitted_at)?,
    })
}

#[cfg(test)]
#[path = "change_batch_tests.rs"]
mod change_batch_tests;
