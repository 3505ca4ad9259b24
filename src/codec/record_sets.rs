// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! One page of a `ListResourceRecordSets` response.
//!
//! Pagination itself lives in [`crate::client::Route53Client::list_records`];
//! this module only turns a page into domain values plus the truncation flag.

use serde::Deserialize;

use super::decode;
use crate::errors::Route53Error;
use crate::record_type::RecordType;
use crate::records::{AliasTarget, ResourceRecordSet};

#[derive(Debug, Deserialize)]
struct ListResourceRecordSetsResponseXml {
    #[serde(rename = "ResourceRecordSets", default)]
    resource_record_sets: Option<ResourceRecordSetsXml>,
    #[serde(rename = "IsTruncated")]
    is_truncated: String,
    #[serde(rename = "NextRecordName", default)]
    next_record_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResourceRecordSetsXml {
    #[serde(rename = "ResourceRecordSet", default)]
    resource_record_set: Vec<RecordSetXml>,
}

#[derive(Debug, Deserialize)]
struct RecordSetXml {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type")]
    record_type: String,
    #[serde(rename = "SetIdentifier", default)]
    set_identifier: Option<String>,
    #[serde(rename = "Weight", default)]
    weight: Option<u32>,
    #[serde(rename = "TTL", default)]
    ttl: Option<u32>,
    #[serde(rename = "AliasTarget", default)]
    alias_target: Option<AliasTargetXml>,
    #[serde(rename = "ResourceRecords", default)]
    resource_records: Option<ResourceRecordsXml>,
}

#[derive(Debug, Deserialize)]
struct AliasTargetXml {
    #[serde(rename = "HostedZoneId")]
    hosted_zone_id: String,
    #[serde(rename = "DNSName")]
    dns_name: String,
}

#[derive(Debug, Deserialize)]
struct ResourceRecordsXml {
    #[serde(rename = "ResourceRecord", default)]
    resource_record: Vec<ResourceRecordXml>,
}

#[derive(Debug, Deserialize)]
struct ResourceRecordXml {
    #[serde(rename = "Value")]
    value: String,
}

impl TryFrom<RecordSetXml> for ResourceRecordSet {
    type Error = Route53Error;

    fn try_from(xml: RecordSetXml) -> Result<Self, Self::Error> {
        let record_type = xml
            .record_type
            .parse::<RecordType>()
            .map_err(|e| Route53Error::malformed("ResourceRecordSet/Type", e.to_string()))?;

        Ok(Self {
            name: xml.name.trim().to_string(),
            record_type,
            ttl: xml.ttl.unwrap_or_default(),
            set_identifier: xml
                .set_identifier
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            weight: xml.weight.unwrap_or_default(),
            alias_target: xml.alias_target.map(|target| AliasTarget {
                hosted_zone_id: target.hosted_zone_id.trim().to_string(),
                dns_name: target.dns_name.trim().to_string(),
            }),
            values: xml
                .resource_records
                .map(|records| records.resource_record)
                .unwrap_or_default()
                .into_iter()
                .map(|record| record.value)
                .collect(),
        })
    }
}

/// One decoded page of a record set listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSetPage {
    /// Record sets in service order
    pub records: Vec<ResourceRecordSet>,
    /// True when `IsTruncated` was exactly `"true"`
    pub is_truncated: bool,
    /// Service-supplied cursor, informational only
    pub next_record_name: Option<String>,
}

impl RecordSetPage {
    /// Cursor for the next page: the name of the last record on this page.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.records.last().map(|record| record.name.as_str())
    }
}

/// Decode one page of a record set listing.
///
/// # Errors
///
/// Returns [`Route53Error::Service`] for error documents and
/// [`Route53Error::MalformedResponse`] for missing `IsTruncated`, unknown
/// record types or unparseable numbers.
pub fn decode_record_set_page(xml: &str) -> Result<RecordSetPage, Route53Error> {
    let response: ListResourceRecordSetsResponseXml = decode(xml, "ListResourceRecordSetsResponse")?;

    let records = response
        .resource_record_sets
        .map(|sets| sets.resource_record_set)
        .unwrap_or_default()
        .into_iter()
        .map(ResourceRecordSet::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecordSetPage {
        records,
        is_truncated: response.is_truncated.trim() == "true",
        next_record_name: response.next_record_name.map(|name| name.trim().to_string()),
    })
}

#[cfg(test)]
#[path = "record_sets_tests.rs"]
mod record_sets_tests;
