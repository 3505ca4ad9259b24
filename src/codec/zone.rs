// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hosted zone requests and responses.

use serde::{Deserialize, Serialize};

use super::{decode, encode, strip_id_prefix};
use crate::constants::{HOSTED_ZONE_ID_PREFIX, ROUTE53_XML_NAMESPACE};
use crate::errors::Route53Error;
use crate::types::Zone;

#[derive(Debug, Serialize)]
#[serde(rename = "CreateHostedZoneRequest")]
struct CreateHostedZoneRequest<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "CallerReference")]
    caller_reference: &'a str,
    #[serde(rename = "HostedZoneConfig")]
    config: HostedZoneConfigXml<'a>,
}

#[derive(Debug, Serialize)]
struct HostedZoneConfigXml<'a> {
    #[serde(rename = "Comment")]
    comment: &'a str,
}

/// Encode a hosted zone creation request.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn encode_create_zone(
    domain_name: &str,
    caller_reference: &str,
    comment: &str,
) -> Result<String, Route53Error> {
    encode(
        &CreateHostedZoneRequest {
            xmlns: ROUTE53_XML_NAMESPACE,
            name: domain_name,
            caller_reference,
            config: HostedZoneConfigXml { comment },
        },
        "CreateHostedZoneRequest",
    )
}

#[derive(Debug, Deserialize)]
struct HostedZoneXml {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "CallerReference", default)]
    caller_reference: String,
    #[serde(rename = "Config", default)]
    config: Option<HostedZoneConfigResponseXml>,
}

#[derive(Debug, Deserialize)]
struct HostedZoneConfigResponseXml {
    #[serde(rename = "Comment", default)]
    comment: String,
}

#[derive(Debug, Deserialize)]
struct DelegationSetXml {
    #[serde(rename = "NameServers", default)]
    name_servers: Option<NameServersXml>,
}

#[derive(Debug, Deserialize)]
struct NameServersXml {
    #[serde(rename = "NameServer", default)]
    name_server: Vec<String>,
}

/// `GetHostedZoneResponse` and `CreateHostedZoneResponse` share this shape.
#[derive(Debug, Deserialize)]
struct HostedZoneResponseXml {
    #[serde(rename = "HostedZone")]
    hosted_zone: HostedZoneXml,
    #[serde(rename = "DelegationSet", default)]
    delegation_set: Option<DelegationSetXml>,
}

#[derive(Debug, Deserialize)]
struct ListHostedZonesResponseXml {
    #[serde(rename = "HostedZones", default)]
    hosted_zones: Option<HostedZonesXml>,
}

#[derive(Debug, Deserialize)]
struct HostedZonesXml {
    #[serde(rename = "HostedZone", default)]
    hosted_zone: Vec<HostedZoneXml>,
}

impl HostedZoneXml {
    fn into_zone(self, name_servers: Vec<String>) -> Zone {
        Zone {
            id: strip_id_prefix(&self.id, HOSTED_ZONE_ID_PREFIX).to_string(),
            domain_name: self.name.trim().to_string(),
            caller_reference: self.caller_reference.trim().to_string(),
            comment: self
                .config
                .map(|config| config.comment.trim().to_string())
                .unwrap_or_default(),
            name_servers: name_servers
                .into_iter()
                .map(|ns| ns.trim().to_string())
                .filter(|ns| !ns.is_empty())
                .collect(),
        }
    }
}

/// Decode the hosted zone of a get or create zone response.
///
/// Name servers come from the response's delegation set and may be literal
/// text or CDATA.
///
/// # Errors
///
/// Returns [`Route53Error::Service`] for error documents and
/// [`Route53Error::MalformedResponse`] if `HostedZone` is missing.
pub fn decode_zone(xml: &str) -> Result<Zone, Route53Error> {
    let response: HostedZoneResponseXml = decode(xml, "HostedZone")?;

    let name_servers = response
        .delegation_set
        .and_then(|set| set.name_servers)
        .map(|servers| servers.name_server)
        .unwrap_or_default();

    Ok(response.hosted_zone.into_zone(name_servers))
}

/// Decode a hosted zone listing into zone descriptors.
///
/// Listed zones carry no name servers; use a zone lookup for those.
///
/// # Errors
///
/// Returns [`Route53Error::Service`] for error documents and
/// [`Route53Error::MalformedResponse`] for unparseable listings.
pub fn decode_zone_list(xml: &str) -> Result<Vec<Zone>, Route53Error> {
    let response: ListHostedZonesResponseXml = decode(xml, "HostedZones")?;

    Ok(response
        .hosted_zones
        .map(|zones| zones.hosted_zone)
        .unwrap_or_default()
        .into_iter()
        .map(|zone| zone.into_zone(Vec::new()))
        .collect())
}

#[cfg(test)]
#[path = "zone_tests.rs"]
mod zone_tests;
