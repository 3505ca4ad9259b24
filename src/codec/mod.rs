// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! XML wire codecs for the Route53 2010-10-01 API.
//!
//! Requests are written with the API namespace on the root element and the
//! exact element order the service schema requires. Responses are read
//! namespace-tolerant: element prefixes are ignored and unknown elements are
//! skipped.
//!
//! Every decoder first checks whether the service answered with an `Error`
//! document instead of the expected one, and turns it into
//! [`Route53Error::Service`](crate::errors::Route53Error::Service).
//!
//! # Modules
//!
//! - [`change_batch`] - change batch requests and change status responses
//! - [`zone`] - hosted zone requests and responses
//! - [`record_sets`] - one page of a record set listing
//! - [`error`] - service error documents

pub mod change_batch;
pub mod error;
pub mod record_sets;
pub mod zone;

pub use change_batch::{decode_change_status, encode_change_batch};
pub use error::{decode_error, ensure_not_error};
pub use record_sets::{decode_record_set_page, RecordSetPage};
pub use zone::{decode_zone, decode_zone_list, encode_create_zone};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::Route53Error;

/// Declaration written in front of every request document
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Decode a response document into `T`, surfacing service errors first.
fn decode<T: DeserializeOwned>(xml: &str, context: &str) -> Result<T, Route53Error> {
    ensure_not_error(xml)?;
    quick_xml::de::from_str(xml).map_err(|e| Route53Error::malformed(context, e.to_string()))
}

/// Serialize a request document, including the XML declaration.
fn encode<T: Serialize>(document: &T, context: &str) -> Result<String, Route53Error> {
    let body = quick_xml::se::to_string(document)
        .map_err(|e| Route53Error::malformed(context, format!("failed to encode request: {e}")))?;
    Ok(format!("{XML_DECLARATION}{body}"))
}

/// Remove a service path prefix such as `/hostedzone/` from an id.
///
/// Ids that do not carry the prefix are returned unchanged.
pub(crate) fn strip_id_prefix<'a>(id: &'a str, prefix: &str) -> &'a str {
    let id = id.trim();
    id.strip_prefix(prefix).unwrap_or(id)
}
