// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Service error documents.
//!
//! The service answers a rejected request with
//!
//! ```xml
//! <ErrorResponse xmlns="https://route53.amazonaws.com/doc/2010-10-01/">
//!   <Error>
//!     <Type>Sender</Type>
//!     <Code>InvalidInput</Code>
//!     <Message>Invalid XML</Message>
//!   </Error>
//!   <RequestId>...</RequestId>
//! </ErrorResponse>
//! ```
//!
//! A bare `<Error>` root is accepted as well.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use tracing::debug;

use crate::errors::Route53Error;

const ERROR_ELEMENT: &str = "Error";

#[derive(Debug, Deserialize)]
struct ErrorResponseXml {
    #[serde(rename = "Error")]
    error: ErrorXml,
}

#[derive(Debug, Deserialize)]
struct ErrorXml {
    #[serde(rename = "Type", default)]
    kind: String,
    #[serde(rename = "Code", default)]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

/// Where, if anywhere, a document carries its `Error` element.
#[derive(Debug, PartialEq, Eq)]
enum ErrorPlacement {
    None,
    Root,
    Child,
}

/// Find an `Error` element at the root or directly below it.
fn error_placement(xml: &str) -> Result<ErrorPlacement, Route53Error> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let is_error = e.local_name().as_ref() == ERROR_ELEMENT.as_bytes();
                match depth {
                    0 if is_error => return Ok(ErrorPlacement::Root),
                    1 if is_error => return Ok(ErrorPlacement::Child),
                    _ => {}
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                let is_error = e.local_name().as_ref() == ERROR_ELEMENT.as_bytes();
                if is_error && depth <= 1 {
                    return Ok(if depth == 0 {
                        ErrorPlacement::Root
                    } else {
                        ErrorPlacement::Child
                    });
                }
                if depth == 0 {
                    return Ok(ErrorPlacement::None);
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(ErrorPlacement::None);
                }
            }
            Ok(Event::Eof) => return Ok(ErrorPlacement::None),
            Ok(_) => {}
            Err(e) => {
                return Err(Route53Error::malformed(
                    "response",
                    format!("invalid XML at position {}: {e}", reader.buffer_position()),
                ))
            }
        }
    }
}

/// Decode an error document into a [`Route53Error::Service`].
///
/// # Errors
///
/// Returns [`Route53Error::MalformedResponse`] if the document has no
/// `Error` element or cannot be parsed.
pub fn decode_error(xml: &str) -> Result<Route53Error, Route53Error> {
    let error = match error_placement(xml)? {
        ErrorPlacement::Root => quick_xml::de::from_str::<ErrorXml>(xml),
        ErrorPlacement::Child => {
            quick_xml::de::from_str::<ErrorResponseXml>(xml).map(|response| response.error)
        }
        ErrorPlacement::None => {
            return Err(Route53Error::malformed(
                "ErrorResponse",
                "document has no Error element",
            ))
        }
    }
    .map_err(|e| Route53Error::malformed("ErrorResponse", e.to_string()))?;

    debug!(
        error_type = %error.kind,
        code = %error.code,
        "Route53 returned an error document"
    );

    Ok(Route53Error::Service {
        code: error.code.trim().to_string(),
        message: error.message.trim().to_string(),
    })
}

/// Fail with the decoded service error if `xml` is an error document.
///
/// # Errors
///
/// Returns [`Route53Error::Service`] for error documents and
/// [`Route53Error::MalformedResponse`] for unparseable XML.
pub fn ensure_not_error(xml: &str) -> Result<(), Route53Error> {
    if error_placement(xml)? == ErrorPlacement::None {
        Ok(())
    } else {
        Err(decode_error(xml)?)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
