// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! AWS3-HTTPS request signing for the 2010-10-01 API.
//!
//! The signature is an HMAC-SHA256 of the request's `Date` header value,
//! keyed with the secret access key and base64 encoded:
//!
//! ```text
//! Date: Tue, 10 Sep 2010 01:36:41 +0000
//! X-Amzn-Authorization: AWS3-HTTPS AWSAccessKeyId=AKIA...,Algorithm=HmacSHA256,Signature=...
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::Credentials;

type HmacSha256 = Hmac<Sha256>;

/// Headers to attach to one signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Value of the `Date` header
    pub date: String,
    /// Value of the `X-Amzn-Authorization` header
    pub authorization: String,
}

/// Format a timestamp as the `Date` header value that gets signed.
#[must_use]
pub fn http_date(now: DateTime<Utc>) -> String {
    now.to_rfc2822()
}

/// Sign a request issued at `now`.
#[must_use]
pub fn sign(credentials: &Credentials, now: DateTime<Utc>) -> SignedHeaders {
    let date = http_date(now);

    let mut mac = HmacSha256::new_from_slice(credentials.secret_access_key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(date.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    SignedHeaders {
        authorization: format!(
            "AWS3-HTTPS AWSAccessKeyId={},Algorithm=HmacSHA256,Signature={signature}",
            credentials.access_key_id
        ),
        date,
    }
}

#[cfg(test)]
#[path = "signing_tests.rs"]
mod signing_tests;
