// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Scripted in-memory transport and response fixtures for unit tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::transport::Route53Transport;

/// One call received by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PostChangeBatch { zone_id: String, payload: String },
    GetChangeInfo { change_id: String },
    GetResourceRecordSets { zone_id: String, query: String },
    GetHostedZone { zone_id: String },
    PostHostedZone { payload: String },
    DeleteHostedZone { zone_id: String, comment: String },
}

/// Transport that answers calls from a queue of scripted responses, in order.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response body.
    pub fn respond(&self, body: impl Into<String>) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(body.into()));
        self
    }

    /// Queue a transport failure.
    pub fn fail(&self, message: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(anyhow!(message.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next(&self, call: Call) -> Result<String> {
        let description = format!("{call:?}");
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted response for {description}")))
    }
}

#[async_trait]
impl Route53Transport for MockTransport {
    async fn post_change_batch(&self, zone_id: &str, payload: &str) -> Result<String> {
        self.next(Call::PostChangeBatch {
            zone_id: zone_id.to_string(),
            payload: payload.to_string(),
        })
    }

    async fn get_change_info(&self, change_id: &str) -> Result<String> {
        self.next(Call::GetChangeInfo {
            change_id: change_id.to_string(),
        })
    }

    async fn get_resource_record_sets(&self, zone_id: &str, query: &str) -> Result<String> {
        self.next(Call::GetResourceRecordSets {
            zone_id: zone_id.to_string(),
            query: query.to_string(),
        })
    }

    async fn get_hosted_zone(&self, zone_id: &str) -> Result<String> {
        self.next(Call::GetHostedZone {
            zone_id: zone_id.to_string(),
        })
    }

    async fn post_hosted_zone(&self, payload: &str) -> Result<String> {
        self.next(Call::PostHostedZone {
            payload: payload.to_string(),
        })
    }

    async fn delete_hosted_zone(&self, zone_id: &str, comment: &str) -> Result<String> {
        self.next(Call::DeleteHostedZone {
            zone_id: zone_id.to_string(),
            comment: comment.to_string(),
        })
    }
}

/// `ChangeResourceRecordSetsResponse` carrying one `ChangeInfo`.
pub fn change_info_xml(change_id: &str, status: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ChangeResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2010-10-01/">
  <ChangeInfo>
    <Id>/change/{change_id}</Id>
    <Status>{status}</Status>
    <SubmittedAt>2010-09-10T01:36:41.958Z</SubmittedAt>
  </ChangeInfo>
</ChangeResourceRecordSetsResponse>"#
    )
}

/// Service error document.
pub fn error_xml(code: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ErrorResponse xmlns="https://route53.amazonaws.com/doc/2010-10-01/">
  <Error>
    <Type>Sender</Type>
    <Code>{code}</Code>
    <Message>{message}</Message>
  </Error>
  <RequestId>a6b5ca0f-1c03-11e0-a6d5-1f1d2c3e4f5a</RequestId>
</ErrorResponse>"#
    )
}

/// `ListHostedZonesResponse` with `(id, name)` pairs.
pub fn zone_list_xml(zones: &[(&str, &str)]) -> String {
    let zones: String = zones
        .iter()
        .map(|(id, name)| {
            format!(
                "<HostedZone><Id>/hostedzone/{id}</Id><Name>{name}</Name>\
                 <CallerReference>ref-{id}</CallerReference></HostedZone>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListHostedZonesResponse xmlns="https://route53.amazonaws.com/doc/2010-10-01/">
  <HostedZones>{zones}</HostedZones>
  <IsTruncated>false</IsTruncated>
  <MaxItems>100</MaxItems>
</ListHostedZonesResponse>"#
    )
}

/// `GetHostedZoneResponse` (or create response when `change_id` is set).
pub fn hosted_zone_xml(id: &str, name: &str, change_id: Option<&str>) -> String {
    let root = if change_id.is_some() {
        "CreateHostedZoneResponse"
    } else {
        "GetHostedZoneResponse"
    };
    let change_info = change_id
        .map(|change_id| {
            format!(
                "<ChangeInfo><Id>/change/{change_id}</Id><Status>PENDING</Status>\
                 <SubmittedAt>2010-09-10T01:36:41.958Z</SubmittedAt></ChangeInfo>"
            )
        })
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<{root} xmlns="https://route53.amazonaws.com/doc/2010-10-01/">
  <HostedZone>
    <Id>/hostedzone/{id}</Id>
    <Name>{name}</Name>
    <CallerReference>ref-{id}</CallerReference>
    <Config><Comment>test zone</Comment></Config>
  </HostedZone>
  {change_info}
  <DelegationSet>
    <NameServers>
      <NameServer>ns-1.awsdns-01.com</NameServer>
      <NameServer>ns-2.awsdns-02.net</NameServer>
    </NameServers>
  </DelegationSet>
</{root}>"#
    )
}

/// One `ResourceRecordSet` element: `(name, type, values)`.
pub fn record_xml(name: &str, record_type: &str, values: &[&str]) -> String {
    let values: String = values
        .iter()
        .map(|value| format!("<ResourceRecord><Value>{value}</Value></ResourceRecord>"))
        .collect();
    format!(
        "<ResourceRecordSet><Name>{name}</Name><Type>{record_type}</Type>\
         <TTL>300</TTL><ResourceRecords>{values}</ResourceRecords></ResourceRecordSet>"
    )
}

/// `ListResourceRecordSetsResponse` page built from [`record_xml`] elements.
pub fn record_page_xml(records: &[String], is_truncated: bool) -> String {
    let records: String = records.concat();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2010-10-01/">
  <ResourceRecordSets>{records}</ResourceRecordSets>
  <IsTruncated>{is_truncated}</IsTruncated>
  <MaxItems>100</MaxItems>
</ListResourceRecordSetsResponse>"#
    )
}
