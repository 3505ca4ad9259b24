// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `change_batch.rs`

#[cfg(test)]
mod tests {
    use crate::codec::change_batch::{
        decode_change_status, default_comment, encode_change_batch, parse_submitted_at,
    };
    use crate::errors::Route53Error;
    use crate::record_type::RecordType;
    use crate::records::ChangeAction;
    use crate::types::ChangeState;
    use chrono::{TimeZone, Utc};

    fn change_response(id: &str, status: &str, submitted_at: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ChangeResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2010-10-01/">
  <ChangeInfo>
    <Id>{id}</Id>
    <Status>{status}</Status>
    <SubmittedAt>{submitted_at}</SubmittedAt>
  </ChangeInfo>
</ChangeResourceRecordSetsResponse>"#
        )
    }

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("'{needle}' not found in {haystack}"))
    }

    #[test]
    fn test_blank_comment_gets_default() {
        let actions = vec![
            ChangeAction::create("a.example.com.", RecordType::A, 300, ["10.0.0.1"]),
            ChangeAction::create("b.example.com.", RecordType::A, 300, ["10.0.0.2"]),
            ChangeAction::create("c.example.com.", RecordType::A, 300, ["10.0.0.3"]),
        ];

        let xml = encode_change_batch("", &actions).unwrap();

        assert!(xml.contains("<Comment>Modify 3 records.</Comment>"));
        assert_eq!(default_comment(3), "Modify 3 records.");
    }

    #[test]
    fn test_explicit_comment_is_escaped() {
        let actions = vec![ChangeAction::create("a.example.com.", RecordType::A, 300, ["10.0.0.1"])];

        let xml = encode_change_batch("add <www> & friends", &actions).unwrap();

        assert!(xml.contains("<Comment>add &lt;www&gt; &amp; friends</Comment>"));
    }

    #[test]
    fn test_request_root_and_element_order() {
        let actions = vec![ChangeAction::create(
            "www.example.com.",
            RecordType::A,
            300,
            ["10.0.0.2", "10.0.0.1"],
        )];

        let xml = encode_change_batch("add www", &actions).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(
            r#"<ChangeResourceRecordSetsRequest xmlns="https://route53.amazonaws.com/doc/2010-10-01/">"#
        ));

        let order = [
            "<ChangeBatch>",
            "<Comment>add www</Comment>",
            "<Changes>",
            "<Change>",
            "<Action>CREATE</Action>",
            "<ResourceRecordSet>",
            "<Name>www.example.com.</Name>",
            "<Type>A</Type>",
            "<TTL>300</TTL>",
            "<ResourceRecords>",
            "<ResourceRecord><Value>10.0.0.1</Value></ResourceRecord>",
            "<ResourceRecord><Value>10.0.0.2</Value></ResourceRecord>",
        ];
        let positions: Vec<usize> = order.iter().map(|tag| position(&xml, tag)).collect();
        assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "elements out of order: {xml}"
        );

        assert!(!xml.contains("SetIdentifier"));
        assert!(!xml.contains("Weight"));
        assert!(!xml.contains("AliasTarget"));
    }

    #[test]
    fn test_weighted_member_encodes_identifier_before_ttl() {
        let actions = vec![ChangeAction::builder("wwwrr.example.com.", RecordType::A)
            .ttl(60)
            .weighted("set2", 2)
            .value("127.0.0.2")
            .build_delete()];

        let xml = encode_change_batch("", &actions).unwrap();

        assert!(xml.contains("<Action>DELETE</Action>"));
        let type_at = position(&xml, "<Type>A</Type>");
        let id_at = position(&xml, "<SetIdentifier>set2</SetIdentifier>");
        let weight_at = position(&xml, "<Weight>2</Weight>");
        let ttl_at = position(&xml, "<TTL>60</TTL>");
        assert!(type_at < id_at && id_at < weight_at && weight_at < ttl_at);
    }

    #[test]
    fn test_blank_set_identifier_is_not_weighted() {
        let actions = vec![ChangeAction::builder("www.example.com.", RecordType::A)
            .weighted("  ", 5)
            .value("127.0.0.1")
            .build_create()];

        let xml = encode_change_batch("", &actions).unwrap();

        assert!(!xml.contains("SetIdentifier"));
        assert!(!xml.contains("<Weight>"));
    }

    #[test]
    fn test_alias_replaces_ttl_and_records() {
        let actions = vec![ChangeAction::builder("example.com.", RecordType::A)
            .alias("Z35SXDOTRQ7X7K", "lb-1.us-east-1.elb.amazonaws.com.")
            .build_create()];

        let xml = encode_change_batch("", &actions).unwrap();

        assert!(xml.contains(
            "<AliasTarget><HostedZoneId>Z35SXDOTRQ7X7K</HostedZoneId><DNSName>lb-1.us-east-1.elb.amazonaws.com.</DNSName></AliasTarget>"
        ));
        assert!(!xml.contains("<TTL>"));
        assert!(!xml.contains("ResourceRecords"));
    }

    #[test]
    fn test_changes_keep_caller_order() {
        let actions = vec![
            ChangeAction::delete("z.example.com.", RecordType::A, 300, ["10.0.0.1"]),
            ChangeAction::create("a.example.com.", RecordType::A, 300, ["10.0.0.2"]),
        ];

        let xml = encode_change_batch("", &actions).unwrap();

        assert!(position(&xml, "z.example.com.") < position(&xml, "a.example.com."));
    }

    #[test]
    fn test_decode_change_status_strips_prefix_once() {
        let xml = change_response("/change/C2682N5HXP0BZ4", "PENDING", "2010-09-10T01:36:41.958Z");

        let status = decode_change_status("Z1D633PJN98FT9", &xml).unwrap();

        assert_eq!(status.zone_id, "Z1D633PJN98FT9");
        assert_eq!(status.change_id, "C2682N5HXP0BZ4");
        assert_eq!(status.status, ChangeState::PENDING);
        assert_eq!(
            status.submitted_at,
            Utc.with_ymd_and_hms(2010, 9, 10, 1, 36, 41).unwrap()
                + chrono::Duration::milliseconds(958)
        );

        let doubled = change_response("/change//change/C1", "INSYNC", "2010-09-10T01:36:41.958Z");
        let status = decode_change_status("Z1", &doubled).unwrap();
        assert_eq!(status.change_id, "/change/C1");
        assert!(status.is_in_sync());
    }

    #[test]
    fn test_decode_change_status_without_prefix() {
        let xml = change_response("C2682N5HXP0BZ4", "INSYNC", "2010-09-10T01:36:41.958Z");

        let status = decode_change_status("Z1", &xml).unwrap();

        assert_eq!(status.change_id, "C2682N5HXP0BZ4");
    }

    #[test]
    fn test_decode_change_status_with_prefixed_elements() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<r:ChangeResourceRecordSetsResponse xmlns:r="https://route53.amazonaws.com/doc/2010-10-01/">
  <r:ChangeInfo>
    <r:Id>/change/C1</r:Id>
    <r:Status>PENDING</r:Status>
    <r:SubmittedAt>2010-09-10T01:36:41.958Z</r:SubmittedAt>
  </r:ChangeInfo>
</r:ChangeResourceRecordSetsResponse>"#;

        let status = decode_change_status("Z1", xml).unwrap();

        assert_eq!(status.zone_id, "Z1");
        assert_eq!(status.change_id, "C1");
        assert_eq!(status.status, ChangeState::PENDING);
    }

    #[test]
    fn test_unknown_status_is_malformed() {
        let xml = change_response("/change/C1", "DONE", "2010-09-10T01:36:41.958Z");

        let err = decode_change_status("Z1", &xml).unwrap_err();

        assert!(
            matches!(err, Route53Error::MalformedResponse { ref context, .. } if context == "ChangeInfo/Status")
        );
    }

    #[test]
    fn test_bad_timestamp_is_malformed() {
        let xml = change_response("/change/C1", "PENDING", "2010-09-10 01:36:41");

        let err = decode_change_status("Z1", &xml).unwrap_err();

        assert!(
            matches!(err, Route53Error::MalformedResponse { ref context, .. } if context == "ChangeInfo/SubmittedAt")
        );
        assert!(parse_submitted_at("not-a-date").is_err());
    }

    #[test]
    fn test_missing_change_info_is_malformed() {
        let xml = r#"<ChangeResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2010-10-01/"/>"#;

        let err = decode_change_status("Z1", xml).unwrap_err();

        assert_eq!(err.reason(), "MalformedResponse");
    }

    #[test]
    fn test_error_document_is_never_a_status() {
        let xml = r#"<ErrorResponse xmlns="https://route53.amazonaws.com/doc/2010-10-01/">
  <Error><Type>Sender</Type><Code>InvalidInput</Code><Message>bad</Message></Error>
</ErrorResponse>"#;

        let err = decode_change_status("Z1", xml).unwrap_err();

        assert_eq!(
            err,
            Route53Error::Service {
                code: "InvalidInput".to_string(),
                message: "bad".to_string(),
            }
        );
    }
}
