// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `records.rs`

#[cfg(test)]
mod tests {
    use crate::errors::Route53Error;
    use crate::record_type::RecordType;
    use crate::records::{normalize_batch, ChangeAction, ChangeKind, ResourceRecordSet};
    use crate::types::Zone;
    use std::collections::HashSet;

    fn published(name: &str, record_type: RecordType, values: &[&str]) -> ResourceRecordSet {
        ResourceRecordSet {
            name: name.to_string(),
            record_type,
            ttl: 300,
            set_identifier: None,
            weight: 0,
            alias_target: None,
            values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    #[test]
    fn test_values_are_sorted_and_duplicates_kept() {
        let action = ChangeAction::create(
            "www.example.com.",
            RecordType::A,
            300,
            ["10.0.0.3", "10.0.0.1", "10.0.0.3"],
        );

        assert_eq!(action.values(), ["10.0.0.1", "10.0.0.3", "10.0.0.3"]);
    }

    #[test]
    fn test_builder_defaults() {
        let action = ChangeAction::builder("example.com.", RecordType::MX)
            .value("10 mail10.example.com")
            .build_delete();

        assert_eq!(action.kind(), ChangeKind::Delete);
        assert_eq!(action.ttl(), 600);
        assert_eq!(action.weight(), 0);
        assert!(action.set_identifier().is_none());
        assert!(!action.is_weighted());
        assert!(action.alias_target().is_none());
    }

    #[test]
    fn test_merge_first_operand_wins_on_scalars() {
        let first = ChangeAction::create("www.example.com.", RecordType::A, 300, ["10.0.0.2", "10.0.0.9"]);
        let second = ChangeAction::create("www.example.com.", RecordType::A, 60, ["10.0.0.1", "10.0.0.2"]);

        let merged = first.merge(&second).unwrap();

        assert_eq!(merged.ttl(), 300);
        assert_eq!(
            merged.values(),
            ["10.0.0.1", "10.0.0.2", "10.0.0.2", "10.0.0.9"]
        );
    }

    #[test]
    fn test_merge_keeps_weight_of_first_operand() {
        let first = ChangeAction::builder("rr.example.com.", RecordType::A)
            .weighted("set1", 10)
            .value("10.0.0.1")
            .build_create();
        let second = ChangeAction::builder("rr.example.com.", RecordType::A)
            .weighted("set1", 99)
            .value("10.0.0.2")
            .build_create();

        let merged = first.merge(&second).unwrap();

        assert_eq!(merged.weight(), 10);
        assert_eq!(merged.set_identifier(), Some("set1"));
        assert_eq!(merged.values().len(), 2);
    }

    #[test]
    fn test_merge_rejects_mismatched_identity() {
        let base = ChangeAction::create("www.example.com.", RecordType::A, 300, ["10.0.0.1"]);

        let mismatches = [
            ChangeAction::create("api.example.com.", RecordType::A, 300, ["10.0.0.1"]),
            ChangeAction::create("www.example.com.", RecordType::AAAA, 300, ["::1"]),
            ChangeAction::delete("www.example.com.", RecordType::A, 300, ["10.0.0.1"]),
            ChangeAction::builder("www.example.com.", RecordType::A)
                .ttl(300)
                .weighted("set1", 1)
                .value("10.0.0.1")
                .build_create(),
        ];

        for other in mismatches {
            let err = base.merge(&other).unwrap_err();
            assert!(
                matches!(err, Route53Error::IncompatibleMerge { .. }),
                "merging with {other} should fail, got {err:?}"
            );
        }
    }

    #[test]
    fn test_identity_ignores_payload() {
        let a = ChangeAction::create("www.example.com.", RecordType::A, 300, ["10.0.0.1"]);
        let b = ChangeAction::create("www.example.com.", RecordType::A, 60, ["10.0.0.2"]);

        assert_eq!(a, b);

        let set: HashSet<ChangeAction> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ordering_is_kind_name_type_identifier() {
        let mut actions = vec![
            ChangeAction::create("b.example.com.", RecordType::A, 300, ["1"]),
            ChangeAction::delete("a.example.com.", RecordType::A, 300, ["1"]),
            ChangeAction::create("a.example.com.", RecordType::TXT, 300, ["\"x\""]),
            ChangeAction::create("a.example.com.", RecordType::A, 300, ["1"]),
        ];
        actions.sort();

        let order: Vec<String> = actions.iter().map(ToString::to_string).collect();
        assert_eq!(
            order,
            vec![
                "CREATE a.example.com. A",
                "CREATE a.example.com. TXT",
                "CREATE b.example.com. A",
                "DELETE a.example.com. A",
            ]
        );
    }

    #[test]
    fn test_relative_names() {
        let mut zone = Zone::with_id("Z1D633PJN98FT9");
        zone.domain_name = "example.com.".to_string();

        let host = ChangeAction::relative("www", &zone, RecordType::A)
            .value("127.0.0.1")
            .build_create();
        let apex = ChangeAction::relative("", &zone, RecordType::TXT)
            .value("\"bar text\"")
            .build_create();

        assert_eq!(host.name(), "www.example.com.");
        assert_eq!(apex.name(), "example.com.");
    }

    #[test]
    fn test_to_delete_mirrors_published_state() {
        let mut record = published("mail.example.com.", RecordType::MX, &["20 b.example.com", "10 a.example.com"]);
        record.set_identifier = Some("primary".to_string());
        record.weight = 5;

        let action = record.to_delete();

        assert_eq!(action.kind(), ChangeKind::Delete);
        assert_eq!(action.name(), "mail.example.com.");
        assert_eq!(action.record_type(), RecordType::MX);
        assert_eq!(action.ttl(), 300);
        assert_eq!(action.set_identifier(), Some("primary"));
        assert_eq!(action.weight(), 5);
        assert_eq!(action.values(), ["10 a.example.com", "20 b.example.com"]);

        // The snapshot itself keeps service order
        assert_eq!(record.first_value(), Some("20 b.example.com"));
    }

    #[test]
    fn test_to_create_mirrors_alias() {
        let mut record = published("example.com.", RecordType::A, &[]);
        record.alias_target = Some(crate::records::AliasTarget {
            hosted_zone_id: "Z35SXDOTRQ7X7K".to_string(),
            dns_name: "lb-1.us-east-1.elb.amazonaws.com.".to_string(),
        });

        let action = record.to_create();

        assert_eq!(action.kind(), ChangeKind::Create);
        assert_eq!(
            action.alias_target().map(|t| t.dns_name.as_str()),
            Some("lb-1.us-east-1.elb.amazonaws.com.")
        );
    }

    #[test]
    fn test_record_set_equality_distinguishes_weighted_members() {
        let mut first = published("rr.example.com.", RecordType::A, &["10.0.0.1"]);
        first.set_identifier = Some("set1".to_string());
        let mut second = first.clone();
        second.set_identifier = Some("set2".to_string());

        assert_ne!(first, second);
        assert_eq!(first, first.clone());
    }

    #[test]
    fn test_normalize_batch_sorts_and_merges() {
        let batch = vec![
            ChangeAction::create("www.example.com.", RecordType::A, 300, ["10.0.0.2"]),
            ChangeAction::create("api.example.com.", RecordType::A, 60, ["10.0.0.5"]),
            ChangeAction::create("www.example.com.", RecordType::A, 60, ["10.0.0.1"]),
        ];

        let normalized = normalize_batch(batch);

        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].name(), "api.example.com.");
        assert_eq!(normalized[1].name(), "www.example.com.");
        assert_eq!(normalized[1].ttl(), 300);
        assert_eq!(normalized[1].values(), ["10.0.0.1", "10.0.0.2"]);
    }
}
