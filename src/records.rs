// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record set snapshots and the change actions built from them.
//!
//! A [`ResourceRecordSet`] is what the service currently publishes for one
//! name and type. A [`ChangeAction`] is one atomic mutation submitted in a
//! change batch.
//!
//! # Identity
//!
//! Two change actions are *the same action* when their kind, name, type and
//! set identifier match. TTL, weight, alias target and values are payload and
//! do not take part in equality, hashing or ordering. This is what lets
//! [`ChangeAction::merge`] fold partial updates to one record set together,
//! and what gives a batch its deterministic wire order.
//!
//! # Example
//!
//! ```rust
//! use valet::records::ChangeAction;
//! use valet::record_type::RecordType;
//!
//! let first = ChangeAction::create("www.example.com.", RecordType::A, 300, ["10.0.0.2"]);
//! let second = ChangeAction::create("www.example.com.", RecordType::A, 60, ["10.0.0.1"]);
//!
//! let merged = first.merge(&second).unwrap();
//! assert_eq!(merged.ttl(), 300);
//! assert_eq!(merged.values(), ["10.0.0.1", "10.0.0.2"]);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::constants::DEFAULT_RECORD_TTL_SECS;
use crate::errors::Route53Error;
use crate::record_type::RecordType;
use crate::types::Zone;

/// Target of an alias record set (another AWS resource instead of literal values).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasTarget {
    /// Hosted zone id of the aliased resource
    pub hosted_zone_id: String,
    /// DNS name of the aliased resource
    pub dns_name: String,
}

/// One record set as currently published by the service.
///
/// Only produced by decoding a record listing. `values` keep the order the
/// service returned them in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSet {
    pub name: String,
    pub record_type: RecordType,
    pub ttl: u32,
    /// Weighted set member id; members sharing name and type differ only here
    pub set_identifier: Option<String>,
    pub weight: u32,
    pub alias_target: Option<AliasTarget>,
    pub values: Vec<String>,
}

impl ResourceRecordSet {
    /// First published value, if any.
    #[must_use]
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// A CREATE action that republishes this record set exactly.
    #[must_use]
    pub fn to_create(&self) -> ChangeAction {
        self.to_builder().build_create()
    }

    /// A DELETE action that retires this record set exactly.
    ///
    /// The service only deletes a record set when every field matches, so
    /// the action mirrors TTL, weighted identity and values as published.
    #[must_use]
    pub fn to_delete(&self) -> ChangeAction {
        self.to_builder().build_delete()
    }

    fn to_builder(&self) -> ChangeActionBuilder {
        ChangeActionBuilder {
            name: self.name.clone(),
            record_type: self.record_type,
            ttl: self.ttl,
            set_identifier: self.set_identifier.clone(),
            weight: self.weight,
            alias_target: self.alias_target.clone(),
            values: self.values.clone(),
        }
    }
}

/// Kind of mutation a [`ChangeAction`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Create,
    Delete,
}

impl ChangeKind {
    /// Wire value of the `Action` element.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic mutation of a record set, the unit of a change batch.
///
/// Values are always kept sorted (stable, duplicates preserved) so the
/// encoded batch does not depend on the order values were added in.
#[derive(Debug, Clone)]
pub struct ChangeAction {
    kind: ChangeKind,
    name: String,
    record_type: RecordType,
    ttl: u32,
    set_identifier: Option<String>,
    weight: u32,
    alias_target: Option<AliasTarget>,
    values: Vec<String>,
}

impl ChangeAction {
    /// Start building an action for `name` and `record_type`.
    #[must_use]
    pub fn builder(name: impl Into<String>, record_type: RecordType) -> ChangeActionBuilder {
        ChangeActionBuilder::new(name, record_type)
    }

    /// Start building an action for a name relative to `zone`.
    ///
    /// `label` is prefixed to the zone's domain name; an empty label
    /// addresses the zone apex.
    #[must_use]
    pub fn relative(label: &str, zone: &Zone, record_type: RecordType) -> ChangeActionBuilder {
        let name = if label.is_empty() {
            zone.domain_name.clone()
        } else {
            format!("{label}.{}", zone.domain_name)
        };
        ChangeActionBuilder::new(name, record_type)
    }

    /// CREATE action with literal values.
    #[must_use]
    pub fn create<I, S>(name: impl Into<String>, record_type: RecordType, ttl: u32, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(name, record_type)
            .ttl(ttl)
            .values(values)
            .build_create()
    }

    /// DELETE action with literal values.
    #[must_use]
    pub fn delete<I, S>(name: impl Into<String>, record_type: RecordType, ttl: u32, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(name, record_type)
            .ttl(ttl)
            .values(values)
            .build_delete()
    }

    fn from_parts(kind: ChangeKind, builder: ChangeActionBuilder) -> Self {
        let mut values = builder.values;
        values.sort();

        Self {
            kind,
            name: builder.name,
            record_type: builder.record_type,
            ttl: builder.ttl,
            set_identifier: builder.set_identifier,
            weight: builder.weight,
            alias_target: builder.alias_target,
            values,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    #[must_use]
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Weighted set identifier, `None` for plain record sets.
    #[must_use]
    pub fn set_identifier(&self) -> Option<&str> {
        self.set_identifier.as_deref()
    }

    /// True if this action addresses a weighted set member.
    ///
    /// Blank identifiers are treated as absent.
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        self.set_identifier
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }

    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    #[must_use]
    pub fn alias_target(&self) -> Option<&AliasTarget> {
        self.alias_target.as_ref()
    }

    /// Record values in canonical (sorted) order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Combine the values of two actions with the same identity.
    ///
    /// Scalar fields (TTL, weight, alias target) come from `self`; the values
    /// are `self`'s followed by `other`'s, re-sorted.
    ///
    /// # Errors
    ///
    /// Returns [`Route53Error::IncompatibleMerge`] if kind, name, type or set
    /// identifier differ.
    pub fn merge(&self, other: &ChangeAction) -> Result<ChangeAction, Route53Error> {
        if self != other {
            return Err(Route53Error::IncompatibleMerge {
                left: self.to_string(),
                right: other.to_string(),
            });
        }

        Ok(self.merge_values(other.values.iter().cloned()))
    }

    /// Copy of this action with `extra` appended to its values, re-sorted.
    #[must_use]
    pub fn merge_values<I, S>(&self, extra: I) -> ChangeAction
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut merged = self.clone();
        merged.values.extend(extra.into_iter().map(Into::into));
        merged.values.sort();
        merged
    }

    fn identity(&self) -> (ChangeKind, &str, RecordType, Option<&str>) {
        (
            self.kind,
            self.name.as_str(),
            self.record_type,
            self.set_identifier.as_deref(),
        )
    }
}

impl PartialEq for ChangeAction {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for ChangeAction {}

impl Hash for ChangeAction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for ChangeAction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChangeAction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.name, self.record_type)?;
        if let Some(id) = &self.set_identifier {
            write!(f, " [{id}]")?;
        }
        Ok(())
    }
}

/// Builder for [`ChangeAction`]; the single construction surface.
#[derive(Debug, Clone)]
pub struct ChangeActionBuilder {
    name: String,
    record_type: RecordType,
    ttl: u32,
    set_identifier: Option<String>,
    weight: u32,
    alias_target: Option<AliasTarget>,
    values: Vec<String>,
}

impl ChangeActionBuilder {
    fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl: DEFAULT_RECORD_TTL_SECS,
            set_identifier: None,
            weight: 0,
            alias_target: None,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }

    #[must_use]
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Make this a weighted (round-robin) set member.
    #[must_use]
    pub fn weighted(mut self, set_identifier: impl Into<String>, weight: u32) -> Self {
        self.set_identifier = Some(set_identifier.into());
        self.weight = weight;
        self
    }

    /// Point this record set at another resource instead of literal values.
    #[must_use]
    pub fn alias(mut self, hosted_zone_id: impl Into<String>, dns_name: impl Into<String>) -> Self {
        self.alias_target = Some(AliasTarget {
            hosted_zone_id: hosted_zone_id.into(),
            dns_name: dns_name.into(),
        });
        self
    }

    #[must_use]
    pub fn build_create(self) -> ChangeAction {
        ChangeAction::from_parts(ChangeKind::Create, self)
    }

    #[must_use]
    pub fn build_delete(self) -> ChangeAction {
        ChangeAction::from_parts(ChangeKind::Delete, self)
    }
}

/// Sort `actions` into wire order and fold actions with equal identity together.
///
/// The first action of each identity keeps its scalar fields; later ones only
/// contribute values.
#[must_use]
pub fn normalize_batch(actions: Vec<ChangeAction>) -> Vec<ChangeAction> {
    let mut actions = actions;
    // Stable, so the first occurrence of an identity stays first
    actions.sort();

    let mut normalized: Vec<ChangeAction> = Vec::with_capacity(actions.len());
    for action in actions {
        match normalized.last_mut() {
            Some(last) if *last == action => {
                *last = last.merge_values(action.values);
            }
            _ => normalized.push(action),
        }
    }
    normalized
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod records_tests;
