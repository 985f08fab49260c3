//! Record key assignment
//!
//! Applies the hostname include/exclude filters, sorts a zone's normalized
//! records into canonical order and derives unique per-record keys with
//! deterministic collision suffixes. Rerunning against unchanged DNS state
//! must reproduce the same keys, since they address resources in Terraform
//! state.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::normalize::TypeFilters;
use crate::record::NormalizedRecord;

/// Case-insensitive hostname filters applied after normalization.
#[derive(Debug, Default)]
pub struct HostnameFilters {
    /// Records whose full name matches any of these are dropped, but only
    /// for types in the skippable-import set. Infrastructure-critical types
    /// (MX and friends) survive even a catch-all exclude.
    pub exclude: Vec<Regex>,
    /// When non-empty, only records whose full name matches at least one
    /// pattern are kept. Applies to every type.
    pub include: Vec<Regex>,
}

impl HostnameFilters {
    pub fn new(exclude: Vec<Regex>, include: Vec<Regex>) -> Self {
        Self { exclude, include }
    }
}

/// Compile hostname filter expressions case-insensitively.
pub fn compile_patterns(expressions: &[String]) -> Result<Vec<Regex>, regex::Error> {
    expressions
        .iter()
        .map(|expression| {
            RegexBuilder::new(expression)
                .case_insensitive(true)
                .build()
        })
        .collect()
}

/// A normalized record with its unique key assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRecord {
    pub key: String,
    pub record: NormalizedRecord,
}

/// One record import directive's addressing tuple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImportEntry {
    pub zone_key: String,
    pub record_key: String,
    pub import_id: String,
}

/// Filter, sort and key one zone's records.
///
/// Canonical order is ascending `(key_base, set_identifier, full_name)`.
/// The first record per `key_base` keeps the bare base; later ones get
/// `_02`, `_03`, ... suffixes in that order.
pub fn assign_keys(
    records: Vec<NormalizedRecord>,
    hostnames: &HostnameFilters,
    types: &TypeFilters,
) -> Vec<KeyedRecord> {
    let mut kept: Vec<NormalizedRecord> = records
        .into_iter()
        .filter(|record| {
            if !hostnames.exclude.is_empty()
                && types.exclude_may_drop(&record.record_type)
                && hostnames
                    .exclude
                    .iter()
                    .any(|pattern| pattern.is_match(&record.full_name))
            {
                return false;
            }
            if !hostnames.include.is_empty()
                && !hostnames
                    .include
                    .iter()
                    .any(|pattern| pattern.is_match(&record.full_name))
            {
                return false;
            }
            true
        })
        .collect();

    kept.sort_by(|a, b| {
        (
            &a.key_base,
            a.set_identifier.as_deref().unwrap_or(""),
            &a.full_name,
        )
            .cmp(&(
                &b.key_base,
                b.set_identifier.as_deref().unwrap_or(""),
                &b.full_name,
            ))
    });

    let mut counts: HashMap<String, usize> = HashMap::new();
    kept.into_iter()
        .map(|record| {
            let seen = counts.entry(record.key_base.clone()).or_insert(0);
            *seen += 1;
            let key = if *seen == 1 {
                record.key_base.clone()
            } else {
                format!("{}_{:02}", record.key_base, seen)
            };
            KeyedRecord { key, record }
        })
        .collect()
}

/// Import addressing tuples for a zone's keyed records, in key order.
pub fn import_entries(zone_key: &str, records: &[KeyedRecord]) -> Vec<ImportEntry> {
    records
        .iter()
        .map(|keyed| ImportEntry {
            zone_key: zone_key.to_string(),
            record_key: keyed.key.clone(),
            import_id: keyed.record.import_id.clone(),
        })
        .collect()
}
