//! Record normalization
//!
//! Maps one raw [`RecordSet`] into the canonical [`NormalizedRecord`] model:
//! type filtering, wildcard decoding, TXT unquoting, percent escaping and
//! per-type field extraction. Absent raw fields stay absent so the renderer
//! never sees placeholder values.

use std::collections::HashSet;

use crate::names::{escape_percent, relative_name, sanitize_subdomain};
use crate::record::{AliasAttributes, NormalizedRecord, RecordSet};

/// Route53 escape sequence for a literal `*` in record names.
const WILDCARD_ESCAPE: &str = "\\052";

/// Record-type filter configuration, loaded once per run and threaded
/// through the pipeline.
#[derive(Debug, Clone)]
pub struct TypeFilters {
    skip_record_types: HashSet<String>,
    skippable_import_types: HashSet<String>,
}

impl Default for TypeFilters {
    /// NS and SOA are provider-managed at the apex and must never be
    /// re-imported; A and CNAME are the only types broad hostname excludes
    /// may drop.
    fn default() -> Self {
        Self {
            skip_record_types: ["NS", "SOA"].into_iter().map(String::from).collect(),
            skippable_import_types: ["A", "CNAME"].into_iter().map(String::from).collect(),
        }
    }
}

impl TypeFilters {
    /// Replace the skip set. Empty input keeps the current set, matching the
    /// configuration file's "override only when provided" behavior.
    pub fn with_skip_record_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let overridden: HashSet<String> = types
            .into_iter()
            .map(|t| t.as_ref().to_uppercase())
            .collect();
        if !overridden.is_empty() {
            self.skip_record_types = overridden;
        }
        self
    }

    /// Replace the skippable-import set. Empty input keeps the current set.
    pub fn with_skippable_import_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let overridden: HashSet<String> = types
            .into_iter()
            .map(|t| t.as_ref().to_uppercase())
            .collect();
        if !overridden.is_empty() {
            self.skippable_import_types = overridden;
        }
        self
    }

    pub fn skips(&self, record_type: &str) -> bool {
        self.skip_record_types.contains(record_type)
    }

    /// Whether hostname exclude patterns are allowed to drop this type.
    pub fn exclude_may_drop(&self, record_type: &str) -> bool {
        self.skippable_import_types.contains(record_type)
    }
}

/// Normalize one raw record, or return `None` when its type is in the skip
/// set.
pub fn normalize(
    record: &RecordSet,
    zone_name: &str,
    zone_id: &str,
    filters: &TypeFilters,
) -> Option<NormalizedRecord> {
    let record_type = record.record_type.to_uppercase();
    if filters.skips(&record_type) {
        return None;
    }

    let full_name = record
        .name
        .trim_end_matches('.')
        .replace(WILDCARD_ESCAPE, "*");
    let relative = relative_name(&full_name, zone_name);
    let subdomain = sanitize_subdomain(&relative);
    let key_base = format!("{}_{}", record_type.to_lowercase(), subdomain);

    let values = if record.resource_records.is_empty() {
        None
    } else {
        Some(
            record
                .resource_records
                .iter()
                .map(|value| escape_percent(&unquote_text_value(value, &record_type)))
                .collect(),
        )
    };

    let alias = record.alias_target.as_ref().map(|target| AliasAttributes {
        name: target
            .dns_name
            .trim_end_matches('.')
            .replace(WILDCARD_ESCAPE, "*"),
        zone_id: target.hosted_zone_id.clone(),
        evaluate_target_health: target.evaluate_target_health,
    });

    let mut import_id_parts = vec![
        zone_id.to_string(),
        if full_name.is_empty() {
            zone_name.to_string()
        } else {
            full_name.clone()
        },
        record_type.clone(),
    ];
    if let Some(set_identifier) = record.set_identifier.as_deref() {
        if !set_identifier.is_empty() {
            import_id_parts.push(set_identifier.to_string());
        }
    }
    let import_id = import_id_parts.join("_");

    Some(NormalizedRecord {
        key_base,
        relative_name: relative,
        subdomain,
        full_name,
        record_type,
        values,
        alias,
        geo_location: record.geo_location.clone(),
        ttl: record.ttl,
        set_identifier: record.set_identifier.clone(),
        health_check_id: record.health_check_id.clone(),
        failover: record.failover.clone(),
        traffic_policy_instance_id: record.traffic_policy_instance_id.clone(),
        multi_value_answer: record.multi_value_answer,
        region: record.region.clone(),
        weight: record.weight,
        import_id,
    })
}

/// TXT and SPF values arrive pre-quoted; strip exactly one outer pair and
/// un-escape interior quotes so the renderer can re-quote on output.
fn unquote_text_value(value: &str, record_type: &str) -> String {
    if matches!(record_type, "TXT" | "SPF")
        && value.len() >= 2
        && value.starts_with('"')
        && value.ends_with('"')
    {
        value[1..value.len() - 1].replace("\\\"", "\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AliasTarget, GeoLocation};

    fn raw(name: &str, record_type: &str) -> RecordSet {
        RecordSet {
            name: name.to_string(),
            record_type: record_type.to_string(),
            ..RecordSet::default()
        }
    }

    #[test]
    fn skip_typed_records_yield_nothing() {
        let filters = TypeFilters::default();
        for skipped in ["NS", "SOA", "ns", "soa"] {
            let record = raw("example.com.", skipped);
            assert_eq!(normalize(&record, "example.com", "Z1", &filters), None);
        }
    }

    #[test]
    fn skip_set_override_replaces_defaults() {
        let filters = TypeFilters::default().with_skip_record_types(["txt"]);
        assert!(normalize(&raw("example.com.", "NS"), "example.com", "Z1", &filters).is_some());
        assert!(normalize(&raw("example.com.", "TXT"), "example.com", "Z1", &filters).is_none());
    }

    #[test]
    fn empty_override_keeps_defaults() {
        let filters = TypeFilters::default().with_skip_record_types(Vec::<String>::new());
        assert!(normalize(&raw("example.com.", "SOA"), "example.com", "Z1", &filters).is_none());
    }

    #[test]
    fn wildcard_escape_is_decoded() {
        let filters = TypeFilters::default();
        let record = raw("\\052.example.com.", "A");
        let normalized = normalize(&record, "example.com", "Z1", &filters).unwrap();
        assert_eq!(normalized.full_name, "*.example.com");
        assert_eq!(normalized.relative_name, "*");
        assert_eq!(normalized.subdomain, "star");
        assert_eq!(normalized.key_base, "a_star");
    }

    #[test]
    fn txt_values_are_unwrapped_and_unescaped() {
        let filters = TypeFilters::default();
        let mut record = raw("example.com.", "TXT");
        record.resource_records = vec!["\"hello \\\"world\\\"\"".to_string()];
        let normalized = normalize(&record, "example.com", "Z1", &filters).unwrap();
        assert_eq!(
            normalized.values,
            Some(vec!["hello \"world\"".to_string()])
        );
    }

    #[test]
    fn non_txt_values_keep_quotes() {
        let filters = TypeFilters::default();
        let mut record = raw("example.com.", "A");
        record.resource_records = vec!["\"203.0.113.9\"".to_string()];
        let normalized = normalize(&record, "example.com", "Z1", &filters).unwrap();
        assert_eq!(
            normalized.values,
            Some(vec!["\"203.0.113.9\"".to_string()])
        );
    }

    #[test]
    fn percent_signs_are_escaped_in_values() {
        let filters = TypeFilters::default();
        let mut record = raw("promo.example.com.", "TXT");
        record.resource_records = vec!["\"50% off\"".to_string()];
        let normalized = normalize(&record, "example.com", "Z1", &filters).unwrap();
        assert_eq!(normalized.values, Some(vec!["50%% off".to_string()]));
    }

    #[test]
    fn alias_target_is_normalized() {
        let filters = TypeFilters::default();
        let mut record = raw("www.example.com.", "A");
        record.alias_target = Some(AliasTarget {
            dns_name: "\\052.elb.amazonaws.com.".to_string(),
            hosted_zone_id: "Z35SXDOTRQ7X7K".to_string(),
            evaluate_target_health: Some(true),
        });
        let normalized = normalize(&record, "example.com", "Z1", &filters).unwrap();
        let alias = normalized.alias.unwrap();
        assert_eq!(alias.name, "*.elb.amazonaws.com");
        assert_eq!(alias.zone_id, "Z35SXDOTRQ7X7K");
        assert_eq!(alias.evaluate_target_health, Some(true));
        assert_eq!(normalized.values, None);
    }

    #[test]
    fn absent_optional_fields_stay_absent() {
        let filters = TypeFilters::default();
        let normalized =
            normalize(&raw("www.example.com.", "A"), "example.com", "Z1", &filters).unwrap();
        assert_eq!(normalized.ttl, None);
        assert_eq!(normalized.set_identifier, None);
        assert_eq!(normalized.weight, None);
        assert_eq!(normalized.multi_value_answer, None);
        assert_eq!(normalized.geo_location, None);
    }

    #[test]
    fn geo_location_copied_when_present() {
        let filters = TypeFilters::default();
        let mut record = raw("geo.example.com.", "A");
        record.geo_location = Some(GeoLocation {
            continent_code: None,
            country_code: Some("DE".to_string()),
            subdivision_code: None,
        });
        let normalized = normalize(&record, "example.com", "Z1", &filters).unwrap();
        assert_eq!(
            normalized.geo_location.unwrap().country_code,
            Some("DE".to_string())
        );
    }

    #[test]
    fn import_id_joins_zone_name_type() {
        let filters = TypeFilters::default();
        let normalized =
            normalize(&raw("www.example.com.", "a"), "example.com", "Z123", &filters).unwrap();
        assert_eq!(normalized.import_id, "Z123_www.example.com_A");
    }

    #[test]
    fn import_id_appends_set_identifier() {
        let filters = TypeFilters::default();
        let mut record = raw("www.example.com.", "A");
        record.set_identifier = Some("blue".to_string());
        let normalized = normalize(&record, "example.com", "Z123", &filters).unwrap();
        assert_eq!(normalized.import_id, "Z123_www.example.com_A_blue");
    }

    #[test]
    fn import_id_falls_back_to_zone_name_for_empty_record_name() {
        let filters = TypeFilters::default();
        let normalized = normalize(&raw("", "MX"), "example.com", "Z123", &filters).unwrap();
        assert_eq!(normalized.import_id, "Z123_example.com_MX");
    }

    #[test]
    fn import_id_is_reproducible() {
        let filters = TypeFilters::default();
        let record = raw("www.example.com.", "A");
        let first = normalize(&record, "example.com", "Z1", &filters).unwrap();
        let second = normalize(&record, "example.com", "Z1", &filters).unwrap();
        assert_eq!(first.import_id, second.import_id);
    }

    #[test]
    fn apex_record_uses_root_subdomain() {
        let filters = TypeFilters::default();
        let normalized =
            normalize(&raw("example.com.", "MX"), "example.com", "Z1", &filters).unwrap();
        assert_eq!(normalized.relative_name, "");
        assert_eq!(normalized.subdomain, "root");
        assert_eq!(normalized.key_base, "mx_root");
    }
}
