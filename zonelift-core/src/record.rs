//! Record model
//!
//! [`RecordSet`] is the provider-agnostic raw input: one DNS record set as
//! delivered by the zone source, before any cleanup. [`NormalizedRecord`] is
//! the canonical form the rest of the pipeline operates on. Optional fields
//! stay `None` when the provider did not send them so downstream rendering
//! can omit the attribute entirely instead of emitting a placeholder.

/// Raw alias target as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AliasTarget {
    pub dns_name: String,
    pub hosted_zone_id: String,
    pub evaluate_target_health: Option<bool>,
}

/// Geolocation routing fields. Used unchanged on both the raw and the
/// normalized side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoLocation {
    pub continent_code: Option<String>,
    pub country_code: Option<String>,
    pub subdivision_code: Option<String>,
}

/// One raw record set from the zone source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    /// Record name, usually a FQDN with trailing dot and provider escape
    /// sequences intact.
    pub name: String,
    /// DNS record type in whatever case the provider uses.
    pub record_type: String,
    pub ttl: Option<i64>,
    /// Literal record values. Empty for alias records.
    pub resource_records: Vec<String>,
    pub alias_target: Option<AliasTarget>,
    pub geo_location: Option<GeoLocation>,
    pub set_identifier: Option<String>,
    pub health_check_id: Option<String>,
    pub failover: Option<String>,
    pub traffic_policy_instance_id: Option<String>,
    pub multi_value_answer: Option<bool>,
    pub region: Option<String>,
    pub weight: Option<i64>,
}

/// Normalized alias attributes: target name with trailing dot stripped and
/// wildcard restored.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasAttributes {
    pub name: String,
    pub zone_id: String,
    pub evaluate_target_health: Option<bool>,
}

/// Canonical record produced by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Key stem shared by records at the same name and type; not yet unique.
    pub key_base: String,
    /// Name relative to the zone, empty at the apex.
    pub relative_name: String,
    /// Sanitized identifier form of the relative name.
    pub subdomain: String,
    /// FQDN with the wildcard escape decoded and trailing dot stripped.
    pub full_name: String,
    /// Uppercased DNS type.
    pub record_type: String,
    pub values: Option<Vec<String>>,
    pub alias: Option<AliasAttributes>,
    pub geo_location: Option<GeoLocation>,
    pub ttl: Option<i64>,
    pub set_identifier: Option<String>,
    pub health_check_id: Option<String>,
    pub failover: Option<String>,
    pub traffic_policy_instance_id: Option<String>,
    pub multi_value_answer: Option<bool>,
    pub region: Option<String>,
    pub weight: Option<i64>,
    /// Identifier accepted by the provider's import mechanism for this exact
    /// record.
    pub import_id: String,
}
