//! Zone configuration
//!
//! Zone metadata mapped into the same ordered-attribute schema as records,
//! with a separate deterministic keying scheme for the VPC associations of
//! private zones.

use crate::hcl::{Body, Value};
use crate::names::sanitize_identifier;

/// One VPC association of a private zone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZoneVpc {
    pub vpc_id: String,
    pub vpc_region: Option<String>,
}

/// Zone metadata as delivered by the zone source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZoneDetails {
    pub id: String,
    /// Zone FQDN with the trailing dot stripped.
    pub name: String,
    pub private_zone: bool,
    pub comment: String,
    pub tags: Vec<(String, String)>,
    pub vpcs: Vec<ZoneVpc>,
    /// Set when the best-effort tag lookup failed and `tags` degraded to
    /// empty. The shell surfaces this as a warning.
    pub tag_lookup_failed: bool,
}

impl ZoneDetails {
    /// Key addressing this zone in the zones map. Private zones share a DNS
    /// name space with public ones, so they get a `_private` suffix.
    pub fn zone_key(&self) -> String {
        if self.private_zone {
            format!("{}_private", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Filename fragment for this zone's record file.
    pub fn file_stem(&self) -> String {
        let stem = self.name.replace('.', "-");
        if self.private_zone {
            format!("{stem}-private")
        } else {
            stem
        }
    }

    /// Local-variable name holding this zone's record map.
    pub fn records_local_var(&self) -> String {
        sanitize_identifier(&format!("zone_records_{}", self.zone_key()))
    }
}

/// Build the VPC sub-map: sorted by `(region, vpc_id)`, keyed by a sanitized
/// identifier derived from both, `vpc_NN` as the last-resort key.
fn build_vpc_map(vpcs: &[ZoneVpc]) -> Body {
    let mut sorted: Vec<&ZoneVpc> = vpcs.iter().collect();
    sorted.sort_by_key(|vpc| (vpc.vpc_region.clone().unwrap_or_default(), vpc.vpc_id.clone()));

    let mut map = Body::new();
    for (index, vpc) in sorted.into_iter().enumerate() {
        let region = vpc.vpc_region.as_deref().unwrap_or("unknown");
        let mut identifier = sanitize_identifier(&format!("{}_{}", region, vpc.vpc_id));
        if identifier.is_empty() {
            identifier = format!("vpc_{:02}", index + 1);
        }

        let mut block = Body::new();
        if !vpc.vpc_id.is_empty() {
            block.push("vpc_id", Value::string(&vpc.vpc_id));
        }
        if let Some(region) = &vpc.vpc_region {
            if !region.is_empty() {
                block.push("vpc_region", Value::string(region));
            }
        }
        map.push(identifier, Value::Map(block));
    }
    map
}

/// Build one zone's ordered attribute body.
///
/// `vpcs` appears only for private zones with at least one association;
/// `tags` is always present (empty map when none, or when tag export is
/// disabled) so the schema shape is stable across zones.
pub fn build_zone_configuration(details: &ZoneDetails, include_tags: bool) -> Body {
    let mut attributes = Body::new();
    attributes.push("name", Value::string(&details.name));
    attributes.push("comment", Value::string(&details.comment));
    attributes.push("private_zone", Value::Bool(details.private_zone));

    if details.private_zone && !details.vpcs.is_empty() {
        attributes.push("vpcs", Value::Map(build_vpc_map(&details.vpcs)));
    }

    let mut tags: Vec<(String, String)> = if include_tags {
        details.tags.clone()
    } else {
        Vec::new()
    };
    tags.sort();
    attributes.push(
        "tags",
        Value::Map(
            tags.into_iter()
                .map(|(name, value)| (name, Value::String(value)))
                .collect(),
        ),
    );

    attributes
}
