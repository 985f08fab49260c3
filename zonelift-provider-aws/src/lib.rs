//! Zonelift AWS Provider
//!
//! Route53 implementation of the zone record source capability: paginated
//! record-set listing, hosted-zone metadata lookup and best-effort tag
//! lookup, mapped into the provider-agnostic core model.

use async_trait::async_trait;
use aws_sdk_route53::Client;
use aws_sdk_route53::error::DisplayErrorContext;
use aws_sdk_route53::types::{self, TagResourceType};
use log::warn;

use zonelift_core::record::{AliasTarget, GeoLocation, RecordSet};
use zonelift_core::source::{RecordSource, SourceError, SourceResult};
use zonelift_core::zone::{ZoneDetails, ZoneVpc};

/// Route53-backed record source.
pub struct Route53Source {
    client: Client,
}

impl Route53Source {
    /// Create a source from the default AWS config chain, optionally pinned
    /// to a named profile.
    pub async fn new(profile: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;
        Self {
            client: Client::new(&config),
        }
    }

    /// Create a source with a specific client (for testing).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordSource for Route53Source {
    async fn list_record_sets(&self, zone_id: &str) -> SourceResult<Vec<RecordSet>> {
        let mut pages = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(zone_id)
            .into_paginator()
            .send();

        let mut records = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                SourceError::Api(format!(
                    "failed to list record sets for {zone_id}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;
            for record_set in page.resource_record_sets() {
                records.push(map_record_set(record_set));
            }
        }
        Ok(records)
    }

    async fn zone_details(&self, zone_id: &str, include_tags: bool) -> SourceResult<ZoneDetails> {
        let response = self
            .client
            .get_hosted_zone()
            .id(zone_id)
            .send()
            .await
            .map_err(|e| {
                SourceError::Api(format!(
                    "failed to look up hosted zone {zone_id}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let hosted_zone = response.hosted_zone().ok_or_else(|| {
            SourceError::MalformedZone(format!("hosted zone {zone_id} missing from response"))
        })?;

        let raw_name = hosted_zone.name();
        let name = if raw_name.is_empty() { zone_id } else { raw_name }
            .trim_end_matches('.')
            .to_string();
        let config = hosted_zone.config();
        let private_zone = config.map(|c| c.private_zone()).unwrap_or(false);
        let comment = config
            .and_then(|c| c.comment())
            .unwrap_or_default()
            .to_string();

        let vpcs = response
            .vpcs()
            .iter()
            .filter_map(|vpc| {
                let vpc_id = vpc.vpc_id()?;
                Some(ZoneVpc {
                    vpc_id: vpc_id.to_string(),
                    vpc_region: vpc.vpc_region().map(|region| region.as_str().to_string()),
                })
            })
            .collect();

        let mut tags = Vec::new();
        let mut tag_lookup_failed = false;
        if include_tags {
            match self
                .client
                .list_tags_for_resource()
                .resource_type(TagResourceType::Hostedzone)
                .resource_id(zone_id)
                .send()
                .await
            {
                Ok(tag_response) => {
                    if let Some(tag_set) = tag_response.resource_tag_set() {
                        for tag in tag_set.tags() {
                            match tag.key() {
                                Some(key) if !key.is_empty() => {
                                    tags.push((
                                        key.to_string(),
                                        tag.value().unwrap_or_default().to_string(),
                                    ));
                                }
                                _ => {}
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "tag lookup for zone {zone_id} failed, exporting empty tags: {}",
                        DisplayErrorContext(&e)
                    );
                    tag_lookup_failed = true;
                }
            }
        }

        Ok(ZoneDetails {
            id: zone_id.to_string(),
            name,
            private_zone,
            comment,
            tags,
            vpcs,
            tag_lookup_failed,
        })
    }
}

/// Map one SDK record set into the core raw model.
fn map_record_set(record: &types::ResourceRecordSet) -> RecordSet {
    RecordSet {
        name: record.name().to_string(),
        record_type: record.r#type().as_str().to_string(),
        ttl: record.ttl(),
        resource_records: record
            .resource_records()
            .iter()
            .map(|entry| entry.value().to_string())
            .collect(),
        alias_target: record.alias_target().map(|target| AliasTarget {
            dns_name: target.dns_name().to_string(),
            hosted_zone_id: target.hosted_zone_id().to_string(),
            evaluate_target_health: Some(target.evaluate_target_health()),
        }),
        geo_location: record.geo_location().map(|geo| GeoLocation {
            continent_code: geo.continent_code().map(String::from),
            country_code: geo.country_code().map(String::from),
            subdivision_code: geo.subdivision_code().map(String::from),
        }),
        set_identifier: record.set_identifier().map(String::from),
        health_check_id: record.health_check_id().map(String::from),
        failover: record.failover().map(|failover| failover.as_str().to_string()),
        traffic_policy_instance_id: record.traffic_policy_instance_id().map(String::from),
        multi_value_answer: record.multi_value_answer(),
        region: record.region().map(|region| region.as_str().to_string()),
        weight: record.weight(),
    }
}
