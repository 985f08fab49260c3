//! Attribute projection
//!
//! Maps a canonical record into the ordered attribute body consumed by the
//! zone module's `aws_route53_record` schema. Field order is fixed, renames
//! (`multi_value_answer` -> `multivalue_answer`, geolocation key shortening)
//! happen here, and absent source fields are omitted outright.

use crate::hcl::{Body, Value};
use crate::record::NormalizedRecord;

/// Project one normalized record into its ordered attribute body.
pub fn project(record: &NormalizedRecord) -> Body {
    let mut attributes = Body::new();

    attributes.push("full_name", Value::string(&record.full_name));
    attributes.push("type", Value::string(&record.record_type));

    if let Some(ttl) = record.ttl {
        attributes.push("ttl", Value::Int(ttl));
    }

    if let Some(values) = &record.values {
        if !values.is_empty() {
            attributes.push(
                "records",
                Value::List(values.iter().map(Value::string).collect()),
            );
        }
    }

    if let Some(alias) = &record.alias {
        let mut alias_attributes = Body::new();
        if !alias.name.is_empty() {
            alias_attributes.push("name", Value::string(&alias.name));
        }
        if !alias.zone_id.is_empty() {
            alias_attributes.push("zone_id", Value::string(&alias.zone_id));
        }
        if let Some(evaluate) = alias.evaluate_target_health {
            alias_attributes.push("evaluate_target_health", Value::Bool(evaluate));
        }
        attributes.push("alias", Value::Map(alias_attributes));
    }

    if let Some(set_identifier) = &record.set_identifier {
        attributes.push("set_identifier", Value::string(set_identifier));
    }
    if let Some(health_check_id) = &record.health_check_id {
        attributes.push("health_check_id", Value::string(health_check_id));
    }
    if let Some(failover) = &record.failover {
        attributes.push("failover", Value::string(failover));
    }
    if let Some(instance_id) = &record.traffic_policy_instance_id {
        attributes.push("traffic_policy_instance_id", Value::string(instance_id));
    }

    if let Some(multi_value_answer) = record.multi_value_answer {
        attributes.push("multivalue_answer", Value::Bool(multi_value_answer));
    }

    if let Some(region) = &record.region {
        if !region.is_empty() {
            let mut policy = Body::new();
            policy.push("region", Value::string(region));
            attributes.push("latency_routing_policy", Value::Map(policy));
        }
    }

    if let Some(weight) = record.weight {
        let mut policy = Body::new();
        policy.push("weight", Value::Int(weight));
        attributes.push("weighted_routing_policy", Value::Map(policy));
    }

    if let Some(geo) = &record.geo_location {
        let mut policy = Body::new();
        let renames = [
            ("continent", &geo.continent_code),
            ("country", &geo.country_code),
            ("subdivision", &geo.subdivision_code),
        ];
        for (target_key, value) in renames {
            if let Some(value) = value {
                if !value.is_empty() {
                    policy.push(target_key, Value::string(value));
                }
            }
        }
        if !policy.is_empty() {
            attributes.push("geolocation_routing_policy", Value::Map(policy));
        }
    }

    attributes
}
