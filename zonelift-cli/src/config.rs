//! Configuration loading
//!
//! Resolves the JSON configuration file and CLI overrides into one options
//! structure. Everything here runs before any network access so
//! configuration mistakes fail fast with exit code 1.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde_json::Value as Json;

use zonelift_core::keys::{HostnameFilters, compile_patterns};
use zonelift_core::normalize::TypeFilters;

pub const DEFAULT_CONFIG_PATH: &str = "config-route53.json";

/// What to export: record locals, zone configuration, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    Records,
    Zones,
    Both,
}

impl ExportTarget {
    pub fn records_enabled(self) -> bool {
        matches!(self, Self::Records | Self::Both)
    }

    pub fn zones_enabled(self) -> bool {
        matches!(self, Self::Zones | Self::Both)
    }

    fn parse(value: &str) -> Result<Self> {
        match value {
            "records" => Ok(Self::Records),
            "zones" => Ok(Self::Zones),
            "both" => Ok(Self::Both),
            other => bail!("invalid export_target {other:?}; expected records, zones or both"),
        }
    }
}

/// Fully resolved run options.
#[derive(Debug)]
pub struct Options {
    pub zone_ids: Vec<String>,
    pub output_dir: PathBuf,
    pub locals_file: PathBuf,
    pub imports_file: PathBuf,
    pub zones_file: PathBuf,
    pub single_zone: bool,
    pub single_zone_records_file: PathBuf,
    pub profile: Option<String>,
    pub skip_hostnames: Vec<String>,
    pub only_hostnames: Vec<String>,
    pub export_target: ExportTarget,
    pub skip_zone_tags: bool,
    pub type_filters: TypeFilters,
}

impl Options {
    fn validate(&self, config_path: &Path) -> Result<()> {
        if self.zone_ids.is_empty() {
            bail!(
                "no zone IDs supplied; add zone_ids entries to {}",
                config_path.display()
            );
        }
        if self.single_zone && self.zone_ids.len() != 1 {
            bail!("single-zone mode requires exactly one hosted zone ID");
        }
        if self.single_zone && self.export_target == ExportTarget::Zones {
            bail!("zones-only export is not supported in single-zone mode");
        }
        Ok(())
    }
}

/// Load the configuration file and apply CLI overrides.
///
/// Config keys are normalized (leading `--` stripped, dashes to
/// underscores) and a nested `arguments` object is merged flat, so the file
/// can mirror command-line spelling. The two CLI flags win over their
/// config counterparts.
pub fn load(
    path: &Path,
    only_hostnames_override: Option<&str>,
    export_target_override: Option<ExportTarget>,
) -> Result<Options> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let data: Json = serde_json::from_str(&raw)
        .with_context(|| format!("invalid JSON in config file {}", path.display()))?;
    let Json::Object(object) = data else {
        bail!("config file {} must define a JSON object", path.display());
    };

    let mut normalized: HashMap<String, Json> = HashMap::new();
    for (key, value) in object {
        let key = normalize_config_key(&key);
        if key == "arguments" && value.is_object() {
            if let Json::Object(nested) = value {
                for (nested_key, nested_value) in nested {
                    normalized.insert(normalize_config_key(&nested_key), nested_value);
                }
            }
        } else {
            normalized.insert(key, value);
        }
    }

    let type_filters = TypeFilters::default()
        .with_skip_record_types(coerce_string_list(normalized.get("skip_record_types")))
        .with_skippable_import_types(coerce_string_list(
            normalized.get("skippable_import_types"),
        ));

    let only_hostnames = match only_hostnames_override {
        Some(raw) => split_expressions(&[raw.to_string()]),
        None => split_expressions(&coerce_string_list(normalized.get("only_hostnames"))),
    };
    let export_target = match export_target_override {
        Some(target) => target,
        None => match normalized.get("export_target").and_then(Json::as_str) {
            Some(value) => ExportTarget::parse(value)?,
            None => ExportTarget::Both,
        },
    };

    let options = Options {
        zone_ids: parse_zone_ids(&coerce_string_list(normalized.get("zone_ids"))),
        output_dir: path_value(&normalized, "output_dir", "."),
        locals_file: path_value(&normalized, "locals_file", "locals.tf"),
        imports_file: path_value(&normalized, "imports_file", "imports.tf"),
        zones_file: path_value(&normalized, "zones_file", "config-zones.tf"),
        single_zone: bool_value(&normalized, "single_zone", false),
        single_zone_records_file: path_value(
            &normalized,
            "single_zone_records_file",
            "config-records.tf",
        ),
        profile: normalized
            .get("profile")
            .and_then(Json::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        skip_hostnames: split_expressions(&coerce_string_list(normalized.get("skip_hostnames"))),
        only_hostnames,
        export_target,
        skip_zone_tags: bool_value(&normalized, "skip_zone_tags", false),
        type_filters,
    };

    options.validate(path)?;
    Ok(options)
}

/// Compile the hostname filter expressions into case-insensitive regexes.
pub fn hostname_filters(options: &Options) -> Result<HostnameFilters> {
    let exclude =
        compile_patterns(&options.skip_hostnames).context("invalid skip_hostnames pattern")?;
    let include =
        compile_patterns(&options.only_hostnames).context("invalid only_hostnames pattern")?;
    Ok(HostnameFilters::new(exclude, include))
}

fn normalize_config_key(key: &str) -> String {
    let trimmed = key.trim();
    let stripped = trimmed.strip_prefix("--").unwrap_or(trimmed);
    stripped.replace('-', "_")
}

/// Accept either a comma-separated string or a list of scalars.
fn coerce_string_list(value: Option<&Json>) -> Vec<String> {
    match value {
        None | Some(Json::Null) => Vec::new(),
        Some(Json::String(raw)) => raw
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from)
            .collect(),
        Some(Json::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Json::Null => None,
                Json::String(s) => {
                    let trimmed = s.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                }
                other => Some(other.to_string()),
            })
            .collect(),
        Some(other) => vec![other.to_string()],
    }
}

fn parse_zone_ids(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().trim_matches('"'))
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

fn split_expressions(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

fn path_value(normalized: &HashMap<String, Json>, key: &str, default: &str) -> PathBuf {
    normalized
        .get(key)
        .and_then(Json::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn bool_value(normalized: &HashMap<String, Json>, key: &str, default: bool) -> bool {
    normalized
        .get(key)
        .and_then(Json::as_bool)
        .unwrap_or(default)
}
