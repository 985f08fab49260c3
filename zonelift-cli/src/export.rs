//! Export orchestration
//!
//! Drives fetch -> normalize -> key -> project -> render for each configured
//! zone and performs all file I/O. A zone that fails to fetch or write is
//! reported and skipped; the aggregate locals, zones and imports files are
//! still written afterwards so partial progress stays visible.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use zonelift_core::attributes;
use zonelift_core::hcl::{self, Body};
use zonelift_core::imports::{self, ZoneImportEntry};
use zonelift_core::keys::{self, HostnameFilters, ImportEntry, KeyedRecord};
use zonelift_core::markers;
use zonelift_core::normalize::{self, TypeFilters};
use zonelift_core::source::RecordSource;
use zonelift_core::zone::{self, ZoneDetails};

use crate::config::Options;

/// Outcome of one run: how many of the configured zones exported cleanly.
pub struct ExportReport {
    pub exported: usize,
    pub total: usize,
}

impl ExportReport {
    pub fn is_partial(&self) -> bool {
        self.exported != self.total
    }
}

pub async fn run(
    options: &Options,
    hostnames: &HostnameFilters,
    source: &dyn RecordSource,
) -> Result<ExportReport> {
    if options.single_zone {
        run_single_zone(options, hostnames, source).await
    } else {
        run_multi_zone(options, hostnames, source).await
    }
}

async fn run_multi_zone(
    options: &Options,
    hostnames: &HostnameFilters,
    source: &dyn RecordSource,
) -> Result<ExportReport> {
    let records_enabled = options.export_target.records_enabled();
    let zone_export_enabled = options.export_target.zones_enabled();
    let include_zone_tags = zone_export_enabled && !options.skip_zone_tags;

    if records_enabled {
        fs::create_dir_all(&options.output_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                options.output_dir.display()
            )
        })?;
    }

    let mut local_vars: Vec<String> = Vec::new();
    let mut record_imports: Vec<ImportEntry> = Vec::new();
    let mut zone_imports: Vec<ZoneImportEntry> = Vec::new();
    let mut zone_configs: Vec<(String, Body)> = Vec::new();
    let mut exported = 0;

    for zone_id in &options.zone_ids {
        let outcome = export_zone(
            options,
            hostnames,
            source,
            zone_id,
            records_enabled,
            zone_export_enabled,
            include_zone_tags,
        )
        .await;
        match outcome {
            Ok(outcome) => {
                local_vars.extend(outcome.local_var);
                record_imports.extend(outcome.import_entries);
                zone_imports.extend(outcome.zone_import);
                zone_configs.extend(outcome.zone_config);
                if !outcome.messages.is_empty() {
                    exported += 1;
                    println!("Exported {zone_id}: {}", outcome.messages.join(", "));
                }
            }
            Err(e) => {
                eprintln!(
                    "{} failed to export {zone_id}: {e:#}",
                    "Error:".red().bold()
                );
            }
        }
    }

    if records_enabled {
        local_vars.sort();
        local_vars.dedup();
        let block = markers::locals_block(&local_vars);
        update_marked_file(
            &options.locals_file,
            markers::RECORDS_BEGIN_MARKER,
            markers::RECORDS_END_MARKER,
            &block,
        )
        .with_context(|| {
            format!(
                "failed to update locals file {}",
                options.locals_file.display()
            )
        })?;
        println!(
            "Updated {} with generated zone record locals",
            options.locals_file.display()
        );
    }

    if zone_export_enabled {
        zone_imports.sort();
        zone_imports.dedup();
        if zone_configs.is_empty() {
            eprintln!("No zone configurations were generated; skipping zones file update.");
        } else {
            zone_configs.sort_by(|a, b| a.0.cmp(&b.0));
            write_file(&options.zones_file, &hcl::render_zones_file(&zone_configs))
                .with_context(|| {
                    format!("failed to write zones file {}", options.zones_file.display())
                })?;
            println!("Wrote zone configuration to {}", options.zones_file.display());
        }
    }

    record_imports.sort();
    record_imports.dedup();
    let imports_text = imports::render_imports(&record_imports, &zone_imports, false, None);
    write_file(&options.imports_file, &imports_text).with_context(|| {
        format!(
            "failed to write imports file {}",
            options.imports_file.display()
        )
    })?;
    println!("Wrote import statements to {}", options.imports_file.display());

    Ok(ExportReport {
        exported,
        total: options.zone_ids.len(),
    })
}

async fn run_single_zone(
    options: &Options,
    hostnames: &HostnameFilters,
    source: &dyn RecordSource,
) -> Result<ExportReport> {
    let zone_id = &options.zone_ids[0];
    let mut record_imports: Vec<ImportEntry> = Vec::new();
    let mut zone_resource_id = None;
    let mut exported = 0;

    if options.export_target.records_enabled() {
        match export_single_zone_records(options, hostnames, source, zone_id).await {
            Ok(entries) => {
                record_imports = entries;
                zone_resource_id = Some(zone_id.as_str());
                exported = 1;
                println!(
                    "Exported {zone_id} -> {}",
                    options.single_zone_records_file.display()
                );
            }
            Err(e) => {
                eprintln!(
                    "{} failed to export {zone_id}: {e:#}",
                    "Error:".red().bold()
                );
            }
        }
    }

    if options.export_target.zones_enabled() {
        eprintln!("Zone export is not supported in single-zone mode; skipping zone output.");
    }

    record_imports.sort();
    record_imports.dedup();
    let imports_text = imports::render_imports(&record_imports, &[], true, zone_resource_id);
    write_file(&options.imports_file, &imports_text).with_context(|| {
        format!(
            "failed to write imports file {}",
            options.imports_file.display()
        )
    })?;
    println!("Wrote import statements to {}", options.imports_file.display());

    Ok(ExportReport {
        exported,
        total: options.zone_ids.len(),
    })
}

struct ZoneOutcome {
    local_var: Option<String>,
    import_entries: Vec<ImportEntry>,
    zone_import: Option<ZoneImportEntry>,
    zone_config: Option<(String, Body)>,
    messages: Vec<String>,
}

async fn export_zone(
    options: &Options,
    hostnames: &HostnameFilters,
    source: &dyn RecordSource,
    zone_id: &str,
    records_enabled: bool,
    zone_export_enabled: bool,
    include_zone_tags: bool,
) -> Result<ZoneOutcome> {
    let details = source.zone_details(zone_id, include_zone_tags).await?;
    if details.tag_lookup_failed {
        eprintln!(
            "{} tag lookup failed for {zone_id}; exporting empty tags",
            "Warning:".yellow().bold()
        );
    }

    let zone_key = details.zone_key();
    let mut outcome = ZoneOutcome {
        local_var: None,
        import_entries: Vec::new(),
        zone_import: None,
        zone_config: None,
        messages: Vec::new(),
    };

    if records_enabled {
        let keyed =
            collect_zone_records(source, zone_id, &details, hostnames, &options.type_filters)
                .await?;
        let bodies = record_bodies(&keyed);
        let local_var = details.records_local_var();
        let path = options
            .output_dir
            .join(format!("route53-records-{}.tf", details.file_stem()));
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove stale {}", path.display()))?;
        }
        write_file(&path, &hcl::render_zone_file(&local_var, &zone_key, &bodies))?;
        outcome.import_entries = keys::import_entries(&zone_key, &keyed);
        outcome.local_var = Some(local_var);
        outcome.messages.push(format!("records -> {}", path.display()));
    }

    if zone_export_enabled {
        outcome.zone_import = Some(ZoneImportEntry {
            zone_key: zone_key.clone(),
            zone_id: zone_id.to_string(),
        });
        outcome.zone_config = Some((
            zone_key,
            zone::build_zone_configuration(&details, !options.skip_zone_tags),
        ));
        outcome.messages.push("zone config prepared".to_string());
    }

    Ok(outcome)
}

async fn export_single_zone_records(
    options: &Options,
    hostnames: &HostnameFilters,
    source: &dyn RecordSource,
    zone_id: &str,
) -> Result<Vec<ImportEntry>> {
    let details = source.zone_details(zone_id, false).await?;
    let keyed =
        collect_zone_records(source, zone_id, &details, hostnames, &options.type_filters).await?;
    let bodies = record_bodies(&keyed);

    write_file(
        &options.single_zone_records_file,
        &hcl::render_single_zone_records("zone_records", &bodies),
    )?;
    update_marked_file(
        &options.locals_file,
        markers::PRIMARY_ZONE_BEGIN_MARKER,
        markers::PRIMARY_ZONE_END_MARKER,
        &markers::single_zone_locals_block(&details.name),
    )?;

    Ok(keys::import_entries(&details.zone_key(), &keyed))
}

async fn collect_zone_records(
    source: &dyn RecordSource,
    zone_id: &str,
    details: &ZoneDetails,
    hostnames: &HostnameFilters,
    types: &TypeFilters,
) -> Result<Vec<KeyedRecord>> {
    let raw = source.list_record_sets(zone_id).await?;
    let normalized = raw
        .iter()
        .filter_map(|record| normalize::normalize(record, &details.name, zone_id, types))
        .collect();
    Ok(keys::assign_keys(normalized, hostnames, types))
}

fn record_bodies(records: &[KeyedRecord]) -> Vec<(String, Body)> {
    records
        .iter()
        .map(|keyed| (keyed.key.clone(), attributes::project(&keyed.record)))
        .collect()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

fn update_marked_file(path: &Path, begin: &str, end: &str, block: &str) -> Result<()> {
    let original = if path.exists() {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        String::new()
    };
    write_file(
        path,
        &markers::replace_marked_section(&original, begin, end, block),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tempfile::tempdir;

    use crate::config::ExportTarget;
    use zonelift_core::record::RecordSet;
    use zonelift_core::source::{SourceError, SourceResult};

    struct StaticSource {
        zones: HashMap<String, (ZoneDetails, Vec<RecordSet>)>,
    }

    #[async_trait]
    impl RecordSource for StaticSource {
        async fn list_record_sets(&self, zone_id: &str) -> SourceResult<Vec<RecordSet>> {
            self.zones
                .get(zone_id)
                .map(|(_, records)| records.clone())
                .ok_or_else(|| SourceError::Api(format!("no such zone {zone_id}")))
        }

        async fn zone_details(
            &self,
            zone_id: &str,
            _include_tags: bool,
        ) -> SourceResult<ZoneDetails> {
            self.zones
                .get(zone_id)
                .map(|(details, _)| details.clone())
                .ok_or_else(|| SourceError::Api(format!("no such zone {zone_id}")))
        }
    }

    fn example_zone(zone_id: &str, name: &str) -> (ZoneDetails, Vec<RecordSet>) {
        let details = ZoneDetails {
            id: zone_id.to_string(),
            name: name.to_string(),
            comment: "managed".to_string(),
            ..ZoneDetails::default()
        };
        let records = vec![
            RecordSet {
                name: format!("www.{name}."),
                record_type: "A".to_string(),
                ttl: Some(300),
                resource_records: vec!["203.0.113.9".to_string()],
                ..RecordSet::default()
            },
            RecordSet {
                name: format!("{name}."),
                record_type: "NS".to_string(),
                resource_records: vec!["ns-1.awsdns.example.".to_string()],
                ..RecordSet::default()
            },
        ];
        (details, records)
    }

    fn test_options(dir: &Path, zone_ids: Vec<String>) -> Options {
        Options {
            zone_ids,
            output_dir: dir.join("zones"),
            locals_file: dir.join("locals.tf"),
            imports_file: dir.join("imports.tf"),
            zones_file: dir.join("config-zones.tf"),
            single_zone: false,
            single_zone_records_file: dir.join("config-records.tf"),
            profile: None,
            skip_hostnames: Vec::new(),
            only_hostnames: Vec::new(),
            export_target: ExportTarget::Both,
            skip_zone_tags: false,
            type_filters: TypeFilters::default(),
        }
    }

    fn source_with(zones: &[(&str, &str)]) -> StaticSource {
        StaticSource {
            zones: zones
                .iter()
                .map(|(zone_id, name)| (zone_id.to_string(), example_zone(zone_id, name)))
                .collect(),
        }
    }

    #[tokio::test]
    async fn multi_zone_run_writes_all_artifacts() {
        let dir = tempdir().unwrap();
        let options = test_options(dir.path(), vec!["Z1".to_string()]);
        let source = source_with(&[("Z1", "example.com")]);

        let report = run(&options, &HostnameFilters::default(), &source)
            .await
            .unwrap();
        assert!(!report.is_partial());

        let records = fs::read_to_string(
            options.output_dir.join("route53-records-example-com.tf"),
        )
        .unwrap();
        assert!(records.contains("zone_records_example_com = {"));
        assert!(records.contains("a_www = {"));
        assert!(!records.contains("ns_root"));

        let locals = fs::read_to_string(&options.locals_file).unwrap();
        assert!(locals.contains(markers::RECORDS_BEGIN_MARKER));
        assert!(locals.contains("local.zone_records_example_com"));

        let zones = fs::read_to_string(&options.zones_file).unwrap();
        assert!(zones.contains("\"example.com\" = {"));

        let imports = fs::read_to_string(&options.imports_file).unwrap();
        assert!(imports.contains("module.zones[\"example.com\"].aws_route53_zone.this[0]"));
        assert!(imports.contains("id = \"Z1_www.example.com_A\""));
    }

    #[tokio::test]
    async fn rerun_produces_byte_identical_files() {
        let dir = tempdir().unwrap();
        let options = test_options(dir.path(), vec!["Z1".to_string()]);
        let source = source_with(&[("Z1", "example.com")]);

        run(&options, &HostnameFilters::default(), &source)
            .await
            .unwrap();
        let first: Vec<String> = [
            options.output_dir.join("route53-records-example-com.tf"),
            options.locals_file.clone(),
            options.zones_file.clone(),
            options.imports_file.clone(),
        ]
        .iter()
        .map(|path| fs::read_to_string(path).unwrap())
        .collect();

        run(&options, &HostnameFilters::default(), &source)
            .await
            .unwrap();
        let second: Vec<String> = [
            options.output_dir.join("route53-records-example-com.tf"),
            options.locals_file.clone(),
            options.zones_file.clone(),
            options.imports_file.clone(),
        ]
        .iter()
        .map(|path| fs::read_to_string(path).unwrap())
        .collect();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn failing_zone_is_isolated() {
        let dir = tempdir().unwrap();
        let options = test_options(dir.path(), vec!["Z1".to_string(), "MISSING".to_string()]);
        let source = source_with(&[("Z1", "example.com")]);

        let report = run(&options, &HostnameFilters::default(), &source)
            .await
            .unwrap();
        assert!(report.is_partial());
        assert_eq!(report.exported, 1);
        assert_eq!(report.total, 2);
        assert!(options
            .output_dir
            .join("route53-records-example-com.tf")
            .exists());
    }

    #[tokio::test]
    async fn locals_update_preserves_hand_written_content() {
        let dir = tempdir().unwrap();
        let options = test_options(dir.path(), vec!["Z1".to_string()]);
        fs::write(&options.locals_file, "locals {\n  owner = \"dns-team\"\n}\n").unwrap();
        let source = source_with(&[("Z1", "example.com")]);

        run(&options, &HostnameFilters::default(), &source)
            .await
            .unwrap();
        let locals = fs::read_to_string(&options.locals_file).unwrap();
        assert!(locals.starts_with("locals {\n  owner = \"dns-team\"\n}\n\n"));

        run(&options, &HostnameFilters::default(), &source)
            .await
            .unwrap();
        assert_eq!(locals, fs::read_to_string(&options.locals_file).unwrap());
    }

    #[tokio::test]
    async fn single_zone_mode_writes_shared_records_file() {
        let dir = tempdir().unwrap();
        let mut options = test_options(dir.path(), vec!["Z1".to_string()]);
        options.single_zone = true;
        options.export_target = ExportTarget::Records;
        let source = source_with(&[("Z1", "example.com")]);

        let report = run(&options, &HostnameFilters::default(), &source)
            .await
            .unwrap();
        assert!(!report.is_partial());

        let records = fs::read_to_string(&options.single_zone_records_file).unwrap();
        assert!(records.contains("  zone_records = {"));
        assert!(records.contains("    a_www = {"));

        let locals = fs::read_to_string(&options.locals_file).unwrap();
        assert!(locals.contains(markers::PRIMARY_ZONE_BEGIN_MARKER));
        assert!(locals.contains("comment = \"Primary example.com zone\""));

        let imports = fs::read_to_string(&options.imports_file).unwrap();
        assert!(imports.contains("module.zone.aws_route53_zone.this[0]"));
        assert!(imports.contains("module.zone.aws_route53_record.this[\"a_www\"]"));
    }

    #[tokio::test]
    async fn records_only_target_skips_zone_artifacts() {
        let dir = tempdir().unwrap();
        let mut options = test_options(dir.path(), vec!["Z1".to_string()]);
        options.export_target = ExportTarget::Records;
        let source = source_with(&[("Z1", "example.com")]);

        run(&options, &HostnameFilters::default(), &source)
            .await
            .unwrap();
        assert!(!options.zones_file.exists());
        let imports = fs::read_to_string(&options.imports_file).unwrap();
        assert!(!imports.contains("aws_route53_zone"));
    }
}
