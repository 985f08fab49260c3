//! Import directive rendering
//!
//! Emits Terraform `import` blocks adopting existing zones and records into
//! the zone module's resource addresses. Zones come before records; within
//! each group entries are sorted so reruns produce identical text.

use crate::hcl::quote_string;
use crate::keys::ImportEntry;

/// Addressing tuple for one zone import directive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZoneImportEntry {
    pub zone_key: String,
    pub zone_id: String,
}

/// Render the imports file. Empty input yields an empty string.
///
/// In single-zone mode record addresses target `module.zone` directly and
/// `zone_resource_id`, when set, adds an import for the zone resource
/// itself. Multi-zone addresses go through `module.zones["<zone_key>"]`.
pub fn render_imports(
    record_entries: &[ImportEntry],
    zone_entries: &[ZoneImportEntry],
    single_zone: bool,
    zone_resource_id: Option<&str>,
) -> String {
    let mut record_entries: Vec<&ImportEntry> = record_entries.iter().collect();
    record_entries.sort_by(|a, b| {
        (&a.zone_key, &a.record_key).cmp(&(&b.zone_key, &b.record_key))
    });
    let mut zone_entries: Vec<&ZoneImportEntry> = zone_entries.iter().collect();
    zone_entries.sort_by(|a, b| a.zone_key.cmp(&b.zone_key));

    let mut lines: Vec<String> = Vec::new();

    if let Some(zone_id) = zone_resource_id {
        lines.extend([
            "import {".to_string(),
            "  to = module.zone.aws_route53_zone.this[0]".to_string(),
            format!("  id = {}", quote_string(zone_id)),
            "}".to_string(),
            String::new(),
        ]);
    }

    for entry in zone_entries {
        lines.extend([
            "import {".to_string(),
            format!(
                "  to = module.zones[{}].aws_route53_zone.this[0]",
                quote_string(&entry.zone_key)
            ),
            format!("  id = {}", quote_string(&entry.zone_id)),
            "}".to_string(),
            String::new(),
        ]);
    }

    for entry in record_entries {
        let to_line = if single_zone {
            format!(
                "  to = module.zone.aws_route53_record.this[{}]",
                quote_string(&entry.record_key)
            )
        } else {
            format!(
                "  to = module.zones[{}].aws_route53_record.this[{}]",
                quote_string(&entry.zone_key),
                quote_string(&entry.record_key)
            )
        };
        lines.extend([
            "import {".to_string(),
            to_line,
            format!("  id = {}", quote_string(&entry.import_id)),
            "}".to_string(),
            String::new(),
        ]);
    }

    if lines.is_empty() {
        return String::new();
    }
    format!("{}\n", lines.join("\n").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_entry(zone_key: &str, record_key: &str, import_id: &str) -> ImportEntry {
        ImportEntry {
            zone_key: zone_key.to_string(),
            record_key: record_key.to_string(),
            import_id: import_id.to_string(),
        }
    }

    #[test]
    fn empty_input_renders_empty_string() {
        assert_eq!(render_imports(&[], &[], false, None), "");
    }

    #[test]
    fn zones_render_before_records() {
        let records = vec![record_entry("example.com", "a_www", "Z1_www.example.com_A")];
        let zones = vec![ZoneImportEntry {
            zone_key: "example.com".to_string(),
            zone_id: "Z1".to_string(),
        }];
        let rendered = render_imports(&records, &zones, false, None);
        assert_eq!(
            rendered,
            "import {\n  to = module.zones[\"example.com\"].aws_route53_zone.this[0]\n  id = \"Z1\"\n}\n\nimport {\n  to = module.zones[\"example.com\"].aws_route53_record.this[\"a_www\"]\n  id = \"Z1_www.example.com_A\"\n}\n"
        );
    }

    #[test]
    fn record_entries_are_sorted_by_zone_then_key() {
        let records = vec![
            record_entry("b.example.com", "a_www", "Zb_www.b.example.com_A"),
            record_entry("a.example.com", "mx_root", "Za_a.example.com_MX"),
            record_entry("a.example.com", "a_www", "Za_www.a.example.com_A"),
        ];
        let rendered = render_imports(&records, &[], false, None);
        let ids: Vec<&str> = rendered
            .lines()
            .filter(|line| line.starts_with("  id"))
            .collect();
        assert_eq!(
            ids,
            vec![
                "  id = \"Za_www.a.example.com_A\"",
                "  id = \"Za_a.example.com_MX\"",
                "  id = \"Zb_www.b.example.com_A\""
            ]
        );
    }

    #[test]
    fn single_zone_addresses_module_zone() {
        let records = vec![record_entry("example.com", "a_www", "Z1_www.example.com_A")];
        let rendered = render_imports(&records, &[], true, Some("Z1"));
        assert_eq!(
            rendered,
            "import {\n  to = module.zone.aws_route53_zone.this[0]\n  id = \"Z1\"\n}\n\nimport {\n  to = module.zone.aws_route53_record.this[\"a_www\"]\n  id = \"Z1_www.example.com_A\"\n}\n"
        );
    }
}
