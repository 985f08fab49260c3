//! Marker-delimited section updates
//!
//! The locals file is hand-maintained; generated content lives between
//! marker comments and gets replaced wholesale on every run. Everything
//! outside the markers must survive byte-for-byte, and running twice with
//! the same block must leave the file unchanged.

use crate::hcl::quote_string;

pub const RECORDS_BEGIN_MARKER: &str = "# BEGIN GENERATED ROUTE53 RECORDS";
pub const RECORDS_END_MARKER: &str = "# END GENERATED ROUTE53 RECORDS";
pub const PRIMARY_ZONE_BEGIN_MARKER: &str = "# BEGIN GENERATED PRIMARY ZONE";
pub const PRIMARY_ZONE_END_MARKER: &str = "# END GENERATED PRIMARY ZONE";

/// Replace the marker-delimited section of `original` with `block`.
///
/// Every existing span from `begin` through `end` (markers included, plus
/// the trailing newline) is removed; the remainder is trimmed of trailing
/// whitespace and the new block is appended after a blank-line separator,
/// or written alone when nothing else remains. `block` is expected to carry
/// its own markers and trailing newline.
pub fn replace_marked_section(original: &str, begin: &str, end: &str, block: &str) -> String {
    let mut cleaned = original.to_string();
    loop {
        let Some(start) = cleaned.find(begin) else {
            break;
        };
        let Some(end_offset) = cleaned[start..].find(end) else {
            break;
        };
        let mut stop = start + end_offset + end.len();
        if cleaned[stop..].starts_with('\n') {
            stop += 1;
        }
        cleaned.replace_range(start..stop, "");
    }

    let cleaned = cleaned.trim_end();
    if cleaned.is_empty() {
        block.to_string()
    } else {
        format!("{cleaned}\n\n{block}")
    }
}

/// The aggregate records block: one `merge()` over every per-zone record
/// local, or an empty map when no zone exported records.
pub fn locals_block(local_vars: &[String]) -> String {
    let mut lines = vec![RECORDS_BEGIN_MARKER.to_string()];
    if local_vars.is_empty() {
        lines.push("locals {".to_string());
        lines.push("  zone_records = {}".to_string());
        lines.push("}".to_string());
    } else {
        lines.push("locals {".to_string());
        lines.push("  zone_records = merge(".to_string());
        lines.push("    {},".to_string());
        for (index, local_var) in local_vars.iter().enumerate() {
            let comma = if index < local_vars.len() - 1 { "," } else { "" };
            lines.push(format!("    local.{local_var}{comma}"));
        }
        lines.push("  )".to_string());
        lines.push("}".to_string());
    }
    lines.push(RECORDS_END_MARKER.to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// The single-zone block: inline zone metadata under its own marker pair.
pub fn single_zone_locals_block(zone_name: &str) -> String {
    let comment = format!("Primary {zone_name} zone");
    [
        PRIMARY_ZONE_BEGIN_MARKER.to_string(),
        "locals {".to_string(),
        "  zone = {".to_string(),
        format!("    name    = {}", quote_string(zone_name)),
        format!("    comment = {}", quote_string(&comment)),
        "    tags    = {}".to_string(),
        "  }".to_string(),
        "}".to_string(),
        PRIMARY_ZONE_END_MARKER.to_string(),
        String::new(),
    ]
    .join("\n")
}
