//! Name and identifier transforms
//!
//! Record names arrive as FQDNs with provider escape sequences; Terraform
//! wants short, stable identifiers. Everything in here is a pure string
//! transform so derived keys are reproducible across runs.

use std::sync::LazyLock;

use regex::Regex;

static NON_ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid pattern"));
static NON_IDENT_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid pattern"));
static CAMEL_BOUNDARY_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid pattern"));
static CAMEL_BOUNDARY_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid pattern"));

/// Compute the record name relative to its zone.
///
/// Trailing dots are stripped from both names. An apex record yields the
/// empty string; a name outside the zone is returned as-is (should not occur
/// with well-formed input, but must not panic).
pub fn relative_name(record_name: &str, zone_name: &str) -> String {
    let name = record_name.trim_end_matches('.');
    let zone = zone_name.trim_end_matches('.');

    if name.is_empty() || name == zone {
        return String::new();
    }

    if !zone.is_empty() {
        if let Some(prefix) = name.strip_suffix(&format!(".{zone}")) {
            return prefix.to_string();
        }
    }

    name.to_string()
}

/// Reduce a relative record name to a key-safe subdomain token.
///
/// Apex records (empty input) become `root`. A literal `*` or the Route53
/// escape sequence `\052` becomes the word `star`. Runs of anything outside
/// `[A-Za-z0-9]` collapse into single underscores.
pub fn sanitize_subdomain(value: &str) -> String {
    if value.is_empty() {
        return "root".to_string();
    }

    let replaced = value.replace('*', "star").replace("\\052", "star");
    let lowered = replaced.to_lowercase();
    let sanitized = NON_ALNUM_RUN.replace_all(&lowered, "_");
    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "root".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Convert a mixed/Pascal-case field name to lower snake_case.
///
/// Two passes: first split a capital-led word off whatever precedes it
/// (`HealthCheckId` -> `Health_Check_Id`), then split a lowercase-or-digit /
/// uppercase boundary (`zoneId` -> `zone_Id`), and lowercase the result.
/// Acronym-only names like `TTL` pass through untouched before lowercasing.
pub fn to_snake_case(value: &str) -> String {
    let pass_one = CAMEL_BOUNDARY_WORD.replace_all(value, "${1}_${2}");
    let pass_two = CAMEL_BOUNDARY_TAIL.replace_all(&pass_one, "${1}_${2}");
    pass_two.to_lowercase()
}

/// Double every `%` that is not already followed by another `%`.
///
/// Keeps record values literal-safe inside Terraform's interpolation syntax.
pub fn escape_percent(value: &str) -> String {
    if !value.contains('%') {
        return value.to_string();
    }

    let mut escaped = String::with_capacity(value.len() + 4);
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' && chars.peek() != Some(&'%') {
            escaped.push_str("%%");
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Force a string into a valid bare identifier.
///
/// Characters outside `[A-Za-z0-9_]` become `_`; an empty or digit-led
/// result is prefixed with `_`.
pub fn sanitize_identifier(value: &str) -> String {
    let sanitized = NON_IDENT_CHAR.replace_all(value, "_").to_string();
    if sanitized.is_empty() || sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{sanitized}")
    } else {
        sanitized
    }
}
