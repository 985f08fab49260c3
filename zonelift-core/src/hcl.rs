//! Terraform text rendering
//!
//! Serializes an ordered tree of scalars, lists and maps into HCL attribute
//! syntax. Output order follows insertion order everywhere; Terraform's
//! `merge()` and `for_each` consumers treat the key order as meaningful
//! documentation, so rendering must be byte-stable across runs on identical
//! input.

use std::sync::LazyLock;

use regex::Regex;

static BARE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid pattern"));

/// One value in the rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    Null,
    List(Vec<Value>),
    Map(Body),
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(value.into())
    }
}

/// Insertion-ordered attribute map. The order entries are pushed is the
/// order they render.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body(Vec<(String, Value)>);

impl Body {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.0.push((key.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Body {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Encode a string with HCL string-literal quoting. JSON quoting rules are
/// a compatible subset, so the JSON encoder is reused rather than
/// reimplemented.
pub fn quote_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn scalar_literal(value: &Value) -> String {
    match value {
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Null => "null".to_string(),
        Value::Int(n) => n.to_string(),
        Value::String(s) => quote_string(s),
        Value::List(_) | Value::Map(_) => unreachable!("composite handled by render_attribute"),
    }
}

fn format_key(name: &str) -> String {
    if BARE_IDENTIFIER.is_match(name) {
        name.to_string()
    } else {
        quote_string(name)
    }
}

/// Render one attribute into `lines`, recursing through maps and lists.
///
/// `name` is `None` for anonymous values nested under a list; those carry a
/// trailing comma. `indent` counts two-space levels.
pub fn render_attribute(name: Option<&str>, value: &Value, indent: usize, lines: &mut Vec<String>) {
    let pad = "  ".repeat(indent);

    match value {
        Value::Map(body) => {
            if body.is_empty() {
                match name {
                    Some(name) => lines.push(format!("{pad}{} = {{}}", format_key(name))),
                    None => lines.push(format!("{pad}{{}},")),
                }
                return;
            }
            match name {
                Some(name) => lines.push(format!("{pad}{} = {{", format_key(name))),
                None => lines.push(format!("{pad}{{")),
            }
            for (key, entry) in body.iter() {
                render_attribute(Some(key), entry, indent + 1, lines);
            }
            lines.push(format!("{pad}{}", if name.is_some() { "}" } else { "}," }));
        }
        Value::List(items) => {
            if items.is_empty() {
                match name {
                    Some(name) => lines.push(format!("{pad}{} = []", format_key(name))),
                    None => lines.push(format!("{pad}[]")),
                }
                return;
            }
            match name {
                Some(name) => lines.push(format!("{pad}{} = [", format_key(name))),
                None => lines.push(format!("{pad}[")),
            }
            for item in items {
                render_attribute(None, item, indent + 1, lines);
            }
            lines.push(format!("{pad}{}", if name.is_some() { "]" } else { "]," }));
        }
        _ => {
            let literal = scalar_literal(value);
            match name {
                Some(name) => lines.push(format!("{pad}{} = {literal}", format_key(name))),
                None => lines.push(format!("{pad}{literal},")),
            }
        }
    }
}

/// Render one zone's record map as a standalone locals file (multi-zone
/// mode). The zone key is always quoted; record keys are sanitized
/// identifiers and stay bare.
pub fn render_zone_file(local_var: &str, zone_key: &str, records: &[(String, Body)]) -> String {
    let mut lines = Vec::new();
    lines.push("locals {".to_string());
    lines.push(format!("  {local_var} = {{"));
    lines.push(format!("    {} = {{", quote_string(zone_key)));
    for (record_key, attributes) in records {
        lines.push(format!("      {record_key} = {{"));
        for (name, value) in attributes.iter() {
            render_attribute(Some(name), value, 4, &mut lines);
        }
        lines.push("      }".to_string());
    }
    lines.push("    }".to_string());
    lines.push("  }".to_string());
    lines.push("}".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// Render the shared record map for single-zone mode (no zone nesting
/// layer).
pub fn render_single_zone_records(local_var: &str, records: &[(String, Body)]) -> String {
    let mut lines = Vec::new();
    lines.push("locals {".to_string());
    lines.push(format!("  {local_var} = {{"));
    for (record_key, attributes) in records {
        lines.push(format!("    {record_key} = {{"));
        for (name, value) in attributes.iter() {
            render_attribute(Some(name), value, 3, &mut lines);
        }
        lines.push("    }".to_string());
    }
    lines.push("  }".to_string());
    lines.push("}".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// Render the zone configuration file: one quoted zone key per entry under a
/// `zones` local.
pub fn render_zones_file(zones: &[(String, Body)]) -> String {
    let mut lines = Vec::new();
    lines.push("locals {".to_string());
    lines.push("  zones = {".to_string());
    for (zone_key, attributes) in zones {
        lines.push(format!("    {} = {{", quote_string(zone_key)));
        for (name, value) in attributes.iter() {
            render_attribute(Some(name), value, 3, &mut lines);
        }
        lines.push("    }".to_string());
    }
    lines.push("  }".to_string());
    lines.push(String::new());
    lines.push("}".to_string());
    lines.push(String::new());
    lines.join("\n")
}
