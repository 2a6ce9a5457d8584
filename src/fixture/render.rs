//! Writing resource sets back out as HCL-style resource blocks.

use super::{ResourceKey, ResourceSet};
use crate::value::{Map, Value};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::fmt::{self, Write};

/// Matches bare references such as `verity_gateway.gateway_1.id`.
static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*\.[a-zA-Z_][a-zA-Z0-9_]*(\.[a-zA-Z_][a-zA-Z0-9_]*)*$")
        .expect("reference pattern is valid")
});

/// Renders every resource, separated by blank lines.
pub fn render_resources(set: &ResourceSet) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for (i, (key, attributes)) in set.resources.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_resource(&mut out, key, attributes)?;
    }
    Ok(out)
}

fn write_resource(out: &mut String, key: &ResourceKey, attributes: &Map) -> fmt::Result {
    writeln!(out, "resource \"{}\" \"{}\" {{", key.resource_type, key.name)?;

    for (name, value) in attributes.iter() {
        match value {
            // A list of maps is a repeated nested block.
            Value::List(blocks) if !blocks.is_empty() && blocks.iter().all(Value::is_map) => {
                for block in blocks.iter().filter_map(Value::as_map) {
                    writeln!(out, "  {} {{", name)?;
                    for (k, v) in block.iter() {
                        writeln!(out, "    {} = {}", k, format_value(v, 2)?)?;
                    }
                    writeln!(out, "  }}")?;
                }
            }
            _ => writeln!(out, "  {} = {}", name, format_value(value, 1)?)?,
        }
    }

    writeln!(out, "}}")
}

/// Formats a single attribute value at the given indent level.
pub fn format_value(value: &Value, indent: usize) -> Result<String, fmt::Error> {
    let pad = "  ".repeat(indent);
    let mut out = String::new();

    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => write!(out, "{}", b)?,
        Value::Int(i) => write!(out, "{}", i)?,
        Value::UInt(u) => write!(out, "{}", u)?,
        Value::Float(f) => write!(out, "{:?}", f)?,
        Value::String(s) => out.push_str(&format_string(s)),
        Value::List(items) if items.is_empty() => out.push_str("[]"),
        Value::List(items) => {
            let formatted = items
                .iter()
                .map(|item| format_value(item, indent))
                .collect::<Result<Vec<_>, _>>()?;
            if items.iter().all(|item| !item.is_container()) {
                write!(out, "[{}]", formatted.join(", "))?;
            } else {
                out.push('[');
                for (i, item) in formatted.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write!(out, "\n{}  {}", pad, item)?;
                }
                write!(out, "\n{}]", pad)?;
            }
        }
        Value::Map(map) if map.is_empty() => out.push_str("{}"),
        Value::Map(map) => {
            out.push('{');
            for (k, v) in map.iter() {
                write!(out, "\n{}  {} = {}", pad, k, format_value(v, indent + 1)?)?;
            }
            write!(out, "\n{}}}", pad)?;
        }
    }

    Ok(out)
}

fn format_string(s: &str) -> String {
    if let Some(inner) = s.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        return inner.to_string();
    }
    if REFERENCE.is_match(s) {
        return s.to_string();
    }
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
