//! Canonical hashing of presets.
//!
//! A preset hash is computed as:
//! ```text
//! preset_hash = hex(BLAKE3(canonical_json(preset)))
//! ```
//!
//! where the canonical form sorts object keys, drops whitespace and prints
//! numbers without trailing zeros. Two presets that differ only in key order
//! or float formatting therefore hash identically.

use serde_json::Value;

use crate::error::SpecError;

/// Computes the canonical BLAKE3 hash of a JSON value.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn canonical_value_hash(value: &Value) -> Result<String, SpecError> {
    let canonical = canonicalize_json(value)?;
    Ok(blake3_hash(canonical.as_bytes()))
}

/// Canonicalizes a JSON value.
///
/// Non-finite floats cannot appear in a `serde_json::Value`, so this never
/// fails today; the `Result` keeps the signature stable for stricter rules.
pub fn canonicalize_json(value: &Value) -> Result<String, SpecError> {
    let mut out = String::new();
    write_canonical(value, &mut out);
    Ok(out)
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f == 0.0 {
                return "0".to_string();
            }
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
            // Display for f64 is already the shortest round-trip form.
            format!("{}", f)
        }
        _ => "null".to_string(),
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Computes a BLAKE3 hash of arbitrary bytes as lowercase hex.
pub fn blake3_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
