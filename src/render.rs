//! Attribute rendering: identity header first, then every other attribute as
//! an indented `key: value` line.

use crate::error::ApiError;
use crate::resource::ResourceRecord;
use serde_json::Value;

/// Natural string form of a value. Nested records and sequences are not
/// pretty-printed.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "<nil>".to_string(),
        other => other.to_string(),
    }
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

/// Render `record` as a block headed by its `identity_key` value.
///
/// The header sits at `depth` tabs, attributes one level deeper. Fails with
/// `MalformedRecord` when the identity is missing or not a string, before
/// anything is produced.
pub fn format_record(
    record: &ResourceRecord,
    identity_key: &str,
    depth: usize,
) -> Result<String, ApiError> {
    let identity = record.identity(identity_key)?;
    let mut output = format!("{}{}\n", indent(depth), identity);
    output.push_str(&format_attributes_except(record, identity_key, depth + 1));
    Ok(output)
}

/// Render every attribute but `skip_key` at `depth` tabs, without a header.
pub fn format_attributes_except(record: &ResourceRecord, skip_key: &str, depth: usize) -> String {
    record
        .attributes_except(skip_key)
        .into_iter()
        .map(|(key, value)| attribute_line(key, value, depth))
        .collect()
}

/// Render every attribute of `record` at `depth` tabs, without a header.
pub fn format_attributes(record: &ResourceRecord, depth: usize) -> String {
    record
        .attributes()
        .into_iter()
        .map(|(key, value)| attribute_line(key, value, depth))
        .collect()
}

fn attribute_line(key: &str, value: &Value, depth: usize) -> String {
    format!("{}{}: {}\n", indent(depth), key, format_value(value))
}

/// Render a sequence of records one per line, in their natural form.
pub fn format_sequence(records: &[ResourceRecord], depth: usize) -> String {
    records
        .iter()
        .map(|record| {
            let value = serde_json::to_value(record).unwrap_or(Value::Null);
            format!("{}{}\n", indent(depth), format_value(&value))
        })
        .collect()
}
