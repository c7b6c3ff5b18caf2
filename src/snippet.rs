//! Output assembly: turns accumulated field descriptors into tabular snippets.
//!
//! Descriptors are flattened into serializable table rows first; the rows can
//! then be rendered as a Markdown or AsciiDoc table, or dumped as JSON/YAML
//! for further tooling.

use crate::generator::{FieldDescriptor, LINE_BREAK};
use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

/// One flattened row of a documentation table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub path: String,
    #[serde(rename = "type")]
    pub json_type: String,
    pub optional: String,
    pub description: String,
}

/// Flattens descriptors into table rows, preserving order.
///
/// The description column collects, in order: a deprecation notice with its
/// reasons, the accumulated description, the constraint strings, and the
/// default value. Each piece gets a closing dot unless it already ends in
/// punctuation, and pieces are joined with the forced line break.
pub fn rows(fields: &[FieldDescriptor]) -> Vec<TableRow> {
    fields.iter().map(row).collect()
}

fn row(field: &FieldDescriptor) -> TableRow {
    let mut pieces = Vec::new();

    if field.deprecated {
        let mut notice = "Deprecated.".to_string();
        for reason in &field.deprecation_reasons {
            notice.push(' ');
            notice.push_str(&add_dot(reason));
        }
        pieces.push(notice);
    }
    if !field.description.is_empty() {
        pieces.push(add_dot(&field.description));
    }
    for constraint in &field.constraints {
        pieces.push(add_dot(constraint));
    }
    if let Some(default_value) = &field.default_value {
        pieces.push(format!("Default value: {}.", default_value));
    }

    TableRow {
        path: field.path.clone(),
        json_type: field.json_type.to_string(),
        optional: field.optional.join(LINE_BREAK),
        description: pieces.join(LINE_BREAK),
    }
}

/// Appends a closing dot unless the text already ends in sentence punctuation.
fn add_dot(text: &str) -> String {
    match text.chars().last() {
        None => String::new(),
        Some('.') | Some('!') | Some('?') | Some(':') => text.to_string(),
        Some(_) => format!("{}.", text),
    }
}

/// Renders rows as a Markdown table. Forced line breaks stay as `<br>`,
/// which Markdown renderers resolve inside table cells.
pub fn to_markdown(rows: &[TableRow]) -> String {
    let mut out = String::from("| Path | Type | Optional | Description |\n");
    out.push_str("| --- | --- | --- | --- |\n");
    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            row.path, row.json_type, row.optional, row.description
        ));
    }
    out
}

/// Renders rows as an AsciiDoc table. Forced line breaks become AsciiDoc
/// hard line breaks.
pub fn to_asciidoc(rows: &[TableRow]) -> String {
    let mut out = String::from("|===\n|Path|Type|Optional|Description\n");
    for row in rows {
        out.push_str(&format!(
            "\n|{}\n|{}\n|{}\n|{}\n",
            asciidoc_text(&row.path),
            asciidoc_text(&row.json_type),
            asciidoc_text(&row.optional),
            asciidoc_text(&row.description)
        ));
    }
    out.push_str("|===\n");
    out
}

fn asciidoc_text(text: &str) -> String {
    text.replace(LINE_BREAK, " +\n")
}

/// Serializes rows to pretty-printed JSON.
///
/// The output is formatted with indentation, making it suitable for human
/// review and version control.
///
/// # Arguments
///
/// * `rows` - The table rows to serialize
///
/// # Returns
///
/// Returns the JSON string representation of the rows.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```ignore
/// use restdocs_from_types::snippet::{rows, serialize_json};
///
/// let json = serialize_json(&rows(&fields)).unwrap();
/// println!("{}", json);
/// ```
pub fn serialize_json(rows: &[TableRow]) -> Result<String> {
    debug!("Serializing {} table rows to JSON", rows.len());
    serde_json::to_string_pretty(rows).context("Failed to serialize table rows to JSON")
}

/// Serializes rows to YAML format.
///
/// The output is standard YAML, suitable for further documentation tooling.
///
/// # Arguments
///
/// * `rows` - The table rows to serialize
///
/// # Returns
///
/// Returns the YAML string representation of the rows.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```ignore
/// use restdocs_from_types::snippet::{rows, serialize_yaml};
///
/// let yaml = serialize_yaml(&rows(&fields)).unwrap();
/// println!("{}", yaml);
/// ```
pub fn serialize_yaml(rows: &[TableRow]) -> Result<String> {
    debug!("Serializing {} table rows to YAML", rows.len());
    serde_yaml::to_string(rows).context("Failed to serialize table rows to YAML")
}
