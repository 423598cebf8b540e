//! BibTeX formatting module
//!
//! Converts BibTeXEntry structures back to BibTeX string format.

use super::entry::BibTeXEntry;
use super::parser::BibTeXParseResult;

/// Format a single BibTeX entry to string
pub fn format_entry(entry: &BibTeXEntry) -> String {
    let mut result = String::new();

    result.push('@');
    result.push_str(entry.entry_type.as_str());
    result.push('{');
    result.push_str(&entry.cite_key);
    result.push(',');
    result.push('\n');

    for field in &entry.fields {
        result.push_str("    ");
        result.push_str(&field.key);
        result.push_str(" = ");
        result.push_str(&format_field_value(&field.value));
        result.push(',');
        result.push('\n');
    }

    result.push('}');
    result
}

/// Format a field value, choosing appropriate delimiters
fn format_field_value(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }

    // Braces keep LaTeX commands and case protection intact
    let mut result = String::with_capacity(value.len() + 2);
    result.push('{');
    result.push_str(value);
    result.push('}');
    result
}

fn format_string_definition(key: &str, value: &str) -> String {
    format!("@string{{{} = {}}}", key, format_field_value(value))
}

fn format_preamble(text: &str) -> String {
    format!("@preamble{{{}}}", format_field_value(text))
}

/// Format a complete BibTeX file: preambles, string definitions, then entries
///
/// The output ends with a single newline.
pub fn format_bibliography(
    preambles: &[String],
    strings: &[(String, String)],
    entries: &[BibTeXEntry],
) -> String {
    let mut blocks = Vec::with_capacity(preambles.len() + strings.len() + entries.len());

    blocks.extend(preambles.iter().map(|p| format_preamble(p)));
    blocks.extend(strings.iter().map(|(k, v)| format_string_definition(k, v)));
    blocks.extend(entries.iter().map(format_entry));

    let mut result = blocks.join("\n\n");
    result.push('\n');
    result
}

impl BibTeXParseResult {
    /// Format this document back to BibTeX text
    pub fn to_bibtex(&self) -> String {
        format_bibliography(&self.preambles, &self.strings, &self.entries)
    }
}
