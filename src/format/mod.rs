//! Response formatting: pretty JSON, filtered JSON, or a table.

pub mod filter;
pub mod table;

pub use filter::{apply_signals, default_filter, BuiltinFilter, JsonFilter};
pub use table::{fill, render_table, render_table_with_headers, TableLayout};

use crate::constants;
use crate::error::Error;
use serde_json::Value;

/// How a response body is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// The whole document, pretty-printed.
    Json,
    /// Each result of the expression, pretty-printed.
    Filtered(String),
    /// The results of the expression, as table rows.
    Table(String),
}

/// Re-indents a JSON document with two spaces.
///
/// # Errors
///
/// Returns a JSON error if `raw` is not valid JSON.
pub fn pretty_json(raw: &str) -> Result<String, Error> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Runs `expression` over the document and interprets filter signals.
///
/// # Errors
///
/// Returns a JSON error for invalid input, or a filter error from the engine.
pub fn filter_response(
    raw: &str,
    expression: &str,
    filter: &dyn JsonFilter,
) -> Result<Vec<Value>, Error> {
    let value: Value = serde_json::from_str(raw)?;
    apply_signals(filter.apply(&value, expression)?)
}

/// Pretty-prints each value, one after another.
///
/// # Errors
///
/// Returns a JSON error if a value cannot be serialized.
pub fn render_json_sequence(values: &[Value]) -> Result<String, Error> {
    let rendered = values
        .iter()
        .map(serde_json::to_string_pretty)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join("\n"))
}

/// Formats a raw response body. An empty body renders as empty output.
///
/// In table mode a single array result is expanded into one row per element.
///
/// # Errors
///
/// Returns a JSON error for invalid bodies and a filter error when the
/// expression fails.
pub fn format_response(
    raw: &str,
    mode: &OutputMode,
    filter: &dyn JsonFilter,
    layout: &TableLayout,
) -> Result<String, Error> {
    if raw.trim().is_empty() {
        return Ok(String::new());
    }

    match mode {
        OutputMode::Json => pretty_json(raw),
        OutputMode::Filtered(expression) if expression.trim().is_empty() => pretty_json(raw),
        OutputMode::Filtered(expression) => {
            render_json_sequence(&filter_response(raw, expression, filter)?)
        }
        OutputMode::Table(expression) => {
            let expression = if expression.trim().is_empty() {
                constants::IDENTITY_FILTER
            } else {
                expression.as_str()
            };
            let mut results = filter_response(raw, expression, filter)?;
            if let [Value::Array(items)] = results.as_mut_slice() {
                results = std::mem::take(items);
            }
            Ok(render_table(&results, layout))
        }
    }
}
