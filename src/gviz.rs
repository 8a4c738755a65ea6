// src/gviz.rs
//! Decoding of the Google Visualization ("gviz") query response.
//!
//! The public query endpoint answers with a JavaScript call rather than
//! plain JSON:
//!
//! ```text
//! /*O_o*/
//! google.visualization.Query.setResponse({"version":"0.6",...,"table":{...}});
//! ```
//!
//! [`unwrap_response`] strips that wrapper, [`parse_table`] decodes the
//! payload and [`to_table`] / [`to_excuses`] shape it for display.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::data_types::{Excuse, ExcuseList, TableData};
use crate::error::FetchError;

pub const PROLOGUE: &str = "/*O_o*/\ngoogle.visualization.Query.setResponse(";
pub const EPILOGUE: &str = ");";

#[derive(Debug, Clone, Deserialize)]
pub struct GvizTable {
    pub cols: Vec<GvizColumn>,
    pub rows: Vec<GvizRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GvizColumn {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GvizRow {
    #[serde(default)]
    pub c: Option<Vec<Option<GvizCell>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GvizCell {
    #[serde(default)]
    pub v: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GvizError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    detailed_message: String,
}

impl GvizRow {
    /// Cell `index` coerced to text; absent cells and null values are empty.
    pub fn text(&self, index: usize) -> String {
        self.c
            .as_ref()
            .and_then(|cells| cells.get(index))
            .and_then(Option::as_ref)
            .and_then(|cell| cell.v.as_ref())
            .map(value_to_string)
            .unwrap_or_default()
    }
}

/// Strip the fixed prologue and epilogue. Anything that does not carry the
/// exact wrapper is rejected.
pub fn unwrap_response(raw: &str) -> Result<&str, FetchError> {
    if raw.len() < PROLOGUE.len() + EPILOGUE.len() {
        return Err(FetchError::Parse(format!(
            "response too short ({} bytes)",
            raw.len()
        )));
    }
    let body = raw
        .strip_prefix(PROLOGUE)
        .ok_or_else(|| FetchError::Parse("missing response prologue".to_string()))?;
    body.strip_suffix(EPILOGUE)
        .ok_or_else(|| FetchError::Parse("missing response epilogue".to_string()))
}

/// Unwrap and decode a raw response down to its `table` object.
pub fn parse_table(raw: &str) -> Result<GvizTable, FetchError> {
    let payload: Value = serde_json::from_str(unwrap_response(raw)?)?;

    let Some(table) = payload.get("table") else {
        return Err(FetchError::Shape(provider_error(&payload)));
    };

    serde_json::from_value(table.clone()).map_err(|e| FetchError::Shape(e.to_string()))
}

fn provider_error(payload: &Value) -> String {
    let first = payload
        .get("errors")
        .and_then(|errors| errors.get(0))
        .and_then(|error| GvizError::deserialize(error).ok());

    match first {
        Some(error) if !error.detailed_message.is_empty() => {
            format!("provider error: {}", error.detailed_message)
        }
        Some(error) if !error.message.is_empty() => format!("provider error: {}", error.message),
        _ => "missing `table` field".to_string(),
    }
}

pub fn column_label(column: &GvizColumn) -> String {
    if column.label.is_empty() {
        format!("Column {}", column.id)
    } else {
        column.label.clone()
    }
}

/// Labels for every column, made unique so no column hides another in the
/// row maps. A repeated label gets the column id appended, then a counter.
pub fn column_labels(cols: &[GvizColumn]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut labels = Vec::with_capacity(cols.len());

    for column in cols {
        let base = column_label(column);
        let mut label = base.clone();
        if seen.contains(&label) && !column.id.is_empty() {
            label = format!("{} ({})", base, column.id);
        }
        let mut n = 2;
        while seen.contains(&label) {
            label = format!("{} ({})", base, n);
            n += 1;
        }
        seen.insert(label.clone());
        labels.push(label);
    }

    labels
}

pub fn to_table(table: &GvizTable) -> TableData {
    let columns = column_labels(&table.cols);

    let rows = table
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, label)| (label.clone(), row.text(i)))
                .collect::<IndexMap<_, _>>()
        })
        .collect();

    TableData { columns, rows }
}

/// First column of each row. Ids are the original row positions, assigned
/// before blank rows are dropped, so they stay put across refreshes.
pub fn to_excuses(table: &GvizTable) -> ExcuseList {
    let excuses: ExcuseList = table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| Excuse {
            id: index + 1,
            text: row.text(0),
        })
        .filter(|excuse| !excuse.text.trim().is_empty())
        .collect();

    debug!(rows = table.rows.len(), kept = excuses.len(), "built excuse list");
    excuses
}

/// String form of a cell value, the way a browser's `toString` renders it.
/// Objects are the exception and come out as compact JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(float_to_string).unwrap_or_default()
            }
        }
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn float_to_string(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        // Shortest round-trip digits, no exponent, no trailing ".0".
        return n.to_string();
    }

    let exponential = format!("{:e}", n);
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exponential,
    }
}
