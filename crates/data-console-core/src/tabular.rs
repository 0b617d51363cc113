// crates/data-console-core/src/tabular.rs
// ============================================================================
// Module: Tabular Analyzer
// Description: Delimited-file parsing, summary statistics, and row filtering.
// Purpose: Analyze CSV files inside the sandbox without mutating them.
// Dependencies: data-console-core::sandbox, serde, serde_json
// ============================================================================

//! ## Overview
//! Datasets are built fresh from a file's contents on every call and
//! discarded after the response is rendered; nothing here is persisted.
//! Structural problems (unterminated quotes, inconsistent column counts,
//! duplicate headers) surface as validation failures rather than being
//! auto-repaired. Filter equality is numeric-aware: numeric cells compare
//! by parsed value against the string filter, text cells by exact string.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::ServiceError;
use crate::sandbox::DataRoot;
use crate::validate::validate_column;
use crate::validate::validate_filename;

/// Maximum number of rows returned in a filter preview.
const PREVIEW_ROWS: usize = 5;

// ============================================================================
// SECTION: Dataset Model
// ============================================================================

/// A single parsed cell.
///
/// # Invariants
/// - `Number` holds values whose trimmed text parses as `f64`.
/// - `Missing` covers empty and whitespace-only cells.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty or whitespace-only cell.
    Missing,
    /// Numeric cell, parsed from its text form.
    Number(f64),
    /// Any other text cell.
    Text(String),
}

impl CellValue {
    /// Classifies a raw cell string.
    fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        trimmed.parse::<f64>().map_or_else(|_| Self::Text(raw.to_string()), Self::Number)
    }

    /// Converts the cell into a JSON value for previews.
    fn to_json(&self) -> Value {
        match self {
            Self::Missing => Value::Null,
            Self::Number(number) => {
                serde_json::Number::from_f64(*number).map_or(Value::Null, Value::Number)
            }
            Self::Text(text) => Value::String(text.clone()),
        }
    }

    /// Numeric-aware equality against a string filter value.
    fn matches(&self, needle: &str, needle_number: Option<f64>) -> bool {
        match self {
            Self::Missing => needle.trim().is_empty(),
            Self::Number(number) => needle_number.is_some_and(|value| value == *number),
            Self::Text(text) => text == needle,
        }
    }
}

/// An in-memory tabular dataset derived from one file.
///
/// # Invariants
/// - Every row has exactly `columns.len()` cells.
/// - Column names are unique and preserve file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Ordered column names from the header row.
    columns: Vec<String>,
    /// Parsed data rows.
    rows: Vec<Vec<CellValue>>,
}

/// Summary statistics for a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvSummary {
    /// Total data row count.
    pub rows: usize,
    /// Ordered column names.
    pub columns: Vec<String>,
    /// Missing-cell count per column.
    pub missing_values: BTreeMap<String, usize>,
}

/// Result of a predicate-based row filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvFilter {
    /// Total number of matching rows.
    pub rows_found: usize,
    /// First matching rows (at most five) as column-to-value mappings.
    pub preview: Vec<BTreeMap<String, Value>>,
}

impl Dataset {
    /// Parses delimited content into a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for structural problems: missing
    /// header, duplicate column names, unterminated quotes, or rows whose
    /// cell count differs from the header.
    pub fn parse(content: &str) -> Result<Self, ServiceError> {
        let mut raw_rows = parse_delimited(content)?;
        if raw_rows.is_empty() {
            return Err(ServiceError::Validation(
                "file contains no header row".to_string(),
            ));
        }
        let columns = raw_rows.remove(0);
        let mut seen = BTreeMap::new();
        for column in &columns {
            if seen.insert(column.clone(), ()).is_some() {
                return Err(ServiceError::Validation(format!(
                    "duplicate column name '{column}'"
                )));
            }
        }
        let mut rows = Vec::with_capacity(raw_rows.len());
        for (index, raw_row) in raw_rows.into_iter().enumerate() {
            if raw_row.len() != columns.len() {
                return Err(ServiceError::Validation(format!(
                    "row {} has {} fields, expected {}",
                    index + 2,
                    raw_row.len(),
                    columns.len()
                )));
            }
            rows.push(raw_row.iter().map(|cell| CellValue::classify(cell)).collect());
        }
        Ok(Self {
            columns,
            rows,
        })
    }

    /// Returns the ordered column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the data row count.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Computes the summary statistics for the dataset.
    #[must_use]
    pub fn summarize(&self) -> CsvSummary {
        let mut missing_values = BTreeMap::new();
        for (index, column) in self.columns.iter().enumerate() {
            let missing = self
                .rows
                .iter()
                .filter(|row| matches!(row.get(index), Some(CellValue::Missing)))
                .count();
            missing_values.insert(column.clone(), missing);
        }
        CsvSummary {
            rows: self.rows.len(),
            columns: self.columns.clone(),
            missing_values,
        }
    }

    /// Filters rows where `column` equals `value` and previews the first
    /// five matches.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when `column` is not among the
    /// dataset's columns.
    pub fn filter(&self, column: &str, value: &str) -> Result<CsvFilter, ServiceError> {
        let Some(column_index) = self.columns.iter().position(|name| name == column) else {
            return Err(ServiceError::Validation(format!("Column '{column}' not found")));
        };
        let needle_number = value.trim().parse::<f64>().ok();
        let mut rows_found = 0;
        let mut preview = Vec::new();
        for row in &self.rows {
            let Some(cell) = row.get(column_index) else {
                continue;
            };
            if !cell.matches(value, needle_number) {
                continue;
            }
            rows_found += 1;
            if preview.len() < PREVIEW_ROWS {
                let mapped = self
                    .columns
                    .iter()
                    .zip(row.iter())
                    .map(|(name, cell)| (name.clone(), cell.to_json()))
                    .collect();
                preview.push(mapped);
            }
        }
        Ok(CsvFilter {
            rows_found,
            preview,
        })
    }
}

// ============================================================================
// SECTION: Sandboxed Entry Points
// ============================================================================

/// Summarizes a CSV file located inside the data root.
///
/// The file is resolved and read exactly once per call.
///
/// # Errors
///
/// Returns [`ServiceError`] when validation, resolution, reading, or parsing
/// fails.
pub fn summarize_csv(root: &DataRoot, filename: &str) -> Result<CsvSummary, ServiceError> {
    let dataset = load_dataset(root, filename)?;
    Ok(dataset.summarize())
}

/// Filters a CSV file located inside the data root by column equality.
///
/// # Errors
///
/// Returns [`ServiceError`] when validation, resolution, reading, parsing,
/// or the column lookup fails.
pub fn filter_csv(
    root: &DataRoot,
    filename: &str,
    column: &str,
    value: &str,
) -> Result<CsvFilter, ServiceError> {
    validate_column(column)?;
    let dataset = load_dataset(root, filename)?;
    dataset.filter(column, value)
}

/// Resolves, reads, and parses a dataset from the data root.
fn load_dataset(root: &DataRoot, filename: &str) -> Result<Dataset, ServiceError> {
    validate_filename(filename)?;
    let path = root.resolve(filename)?;
    let content = std::fs::read_to_string(&path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ServiceError::NotFound("File not found".to_string())
        } else {
            ServiceError::Storage(format!("failed to read file: {err}"))
        }
    })?;
    Dataset::parse(&content)
}

// ============================================================================
// SECTION: Delimited Parser
// ============================================================================

/// Parser states for quoted-field handling.
enum ParseState {
    /// At the start of a field.
    FieldStart,
    /// Inside an unquoted field.
    Unquoted,
    /// Inside a quoted field.
    Quoted,
    /// Immediately after a closing quote inside a quoted field.
    QuoteInQuoted,
}

/// Parses comma-delimited content with quoted-field support.
///
/// Handles `""` escapes, commas and newlines inside quotes, and CRLF line
/// endings. A trailing newline does not produce an empty record.
fn parse_delimited(content: &str) -> Result<Vec<Vec<String>>, ServiceError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = ParseState::FieldStart;
    for ch in content.chars() {
        match state {
            ParseState::FieldStart => match ch {
                '"' => state = ParseState::Quoted,
                ',' => row.push(std::mem::take(&mut field)),
                '\n' => {
                    // A bare newline with no pending fields is a blank line.
                    if !row.is_empty() {
                        finish_row(&mut rows, &mut row, &mut field);
                    }
                }
                '\r' => {}
                _ => {
                    field.push(ch);
                    state = ParseState::Unquoted;
                }
            },
            ParseState::Unquoted => match ch {
                ',' => {
                    row.push(std::mem::take(&mut field));
                    state = ParseState::FieldStart;
                }
                '\n' => {
                    finish_row(&mut rows, &mut row, &mut field);
                    state = ParseState::FieldStart;
                }
                '\r' => {}
                _ => field.push(ch),
            },
            ParseState::Quoted => match ch {
                '"' => state = ParseState::QuoteInQuoted,
                _ => field.push(ch),
            },
            ParseState::QuoteInQuoted => match ch {
                '"' => {
                    field.push('"');
                    state = ParseState::Quoted;
                }
                ',' => {
                    row.push(std::mem::take(&mut field));
                    state = ParseState::FieldStart;
                }
                '\n' => {
                    finish_row(&mut rows, &mut row, &mut field);
                    state = ParseState::FieldStart;
                }
                '\r' => {}
                _ => {
                    return Err(ServiceError::Validation(format!(
                        "unexpected character '{ch}' after closing quote"
                    )));
                }
            },
        }
    }
    match state {
        ParseState::Quoted => {
            return Err(ServiceError::Validation("unterminated quoted field".to_string()));
        }
        ParseState::Unquoted | ParseState::QuoteInQuoted => {
            finish_row(&mut rows, &mut row, &mut field);
        }
        ParseState::FieldStart => {
            if !row.is_empty() {
                finish_row(&mut rows, &mut row, &mut field);
            }
        }
    }
    Ok(rows)
}

/// Completes the current row, absorbing the pending field.
fn finish_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, field: &mut String) {
    row.push(std::mem::take(field));
    rows.push(std::mem::take(row));
}

#[cfg(test)]
mod tests;
