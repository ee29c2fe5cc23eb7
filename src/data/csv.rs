//! Delimited-text loading for training and test splits.
//!
//! Supported format:
//! - UTF-8, one sample per line, configurable single-character delimiter
//! - Optional header row (auto-detected by default: the first row is a
//!   header if it contains any non-numeric, non-empty cell)
//! - Double-quoted fields with embedded delimiters are handled correctly
//! - The last `target_cols` columns are targets, everything before them
//!   is a feature
//! - Targets may be rescaled with `(t - target_offset) / target_divisor`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{DataError, Dataset};
use crate::error::Result;
use crate::math::matrix::Matrix;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: char,
    /// `Some(true)` always skips the first row, `Some(false)` never does,
    /// `None` auto-detects.
    pub has_header: Option<bool>,
    pub target_cols: usize,
    pub target_offset: f64,
    pub target_divisor: f64,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: ';',
            has_header: None,
            target_cols: 1,
            target_offset: 0.0,
            target_divisor: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads and parses a delimited file into a `Dataset`.
pub fn load_delimited<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Dataset> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_delimited(&text, options)
}

/// Parses delimited text into a `Dataset`.
///
/// Row numbers in errors are 1-based and count the header line if present.
pub fn parse_delimited(text: &str, options: &CsvOptions) -> Result<Dataset> {
    if options.target_cols == 0 {
        return Err(DataError::Options("target_cols must be at least 1".into()).into());
    }
    if options.target_divisor == 0.0 || !options.target_divisor.is_finite() {
        return Err(DataError::Options("target_divisor must be a non-zero number".into()).into());
    }

    // Blank lines carry no data, so header detection looks at the first
    // non-empty one.
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .peekable();

    if let Some((_, first)) = lines.peek() {
        let skip = match options.has_header {
            Some(skip) => skip,
            None => is_header(first, options.delimiter),
        };
        if skip {
            lines.next();
        }
    }

    let mut features: Vec<f64> = Vec::new();
    let mut targets: Vec<f64> = Vec::new();
    let mut width: Option<usize> = None;
    let mut rows = 0;

    for (line_idx, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row_num = line_idx + 1;

        let cells = parse_row(line, options.delimiter);
        let expected = *width.get_or_insert(cells.len());
        if cells.len() != expected {
            return Err(DataError::Ragged { row: row_num, expected, found: cells.len() }.into());
        }
        if cells.len() <= options.target_cols {
            return Err(DataError::TooFewColumns {
                row: row_num,
                needed: options.target_cols + 1,
                targets: options.target_cols,
                found: cells.len(),
            }
            .into());
        }

        let split = cells.len() - options.target_cols;
        for (col, cell) in cells.iter().enumerate() {
            let value = parse_float(cell, row_num, col + 1)?;
            if col < split {
                features.push(value);
            } else {
                targets.push((value - options.target_offset) / options.target_divisor);
            }
        }
        rows += 1;
    }

    let Some(width) = width else {
        return Err(DataError::Empty.into());
    };
    let feature_cols = width - options.target_cols;

    Ok(Dataset {
        inputs: Matrix::from_vec(rows, feature_cols, features)?,
        targets: Matrix::from_vec(rows, options.target_cols, targets)?,
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str, delimiter: char) -> bool {
    parse_row(line, delimiter).iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Splits a single row on `delimiter`, handling double-quoted fields.
fn parse_row(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside quoted field.
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_float(cell: &str, row: usize, col: usize) -> std::result::Result<f64, DataError> {
    cell.trim().parse::<f64>().map_err(|_| DataError::Parse {
        row,
        col,
        value: cell.to_string(),
    })
}
