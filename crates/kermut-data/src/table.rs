//! Per-dataset CSV tables keyed by mutant identifier.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use kermut_core::constants::MUTANT_COL;
use kermut_core::errors::{DataError, DataResult};
use tracing::{debug, warn};

/// An ordered CSV table with a mutant identifier column.
///
/// Row order is the canonical order every derived array is aligned to.
#[derive(Debug, Clone)]
pub struct MutationTable {
    source: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    mutant_idx: usize,
}

impl MutationTable {
    /// Read a table from disk. A missing file is `TableNotFound`.
    pub fn from_path(path: &Path) -> DataResult<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DataError::TableNotFound {
                path: path.to_path_buf(),
            },
            _ => DataError::io(path, e),
        })?;
        let table = Self::from_reader(file, path)?;
        debug!(path = %path.display(), rows = table.len(), "loaded table");
        Ok(table)
    }

    /// Parse a table from any reader. `source` is used in error messages.
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> DataResult<Self> {
        let csv_err = |e: csv::Error| DataError::Csv {
            path: source.to_path_buf(),
            message: e.to_string(),
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();
        let mutant_idx = headers
            .iter()
            .position(|h| h == MUTANT_COL)
            .ok_or_else(|| DataError::MissingColumn {
                column: MUTANT_COL.to_string(),
                path: source.to_path_buf(),
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let table = Self {
            source: source.to_path_buf(),
            headers,
            rows,
            mutant_idx,
        };
        let unique = table.mutant_positions().len();
        if unique != table.len() {
            warn!(
                path = %source.display(),
                rows = table.len(),
                unique,
                "duplicate mutant identifiers; first occurrence wins in lookups"
            );
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of a column in row order.
    pub fn column(&self, name: &str) -> DataResult<Vec<&str>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DataError::MissingColumn {
                column: name.to_string(),
                path: self.source.clone(),
            })?;
        Ok(self.rows.iter().map(|row| cell(row, idx)).collect())
    }

    /// Numeric values of a column in row order. Empty cells become NaN.
    pub fn column_f64(&self, name: &str) -> DataResult<Vec<f64>> {
        self.column(name)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| parse_float(name, row, value))
            .collect()
    }

    /// Mutant identifiers in row order.
    pub fn mutants(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|row| cell(row, self.mutant_idx))
            .collect()
    }

    /// Identifier → first row holding it.
    pub fn mutant_positions(&self) -> HashMap<&str, usize> {
        let mut positions = HashMap::with_capacity(self.rows.len());
        for (i, mutant) in self.mutants().into_iter().enumerate() {
            positions.entry(mutant).or_insert(i);
        }
        positions
    }
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

pub(crate) fn parse_float(column: &str, row: usize, value: &str) -> DataResult<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| DataError::InvalidValue {
        column: column.to_string(),
        row,
        value: value.to_string(),
    })
}
