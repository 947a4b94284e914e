//! Reference catalog: caller-loaded service tables.
//!
//! The two inventory exports the lookup searches arrive as spreadsheet
//! rows from the host layer, one table per source. Column sets differ by
//! source and by export vintage, so rows are kept as `serde_json` maps
//! and only construction validates shape. Classification is by header:
//! the NSP19 export is narrow with run-together column names, the NSP24
//! export is wide with spaced ones.

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::records::ReportFormat;

/// Construction failures for a reference table. The only fallible public
/// surface; lookup itself never errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("reference table has no columns")]
    EmptyHeader,
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// One reference table: an ordered header plus rows keyed by column name.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl ReferenceTable {
    /// Build a table from a header and positional rows.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, CatalogError> {
        if columns.is_empty() {
            return Err(CatalogError::EmptyHeader);
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(CatalogError::DuplicateColumn(column.clone()));
            }
        }

        let mut keyed = Vec::with_capacity(rows.len());
        for (i, cells) in rows.into_iter().enumerate() {
            if cells.len() != columns.len() {
                return Err(CatalogError::RowWidthMismatch {
                    row: i,
                    expected: columns.len(),
                    found: cells.len(),
                });
            }
            let mut row = Map::new();
            for (column, cell) in columns.iter().zip(cells) {
                row.insert(column.clone(), cell);
            }
            keyed.push(row);
        }

        Ok(Self {
            columns,
            rows: keyed,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub(crate) fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }
}

/// Render one cell as trimmed text for id matching. Numbers print
/// naturally; null and structured values yield nothing.
pub(crate) fn cell_str(row: &Map<String, Value>, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Render one cell only when it is genuine text. Description candidates
/// must be strings; a numeric cell is never a description.
pub(crate) fn string_cell(row: &Map<String, Value>, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Header names that identify the narrow NSP19 export.
const NSP19_MARKER_COLUMNS: [&str; 3] = ["ServiceId", "ServiceName", "CustomerName"];
/// Header names that identify the wide NSP24 export.
const NSP24_MARKER_COLUMNS: [&str; 3] = ["Service ID", "Service Name", "Description"];
/// Column-count boundary between the two export shapes.
const NSP19_MAX_COLUMNS: usize = 15;

/// Classify a table by its header shape. `None` for headers matching
/// neither export.
pub fn detect_format(table: &ReferenceTable) -> Option<ReportFormat> {
    let width = table.columns().len();
    if NSP19_MARKER_COLUMNS.iter().any(|c| table.has_column(c)) && width < NSP19_MAX_COLUMNS {
        return Some(ReportFormat::Nsp19);
    }
    if NSP24_MARKER_COLUMNS.iter().any(|c| table.has_column(c)) && width >= NSP19_MAX_COLUMNS {
        return Some(ReportFormat::Nsp24);
    }
    None
}

/// The pair of reference tables lookup searches. Either side may be
/// absent; NSP24 is the higher-priority source.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    nsp24: Option<ReferenceTable>,
    nsp19: Option<ReferenceTable>,
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under the format its header matches, replacing
    /// any previous table for that format. Returns the detected format;
    /// unrecognized shapes are dropped.
    pub fn push_table(&mut self, table: ReferenceTable) -> Option<ReportFormat> {
        match detect_format(&table) {
            Some(ReportFormat::Nsp24) => {
                log::info!(
                    "CATALOG_TABLE_LOADED format=NSP24 rows={} columns={}",
                    table.len(),
                    table.columns().len()
                );
                self.nsp24 = Some(table);
                Some(ReportFormat::Nsp24)
            }
            Some(ReportFormat::Nsp19) => {
                log::info!(
                    "CATALOG_TABLE_LOADED format=NSP19 rows={} columns={}",
                    table.len(),
                    table.columns().len()
                );
                self.nsp19 = Some(table);
                Some(ReportFormat::Nsp19)
            }
            None => {
                log::warn!("CATALOG_FORMAT_UNKNOWN columns={:?}", table.columns());
                None
            }
        }
    }

    pub fn nsp24(&self) -> Option<&ReferenceTable> {
        self.nsp24.as_ref()
    }

    pub fn nsp19(&self) -> Option<&ReferenceTable> {
        self.nsp19.as_ref()
    }

    /// Number of loaded tables (0..=2).
    pub fn table_count(&self) -> usize {
        usize::from(self.nsp24.is_some()) + usize::from(self.nsp19.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.table_count() == 0
    }

    /// Drop both tables.
    pub fn clear(&mut self) {
        self.nsp24 = None;
        self.nsp19 = None;
    }
}
