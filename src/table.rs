//! The in-memory table.
//!
//! A [`Table`] exclusively owns its [`ColumnRegistry`] and row store. It has no internal
//! locking: callers that share a table across threads must serialize access themselves.

use std::path::Path;

use crate::error::TableResult;
use crate::export::{self, WriteOptions};
use crate::ingestion::{self, IngestOptions};
use crate::schema::ColumnRegistry;
use crate::schema::field::SEPARATOR;
use crate::types::{ColumnType, Component, Row};

/// Rows of scalar/vector cells plus the column types needed to export them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub(crate) prefix: Option<String>,
    pub(crate) columns: ColumnRegistry,
    pub(crate) rows: Vec<Row>,
}

impl Table {
    /// Create an empty table for programmatic construction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a tab-delimited file, skipping `skip_rows` leading records and `skip_columns`
    /// leading cells of every record.
    ///
    /// See [`ingestion::ingest_tsv_from_path`] for the full rules.
    pub fn ingest(
        path: impl AsRef<Path>,
        skip_rows: usize,
        skip_columns: usize,
    ) -> TableResult<Self> {
        let options = IngestOptions {
            skip_rows,
            skip_columns,
            ..Default::default()
        };
        ingestion::ingest_tsv_from_path(path, &options)
    }

    /// Ingest with explicit [`IngestOptions`].
    pub fn ingest_with(path: impl AsRef<Path>, options: &IngestOptions) -> TableResult<Self> {
        ingestion::ingest_tsv_from_path(path, options)
    }

    /// Write the table as a tab-delimited file, replacing it unless `append` is set.
    ///
    /// See [`export::write_tsv_to_path`] for the column layout.
    pub fn write(&self, path: impl AsRef<Path>, append: bool) -> TableResult<()> {
        let options = WriteOptions {
            append,
            ..Default::default()
        };
        export::write_tsv_to_path(self, path, &options)
    }

    /// Write with explicit [`WriteOptions`].
    pub fn write_with(&self, path: impl AsRef<Path>, options: &WriteOptions) -> TableResult<()> {
        export::write_tsv_to_path(self, path, options)
    }

    /// Table-wide prefix recorded from the ingested header, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn set_prefix(&mut self, prefix: Option<String>) {
        self.prefix = prefix;
    }

    pub fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns row `i`, or `None` if it is out of range.
    pub fn row(&self, i: usize) -> Option<&Row> {
        self.rows.get(i)
    }

    /// Returns a copy of row `i` restricted to `keys`.
    pub fn row_subset<S: AsRef<str>>(&self, i: usize, keys: &[S]) -> Option<Row> {
        let row = self.rows.get(i)?;
        Some(
            keys.iter()
                .map(|k| (k.as_ref(), *row.get(k.as_ref())))
                .collect(),
        )
    }

    /// Column name qualified with the table prefix (`prefix:name`), or `name` if no prefix is set.
    pub fn full_key(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{SEPARATOR}{name}"),
            None => name.to_owned(),
        }
    }

    /// Flat export names for one logical column: one for a Scalar column (or an unknown name),
    /// three `:X`/`:Y`/`:Z` names for a Vector column.
    pub fn exploded_columns_for_key(&self, name: &str) -> Vec<String> {
        let key = self.full_key(name);
        match self.columns.get(name) {
            Some(ColumnType::Vector) => Component::ALL
                .iter()
                .map(|c| format!("{key}{SEPARATOR}{}", c.suffix()))
                .collect(),
            _ => vec![key],
        }
    }

    /// Flat export names of every column, in registry order.
    pub fn exploded_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .flat_map(|(name, _)| self.exploded_columns_for_key(name))
            .collect()
    }
}
