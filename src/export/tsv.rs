//! Tab-delimited export.

use std::collections::HashMap;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::error::{TableError, TableResult};
use crate::observability::{
    report, TableContext, TableObserver, TableOperation, TableSeverity, TableStats,
};
use crate::table::Table;
use crate::types::{ColumnType, Component, Row, Value};

/// Options controlling export.
#[derive(Clone)]
pub struct WriteOptions {
    /// Append to an existing file instead of replacing it.
    pub append: bool,
    /// Field delimiter. Defaults to a horizontal tab.
    pub delimiter: u8,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn TableObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: TableSeverity,
}

impl fmt::Debug for WriteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteOptions")
            .field("append", &self.append)
            .field("delimiter", &self.delimiter)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            append: false,
            delimiter: b'\t',
            observer: None,
            alert_at_or_above: TableSeverity::Critical,
        }
    }
}

pub fn writer_builder(delimiter: u8) -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(delimiter).has_headers(false);
    builder
}

/// Header of an exported table: [`Table::exploded_columns`] sorted case-insensitively, ties
/// kept in registry order.
pub fn sorted_header(table: &Table) -> Vec<String> {
    let mut header = table.exploded_columns();
    header.sort_by_cached_key(|c| c.to_lowercase());
    header
}

/// Write `table` to `path`.
///
/// Layout:
///
/// - The header is [`sorted_header`].
/// - Each row, in insertion order, becomes one record. A Scalar column contributes its value; a
///   Vector column contributes its three components. Absent cells are written as empty fields,
///   as are cells whose stored shape no longer matches the column type.
///
/// The table is not modified. The file is closed before this function returns, on success or
/// failure.
pub fn write_tsv_to_path(
    table: &Table,
    path: impl AsRef<Path>,
    options: &WriteOptions,
) -> TableResult<()> {
    let path = path.as_ref();
    let ctx = TableContext {
        path: path.to_path_buf(),
        operation: TableOperation::Write,
    };

    let result = OpenOptions::new()
        .write(true)
        .create(true)
        .append(options.append)
        .truncate(!options.append)
        .open(path)
        .map_err(TableError::from)
        .and_then(|file| write_tsv_to_writer(table, file, options.delimiter));

    report(
        options.observer.as_ref(),
        options.alert_at_or_above,
        &ctx,
        &result,
        |columns| TableStats {
            rows: table.row_count(),
            columns: *columns,
            skipped_cells: 0,
        },
    );

    let columns = result?;
    tracing::debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns,
        append = options.append,
        "wrote table"
    );
    Ok(())
}

/// Write `table` to `out` and flush it. Returns the number of header columns.
pub fn write_tsv_to_writer<W: Write>(
    table: &Table,
    mut out: W,
    delimiter: u8,
) -> TableResult<usize> {
    let unsorted = table.exploded_columns();
    let positions: HashMap<&str, usize> = unsorted
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();
    let header = sorted_header(table);

    if header.is_empty() {
        // A zero-field csv record is not guaranteed to be a blank line; write those directly.
        for _ in 0..=table.row_count() {
            out.write_all(b"\n")?;
        }
        out.flush()?;
        return Ok(0);
    }

    let order: Vec<usize> = header
        .iter()
        .filter_map(|c| positions.get(c.as_str()).copied())
        .collect();

    let mut wtr = writer_builder(delimiter).from_writer(out);
    wtr.write_record(&header)?;
    let mut cells = Vec::with_capacity(unsorted.len());
    for row in &table.rows {
        cells.clear();
        row_cells(table, row, &mut cells);
        wtr.write_record(order.iter().map(|&i| cells[i].as_str()))?;
    }
    wtr.flush()?;

    Ok(header.len())
}

/// Cells of `row` in registry (unsorted) order.
fn row_cells(table: &Table, row: &Row, cells: &mut Vec<String>) {
    for (name, ty) in table.columns.iter() {
        match (ty, row.get(name)) {
            (ColumnType::Scalar, Value::Scalar(v)) => cells.push(v.to_string()),
            (ColumnType::Scalar, _) => cells.push(String::new()),
            (ColumnType::Vector, Value::Vector(v)) => {
                cells.extend(Component::ALL.iter().map(|&c| v.get(c).to_string()))
            }
            (ColumnType::Vector, _) => cells.extend(Component::ALL.iter().map(|_| String::new())),
        }
    }
}
