//! Tab-delimited ingestion.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::{TableError, TableResult};
use crate::observability::{
    report, TableContext, TableObserver, TableOperation, TableSeverity, TableStats,
};
use crate::schema::Field;
use crate::table::Table;
use crate::types::Row;

/// Options controlling ingestion.
#[derive(Clone)]
pub struct IngestOptions {
    /// Leading records discarded before the header.
    pub skip_rows: usize,
    /// Leading cells of every record that are not part of the table.
    pub skip_columns: usize,
    /// Field delimiter. Defaults to a horizontal tab.
    pub delimiter: u8,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn TableObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: TableSeverity,
}

impl fmt::Debug for IngestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestOptions")
            .field("skip_rows", &self.skip_rows)
            .field("skip_columns", &self.skip_columns)
            .field("delimiter", &self.delimiter)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            skip_rows: 0,
            skip_columns: 0,
            delimiter: b'\t',
            observer: None,
            alert_at_or_above: TableSeverity::Critical,
        }
    }
}

/// Reader configuration shared by path- and reader-based ingestion.
pub fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// Ingest a tab-delimited file into a new [`Table`].
///
/// Rules:
///
/// - The first `skip_rows` records are discarded; the next one is the header.
/// - Header cells before `skip_columns` are ignored. The rest are decoded with
///   [`Field::parse`]; two textually identical raw cells fail with
///   [`TableError::DuplicateColumn`]. Invalid UTF-8 in a header cell is replaced with U+FFFD.
/// - Each later record becomes one row. Empty cells, cells that are not valid UTF-8 and cells
///   that do not parse as numbers are left absent. Cells of subscripted columns are assembled
///   into one vector per row.
///
/// The file is closed before this function returns, on success or failure.
pub fn ingest_tsv_from_path(
    path: impl AsRef<Path>,
    options: &IngestOptions,
) -> TableResult<Table> {
    let path = path.as_ref();
    let result = File::open(path).map_err(TableError::from).and_then(|file| {
        let mut rdr = reader_builder(options.delimiter).from_reader(file);
        ingest_records(&mut rdr, options, &path.display().to_string())
    });
    finish(path, options, result)
}

/// Ingest from an existing reader. The reader should be built with [`reader_builder`] so that
/// the header is delivered as an ordinary record. Observers see the path `<reader>`.
pub fn ingest_tsv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    options: &IngestOptions,
) -> TableResult<Table> {
    let result = ingest_records(rdr, options, READER_ORIGIN);
    finish(Path::new(READER_ORIGIN), options, result)
}

const READER_ORIGIN: &str = "<reader>";

fn finish(
    path: &Path,
    options: &IngestOptions,
    result: TableResult<(Table, usize)>,
) -> TableResult<Table> {
    let ctx = TableContext {
        path: path.to_path_buf(),
        operation: TableOperation::Ingest,
    };
    report(
        options.observer.as_ref(),
        options.alert_at_or_above,
        &ctx,
        &result,
        |(table, skipped)| TableStats {
            rows: table.row_count(),
            columns: table.columns().len(),
            skipped_cells: *skipped,
        },
    );

    let (table, skipped) = result?;
    tracing::debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.columns().len(),
        skipped,
        "ingested table"
    );
    Ok(table)
}

fn ingest_records<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    options: &IngestOptions,
    origin: &str,
) -> TableResult<(Table, usize)> {
    let mut table = Table::new();
    let mut fields: Vec<Field> = Vec::new();
    let mut have_header = false;
    let mut skipped = 0;

    // Byte records: a badly encoded cell is skipped like any other unparsable cell.
    for (idx, result) in rdr.byte_records().enumerate() {
        let record = result?;
        if idx < options.skip_rows {
            continue;
        }

        if !have_header {
            fields = decode_header(&mut table, &record, options.skip_columns, origin)?;
            have_header = true;
            continue;
        }

        let row = decode_row(&fields, &record, &mut skipped);
        table.rows.push(row);
    }

    Ok((table, skipped))
}

fn decode_header(
    table: &mut Table,
    record: &csv::ByteRecord,
    skip_columns: usize,
    origin: &str,
) -> TableResult<Vec<Field>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut fields = Vec::with_capacity(record.len().saturating_sub(skip_columns));

    for (i, bytes) in record.iter().enumerate().skip(skip_columns) {
        let raw = String::from_utf8_lossy(bytes);
        if seen.contains(&*raw) {
            return Err(TableError::DuplicateColumn {
                column: raw.into_owned(),
                origin: origin.to_owned(),
            });
        }

        let field = Field::parse(&raw, i);
        if let Some(prefix) = field.table_prefix() {
            table.prefix = Some(prefix.to_owned());
        }
        table.columns.register_from_header(&field);
        fields.push(field);
        seen.insert(raw.into_owned());
    }

    Ok(fields)
}

fn decode_row(fields: &[Field], record: &csv::ByteRecord, skipped: &mut usize) -> Row {
    let mut row = Row::new();

    for field in fields {
        // Short records read as empty cells.
        let bytes = record.get(field.in_index).unwrap_or_default();
        if bytes.is_empty() {
            continue;
        }

        let raw = match std::str::from_utf8(bytes) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::trace!(column = %field.name, error = %e, "skipping non-UTF-8 cell");
                *skipped += 1;
                continue;
            }
        };

        let Some(value) = parse_number(raw) else {
            tracing::trace!(column = %field.name, raw, "skipping non-numeric cell");
            *skipped += 1;
            continue;
        };

        if !field.has_subscript() {
            row.insert(field.name.as_str(), value.into());
            continue;
        }

        let component = field.component();
        if component.is_none() {
            tracing::trace!(
                column = %field.name,
                subscript = field.subscript.as_deref().unwrap_or_default(),
                "discarding value for unrecognised subscript"
            );
        }
        row.set_component(&field.name, component, value);
    }

    row
}

/// Parses a decimal number. Of the special values only `Infinity` and `NaN` are accepted, with
/// an optional sign and in exactly that spelling; `inf`, `nan` and other case variants are not
/// numbers.
fn parse_number(raw: &str) -> Option<f64> {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let special = unsigned
        .bytes()
        .next()
        .is_some_and(|b| matches!(b.to_ascii_lowercase(), b'i' | b'n'));
    if special && unsigned != "Infinity" && unsigned != "NaN" {
        return None;
    }
    raw.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnType, Value, Vector3};

    fn ingest_str(input: &str, skip_rows: usize, skip_columns: usize) -> TableResult<Table> {
        let mut rdr = reader_builder(b'\t').from_reader(input.as_bytes());
        let options = IngestOptions {
            skip_rows,
            skip_columns,
            ..Default::default()
        };
        ingest_tsv_from_reader(&mut rdr, &options)
    }

    #[test]
    fn scalar_and_vector_columns() {
        let t = ingest_str("a\tp:X\tp:Y\tp:Z\n1\t2\t3\t4\n", 0, 0).unwrap();
        assert_eq!(t.column_type("a"), Some(ColumnType::Scalar));
        assert_eq!(t.column_type("p"), Some(ColumnType::Vector));
        let row = t.row(0).unwrap();
        assert_eq!(row.scalar("a"), Some(1.0));
        assert_eq!(row.vector("p"), Some(Vector3::new(2.0, 3.0, 4.0)));
    }

    #[test]
    fn skip_rows_and_columns() {
        let input = "junk\tjunk\nid\ta\tb\nr1\t1\t2\nr2\t3\t\n";
        let t = ingest_str(input, 1, 1).unwrap();
        assert_eq!(t.columns().len(), 2);
        assert!(!t.columns().contains("id"));
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.row(1).unwrap().scalar("a"), Some(3.0));
        assert_eq!(t.row(1).unwrap().get("b"), &Value::Absent);
    }

    #[test]
    fn unrecognised_subscript_creates_zero_vector() {
        let t = ingest_str("A:B\n7\n", 0, 0).unwrap();
        assert_eq!(t.column_type("A"), Some(ColumnType::Vector));
        assert_eq!(t.row(0).unwrap().vector("A"), Some(Vector3::default()));
    }

    #[test]
    fn short_record_reads_as_empty() {
        let t = ingest_str("a\tb\n1\n", 0, 0).unwrap();
        let row = t.row(0).unwrap();
        assert_eq!(row.scalar("a"), Some(1.0));
        assert!(!row.contains("b"));
    }

    #[test]
    fn last_prefix_wins() {
        let t = ingest_str("one:a\ttwo:b\tc\n1\t2\t3\n", 0, 0).unwrap();
        assert_eq!(t.prefix(), Some("two"));
    }

    #[test]
    fn duplicate_raw_header_is_rejected() {
        let err = ingest_str("a\tb\ta\n", 0, 0).unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { ref column, .. } if column == "a"));
    }

    #[test]
    fn duplicates_before_skip_offset_are_ignored() {
        let t = ingest_str("x\tx\ta\n0\t0\t1\n", 0, 2).unwrap();
        assert_eq!(t.row(0).unwrap().scalar("a"), Some(1.0));
    }

    #[test]
    fn fewer_records_than_skip_yields_empty_table() {
        let t = ingest_str("a\n", 3, 0).unwrap();
        assert!(t.columns().is_empty());
        assert_eq!(t.row_count(), 0);
    }

    #[test]
    fn non_utf8_cell_is_left_absent() {
        let input = b"a\tnote\n1\tcaf\xe9\n";
        let mut rdr = reader_builder(b'\t').from_reader(&input[..]);
        let t = ingest_tsv_from_reader(&mut rdr, &IngestOptions::default()).unwrap();
        assert_eq!(t.row_count(), 1);
        let row = t.row(0).unwrap();
        assert_eq!(row.scalar("a"), Some(1.0));
        assert!(!row.contains("note"));
        assert_eq!(t.column_type("note"), Some(ColumnType::Scalar));
    }

    #[test]
    fn non_utf8_header_cell_is_decoded_lossily() {
        let input = b"caf\xe9\tb\n1\t2\n";
        let mut rdr = reader_builder(b'\t').from_reader(&input[..]);
        let t = ingest_tsv_from_reader(&mut rdr, &IngestOptions::default()).unwrap();
        assert_eq!(t.row(0).unwrap().scalar("caf\u{FFFD}"), Some(1.0));
        assert_eq!(t.row(0).unwrap().scalar("b"), Some(2.0));
    }

    #[test]
    fn only_exact_infinity_and_nan_spellings_are_numbers() {
        let input = "a\tb\tc\td\te\tf\ninf\tnan\tInfinity\t-Infinity\tNaN\tINFINITY\n";
        let t = ingest_str(input, 0, 0).unwrap();
        let row = t.row(0).unwrap();
        assert!(!row.contains("a"));
        assert!(!row.contains("b"));
        assert_eq!(row.scalar("c"), Some(f64::INFINITY));
        assert_eq!(row.scalar("d"), Some(f64::NEG_INFINITY));
        assert!(row.scalar("e").is_some_and(f64::is_nan));
        assert!(!row.contains("f"));
    }

    #[test]
    fn parse_number_accepts_ordinary_decimals() {
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number("-2e3"), Some(-2000.0));
        assert_eq!(parse_number("+Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_number("-inf"), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number(""), None);
    }
}
