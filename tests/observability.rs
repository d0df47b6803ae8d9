use std::sync::{Arc, Mutex};

use tempfile::tempdir;
use tsv_table::export::WriteOptions;
use tsv_table::ingestion::{ingest_tsv_from_reader, reader_builder, IngestOptions};
use tsv_table::observability::{
    CompositeObserver, StdErrObserver, TableContext, TableObserver, TableOperation,
    TableSeverity, TableStats,
};
use tsv_table::{Table, TableError};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(TableOperation, TableStats)>>,
    failures: Mutex<Vec<TableSeverity>>,
    alerts: Mutex<Vec<TableSeverity>>,
}

impl TableObserver for RecordingObserver {
    fn on_success(&self, ctx: &TableContext, stats: TableStats) {
        self.successes.lock().unwrap().push((ctx.operation, stats));
    }

    fn on_failure(&self, _ctx: &TableContext, severity: TableSeverity, _error: &TableError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &TableContext, severity: TableSeverity, _error: &TableError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_receives_ingest_and_write_success() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestOptions {
        skip_rows: 1,
        skip_columns: 1,
        observer: Some(obs.clone()),
        ..Default::default()
    };
    let t = Table::ingest_with("tests/fixtures/samples.tsv", &opts).unwrap();

    let dir = tempdir().unwrap();
    let wopts = WriteOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };
    t.write_with(dir.path().join("out.tsv"), &wopts).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![
            (
                TableOperation::Ingest,
                TableStats {
                    rows: 3,
                    columns: 3,
                    // "abc" and "n/a"
                    skipped_cells: 2,
                }
            ),
            (
                TableOperation::Write,
                TableStats {
                    rows: 3,
                    columns: 5,
                    skipped_cells: 0,
                }
            ),
        ]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: TableSeverity::Critical,
        ..Default::default()
    };

    let _ = Table::ingest_with("tests/fixtures/does_not_exist.tsv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![TableSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![TableSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_duplicate_header() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: TableSeverity::Critical,
        ..Default::default()
    };

    let _ = Table::ingest_with("tests/fixtures/duplicate_header.tsv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![TableSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn composite_observer_fans_out_ingest_failure() {
    let first = Arc::new(RecordingObserver::default());
    let second = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn TableObserver>> =
        vec![first.clone(), second.clone(), Arc::new(StdErrObserver)];
    let composite = CompositeObserver::new(observers);
    let opts = IngestOptions {
        observer: Some(Arc::new(composite)),
        alert_at_or_above: TableSeverity::Error,
        ..Default::default()
    };

    let err = Table::ingest_with("tests/fixtures/duplicate_header.tsv", &opts).unwrap_err();
    assert!(matches!(err, TableError::DuplicateColumn { .. }));

    for obs in [&first, &second] {
        assert_eq!(*obs.failures.lock().unwrap(), vec![TableSeverity::Error]);
        assert_eq!(*obs.alerts.lock().unwrap(), vec![TableSeverity::Error]);
        assert!(obs.successes.lock().unwrap().is_empty());
    }
}

#[test]
fn reader_ingest_reports_to_observer() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    let mut rdr = reader_builder(b'\t').from_reader("a\tp:X\n1\tx\n2\t3\n".as_bytes());
    ingest_tsv_from_reader(&mut rdr, &opts).unwrap();

    let mut rdr = reader_builder(b'\t').from_reader("a\tb\ta\n".as_bytes());
    ingest_tsv_from_reader(&mut rdr, &opts).unwrap_err();

    assert_eq!(
        *obs.successes.lock().unwrap(),
        vec![(
            TableOperation::Ingest,
            TableStats {
                rows: 2,
                columns: 2,
                skipped_cells: 1,
            }
        )]
    );
    assert_eq!(*obs.failures.lock().unwrap(), vec![TableSeverity::Error]);
}
