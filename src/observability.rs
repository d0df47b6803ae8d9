//! Outcome reporting for ingest and export.
//!
//! [`crate::ingestion::IngestOptions`] and [`crate::export::WriteOptions`] accept an optional
//! [`TableObserver`]. Finer-grained diagnostics (skipped cells, dropped arguments) are emitted
//! through `tracing` instead.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::TableError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TableSeverity {
    Info,
    /// Non-fatal.
    Warning,
    /// The operation failed.
    Error,
    /// Infrastructure failure (file system).
    Critical,
}

impl TableSeverity {
    /// Severity assigned to a failed operation.
    pub fn for_error(err: &TableError) -> Self {
        if err.is_io() {
            Self::Critical
        } else {
            Self::Error
        }
    }
}

/// Which table operation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOperation {
    Ingest,
    Write,
}

/// Context about a file operation.
#[derive(Debug, Clone)]
pub struct TableContext {
    pub path: PathBuf,
    pub operation: TableOperation,
}

/// Stats reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// Rows ingested or written.
    pub rows: usize,
    /// Logical columns for ingest, exploded columns for export.
    pub columns: usize,
    /// Non-empty cells dropped during ingest because they did not parse as numbers.
    pub skipped_cells: usize,
}

/// Observer interface for ingest/export outcomes.
pub trait TableObserver: Send + Sync {
    fn on_success(&self, _ctx: &TableContext, _stats: TableStats) {}

    fn on_failure(&self, _ctx: &TableContext, _severity: TableSeverity, _error: &TableError) {}

    /// Called when a failure meets the configured alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &TableContext, severity: TableSeverity, error: &TableError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Report `result` to `observer`, raising an alert when the failure severity reaches
/// `alert_at_or_above`.
pub(crate) fn report<T>(
    observer: Option<&Arc<dyn TableObserver>>,
    alert_at_or_above: TableSeverity,
    ctx: &TableContext,
    result: &Result<T, TableError>,
    stats: impl FnOnce(&T) -> TableStats,
) {
    let Some(obs) = observer else {
        return;
    };
    match result {
        Ok(v) => obs.on_success(ctx, stats(v)),
        Err(e) => {
            let sev = TableSeverity::for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

/// Fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn TableObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn TableObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl TableObserver for CompositeObserver {
    fn on_success(&self, ctx: &TableContext, stats: TableStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &TableContext, severity: TableSeverity, error: &TableError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &TableContext, severity: TableSeverity, error: &TableError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Writes one `key=value` line per event to stderr, tagged `[tsv-table]`.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl StdErrObserver {
    fn success_line(ctx: &TableContext, stats: TableStats) -> String {
        format!(
            "[tsv-table] op={:?} status=ok path={} rows={} columns={} skipped_cells={}",
            ctx.operation,
            ctx.path.display(),
            stats.rows,
            stats.columns,
            stats.skipped_cells
        )
    }

    fn failure_line(
        status: &str,
        ctx: &TableContext,
        severity: TableSeverity,
        error: &TableError,
    ) -> String {
        format!(
            "[tsv-table] op={:?} status={status} severity={:?} path={} err={}",
            ctx.operation,
            severity,
            ctx.path.display(),
            error
        )
    }
}

impl TableObserver for StdErrObserver {
    fn on_success(&self, ctx: &TableContext, stats: TableStats) {
        eprintln!("{}", Self::success_line(ctx, stats));
    }

    fn on_failure(&self, ctx: &TableContext, severity: TableSeverity, error: &TableError) {
        eprintln!("{}", Self::failure_line("failed", ctx, severity, error));
    }

    fn on_alert(&self, ctx: &TableContext, severity: TableSeverity, error: &TableError) {
        eprintln!("{}", Self::failure_line("alert", ctx, severity, error));
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl TableObserver for FileObserver {
    fn on_success(&self, ctx: &TableContext, stats: TableStats) {
        self.append_line(&format!(
            "{} ok op={:?} path={} rows={} columns={} skipped_cells={}",
            unix_ts(),
            ctx.operation,
            ctx.path.display(),
            stats.rows,
            stats.columns,
            stats.skipped_cells
        ));
    }

    fn on_failure(&self, ctx: &TableContext, severity: TableSeverity, error: &TableError) {
        self.append_line(&format!(
            "{} fail severity={:?} op={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.operation,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &TableContext, severity: TableSeverity, error: &TableError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} op={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.operation,
            ctx.path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
