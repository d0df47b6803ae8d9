use thiserror::Error;

/// Convenience result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Error type returned by ingestion, row insertion and export.
///
/// Malformed numeric cells are not represented here: ingestion recovers from them locally and
/// leaves the affected cell absent.
#[derive(Debug, Error)]
pub enum TableError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the tab-delimited reader/writer.
    #[error("tsv error: {0}")]
    Csv(#[from] csv::Error),

    /// Two raw header cells (at or after the column skip offset) are textually identical.
    #[error("duplicate column name '{column}' in {origin}")]
    DuplicateColumn { column: String, origin: String },

    /// A dynamic row argument had the wrong kind for its position in a name/value pair.
    #[error("type mismatch at argument {position}: expected {expected}, found {found}")]
    TypeMismatch {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
}

impl TableError {
    /// Returns `true` if this error originates from the file system.
    pub fn is_io(&self) -> bool {
        match self {
            TableError::Io(_) => true,
            TableError::Csv(err) => matches!(err.kind(), csv::ErrorKind::Io(_)),
            _ => false,
        }
    }
}
