//! Programmatic row construction.
//!
//! [`Table::add_row`] takes a flat or nested list of [`RowArg`]s and appends exactly one row:
//!
//! - [`RowArg::Mapping`] contributes its `(name, value)` entries directly.
//! - [`RowArg::Sequence`] is flattened recursively with the same rules. Each sequence has its own
//!   pending name, so a name never pairs with a value from a different nesting level.
//! - Bare [`RowArg::Text`] / [`RowArg::Value`] arguments are consumed in pairs: a text name, then
//!   its value. A trailing unmatched name is dropped.
//!
//! Every written cell updates the column registry with the last-write-wins rule (see
//! [`crate::schema::ColumnRegistry::register_from_value`]).
//!
//! ```rust
//! use tsv_table::{RowArg, Table};
//!
//! # fn main() -> Result<(), tsv_table::TableError> {
//! let mut table = Table::new();
//! table.add_row(vec![
//!     "k1".into(),
//!     1.0.into(),
//!     "k2".into(),
//!     RowArg::mapping([("a", 2.0)]),
//! ])?;
//!
//! let row = table.row(0).unwrap();
//! assert_eq!(row.scalar("k1"), Some(1.0));
//! assert_eq!(row.scalar("a"), Some(2.0));
//! assert!(!row.contains("k2"));
//! # Ok(())
//! # }
//! ```

use crate::error::{TableError, TableResult};
use crate::schema::ColumnRegistry;
use crate::table::Table;
use crate::types::{Row, Value, Vector3};

/// One argument to [`Table::add_row`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowArg {
    /// Bare text; only valid as the name half of a pair.
    Text(String),
    /// Bare cell value; only valid as the value half of a pair.
    Value(Value),
    /// Named cells written as-is.
    Mapping(Vec<(String, Value)>),
    /// Nested arguments.
    Sequence(Vec<RowArg>),
}

impl RowArg {
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        RowArg::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn sequence<I>(args: I) -> Self
    where
        I: IntoIterator<Item = RowArg>,
    {
        RowArg::Sequence(args.into_iter().collect())
    }

    fn kind(&self) -> &'static str {
        match self {
            RowArg::Text(_) => "text",
            RowArg::Value(Value::Absent) => "absent value",
            RowArg::Value(Value::Scalar(_)) => "number",
            RowArg::Value(Value::Vector(_)) => "vector",
            RowArg::Mapping(_) => "mapping",
            RowArg::Sequence(_) => "sequence",
        }
    }
}

impl From<&str> for RowArg {
    fn from(v: &str) -> Self {
        RowArg::Text(v.to_owned())
    }
}

impl From<String> for RowArg {
    fn from(v: String) -> Self {
        RowArg::Text(v)
    }
}

impl From<f64> for RowArg {
    fn from(v: f64) -> Self {
        RowArg::Value(Value::Scalar(v))
    }
}

impl From<Vector3> for RowArg {
    fn from(v: Vector3) -> Self {
        RowArg::Value(Value::Vector(v))
    }
}

impl From<Value> for RowArg {
    fn from(v: Value) -> Self {
        RowArg::Value(v)
    }
}

impl From<Vec<RowArg>> for RowArg {
    fn from(v: Vec<RowArg>) -> Self {
        RowArg::Sequence(v)
    }
}

impl Table {
    /// Append one row built from `args`.
    ///
    /// Fails with [`TableError::TypeMismatch`] when a non-text bare argument appears where a
    /// column name is expected, or a text argument appears where a value is expected. In that case
    /// no row is appended, but column types registered by earlier arguments of the same call are
    /// kept.
    pub fn add_row(&mut self, args: Vec<RowArg>) -> TableResult<()> {
        let mut row = Row::new();
        let mut position = 0;
        fill_row(&mut self.columns, &mut row, &args, &mut position)?;
        self.rows.push(row);
        Ok(())
    }
}

fn fill_row(
    columns: &mut ColumnRegistry,
    row: &mut Row,
    args: &[RowArg],
    position: &mut usize,
) -> TableResult<()> {
    let mut pending: Option<&str> = None;

    for arg in args {
        match arg {
            RowArg::Mapping(entries) => {
                *position += 1;
                for (name, value) in entries {
                    write_cell(columns, row, name, value);
                }
            }
            RowArg::Sequence(nested) => {
                *position += 1;
                fill_row(columns, row, nested, position)?;
            }
            RowArg::Text(text) => {
                if pending.is_some() {
                    return Err(mismatch(*position, "value", arg));
                }
                *position += 1;
                pending = Some(text.as_str());
            }
            RowArg::Value(value) => match pending.take() {
                Some(name) => {
                    *position += 1;
                    write_cell(columns, row, name, value);
                }
                None => return Err(mismatch(*position, "column name", arg)),
            },
        }
    }

    if let Some(name) = pending {
        tracing::trace!(column = name, "dropping unmatched trailing column name");
    }
    Ok(())
}

fn write_cell(columns: &mut ColumnRegistry, row: &mut Row, name: &str, value: &Value) {
    columns.register_from_value(name, value);
    row.insert(name, *value);
}

fn mismatch(position: usize, expected: &'static str, found: &RowArg) -> TableError {
    TableError::TypeMismatch {
        position,
        expected,
        found: found.kind(),
    }
}
