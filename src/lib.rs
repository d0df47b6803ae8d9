//! `tsv-table` ingests tab-delimited files into an in-memory [`Table`] whose columns are either
//! single numbers or 3-component vectors, and writes tables back out with a deterministic,
//! alphabetically sorted header.
//!
//! ## Header grammar
//!
//! Each header cell is decoded as `[prefix:]name[:subscript]` (see [`schema::Field::parse`]):
//!
//! - `speed` → Scalar column `speed`
//! - `run1:speed` → Scalar column `speed`, table prefix `run1`
//! - `pos:X`, `pos:Y`, `pos:Z` → one Vector column `pos`, assembled per row
//! - `run1:pos:X` → as above, with table prefix `run1`
//!
//! A two-token header whose last token is one character is always read as `name:subscript`,
//! so `A:B` is column `A` with subscript `B`. Only `X`, `Y` and `Z` address vector components.
//!
//! Empty and non-numeric cells are left absent; ingestion does not fail on them.
//!
//! ## Quick example
//!
//! ```no_run
//! use tsv_table::Table;
//!
//! # fn main() -> Result<(), tsv_table::TableError> {
//! // Skip one banner record and one leading id column.
//! let table = Table::ingest("samples.tsv", 1, 1)?;
//! println!("rows={} prefix={:?}", table.row_count(), table.prefix());
//!
//! // Header is written in case-insensitive alphabetical order.
//! table.write("out.tsv", false)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Building rows programmatically
//!
//! ```rust
//! use tsv_table::{RowArg, Table, Vector3};
//! use tsv_table::export::sorted_header;
//!
//! # fn main() -> Result<(), tsv_table::TableError> {
//! let mut table = Table::new();
//! table.add_row(vec![
//!     "b".into(),
//!     1.0.into(),
//!     RowArg::mapping([("A", 2.0)]),
//!     "c".into(),
//!     Vector3::new(1.0, 2.0, 3.0).into(),
//! ])?;
//! assert_eq!(sorted_header(&table), vec!["A", "b", "c:X", "c:Y", "c:Z"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: header decoding and the column type registry
//! - [`types`]: cell, row and vector types
//! - [`ingestion`]: tab-delimited ingestion
//! - [`insert`]: programmatic row construction
//! - [`export`]: tab-delimited export
//! - [`observability`]: observer hooks for ingest/export outcomes
//! - [`error`]: error types
//!
//! A [`Table`] is plain single-owner state with no internal locking; concurrent use must be
//! serialized by the caller.

pub mod error;
pub mod export;
pub mod ingestion;
pub mod insert;
pub mod observability;
pub mod schema;
pub mod table;
pub mod types;

pub use error::{TableError, TableResult};
pub use insert::RowArg;
pub use table::Table;
pub use types::{ColumnType, Component, Row, Value, Vector3};
