//! Ingestion entrypoints.
//!
//! Most callers should use [`crate::Table::ingest`] or [`ingest_tsv_from_path`], which:
//!
//! - read a tab-delimited file whose header follows `[prefix:]name[:subscript]`
//! - build an in-memory [`crate::Table`] with one Scalar or Vector column per logical name
//! - optionally report success/failure/alerts to a [`crate::observability::TableObserver`]

pub mod tsv;

pub use tsv::{ingest_tsv_from_path, ingest_tsv_from_reader, reader_builder, IngestOptions};
