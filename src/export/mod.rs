//! Export of a [`crate::Table`] to a tab-delimited file.
//!
//! Vector columns are exploded into `:X`/`:Y`/`:Z` columns, and the header is the exploded list
//! sorted case-insensitively. See [`write_tsv_to_path`].

pub mod tsv;

pub use tsv::{sorted_header, write_tsv_to_path, write_tsv_to_writer, writer_builder, WriteOptions};
