//! Header decoding and the per-column type registry.
//!
//! - [`Field`]: one decoded header cell (`[prefix:]name[:subscript]`)
//! - [`ColumnRegistry`]: logical column name → [`crate::types::ColumnType`], in registration
//!   order

pub mod field;
pub mod registry;

pub use field::Field;
pub use registry::ColumnRegistry;
