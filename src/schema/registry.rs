//! Column type registry.
//!
//! Columns keep the order in which their names were first registered; export walks them in that
//! order before sorting. There are two update rules and they are deliberately separate:
//!
//! - [`ColumnRegistry::register_from_header`] is applied once per ingested header cell.
//! - [`ColumnRegistry::register_from_value`] is applied on every dynamic insert and overwrites
//!   whatever type was recorded before (last write wins). Rows stored under the old type are
//!   not migrated, so a retyped column can export earlier rows as empty cells.

use std::collections::HashMap;

use crate::types::{ColumnType, Value};

use super::field::Field;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRegistry {
    entries: Vec<(String, ColumnType)>,
    index: HashMap<String, usize>,
}

impl ColumnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest rule: Vector if the header field carries a subscript, else Scalar.
    pub fn register_from_header(&mut self, field: &Field) {
        let ty = if field.has_subscript() {
            ColumnType::Vector
        } else {
            ColumnType::Scalar
        };
        self.set(&field.name, ty);
    }

    /// Dynamic-insert rule: Vector if `value` is a vector, else Scalar, replacing any earlier
    /// type. An absent value has no shape and only registers an unknown name as Scalar.
    pub fn register_from_value(&mut self, name: &str, value: &Value) {
        match value.column_type() {
            Some(ty) => {
                if let Some(prev) = self.get(name).filter(|prev| *prev != ty) {
                    tracing::debug!(column = name, ?prev, new = ?ty, "column retyped by insert");
                }
                self.set(name, ty);
            }
            None => {
                if !self.contains(name) {
                    self.set(name, ColumnType::Scalar);
                }
            }
        }
    }

    fn set(&mut self, name: &str, ty: ColumnType) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 = ty,
            None => {
                self.index.insert(name.to_owned(), self.entries.len());
                self.entries.push((name.to_owned(), ty));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.index.get(name).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate columns in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.entries.iter().map(|(name, ty)| (name.as_str(), *ty))
    }
}
