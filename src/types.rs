//! Core value types stored in a [`crate::Table`].
//!
//! Every cell is one of the variants of [`Value`]; a [`Row`] maps column names to cells.

use std::collections::HashMap;
use std::fmt;

/// Shape of a logical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// A single number.
    Scalar,
    /// A 3-component vector, exported as three `:X`/`:Y`/`:Z` columns.
    Vector,
}

/// Vector component addressed by a subscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    X,
    Y,
    Z,
}

impl Component {
    /// All components in export order.
    pub const ALL: [Component; 3] = [Component::X, Component::Y, Component::Z];

    /// Parse a subscript. Returns `None` for anything but `X`, `Y` or `Z`.
    pub fn from_subscript(s: &str) -> Option<Self> {
        match s {
            "X" => Some(Self::X),
            "Y" => Some(Self::Y),
            "Z" => Some(Self::Z),
            _ => None,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

/// A 3-component numeric tuple.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::X => self.x,
            Component::Y => self.y,
            Component::Z => self.z,
        }
    }

    pub fn set(&mut self, component: Component, value: f64) {
        match component {
            Component::X => self.x = value,
            Component::Y => self.y = value,
            Component::Z => self.z = value,
        }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A single cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Value {
    /// Missing value (empty or unparsable cell).
    #[default]
    Absent,
    /// A single number.
    Scalar(f64),
    /// A fully assembled vector.
    Vector(Vector3),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Shape implied by this value, or `None` for [`Value::Absent`].
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::Absent => None,
            Value::Scalar(_) => Some(ColumnType::Scalar),
            Value::Vector(_) => Some(ColumnType::Vector),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vector3> {
        match self {
            Value::Vector(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<Vector3> for Value {
    fn from(v: Vector3) -> Self {
        Value::Vector(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Absent, Into::into)
    }
}

static ABSENT: Value = Value::Absent;

/// One table row: a mapping from column name to cell.
///
/// Absent cells are not stored; looking them up yields [`Value::Absent`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell for `name`, or [`Value::Absent`] if the row has none.
    pub fn get(&self, name: &str) -> &Value {
        self.cells.get(name).unwrap_or(&ABSENT)
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.get(name).as_scalar()
    }

    pub fn vector(&self, name: &str) -> Option<Vector3> {
        self.get(name).as_vector()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cells.contains_key(name)
    }

    /// Stores `value` under `name`. Storing [`Value::Absent`] clears the cell.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if value.is_absent() {
            self.cells.remove(&name);
        } else {
            self.cells.insert(name, value);
        }
    }

    /// Sets one component of the vector stored under `name`. A cell that is absent or holds a
    /// scalar is replaced by a zero vector first, so `component: None` still creates the vector.
    pub(crate) fn set_component(&mut self, name: &str, component: Option<Component>, value: f64) {
        let cell = self.cells.entry(name.to_owned()).or_default();
        if !matches!(cell, Value::Vector(_)) {
            *cell = Value::Vector(Vector3::default());
        }
        if let (Value::Vector(v), Some(component)) = (cell, component) {
            v.set(component, value);
        }
    }

    /// Number of non-absent cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate non-absent cells in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v.into());
        }
        row
    }
}
