//! Header name decoding.
//!
//! A header cell follows the grammar `[prefix:]name[:subscript]`, where a subscript is any
//! single-character trailing token. Only `X`, `Y` and `Z` address vector components.

use crate::types::Component;

/// Separator between header tokens.
pub const SEPARATOR: char = ':';

/// One decoded header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Source column position in the header record.
    pub in_index: usize,
    pub prefix: Option<String>,
    /// Logical column name.
    pub name: String,
    /// Single-character component tag, if any.
    pub subscript: Option<String>,
}

impl Field {
    /// Decode `header` found at column `in_index`.
    ///
    /// A header with more than one token whose last token is a single character always carries
    /// a subscript, so `"A:B"` decodes to name `A` with subscript `B` and no prefix.
    ///
    /// Trailing empty tokens are ignored (`"a:"` decodes like `"a"`).
    pub fn parse(header: &str, in_index: usize) -> Self {
        let mut tokens: Vec<&str> = header.split(SEPARATOR).collect();
        while tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_empty()) {
            tokens.pop();
        }

        let n = tokens.len();
        let has_subscript = n > 1 && tokens[n - 1].chars().count() == 1;

        let (prefix, name, subscript) = if has_subscript {
            let prefix = (n > 2).then(|| tokens[n - 3]);
            (prefix, tokens[n - 2], Some(tokens[n - 1]))
        } else {
            let prefix = (n > 1).then(|| tokens[n - 2]);
            (prefix, tokens[n - 1], None)
        };

        Self {
            in_index,
            prefix: prefix.map(str::to_owned),
            name: name.to_owned(),
            subscript: subscript.map(str::to_owned),
        }
    }

    pub fn has_subscript(&self) -> bool {
        self.subscript.is_some()
    }

    /// Vector component addressed by this field's subscript, if it is one of `X`/`Y`/`Z`.
    pub fn component(&self) -> Option<Component> {
        self.subscript.as_deref().and_then(Component::from_subscript)
    }

    /// The prefix, if present and non-empty.
    pub fn table_prefix(&self) -> Option<&str> {
        self.prefix.as_deref().filter(|p| !p.is_empty())
    }
}
