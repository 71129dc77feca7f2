//! Types module for Hypergraph
//! Attribute references, equality facts and variable identifiers shared by the builder and the extractor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arena index of a variable minted by the builder
/// One per distinct attribute reference, assigned in first-seen order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariableId(pub usize);

/// Canonical variable label as it appears in the output (`v0`, `v1`, ...)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Variable(pub usize);

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A `(table, column)` pair naming one column of one relation in the query
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeRef {
    pub table: String,
    pub column: String,
}

impl AttributeRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Equi-join fact `left = right` discovered in WHERE/ON/HAVING
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equality {
    pub left: AttributeRef,
    pub right: AttributeRef,
}

impl Equality {
    pub fn new(
        left_table: impl Into<String>,
        left_column: impl Into<String>,
        right_table: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        Self {
            left: AttributeRef::new(left_table, left_column),
            right: AttributeRef::new(right_table, right_column),
        }
    }
}

impl fmt::Display for Equality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.left, self.right)
    }
}
