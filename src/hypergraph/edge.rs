use super::types::{AttributeRef, Variable};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A hyperedge: one table and the canonical variables of its join attributes
/// Rendered as `name(v0,v1,...)`, or `name()` for a table without join attributes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperedge {
    /// Table (or alias) name
    pub name: String,

    /// Canonical variables, in the order the table's attributes were first seen.
    /// The same variable may appear twice when two columns of the table were unified.
    pub variables: Vec<Variable>,
}

impl fmt::Display for Hyperedge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.variables.iter().join(","))
    }
}

/// One line of the variable mapping: a canonical variable and its equivalence class
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub variable: Variable,
    pub attributes: Vec<AttributeRef>,
}

impl fmt::Display for MappingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.variable, self.attributes.iter().join(","))
    }
}

/// Finished hypergraph: hyperedges in table declaration order plus the variable mapping
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypergraph {
    pub hyperedges: Vec<Hyperedge>,
    pub mapping: Vec<MappingEntry>,
}

impl Hypergraph {
    /// Lines of the `.hg` output
    pub fn hyperedge_lines(&self) -> Vec<String> {
        self.hyperedges.iter().map(|e| e.to_string()).collect()
    }

    /// Lines of the `.map` output
    pub fn mapping_lines(&self) -> Vec<String> {
        self.mapping.iter().map(|m| m.to_string()).collect()
    }

    /// Number of canonical variables (vertices)
    pub fn variable_count(&self) -> usize {
        self.mapping.len()
    }

    pub fn hyperedge(&self, name: &str) -> Option<&Hyperedge> {
        self.hyperedges.iter().find(|e| e.name == name)
    }
}
