use super::edge::{Hyperedge, Hypergraph, MappingEntry};
use super::types::{AttributeRef, Equality, Variable, VariableId};
use super::union_find::{ArenaUnionFind, UnionFind};
use crate::error::{Result, Sql2HgError};
use std::collections::HashMap;
use tracing::debug;

/// A declared table and the variables of its join attributes, in first-seen order
#[derive(Debug, Clone)]
struct TableEdge {
    name: String,
    attributes: Vec<VariableId>,
}

/// Builds the hypergraph of one query
///
/// Single use: declare every table, record every join, then consume with [`HypergraphBuilder::build`].
/// Output order never depends on hash iteration: tables come out in declaration order and
/// canonical variables are labelled in first-seen order.
pub struct HypergraphBuilder<U: UnionFind = ArenaUnionFind> {
    /// Table edges in declaration order
    tables: Vec<TableEdge>,

    /// Table name -> index into `tables`
    table_index: HashMap<String, usize>,

    /// Attribute reference -> variable minted for it
    bindings: HashMap<AttributeRef, VariableId>,

    /// Variable id -> attribute reference; its length is the next variable id
    attributes: Vec<AttributeRef>,

    vars: U,
}

impl HypergraphBuilder<ArenaUnionFind> {
    pub fn new() -> Self {
        Self::with_union_find(ArenaUnionFind::new())
    }
}

impl Default for HypergraphBuilder<ArenaUnionFind> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: UnionFind> HypergraphBuilder<U> {
    /// Create a builder over an empty union-find structure
    pub fn with_union_find(vars: U) -> Self {
        Self {
            tables: Vec::new(),
            table_index: HashMap::new(),
            bindings: HashMap::new(),
            attributes: Vec::new(),
            vars,
        }
    }

    /// Register a table edge with no attributes
    /// Declaring the same name twice is rejected
    pub fn declare_table(&mut self, name: &str) -> Result<()> {
        if self.table_index.contains_key(name) {
            return Err(Sql2HgError::DuplicateTable(name.to_string()));
        }

        debug!(table = name, "declared table");
        self.table_index.insert(name.to_string(), self.tables.len());
        self.tables.push(TableEdge {
            name: name.to_string(),
            attributes: Vec::new(),
        });
        Ok(())
    }

    /// Ensure `(table, column)` is a join attribute of `table` with a variable bound to it
    /// Mints a fresh variable the first time the pair is seen; later calls return the same id.
    pub fn register_join_attribute(&mut self, table: &str, column: &str) -> Result<VariableId> {
        let table_idx = self.table_idx(table)?;
        let attr = AttributeRef::new(table, column);
        if let Some(id) = self.bindings.get(&attr) {
            return Ok(*id);
        }

        let id = self.vars.add();
        debug_assert_eq!(id.0, self.attributes.len());
        debug!(attribute = %attr, variable = id.0, "minted variable");

        self.tables[table_idx].attributes.push(id);
        self.bindings.insert(attr.clone(), id);
        self.attributes.push(attr);
        Ok(id)
    }

    /// Variable bound to a registered join attribute
    pub fn variable_of(&self, table: &str, column: &str) -> Result<VariableId> {
        self.table_idx(table)?;
        self.bindings
            .get(&AttributeRef::new(table, column))
            .copied()
            .ok_or_else(|| Sql2HgError::UnknownAttribute {
                table: table.to_string(),
                column: column.to_string(),
            })
    }

    /// Merge the classes of two already-registered join attributes
    pub fn union_attributes(&mut self, left: &AttributeRef, right: &AttributeRef) -> Result<()> {
        self.table_idx(&left.table)?;
        self.table_idx(&right.table)?;
        let left_var = self.variable_of(&left.table, &left.column)?;
        let right_var = self.variable_of(&right.table, &right.column)?;

        if self.vars.union(left_var, right_var) {
            debug!(left = %left, right = %right, "unified attributes");
        }
        Ok(())
    }

    /// Record one equi-join predicate: register both sides, then unify them
    /// Both tables are checked before anything is registered.
    pub fn record_join(&mut self, equality: &Equality) -> Result<()> {
        self.table_idx(&equality.left.table)?;
        self.table_idx(&equality.right.table)?;

        self.register_join_attribute(&equality.left.table, &equality.left.column)?;
        self.register_join_attribute(&equality.right.table, &equality.right.column)?;
        self.union_attributes(&equality.left, &equality.right)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of distinct attribute references seen so far
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Number of equivalence classes of join attributes
    pub fn class_count(&self) -> usize {
        self.vars.class_count()
    }

    /// One hyperedge per declared table, in declaration order
    pub fn build_hyperedges(&mut self) -> Vec<Hyperedge> {
        let labels = self.canonical_labels();
        self.tables
            .iter()
            .map(|table| Hyperedge {
                name: table.name.clone(),
                variables: table.attributes.iter().map(|id| labels[id.0]).collect(),
            })
            .collect()
    }

    /// One entry per canonical variable listing the attribute references of its class
    pub fn build_mapping(&mut self) -> Vec<MappingEntry> {
        let labels = self.canonical_labels();
        let mut mapping: Vec<MappingEntry> = Vec::new();
        for (attr, label) in self.attributes.iter().zip(labels) {
            // labels are dense and increase with first appearance
            if label.0 == mapping.len() {
                mapping.push(MappingEntry {
                    variable: label,
                    attributes: Vec::new(),
                });
            }
            mapping[label.0].attributes.push(attr.clone());
        }
        mapping
    }

    /// Consume the builder and emit both outputs
    pub fn build(mut self) -> Hypergraph {
        let hyperedges = self.build_hyperedges();
        let mapping = self.build_mapping();
        debug!(
            hyperedges = hyperedges.len(),
            variables = mapping.len(),
            "built hypergraph"
        );
        Hypergraph { hyperedges, mapping }
    }

    fn table_idx(&self, table: &str) -> Result<usize> {
        self.table_index
            .get(table)
            .copied()
            .ok_or_else(|| Sql2HgError::UnknownTable(table.to_string()))
    }

    /// Output label of every variable, indexed by variable id
    /// Classes are numbered densely in the order their first member was minted.
    fn canonical_labels(&mut self) -> Vec<Variable> {
        let mut label_of_root: HashMap<VariableId, Variable> = HashMap::new();
        let mut labels = Vec::with_capacity(self.attributes.len());
        for idx in 0..self.attributes.len() {
            let root = self.vars.find(VariableId(idx));
            let next = Variable(label_of_root.len());
            labels.push(*label_of_root.entry(root).or_insert(next));
        }
        labels
    }
}
