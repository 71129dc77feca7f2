//! # Hypergraph Module
//!
//! Turns the join structure of a query into a hypergraph: one hyperedge per table,
//! one vertex per equivalence class of join-connected attributes.
//!
//! ## Features
//!
//! - **Builder**: declares tables, registers join attributes and unifies them
//! - **Union-find**: incremental equivalence classes over a growing variable domain
//! - **Output**: `name(v0,v1)` hyperedge lines and `v0=table.column,...` mapping lines
//!
//! ## Usage
//!
//! ```rust
//! use sql2hg::hypergraph::{Equality, HypergraphBuilder};
//!
//! let mut builder = HypergraphBuilder::new();
//! for table in ["R", "S", "T"] {
//!     builder.declare_table(table)?;
//! }
//! builder.record_join(&Equality::new("R", "a", "S", "b"))?;
//! builder.record_join(&Equality::new("S", "b", "T", "c"))?;
//!
//! let graph = builder.build();
//! assert_eq!(graph.hyperedge_lines(), vec!["R(v0)", "S(v0)", "T(v0)"]);
//! assert_eq!(graph.mapping_lines(), vec!["v0=R.a,S.b,T.c"]);
//! # Ok::<(), sql2hg::Sql2HgError>(())
//! ```

pub mod builder;
pub mod edge;
pub mod types;
pub mod union_find;

// Re-export main types for convenience
pub use builder::HypergraphBuilder;
pub use edge::{Hyperedge, Hypergraph, MappingEntry};
pub use types::{AttributeRef, Equality, Variable, VariableId};
pub use union_find::{ArenaUnionFind, UnionFind};
