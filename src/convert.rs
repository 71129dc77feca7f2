//! SQL to hypergraph conversion pipeline
//!
//! Extraction runs to completion first; the builder only sees fully extracted
//! tables and joins, and any error aborts the conversion without output.

use crate::config::SqlDialect;
use crate::error::Result;
use crate::extract::{parse_statement, JoinExtractor};
use crate::hypergraph::{Equality, Hypergraph, HypergraphBuilder};
use serde::Serialize;
use tracing::info;

/// Everything produced for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    /// Statement as re-printed by the parser
    pub statement: String,
    pub tables: Vec<String>,
    pub joins: Vec<Equality>,
    pub hypergraph: Hypergraph,
}

impl Conversion {
    /// Pretty-printed JSON report
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Convert the join structure of one SELECT query into a hypergraph
pub fn convert(sql: &str, dialect: SqlDialect) -> Result<Conversion> {
    let statement = parse_statement(sql, dialect)?;
    let extracted = JoinExtractor::extract(&statement)?;
    let hypergraph = build_hypergraph(&extracted.tables, &extracted.equalities)?;

    info!(
        hyperedges = hypergraph.hyperedges.len(),
        variables = hypergraph.variable_count(),
        "converted query"
    );

    Ok(Conversion {
        statement: statement.to_string(),
        tables: extracted.tables,
        joins: extracted.equalities,
        hypergraph,
    })
}

/// Run a fresh builder over already extracted tables and joins
pub fn build_hypergraph(tables: &[String], equalities: &[Equality]) -> Result<Hypergraph> {
    let mut builder = HypergraphBuilder::new();
    for table in tables {
        builder.declare_table(table)?;
    }
    for equality in equalities {
        builder.record_join(equality)?;
    }
    Ok(builder.build())
}
