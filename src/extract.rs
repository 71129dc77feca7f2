//! Join Extraction - collects relations and equi-join facts from a parsed SELECT
//!
//! Only the join skeleton of a query is understood: relations in FROM/JOIN and
//! `AND`-conjoined `column = column` predicates in ON, WHERE and HAVING.
//! Every other shape is reported as [`Sql2HgError::UnsupportedQueryShape`] so the
//! hypergraph is never built from a query it would misrepresent.

use crate::config::SqlDialect;
use crate::error::{Result, Sql2HgError};
use crate::hypergraph::{AttributeRef, Equality};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sqlparser::ast::{
    BinaryOperator, Expr, Ident, JoinConstraint, JoinOperator, ObjectName, Query, Select,
    SetExpr, Statement, TableFactor, TableWithJoins, Visit, Visitor,
};
use sqlparser::parser::Parser;
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

/// Relations and equality facts of one query, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedJoins {
    pub tables: Vec<String>,
    pub equalities: Vec<Equality>,
}

/// Parse exactly one SQL statement
pub fn parse_statement(sql: &str, dialect: SqlDialect) -> Result<Statement> {
    let parser_dialect = dialect.parser_dialect();
    let mut statements = Parser::parse_sql(parser_dialect.as_ref(), sql)?;
    match statements.len() {
        0 => Err(unsupported("no SQL statement found")),
        1 => Ok(statements.remove(0)),
        n => Err(unsupported(format!("expected a single statement, found {}", n))),
    }
}

/// Walks a SELECT statement collecting relations and equality predicates
#[derive(Debug, Default)]
pub struct JoinExtractor<'a> {
    tables: Vec<String>,
    /// ON constraints in join order, then WHERE, then HAVING
    predicates: Vec<&'a Expr>,
    equalities: Vec<Equality>,
}

impl<'a> JoinExtractor<'a> {
    /// Extract relations and equi-joins from a parsed statement
    pub fn extract(statement: &'a Statement) -> Result<ExtractedJoins> {
        let mut extractor = Self::default();
        match statement {
            Statement::Query(query) => {
                reject_subqueries(query)?;
                extractor.visit_query(query)?
            }
            other => {
                return Err(unsupported(format!(
                    "only SELECT statements are supported, found: {}",
                    other
                )))
            }
        }
        extractor.finish()
    }

    /// Parse and extract in one step
    pub fn extract_sql(sql: &str, dialect: SqlDialect) -> Result<ExtractedJoins> {
        let statement = parse_statement(sql, dialect)?;
        JoinExtractor::extract(&statement)
    }

    fn visit_query(&mut self, query: &'a Query) -> Result<()> {
        if query.with.is_some() {
            return Err(unsupported("WITH clauses are not supported"));
        }

        match query.body.as_ref() {
            SetExpr::Select(select) => self.visit_select(select),
            // parenthesised query
            SetExpr::Query(inner) => self.visit_query(inner),
            SetExpr::SetOperation { op, .. } => Err(unsupported(format!(
                "set operation {} is not supported",
                op
            ))),
            other => Err(unsupported(format!("unsupported query body: {}", other))),
        }
    }

    fn visit_select(&mut self, select: &'a Select) -> Result<()> {
        for table_with_joins in &select.from {
            self.visit_table_with_joins(table_with_joins)?;
        }

        if let Some(selection) = &select.selection {
            self.predicates.push(selection);
        }
        if let Some(having) = &select.having {
            self.predicates.push(having);
        }
        Ok(())
    }

    fn visit_table_with_joins(&mut self, table_with_joins: &'a TableWithJoins) -> Result<()> {
        self.visit_table_factor(&table_with_joins.relation)?;
        for join in &table_with_joins.joins {
            self.visit_table_factor(&join.relation)?;
            self.visit_join_operator(&join.join_operator)?;
        }
        Ok(())
    }

    fn visit_table_factor(&mut self, factor: &'a TableFactor) -> Result<()> {
        match factor {
            TableFactor::Table { args: Some(_), .. } => Err(unsupported(format!(
                "table functions are not supported: {}",
                factor
            ))),
            TableFactor::Table { name, alias, .. } => {
                let relation = match alias {
                    Some(alias) => alias.name.value.clone(),
                    None => object_name(name),
                };
                self.add_relation(relation);
                Ok(())
            }
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => self.visit_table_with_joins(table_with_joins),
            TableFactor::Derived { .. } => Err(unsupported(
                "derived tables (subqueries in FROM) are not supported",
            )),
            other => Err(unsupported(format!("unsupported FROM item: {}", other))),
        }
    }

    fn visit_join_operator(&mut self, operator: &'a JoinOperator) -> Result<()> {
        let constraint = match operator {
            JoinOperator::Inner(constraint)
            | JoinOperator::LeftOuter(constraint)
            | JoinOperator::RightOuter(constraint)
            | JoinOperator::FullOuter(constraint) => constraint,
            JoinOperator::CrossJoin => return Ok(()),
            other => {
                return Err(unsupported(format!(
                    "join operator {:?} is not supported",
                    other
                )))
            }
        };

        match constraint {
            JoinConstraint::On(expr) => {
                self.predicates.push(expr);
                Ok(())
            }
            JoinConstraint::None => Ok(()),
            JoinConstraint::Using(columns) => Err(unsupported(format!(
                "JOIN ... USING ({}) is not supported",
                columns.iter().map(|c| c.value.as_str()).join(", ")
            ))),
            JoinConstraint::Natural => Err(unsupported("NATURAL joins are not supported")),
        }
    }

    fn add_relation(&mut self, relation: String) {
        if self.tables.contains(&relation) {
            warn!(
                relation = %relation,
                "relation referenced more than once, keeping a single hyperedge"
            );
            return;
        }
        debug!(relation = %relation, "found relation");
        self.tables.push(relation);
    }

    fn finish(mut self) -> Result<ExtractedJoins> {
        // unqualified columns can only be resolved once every relation is known
        let predicates = std::mem::take(&mut self.predicates);
        for predicate in predicates {
            self.collect_equalities(predicate)?;
        }

        info!(
            tables = self.tables.len(),
            joins = self.equalities.len(),
            "extracted join structure"
        );
        Ok(ExtractedJoins {
            tables: self.tables,
            equalities: self.equalities,
        })
    }

    fn collect_equalities(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::BinaryOp {
                left,
                op: BinaryOperator::And,
                right,
            } => {
                self.collect_equalities(left)?;
                self.collect_equalities(right)
            }
            Expr::Nested(inner) => self.collect_equalities(inner),
            Expr::BinaryOp {
                left,
                op: BinaryOperator::Eq,
                right,
            } => match (self.column_ref(left)?, self.column_ref(right)?) {
                (Some(left), Some(right)) => {
                    let equality = Equality { left, right };
                    debug!(join = %equality, "found equi-join");
                    self.equalities.push(equality);
                    Ok(())
                }
                _ => Err(unsupported(format!(
                    "only equalities between two columns are supported, found: {}",
                    expr
                ))),
            },
            other => Err(unsupported(format!(
                "only AND-conjoined column equalities are supported, found: {}",
                other
            ))),
        }
    }

    /// Attribute reference named by `expr`, or `None` when it is not a column
    fn column_ref(&self, expr: &Expr) -> Result<Option<AttributeRef>> {
        match expr {
            Expr::Nested(inner) => self.column_ref(inner),
            Expr::Identifier(ident) => self.unqualified_column(ident).map(Some),
            Expr::CompoundIdentifier(idents) => match idents.split_last() {
                Some((column, qualifier)) if !qualifier.is_empty() => {
                    let table = qualifier.iter().map(|i| i.value.as_str()).join(".");
                    Ok(Some(AttributeRef::new(table, column.value.clone())))
                }
                Some((column, _)) => self.unqualified_column(column).map(Some),
                None => Ok(None),
            },
            _ => Ok(None),
        }
    }

    fn unqualified_column(&self, column: &Ident) -> Result<AttributeRef> {
        match self.tables.as_slice() {
            [only] => Ok(AttributeRef::new(only.clone(), column.value.clone())),
            [] => Err(unsupported(format!(
                "column '{}' cannot be resolved: the query has no FROM relations",
                column.value
            ))),
            tables => Err(unsupported(format!(
                "column '{}' must be qualified when the query references {} relations",
                column.value,
                tables.len()
            ))),
        }
    }
}

/// Finds a query nested inside any expression of the statement
#[derive(Debug, Default)]
struct SubqueryFinder {
    expr_depth: usize,
}

impl Visitor for SubqueryFinder {
    type Break = String;

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if self.expr_depth > 0 {
            return ControlFlow::Break(query.to_string());
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_expr(&mut self, _expr: &Expr) -> ControlFlow<Self::Break> {
        self.expr_depth += 1;
        ControlFlow::Continue(())
    }

    fn post_visit_expr(&mut self, _expr: &Expr) -> ControlFlow<Self::Break> {
        self.expr_depth -= 1;
        ControlFlow::Continue(())
    }
}

/// Subqueries anywhere in an expression (SELECT list, WHERE, GROUP BY, ORDER BY, LIMIT, ...)
fn reject_subqueries(query: &Query) -> Result<()> {
    match query.visit(&mut SubqueryFinder::default()) {
        ControlFlow::Break(subquery) => Err(unsupported(format!(
            "subqueries are not supported: ({})",
            subquery
        ))),
        ControlFlow::Continue(()) => Ok(()),
    }
}

fn object_name(name: &ObjectName) -> String {
    name.0.iter().map(|ident| ident.value.as_str()).join(".")
}

fn unsupported(msg: impl Into<String>) -> Sql2HgError {
    Sql2HgError::UnsupportedQueryShape(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(sql: &str) -> Result<ExtractedJoins> {
        JoinExtractor::extract_sql(sql, SqlDialect::Generic)
    }

    fn assert_unsupported(sql: &str) {
        match extract(sql) {
            Err(Sql2HgError::UnsupportedQueryShape(_)) => {}
            other => panic!("expected UnsupportedQueryShape for `{}`, got {:?}", sql, other),
        }
    }

    #[test]
    fn test_comma_join_with_where() {
        let joins = extract("SELECT * FROM R, S, T WHERE R.a = S.b AND S.b = T.c").unwrap();
        assert_eq!(joins.tables, vec!["R", "S", "T"]);
        assert_eq!(
            joins.equalities,
            vec![
                Equality::new("R", "a", "S", "b"),
                Equality::new("S", "b", "T", "c"),
            ]
        );
    }

    #[test]
    fn test_explicit_joins_collect_on_before_where() {
        let joins = extract(
            "SELECT r.x FROM R JOIN S ON R.a = S.b LEFT JOIN T ON (S.c = T.c AND T.d = R.d) \
             WHERE R.e = T.e",
        )
        .unwrap();
        assert_eq!(joins.tables, vec!["R", "S", "T"]);
        assert_eq!(
            joins
                .equalities
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>(),
            vec!["R.a = S.b", "S.c = T.c", "T.d = R.d", "R.e = T.e"]
        );
    }

    #[test]
    fn test_having_predicates_are_collected() {
        let joins =
            extract("SELECT COUNT(*) FROM R, S GROUP BY R.a, S.b HAVING R.a = S.b").unwrap();
        assert_eq!(joins.equalities, vec![Equality::new("R", "a", "S", "b")]);
    }

    #[test]
    fn test_aliases_name_relations() {
        let joins = extract(
            "SELECT * FROM title AS t, movie_info mi WHERE t.id = mi.movie_id",
        )
        .unwrap();
        assert_eq!(joins.tables, vec!["t", "mi"]);
        assert_eq!(joins.equalities, vec![Equality::new("t", "id", "mi", "movie_id")]);
    }

    #[test]
    fn test_self_join_through_aliases() {
        let joins = extract("SELECT * FROM R r1, R r2 WHERE r1.a = r2.b").unwrap();
        assert_eq!(joins.tables, vec!["r1", "r2"]);
    }

    #[test]
    fn test_repeated_table_is_collected_once() {
        let joins = extract("SELECT * FROM R, S, R WHERE R.a = S.a").unwrap();
        assert_eq!(joins.tables, vec!["R", "S"]);
    }

    #[test]
    fn test_schema_qualified_names() {
        let joins = extract("SELECT * FROM db.R, db.S WHERE db.R.a = db.S.b").unwrap();
        assert_eq!(joins.tables, vec!["db.R", "db.S"]);
        assert_eq!(joins.equalities, vec![Equality::new("db.R", "a", "db.S", "b")]);
    }

    #[test]
    fn test_nested_join_in_from() {
        let joins =
            extract("SELECT * FROM (R JOIN S ON R.a = S.a) JOIN T ON S.b = T.b").unwrap();
        assert_eq!(joins.tables, vec!["R", "S", "T"]);
        assert_eq!(joins.equalities.len(), 2);
    }

    #[test]
    fn test_cross_join_and_no_predicates() {
        let joins = extract("SELECT * FROM R CROSS JOIN S").unwrap();
        assert_eq!(joins.tables, vec!["R", "S"]);
        assert!(joins.equalities.is_empty());
    }

    #[test]
    fn test_unqualified_columns_with_single_relation() {
        let joins = extract("SELECT * FROM R WHERE a = b").unwrap();
        assert_eq!(joins.equalities, vec![Equality::new("R", "a", "R", "b")]);
    }

    #[test]
    fn test_unqualified_columns_with_many_relations() {
        assert_unsupported("SELECT * FROM R, S WHERE a = S.b");
    }

    #[test]
    fn test_rejects_or() {
        assert_unsupported("SELECT * FROM R, S WHERE R.a = S.b OR R.c = S.d");
    }

    #[test]
    fn test_rejects_non_equality_predicates() {
        assert_unsupported("SELECT * FROM R, S WHERE R.a < S.b");
        assert_unsupported("SELECT * FROM R, S WHERE R.a = S.b AND R.c = 5");
        assert_unsupported("SELECT * FROM R, S WHERE R.a = S.b AND R.c IS NULL");
    }

    #[test]
    fn test_rejects_subqueries() {
        assert_unsupported("SELECT * FROM R WHERE R.a IN (SELECT S.b FROM S)");
        assert_unsupported("SELECT * FROM (SELECT * FROM R) AS x");
        assert_unsupported("SELECT (SELECT MAX(S.b) FROM S) FROM R");
    }

    #[test]
    fn test_rejects_subqueries_nested_in_expressions() {
        assert_unsupported("SELECT COALESCE((SELECT MAX(S.b) FROM S WHERE S.b = R.a), 0) FROM R");
        assert_unsupported("SELECT R.a + (SELECT 1 FROM S) AS x FROM R");
        assert_unsupported("SELECT * FROM R, S WHERE R.a = S.b AND NOT EXISTS (SELECT 1 FROM T)");
    }

    #[test]
    fn test_rejects_subqueries_outside_select_and_where() {
        assert_unsupported("SELECT R.a FROM R GROUP BY R.a, (SELECT 1 FROM S)");
        assert_unsupported("SELECT * FROM R ORDER BY (SELECT MAX(S.b) FROM S)");
        assert_unsupported("SELECT * FROM R LIMIT (SELECT 1 FROM T)");
        assert_unsupported("SELECT * FROM R LIMIT 1 OFFSET (SELECT 1 FROM T)");
    }

    #[test]
    fn test_subquery_error_names_the_subquery() {
        let err = extract("SELECT * FROM R ORDER BY (SELECT MAX(S.b) FROM S)").unwrap_err();
        assert!(err.to_string().contains("SELECT MAX(S.b) FROM S"), "got {}", err);
    }

    #[test]
    fn test_plain_order_by_and_limit_are_accepted() {
        let joins =
            extract("SELECT * FROM R, S WHERE R.a = S.b ORDER BY R.a LIMIT 10 OFFSET 5").unwrap();
        assert_eq!(joins.equalities, vec![Equality::new("R", "a", "S", "b")]);
    }

    #[test]
    fn test_rejects_table_functions() {
        assert_unsupported("SELECT * FROM generate_series(1, 3) AS g, R WHERE g.x = R.a");
    }

    #[test]
    fn test_unqualified_column_without_relations() {
        let err = extract("SELECT * WHERE a = b").unwrap_err();
        assert!(matches!(err, Sql2HgError::UnsupportedQueryShape(_)));
        assert!(err.to_string().contains("no FROM relations"), "got {}", err);
    }

    #[test]
    fn test_rejects_set_operations_and_ctes() {
        assert_unsupported("SELECT * FROM R UNION SELECT * FROM S");
        assert_unsupported("WITH x AS (SELECT * FROM R) SELECT * FROM x");
    }

    #[test]
    fn test_rejects_using_and_natural() {
        assert_unsupported("SELECT * FROM R JOIN S USING (a)");
        assert_unsupported("SELECT * FROM R NATURAL JOIN S");
    }

    #[test]
    fn test_rejects_non_select_statements() {
        assert_unsupported("INSERT INTO R VALUES (1)");
        assert_unsupported("DELETE FROM R WHERE R.a = 1");
    }

    #[test]
    fn test_rejects_multiple_statements() {
        assert_unsupported("SELECT * FROM R; SELECT * FROM S");
    }

    #[test]
    fn test_parse_error() {
        let err = extract("SELECT * FROM R WHERE").unwrap_err();
        assert!(matches!(err, Sql2HgError::Parse(_)), "got {:?}", err);
    }
}
