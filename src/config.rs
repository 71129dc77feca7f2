//! Runtime configuration
//!
//! Command-line values win; otherwise `SQL2HG_DIALECT` / `SQL2HG_OUT_DIR` from the
//! environment (a `.env` file is loaded by the binary), then built-in defaults.

use crate::error::{Result, Sql2HgError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sqlparser::dialect::{
    AnsiDialect, BigQueryDialect, Dialect, DuckDbDialect, GenericDialect, HiveDialect,
    MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect, SnowflakeDialect,
};
use std::path::PathBuf;

pub const DIALECT_ENV: &str = "SQL2HG_DIALECT";
pub const OUT_DIR_ENV: &str = "SQL2HG_OUT_DIR";

/// SQL dialect used to parse the query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum SqlDialect {
    #[default]
    Generic,
    Ansi,
    #[value(name = "postgres")]
    PostgreSql,
    #[value(name = "mysql")]
    MySql,
    Sqlite,
    #[value(name = "mssql")]
    MsSql,
    Snowflake,
    #[value(name = "bigquery")]
    BigQuery,
    Hive,
    #[value(name = "duckdb")]
    DuckDb,
}

impl SqlDialect {
    pub fn parser_dialect(&self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::Generic => Box::new(GenericDialect {}),
            SqlDialect::Ansi => Box::new(AnsiDialect {}),
            SqlDialect::PostgreSql => Box::new(PostgreSqlDialect {}),
            SqlDialect::MySql => Box::new(MySqlDialect {}),
            SqlDialect::Sqlite => Box::new(SQLiteDialect {}),
            SqlDialect::MsSql => Box::new(MsSqlDialect {}),
            SqlDialect::Snowflake => Box::new(SnowflakeDialect {}),
            SqlDialect::BigQuery => Box::new(BigQueryDialect {}),
            SqlDialect::Hive => Box::new(HiveDialect {}),
            SqlDialect::DuckDb => Box::new(DuckDbDialect {}),
        }
    }

    /// Parse a dialect name, ignoring case
    pub fn from_name(name: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(name.trim(), true)
            .map_err(|_| Sql2HgError::Config(format!("unknown SQL dialect '{}'", name)))
    }
}

/// Resolved configuration for one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dialect: SqlDialect,

    /// Directory receiving the `.hg` and `.map` files
    pub out_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: SqlDialect::Generic,
            out_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Resolve against the process environment
    pub fn resolve(dialect: Option<SqlDialect>, out_dir: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with(dialect, out_dir, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup
    pub fn resolve_with<F>(
        dialect: Option<SqlDialect>,
        out_dir: Option<PathBuf>,
        env: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let dialect = match dialect {
            Some(dialect) => dialect,
            None => match env(DIALECT_ENV).filter(|v| !v.trim().is_empty()) {
                Some(name) => SqlDialect::from_name(&name)?,
                None => defaults.dialect,
            },
        };

        let out_dir = out_dir
            .or_else(|| {
                env(OUT_DIR_ENV)
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or(defaults.out_dir);

        if out_dir.is_file() {
            return Err(Sql2HgError::Config(format!(
                "output directory {} is a file",
                out_dir.display()
            )));
        }

        Ok(Self { dialect, out_dir })
    }
}
