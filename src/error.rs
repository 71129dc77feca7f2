use thiserror::Error;

#[derive(Error, Debug)]
pub enum Sql2HgError {
    #[error("SQL parse error: {0}")]
    Parse(String),

    #[error("Unsupported query shape: {0}")]
    UnsupportedQueryShape(String),

    #[error("Unknown table '{0}': not present in FROM")]
    UnknownTable(String),

    #[error("Unknown attribute '{table}.{column}': not registered as a join attribute")]
    UnknownAttribute { table: String, column: String },

    #[error("Duplicate table '{0}': already declared")]
    DuplicateTable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<sqlparser::parser::ParserError> for Sql2HgError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        Sql2HgError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Sql2HgError>;
