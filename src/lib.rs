pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod hypergraph;
pub mod observability;
pub mod output;

pub use config::{Config, SqlDialect};
pub use convert::{build_hypergraph, convert, Conversion};
pub use error::{Result, Sql2HgError};
pub use extract::{ExtractedJoins, JoinExtractor};
pub use hypergraph::{Hypergraph, HypergraphBuilder};
