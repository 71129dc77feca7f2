use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use sql2hg::config::{Config, SqlDialect};
use sql2hg::convert::{convert, Conversion};
use sql2hg::observability;
use sql2hg::output::{write_conversion, OutputPaths};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Converts the join structure of a SQL query into a hypergraph
#[derive(Parser)]
#[command(name = "sql2hg")]
#[command(about = "Convert the join structure of a SELECT query into a hypergraph (.hg) and variable mapping (.map)")]
struct Args {
    /// File containing a single SELECT query
    query_file: PathBuf,

    /// Directory for the .hg and .map files (or set SQL2HG_OUT_DIR)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// SQL dialect used to parse the query (or set SQL2HG_DIALECT)
    #[arg(short, long, value_enum)]
    dialect: Option<SqlDialect>,

    /// Print the conversion as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Do not write the .hg and .map files
    #[arg(long)]
    no_write: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    observability::init_tracing(args.verbose);

    let config = Config::resolve(args.dialect, args.out_dir.clone())?;
    info!(file = %args.query_file.display(), dialect = ?config.dialect, "converting query");

    let sql = fs::read_to_string(&args.query_file)
        .with_context(|| format!("failed to read {}", args.query_file.display()))?;
    let conversion = convert(&sql, config.dialect)
        .with_context(|| format!("failed to convert {}", args.query_file.display()))?;

    if args.json {
        println!("{}", conversion.to_json()?);
    } else {
        print_report(&conversion);
    }

    if !args.no_write {
        let paths = OutputPaths::for_input(&args.query_file, &config.out_dir)?;
        write_conversion(&conversion, &paths).with_context(|| {
            format!(
                "failed to write {} / {}",
                paths.hypergraph.display(),
                paths.mapping.display()
            )
        })?;
    }

    Ok(())
}

fn print_report(conversion: &Conversion) {
    println!("{}", conversion.statement);
    println!();
    println!("Tables: [{}]", conversion.tables.iter().join(", "));
    println!("Joins: [{}]", conversion.joins.iter().join(", "));

    println!("\nHypergraph:");
    for line in conversion.hypergraph.hyperedge_lines() {
        println!("{}", line);
    }

    println!("\nMapping:");
    for line in conversion.hypergraph.mapping_lines() {
        println!("{}", line);
    }
}
