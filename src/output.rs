//! Output files: `<base>.hg` holds the hyperedges, `<base>.map` the variable mapping.

use crate::convert::Conversion;
use crate::error::{Result, Sql2HgError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const HYPERGRAPH_EXTENSION: &str = "hg";
pub const MAPPING_EXTENSION: &str = "map";

/// Base name of the input file, without directory and extension
pub fn base_name(input: &Path) -> Result<String> {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            Sql2HgError::Config(format!(
                "cannot derive an output name from {}",
                input.display()
            ))
        })
}

/// Destination of both output files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub hypergraph: PathBuf,
    pub mapping: PathBuf,
}

impl OutputPaths {
    pub fn for_input(input: &Path, out_dir: &Path) -> Result<Self> {
        let base = base_name(input)?;
        Ok(Self {
            hypergraph: out_dir.join(format!("{}.{}", base, HYPERGRAPH_EXTENSION)),
            mapping: out_dir.join(format!("{}.{}", base, MAPPING_EXTENSION)),
        })
    }
}

/// Create or truncate `path` and write one line per entry
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the hyperedge file, then the mapping file
pub fn write_conversion(conversion: &Conversion, paths: &OutputPaths) -> Result<()> {
    let hypergraph = &conversion.hypergraph;

    write_lines(&paths.hypergraph, &hypergraph.hyperedge_lines())?;
    info!(path = %paths.hypergraph.display(), "wrote hypergraph");

    write_lines(&paths.mapping, &hypergraph.mapping_lines())?;
    info!(path = %paths.mapping.display(), "wrote mapping");
    Ok(())
}
