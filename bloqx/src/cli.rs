//! The bloqx command line interface.

use clap::{crate_version, Parser};

pub mod catalog;
pub mod dot;
pub mod report;

/// CLI arguments.
#[derive(Parser, Debug)]
#[clap(version = crate_version!(), long_about = None)]
#[clap(about = "bloqx command line interface")]
pub enum Cli {
    /// Print a resource report for a catalog example.
    Report(report::ReportArgs),
    /// Emit a catalog example's decomposition as graphviz dot.
    Dot(dot::DotArgs),
    /// List, render, or check the example catalog.
    Catalog(catalog::CatalogArgs),
}

/// Error type for the CLI.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum CliError {
    /// Error reading or writing files.
    #[display("IO error: {_0}")]
    IO(std::io::Error),
    /// The requested name is not in the registry.
    #[display("no catalog example named '{_0}'")]
    UnknownExample(String),
    /// Resource counting failed.
    #[display("counting failed: {_0}")]
    Count(crate::callgraph::CountError),
    /// Building a decomposition failed.
    #[display("decomposing failed: {_0}")]
    Decompose(crate::bloq::DecomposeError),
    /// Flattening a composite failed.
    #[display("flattening failed: {_0}")]
    Flatten(crate::composite::FlattenError),
    /// The catalog filter is not a valid regular expression.
    #[display("invalid filter: {_0}")]
    Filter(regex::Error),
    /// One or more catalog checks failed.
    #[display("{_0} catalog check(s) failed")]
    ChecksFailed(usize),
}

impl Cli {
    pub fn run(self) -> Result<(), CliError> {
        match self {
            Cli::Report(args) => args.run(),
            Cli::Dot(args) => args.run(),
            Cli::Catalog(args) => args.run(),
        }
    }
}
