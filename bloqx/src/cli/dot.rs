//! The `dot` CLI subcommand.

use clap::Parser;
use std::fs;
use std::path::PathBuf;

use super::CliError;

/// Emit a catalog example's decomposition as graphviz dot.
#[derive(Parser, Debug)]
pub struct DotArgs {
    /// Name of the catalog example to draw.
    example: String,

    /// Output to a file instead of printing.
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Recursively flatten nested decompositions before drawing.
    #[arg(long, short)]
    flatten: bool,
}

impl DotArgs {
    /// Run the `dot` command using the provided arguments.
    pub fn run(self) -> Result<(), CliError> {
        let ex = crate::catalog::find(&self.example)
            .ok_or_else(|| CliError::UnknownExample(self.example.clone()))?;
        let cbloq = ex.bloq().decompose()?;
        let cbloq = if self.flatten {
            cbloq.flatten(|_| true)?
        } else {
            cbloq
        };
        let dot = cbloq.to_dot();
        if let Some(out_path) = self.out {
            fs::write(out_path, dot)?;
        } else {
            print!("{dot}");
        }
        Ok(())
    }
}
