//! The `catalog` CLI subcommand.

use clap::Parser;
use rayon::prelude::*;
use regex::Regex;

use crate::bloq::{AnyBloq, DecomposeError};
use crate::catalog::{examples, BloqExample};
use crate::tcomplexity::{TComplexity, TComplexityCounter};

use super::CliError;

/// List, render, or check the example catalog.
#[derive(Parser, Debug)]
pub struct CatalogArgs {
    /// Only include examples whose name matches this regular expression.
    filter: Option<String>,

    /// Render a markdown table with resolved costs.
    #[arg(long)]
    markdown: bool,

    /// Resolve every example's costs and decomposition, reporting failures.
    #[arg(long)]
    check: bool,
}

impl CatalogArgs {
    /// Run the `catalog` command using the provided arguments.
    pub fn run(self) -> Result<(), CliError> {
        let selected = self.selected()?;
        if self.check {
            return check(&selected);
        }
        let listing = if self.markdown {
            markdown(&selected)?
        } else {
            selected
                .iter()
                .map(|ex| ex.name.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        };
        println!("{listing}");
        Ok(())
    }

    fn selected(&self) -> Result<Vec<BloqExample>, CliError> {
        let all = examples();
        match &self.filter {
            None => Ok(all),
            Some(f) => {
                let re = Regex::new(f)?;
                Ok(all.into_iter().filter(|ex| re.is_match(ex.name)).collect())
            }
        }
    }
}

fn markdown(selected: &[BloqExample]) -> Result<String, CliError> {
    let mut lines = vec![
        "| name | bloq | T | clifford | rotations |".to_string(),
        "| --- | --- | ---: | ---: | ---: |".to_string(),
    ];
    for ex in selected {
        let bloq = ex.bloq();
        let tc = bloq.t_complexity()?;
        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            ex.name,
            bloq.pretty_name(),
            tc.t,
            tc.clifford,
            tc.rotations
        ));
    }
    Ok(lines.join("\n"))
}

fn check(selected: &[BloqExample]) -> Result<(), CliError> {
    let failures: Vec<String> = selected
        .par_iter()
        .filter_map(|ex| {
            check_example(ex)
                .err()
                .map(|msg| format!("{}: {}", ex.name, msg))
        })
        .collect();
    for failure in &failures {
        eprintln!("{failure}");
    }
    if failures.is_empty() {
        println!("{} examples ok", selected.len());
        Ok(())
    } else {
        Err(CliError::ChecksFailed(failures.len()))
    }
}

/// Cost resolution, decomposition validity, and, where a bloq declares both
/// callee counts and a decomposition, agreement between the two.
fn check_example(ex: &BloqExample) -> Result<(), String> {
    let bloq = ex.bloq();
    let tc = bloq.t_complexity().map_err(|e| e.to_string())?;
    log::debug!("{}: {}", ex.name, tc);
    let cbloq = match bloq.decompose() {
        Ok(cbloq) => cbloq,
        Err(DecomposeError::NotImplemented) => return Ok(()),
        Err(e) => return Err(e.to_string()),
    };
    cbloq.flatten(|_| true).map_err(|e| e.to_string())?;
    if let Some(counts) = bloq.bloq_counts() {
        let declared = tally_cost(&counts)?;
        let derived = tally_cost(&cbloq.counts_tally())?;
        if declared != derived {
            return Err(format!(
                "declared counts give {declared}, the decomposition gives {derived}"
            ));
        }
    }
    Ok(())
}

fn tally_cost(counts: &[(u64, AnyBloq)]) -> Result<TComplexity, String> {
    let mut counter = TComplexityCounter::new();
    let mut total = TComplexity::ZERO;
    for (n, callee) in counts {
        total += counter.count(callee).map_err(|e| e.to_string())? * *n;
    }
    Ok(total)
}
