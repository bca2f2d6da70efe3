//! The `report` CLI subcommand.

use clap::Parser;
use petgraph::visit::EdgeRef;
use std::fs;
use std::path::PathBuf;

use crate::bloq::AnyBloq;
use crate::surface_code::AlgorithmSummary;

use super::CliError;

/// Print a resource report for a catalog example.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Name of the catalog example to report on.
    example: String,

    /// Output to a file instead of printing the results.
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Synthesis precision used to convert rotations into T gates.
    #[arg(long, default_value_t = 1e-11)]
    eps: f64,
}

impl ReportArgs {
    /// Run the `report` command using the provided arguments.
    pub fn run(self) -> Result<(), CliError> {
        let ex = crate::catalog::find(&self.example)
            .ok_or_else(|| CliError::UnknownExample(self.example.clone()))?;
        let report = render(ex.name, &ex.bloq(), self.eps)?;
        if let Some(out_path) = self.out {
            fs::write(out_path, report)?;
        } else {
            print!("{report}");
        }
        Ok(())
    }
}

fn render(name: &str, bloq: &AnyBloq, eps: f64) -> Result<String, CliError> {
    let cg = bloq.call_graph()?;
    let sigma = cg.sigma()?;
    let tc = bloq.t_complexity()?;
    let mut summary = AlgorithmSummary::from_sigma(&sigma)?;
    summary.algorithm_qubits = bloq.signature().n_qubits();

    let mut lines = vec![
        format!("{}: {}", name, bloq.pretty_name()),
        format!("qubits: {}", summary.algorithm_qubits),
        format!("t-complexity: {tc}"),
        format!("total T at eps {:e}: {}", eps, tc.total_t(eps)),
        String::new(),
        "call graph:".to_string(),
    ];
    let graph = cg.graph();
    for edge in graph.edge_references() {
        lines.push(format!(
            "  {} -> {} x{}",
            graph[edge.source()],
            graph[edge.target()],
            edge.weight()
        ));
    }
    lines.push(String::new());
    lines.push("leaf tally:".to_string());
    for (leaf, n) in &sigma {
        lines.push(format!("  {n:>8} x {leaf}"));
    }
    lines.push(String::new());
    lines.push(format!(
        "summary: {} T, {} Toffoli, {} rotations",
        summary.t_gates, summary.toffoli_gates, summary.rotation_gates
    ));
    lines.push(String::new());
    Ok(lines.join("\n"))
}
