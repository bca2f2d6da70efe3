// bloqx - Rust library for building and costing quantum algorithms
//         from composable, typed bloqs
// Copyright (C) 2025 - the bloqx developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Call graphs: who calls whom, and how many times.
//!
//! A bloq's call graph is a DAG with bloqs as nodes and `caller -> callee`
//! edges weighted by calls per single invocation of the caller. Multiplying
//! weights down the paths from the root gives `sigma`, the total leaf tally,
//! which is what resource estimates consume.

use log::debug;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rustc_hash::FxHashMap;

use crate::bloq::{AnyBloq, Bloq, DecomposeError};

/// Errors from counting callees or resolving costs.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum CountError {
    #[display("no way to count {_0}")]
    Unresolvable(String),
    #[display("call graph contains a cycle through {_0}")]
    Cyclic(String),
    #[display("decomposition failed: {_0}")]
    #[from]
    Decompose(DecomposeError),
}

/// A rooted DAG of callee counts.
#[derive(Debug)]
pub struct CallGraph {
    graph: DiGraph<AnyBloq, u64>,
    root: NodeIndex,
}

impl CallGraph {
    pub fn graph(&self) -> &DiGraph<AnyBloq, u64> {
        &self.graph
    }

    pub fn root(&self) -> &AnyBloq {
        &self.graph[self.root]
    }

    /// Bloqs that were not expanded any further, in first-seen order.
    pub fn leaves(&self) -> Vec<AnyBloq> {
        self.graph
            .node_indices()
            .filter(|&ix| self.graph.edges_directed(ix, Direction::Outgoing).next().is_none())
            .map(|ix| self.graph[ix].clone())
            .collect()
    }

    /// Total calls of each leaf per single invocation of the root.
    pub fn sigma(&self) -> Result<Vec<(AnyBloq, u64)>, CountError> {
        let order = toposort(&self.graph, None)
            .map_err(|c| CountError::Cyclic(self.graph[c.node_id()].pretty_name()))?;
        let mut mult: FxHashMap<NodeIndex, u64> = FxHashMap::default();
        mult.insert(self.root, 1);
        for ix in order {
            let m = match mult.get(&ix) {
                Some(&m) => m,
                // not reachable from the root
                None => continue,
            };
            for edge in self.graph.edges_directed(ix, Direction::Outgoing) {
                use petgraph::visit::EdgeRef;
                *mult.entry(edge.target()).or_insert(0) += m * edge.weight();
            }
        }
        Ok(self
            .graph
            .node_indices()
            .filter(|&ix| self.graph.edges_directed(ix, Direction::Outgoing).next().is_none())
            .map(|ix| (self.graph[ix].clone(), mult.get(&ix).copied().unwrap_or(0)))
            .collect())
    }

    /// Leaf T gates per root invocation, synthesizing rotations at `eps`.
    pub fn t_counts(&self, eps: f64) -> Result<u64, CountError> {
        let sigma = self.sigma()?;
        crate::tcomplexity::t_counts_from_sigma(&sigma, eps)
    }
}

/// A callee-tally transformation applied while building a call graph.
/// Returning `None` drops the bloq from the graph entirely.
pub type Generalizer = Box<dyn Fn(AnyBloq) -> Option<AnyBloq>>;

/// Drops the bookkeeping bloqs that reshape wires without acting on them.
pub fn ignore_split_join(b: AnyBloq) -> Option<AnyBloq> {
    use crate::bloqs::util::{Cast, Join, Split};
    if b.is::<Split>() || b.is::<Join>() || b.is::<Cast>() {
        None
    } else {
        Some(b)
    }
}

/// Drops qubit allocation and deallocation.
pub fn ignore_alloc_free(b: AnyBloq) -> Option<AnyBloq> {
    use crate::bloqs::util::{Allocate, Free};
    if b.is::<Allocate>() || b.is::<Free>() {
        None
    } else {
        Some(b)
    }
}

/// Builds [`CallGraph`]s breadth-first from a root bloq.
///
/// Callee tallies come from [`Bloq::bloq_counts`] when declared, else from
/// the decomposition; a bloq with neither is a leaf. Generalizers run on
/// every callee (not the root) and merged duplicates accumulate their edge
/// weights.
#[derive(Default)]
pub struct CallGraphBuilder {
    generalizers: Vec<Generalizer>,
    keep: Option<Box<dyn Fn(&AnyBloq) -> bool>>,
    max_depth: Option<usize>,
}

impl CallGraphBuilder {
    pub fn new() -> Self {
        CallGraphBuilder::default()
    }

    /// Adds a generalizer; generalizers run in the order added.
    pub fn with_generalizer(
        mut self,
        g: impl Fn(AnyBloq) -> Option<AnyBloq> + 'static,
    ) -> Self {
        self.generalizers.push(Box::new(g));
        self
    }

    /// Bloqs matching `keep` are left unexpanded even if they could
    /// decompose.
    pub fn with_keep(mut self, keep: impl Fn(&AnyBloq) -> bool + 'static) -> Self {
        self.keep = Some(Box::new(keep));
        self
    }

    /// Stops expanding below `depth` levels from the root.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn build(&self, root: AnyBloq) -> Result<CallGraph, CountError> {
        let mut graph: DiGraph<AnyBloq, u64> = DiGraph::new();
        let mut node_ix: FxHashMap<AnyBloq, NodeIndex> = FxHashMap::default();
        let root_ix = graph.add_node(root.clone());
        node_ix.insert(root, root_ix);

        let mut queue = std::collections::VecDeque::new();
        queue.push_back((root_ix, 0usize));
        while let Some((ix, depth)) = queue.pop_front() {
            if self.max_depth.is_some_and(|max| depth >= max) {
                debug!("not expanding {} below max depth", graph[ix]);
                continue;
            }
            let bloq = graph[ix].clone();
            if self.keep.as_ref().is_some_and(|keep| keep(&bloq)) {
                continue;
            }
            let callees = match self.callees(&bloq)? {
                Some(callees) => callees,
                None => continue,
            };
            for (n, callee) in callees {
                let Some(callee) = self.generalize(callee) else {
                    continue;
                };
                let child_ix = *node_ix.entry(callee.clone()).or_insert_with(|| {
                    let child_ix = graph.add_node(callee);
                    queue.push_back((child_ix, depth + 1));
                    child_ix
                });
                match graph.find_edge(ix, child_ix) {
                    Some(e) => graph[e] += n,
                    None => {
                        graph.add_edge(ix, child_ix, n);
                    }
                }
            }
        }
        Ok(CallGraph {
            graph,
            root: root_ix,
        })
    }

    fn callees(&self, bloq: &AnyBloq) -> Result<Option<Vec<(u64, AnyBloq)>>, CountError> {
        if let Some(counts) = bloq.bloq_counts() {
            return Ok(Some(counts));
        }
        match bloq.decompose() {
            Ok(cbloq) => Ok(Some(cbloq.counts_tally())),
            Err(DecomposeError::NotImplemented) => Ok(None),
            Err(e) => Err(CountError::Decompose(e)),
        }
    }

    fn generalize(&self, bloq: AnyBloq) -> Option<AnyBloq> {
        let mut bloq = bloq;
        for g in &self.generalizers {
            bloq = g(bloq)?;
        }
        Some(bloq)
    }
}
