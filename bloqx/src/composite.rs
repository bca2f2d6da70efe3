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

//! Composite bloqs: directed acyclic graphs of wired bloq instances.
//!
//! A [`CompositeBloq`] is itself a bloq. Its nodes are [`BloqInstance`]s plus
//! two virtual dangling nodes standing for the composite's own left and right
//! edges; its edges are [`Connection`]s between [`Soquet`]s. Every soquet is
//! produced exactly once and consumed exactly once, which is what lets the
//! graph be reversed, flattened and simulated without bookkeeping beyond the
//! connection list.

use std::fmt::{self, Display};

use rustc_hash::FxHashMap;

use crate::bloq::{AnyBloq, Bloq, DecomposeError};
use crate::builder::{BloqBuilder, BuildError, SoqMap, Soqs};
use crate::classical::{ClassicalError, ClassicalVals};
use crate::register::{Register, Signature};
use crate::tcomplexity::TComplexity;

/// One occurrence of a bloq inside a composite.
///
/// The index `i` distinguishes repeated uses of equal bloqs; within a
/// composite, instance `k` of the instance list has `i == k`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BloqInstance {
    pub bloq: AnyBloq,
    pub i: usize,
}

impl Display for BloqInstance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}<{}>", self.bloq.pretty_name(), self.i)
    }
}

/// A node of the dataflow graph: a bloq instance or one of the two virtual
/// edge nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// Source of the composite's left-edge soquets.
    LeftDangle,
    /// Sink of the composite's right-edge soquets.
    RightDangle,
    Binst(BloqInstance),
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::LeftDangle => write!(f, "LeftDangle"),
            Node::RightDangle => write!(f, "RightDangle"),
            Node::Binst(b) => write!(f, "{b}"),
        }
    }
}

/// One port of one node: a register element of a bloq instance or dangle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Soquet {
    pub node: Node,
    pub reg: Register,
    /// Element index into `reg.shape`; empty for shapeless registers.
    pub idx: Vec<usize>,
}

impl Display for Soquet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.reg.name)?;
        if !self.idx.is_empty() {
            write!(f, "{:?}", self.idx)?;
        }
        Ok(())
    }
}

/// A directed wire from a producing soquet to a consuming soquet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    pub left: Soquet,
    pub right: Soquet,
}

impl Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.left, self.right)
    }
}

/// A bloq defined by a wiring diagram of other bloqs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeBloq {
    binsts: Vec<BloqInstance>,
    connections: Vec<Connection>,
    signature: Signature,
}

impl CompositeBloq {
    pub(crate) fn new(
        binsts: Vec<BloqInstance>,
        connections: Vec<Connection>,
        signature: Signature,
    ) -> Self {
        debug_assert!(binsts.iter().enumerate().all(|(k, b)| b.i == k));
        CompositeBloq {
            binsts,
            connections,
            signature,
        }
    }

    pub fn bloq_instances(&self) -> &[BloqInstance] {
        &self.binsts
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Maps each consuming soquet to the soquet that produces its data.
    pub fn predecessors(&self) -> FxHashMap<Soquet, Soquet> {
        self.connections
            .iter()
            .map(|c| (c.right.clone(), c.left.clone()))
            .collect()
    }

    /// Maps each producing soquet to the soquet that consumes its data.
    pub fn successors(&self) -> FxHashMap<Soquet, Soquet> {
        self.connections
            .iter()
            .map(|c| (c.left.clone(), c.right.clone()))
            .collect()
    }

    /// Instances in topological order, ties broken by instance index.
    pub fn iter_binsts(&self) -> Vec<BloqInstance> {
        use std::cmp::Reverse;
        use std::collections::BinaryHeap;

        let n = self.binsts.len();
        let mut indeg = vec![0usize; n];
        let mut succs: Vec<Vec<usize>> = vec![vec![]; n];
        for c in &self.connections {
            if let (Node::Binst(p), Node::Binst(s)) = (&c.left.node, &c.right.node) {
                succs[p.i].push(s.i);
                indeg[s.i] += 1;
            }
        }
        let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
            .filter(|&i| indeg[i] == 0)
            .map(Reverse)
            .collect();
        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(i)) = ready.pop() {
            order.push(self.binsts[i].clone());
            for &s in &succs[i] {
                indeg[s] -= 1;
                if indeg[s] == 0 {
                    ready.push(Reverse(s));
                }
            }
        }
        debug_assert_eq!(order.len(), n, "connection graph has a cycle");
        order
    }

    /// The soquets feeding the composite's right edge, keyed by register
    /// name.
    pub fn final_soquets(&self) -> SoqMap {
        let preds = self.predecessors();
        let mut out = SoqMap::new();
        for reg in self.signature.rights() {
            let mut soqs = Vec::with_capacity(reg.num_elements());
            for idx in reg.all_idxs() {
                let port = Soquet {
                    node: Node::RightDangle,
                    reg: reg.clone(),
                    idx,
                };
                let producer = preds.get(&port).expect("every right dangle is fed");
                soqs.push(producer.clone());
            }
            out.insert(&reg.name, Soqs::for_register(reg, soqs));
        }
        out
    }

    /// Tallies the instances by bloq, in order of first appearance.
    pub fn counts_tally(&self) -> Vec<(u64, AnyBloq)> {
        let mut order: Vec<AnyBloq> = Vec::new();
        let mut tally: FxHashMap<AnyBloq, u64> = FxHashMap::default();
        for binst in &self.binsts {
            let n = tally.entry(binst.bloq.clone()).or_insert_with(|| {
                order.push(binst.bloq.clone());
                0
            });
            *n += 1;
        }
        order.into_iter().map(|b| (tally[&b], b)).collect()
    }

    /// The reversed diagram: every instance adjointed, every wire flipped.
    ///
    /// This is purely structural and always succeeds; instances whose bloq
    /// declares no adjoint get wrapped in [`crate::bloq::Adjoint`].
    pub fn adjoint(&self) -> CompositeBloq {
        let flip = |soq: &Soquet| -> Soquet {
            let node = match &soq.node {
                Node::LeftDangle => Node::RightDangle,
                Node::RightDangle => Node::LeftDangle,
                Node::Binst(b) => Node::Binst(BloqInstance {
                    bloq: b.bloq.adjoint(),
                    i: b.i,
                }),
            };
            Soquet {
                node,
                reg: soq.reg.adjoint(),
                idx: soq.idx.clone(),
            }
        };
        let binsts = self
            .binsts
            .iter()
            .map(|b| BloqInstance {
                bloq: b.bloq.adjoint(),
                i: b.i,
            })
            .collect();
        let connections = self
            .connections
            .iter()
            .map(|c| Connection {
                left: flip(&c.right),
                right: flip(&c.left),
            })
            .collect();
        CompositeBloq {
            binsts,
            connections,
            signature: self.signature.adjoint(),
        }
    }

    /// Rebuilds the diagram with the instances selected by `pred` replaced by
    /// their decompositions. Instances whose bloq has no decomposition are
    /// kept as-is even when selected.
    pub fn flatten_once(
        &self,
        pred: impl Fn(&BloqInstance) -> bool,
    ) -> Result<CompositeBloq, FlattenError> {
        let preds = self.predecessors();
        let (mut bb, mut init) = BloqBuilder::from_signature(self.signature.clone());

        // original producer soquet -> soquet in the rebuilt diagram
        let mut xlat: FxHashMap<Soquet, Soquet> = FxHashMap::default();
        for reg in self.signature.lefts() {
            let soqs = init.take(&reg.name);
            for (idx, new_soq) in reg.all_idxs().into_iter().zip(soqs.into_vec()) {
                let orig = Soquet {
                    node: Node::LeftDangle,
                    reg: reg.clone(),
                    idx,
                };
                xlat.insert(orig, new_soq);
            }
        }

        let mut flattened_any = false;
        for binst in self.iter_binsts() {
            let sig = binst.bloq.signature();
            let mut in_soqs = SoqMap::new();
            for reg in sig.lefts() {
                let mut soqs = Vec::with_capacity(reg.num_elements());
                for idx in reg.all_idxs() {
                    let port = Soquet {
                        node: Node::Binst(binst.clone()),
                        reg: reg.clone(),
                        idx,
                    };
                    let producer = preds.get(&port).expect("every left port is connected");
                    let translated = xlat
                        .remove(producer)
                        .expect("each producer feeds exactly one consumer");
                    soqs.push(translated);
                }
                in_soqs.insert(&reg.name, Soqs::for_register(reg, soqs));
            }

            let mut out = if pred(&binst) {
                match binst.bloq.decompose() {
                    Ok(cbloq) => {
                        flattened_any = true;
                        bb.add_from(&cbloq, in_soqs)?
                    }
                    Err(DecomposeError::NotImplemented) => bb.add(binst.bloq.clone(), in_soqs)?,
                    Err(e @ DecomposeError::Build(_)) => return Err(FlattenError::Decompose(e)),
                }
            } else {
                bb.add(binst.bloq.clone(), in_soqs)?
            };

            for reg in sig.rights() {
                let soqs = out.take(&reg.name);
                for (idx, new_soq) in reg.all_idxs().into_iter().zip(soqs.into_vec()) {
                    let orig = Soquet {
                        node: Node::Binst(binst.clone()),
                        reg: reg.clone(),
                        idx,
                    };
                    xlat.insert(orig, new_soq);
                }
            }
        }
        if !flattened_any {
            return Err(FlattenError::DidNotFlattenAnything);
        }

        let mut fin = SoqMap::new();
        for reg in self.signature.rights() {
            let mut soqs = Vec::with_capacity(reg.num_elements());
            for idx in reg.all_idxs() {
                let port = Soquet {
                    node: Node::RightDangle,
                    reg: reg.clone(),
                    idx,
                };
                let producer = preds.get(&port).expect("every right dangle is fed");
                let translated = xlat
                    .remove(producer)
                    .expect("each producer feeds exactly one consumer");
                soqs.push(translated);
            }
            fin.insert(&reg.name, Soqs::for_register(reg, soqs));
        }
        Ok(bb.finalize(fin)?)
    }

    /// Repeatedly flattens the instances selected by `pred` until nothing
    /// selected decomposes any further.
    pub fn flatten(
        &self,
        pred: impl Fn(&BloqInstance) -> bool,
    ) -> Result<CompositeBloq, FlattenError> {
        let mut cbloq = self.clone();
        loop {
            match cbloq.flatten_once(&pred) {
                Ok(next) => cbloq = next,
                Err(FlattenError::DidNotFlattenAnything) => return Ok(cbloq),
                Err(e) => return Err(e),
            }
        }
    }

    /// A line-per-instance description of the wiring, for tests and debug
    /// output.
    pub fn debug_text(&self) -> String {
        crate::drawing::debug_text(self)
    }

    /// Graphviz source for the wiring diagram.
    pub fn to_dot(&self) -> String {
        crate::drawing::to_dot(self)
    }
}

impl Bloq for CompositeBloq {
    fn signature(&self) -> Signature {
        self.signature.clone()
    }

    fn pretty_name(&self) -> String {
        "CompositeBloq".to_string()
    }

    fn build_composite(&self, bb: &mut BloqBuilder, soqs: SoqMap) -> Result<SoqMap, DecomposeError> {
        Ok(bb.add_from(self, soqs)?)
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(self.counts_tally())
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        None
    }

    fn on_classical_vals(&self, vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        crate::classical::cbloq_on_classical_vals(self, vals)
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(self.adjoint().into())
    }
}

/// Errors from [`CompositeBloq::flatten_once`] and [`CompositeBloq::flatten`].
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum FlattenError {
    #[display("no selected instance had a decomposition")]
    DidNotFlattenAnything,
    #[display("decomposing an instance failed: {_0}")]
    Decompose(DecomposeError),
    #[display("rewiring failed: {_0}")]
    #[from]
    Build(BuildError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloqs::basic::{CNot, TGate, TwoBitSwap, XGate};
    use crate::builder::BloqBuilder;
    use crate::register::Signature;

    fn xtx_chain() -> CompositeBloq {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("q", 1)]));
        let mut q = soqs.take_one("q");
        for bloq in [
            AnyBloq::from(XGate),
            TGate::default().into(),
            XGate.into(),
        ] {
            q = bb.add(bloq, [("q", q.into())].into()).unwrap().take_one("q");
        }
        bb.finalize([("q", q.into())].into()).unwrap()
    }

    #[test]
    fn instances_and_tally() {
        let cbloq = xtx_chain();
        assert_eq!(cbloq.bloq_instances().len(), 3);
        // 3 instances, 4 wires: dangle -> X -> T -> X -> dangle
        assert_eq!(cbloq.connections().len(), 4);
        let tally = cbloq.counts_tally();
        assert_eq!(tally.len(), 2);
        assert_eq!(tally[0], (2, XGate.into()));
        assert_eq!(tally[1], (1, TGate::default().into()));
    }

    #[test]
    fn topological_iteration() {
        let cbloq = xtx_chain();
        let order: Vec<usize> = cbloq.iter_binsts().iter().map(|b| b.i).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn final_soquets_point_at_last_instance() {
        let cbloq = xtx_chain();
        let mut fins = cbloq.final_soquets();
        let soq = fins.take_one("q");
        assert!(matches!(soq.node, Node::Binst(ref b) if b.i == 2));
    }

    #[test]
    fn predecessor_map_inverts_successors() {
        let cbloq = xtx_chain();
        let preds = cbloq.predecessors();
        let succs = cbloq.successors();
        assert_eq!(preds.len(), cbloq.connections().len());
        for (consumer, producer) in &preds {
            assert_eq!(&succs[producer], consumer);
        }
    }

    #[test]
    fn structural_adjoint_reverses_order() {
        let cbloq = xtx_chain();
        let adj = cbloq.adjoint();
        assert_eq!(adj.bloq_instances().len(), 3);
        let bloqs: Vec<AnyBloq> = adj.iter_binsts().iter().map(|b| b.bloq.clone()).collect();
        // X ... X self-adjoint at the ends, T became T† in the middle
        assert_eq!(bloqs[0], XGate.into());
        assert_eq!(bloqs[1], TGate { is_adjoint: true }.into());
        assert_eq!(bloqs[2], XGate.into());
    }

    #[test]
    fn adjoint_twice_is_identity() {
        let cbloq = xtx_chain();
        assert_eq!(cbloq.adjoint().adjoint(), cbloq);
    }

    #[test]
    fn flatten_replaces_swap_with_cnots() {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("x", 1), ("y", 1)]));
        let x = soqs.take_one("x");
        let y = soqs.take_one("y");
        let mut out = bb
            .add(TwoBitSwap, [("x", x.into()), ("y", y.into())].into())
            .unwrap();
        let cbloq = bb
            .finalize(
                [
                    ("x", out.take_one("x").into()),
                    ("y", out.take_one("y").into()),
                ]
                .into(),
            )
            .unwrap();

        let flat = cbloq.flatten_once(|_| true).unwrap();
        assert_eq!(flat.counts_tally(), vec![(3, CNot.into())]);
    }

    #[test]
    fn flatten_keeps_atoms() {
        let cbloq = xtx_chain();
        // X and T are atomic: nothing to flatten
        assert!(matches!(
            cbloq.flatten_once(|_| true),
            Err(FlattenError::DidNotFlattenAnything)
        ));
        // but flatten() treats that as convergence
        let same = cbloq.flatten(|_| true).unwrap();
        assert_eq!(same.bloq_instances().len(), 3);
    }
}
