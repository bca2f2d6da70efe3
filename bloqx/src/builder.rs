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

//! Imperative construction of [`CompositeBloq`]s.
//!
//! A [`BloqBuilder`] hands out [`Soquet`]s and enforces that each one is
//! consumed exactly once: wiring an already-consumed soquet, a soquet from
//! another builder, or leaving soquets dangling at
//! [`finalize`](BloqBuilder::finalize) are all errors. Bloq authors meet this
//! API in [`Bloq::build_composite`](crate::bloq::Bloq::build_composite),
//! where the builder is handed to them along with the incoming soquets.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::bloq::{AnyBloq, Bloq};
use crate::bloqs::util::{Allocate, Free, Join, Split};
use crate::composite::{BloqInstance, CompositeBloq, Connection, Node, Soquet};
use crate::dtype::QDType;
use crate::register::{Register, Side, Signature};

/// The soquets filling one register: a single soquet for a shapeless
/// register, a row-major array for a shaped one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Soqs {
    One(Soquet),
    Many(Vec<Soquet>),
}

impl Soqs {
    /// Packs soquets for `reg`: `One` when the register is shapeless.
    pub fn for_register(reg: &Register, mut soqs: Vec<Soquet>) -> Soqs {
        if reg.shape.is_empty() {
            assert_eq!(soqs.len(), 1, "shapeless register takes one soquet");
            Soqs::One(soqs.pop().unwrap())
        } else {
            Soqs::Many(soqs)
        }
    }

    pub fn into_vec(self) -> Vec<Soquet> {
        match self {
            Soqs::One(s) => vec![s],
            Soqs::Many(v) => v,
        }
    }

    fn len(&self) -> usize {
        match self {
            Soqs::One(_) => 1,
            Soqs::Many(v) => v.len(),
        }
    }

    fn shape_desc(&self) -> String {
        match self {
            Soqs::One(_) => "a single soquet".to_string(),
            Soqs::Many(v) => format!("an array of {}", v.len()),
        }
    }
}

impl From<Soquet> for Soqs {
    fn from(s: Soquet) -> Self {
        Soqs::One(s)
    }
}

impl From<Vec<Soquet>> for Soqs {
    fn from(v: Vec<Soquet>) -> Self {
        Soqs::Many(v)
    }
}

/// Soquets keyed by register name, in insertion order.
///
/// The `take_*` accessors panic on a missing or wrongly-shaped name: inside
/// `build_composite` the builder guarantees one entry per left register, so a
/// failed lookup is a bug in the bloq, not a runtime condition.
#[derive(Debug, Clone, Default)]
pub struct SoqMap {
    entries: Vec<(String, Soqs)>,
}

impl SoqMap {
    pub fn new() -> Self {
        SoqMap::default()
    }

    pub fn insert(&mut self, name: &str, soqs: impl Into<Soqs>) {
        assert!(
            self.entries.iter().all(|(n, _)| n != name),
            "duplicate soquet entry {name}"
        );
        self.entries.push((name.to_string(), soqs.into()));
    }

    /// Removes and returns the entry for `name`. Panics if absent.
    pub fn take(&mut self, name: &str) -> Soqs {
        let pos = self
            .entries
            .iter()
            .position(|(n, _)| n == name)
            .unwrap_or_else(|| panic!("no soquet named {name}"));
        self.entries.remove(pos).1
    }

    /// Like [`take`](Self::take), for a shapeless register.
    pub fn take_one(&mut self, name: &str) -> Soquet {
        match self.take(name) {
            Soqs::One(s) => s,
            Soqs::Many(_) => panic!("soquet {name} is an array"),
        }
    }

    /// Like [`take`](Self::take), for a shaped register.
    pub fn take_many(&mut self, name: &str) -> Vec<Soquet> {
        match self.take(name) {
            Soqs::One(_) => panic!("soquet {name} is not an array"),
            Soqs::Many(v) => v,
        }
    }

    fn try_take(&mut self, name: &str) -> Option<Soqs> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

impl<const N: usize> From<[(&str, Soqs); N]> for SoqMap {
    fn from(arr: [(&str, Soqs); N]) -> Self {
        let mut m = SoqMap::new();
        for (name, soqs) in arr {
            m.insert(name, soqs);
        }
        m
    }
}

impl IntoIterator for SoqMap {
    type Item = (String, Soqs);
    type IntoIter = std::vec::IntoIter<(String, Soqs)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Builds a [`CompositeBloq`] one instance at a time.
pub struct BloqBuilder {
    /// `Some` when built against a fixed signature.
    signature: Option<Signature>,
    /// Registers declared so far, in growable-signature mode.
    grown: Vec<Register>,
    binsts: Vec<BloqInstance>,
    connections: Vec<Connection>,
    /// Soquets produced but not yet consumed.
    available: FxHashSet<Soquet>,
    /// Every soquet this builder has ever produced.
    issued: FxHashSet<Soquet>,
}

impl BloqBuilder {
    /// A builder with a growable signature: registers are declared with
    /// [`add_register`](Self::add_register) and right registers are inferred
    /// at [`finalize`](Self::finalize).
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        BloqBuilder {
            signature: None,
            grown: Vec::new(),
            binsts: Vec::new(),
            connections: Vec::new(),
            available: FxHashSet::default(),
            issued: FxHashSet::default(),
        }
    }

    /// A builder for a known signature, along with the left-edge soquets, one
    /// entry per left register.
    pub fn from_signature(signature: Signature) -> (Self, SoqMap) {
        let mut bb = BloqBuilder::new();
        let mut soqs = SoqMap::new();
        for reg in signature.lefts() {
            let issued = bb.issue(Node::LeftDangle, reg);
            soqs.insert(&reg.name, Soqs::for_register(reg, issued));
        }
        bb.signature = Some(signature);
        (bb, soqs)
    }

    /// Declares a register in growable-signature mode, returning its
    /// left-edge soquets when it has a left side.
    ///
    /// # Panics
    ///
    /// Panics when the builder was created with a fixed signature.
    pub fn add_register(&mut self, reg: Register) -> Option<Soqs> {
        assert!(
            self.signature.is_none(),
            "cannot grow a fixed signature"
        );
        let soqs = if reg.side.has_left() {
            let issued = self.issue(Node::LeftDangle, &reg);
            Some(Soqs::for_register(&reg, issued))
        } else {
            None
        };
        self.grown.push(reg);
        soqs
    }

    /// Issues fresh soquets for every element of `reg` on `node`.
    fn issue(&mut self, node: Node, reg: &Register) -> Vec<Soquet> {
        reg.all_idxs()
            .into_iter()
            .map(|idx| {
                let soq = Soquet {
                    node: node.clone(),
                    reg: reg.clone(),
                    idx,
                };
                self.available.insert(soq.clone());
                self.issued.insert(soq.clone());
                soq
            })
            .collect()
    }

    /// Checks that `soq` can fill an element of `reg` and has not been spent.
    /// `seen` catches the same soquet appearing twice in one call.
    fn check_usable(
        &self,
        reg: &Register,
        soq: &Soquet,
        seen: &mut FxHashSet<Soquet>,
    ) -> Result<(), BuildError> {
        if !soq.reg.dtype.is_compatible(&reg.dtype) {
            return Err(BuildError::WrongDtype {
                name: reg.name.clone(),
                expected: reg.dtype,
                got: soq.reg.dtype,
            });
        }
        if !self.issued.contains(soq) {
            return Err(BuildError::ForeignSoquet(soq.clone()));
        }
        if seen.contains(soq) || !self.available.contains(soq) {
            return Err(BuildError::SoquetUsedTwice(soq.clone()));
        }
        seen.insert(soq.clone());
        Ok(())
    }

    /// Takes the soquets for `reg` out of `in_soqs`, validated against the
    /// register's shape and dtype.
    fn take_for_reg(
        &self,
        in_soqs: &mut SoqMap,
        reg: &Register,
        seen: &mut FxHashSet<Soquet>,
    ) -> Result<Vec<Soquet>, BuildError> {
        let soqs = in_soqs
            .try_take(&reg.name)
            .ok_or_else(|| BuildError::MissingSoquet {
                name: reg.name.clone(),
            })?;
        let shape_ok = match &soqs {
            Soqs::One(_) => reg.shape.is_empty(),
            Soqs::Many(v) => !reg.shape.is_empty() && v.len() == reg.num_elements(),
        };
        if !shape_ok {
            return Err(BuildError::WrongShape {
                name: reg.name.clone(),
                expected: format!("shape {:?} ({} soquets)", reg.shape, reg.num_elements()),
                got: soqs.shape_desc(),
            });
        }
        let soqs = soqs.into_vec();
        for soq in &soqs {
            self.check_usable(reg, soq, seen)?;
        }
        Ok(soqs)
    }

    /// Adds one instance of `bloq`, consuming one entry of `in_soqs` per left
    /// register and returning one entry per right register.
    pub fn add(
        &mut self,
        bloq: impl Into<AnyBloq>,
        mut in_soqs: SoqMap,
    ) -> Result<SoqMap, BuildError> {
        let bloq = bloq.into();
        let sig = bloq.signature();
        let binst = BloqInstance {
            bloq: bloq.clone(),
            i: self.binsts.len(),
        };

        // Validate everything before mutating, so a failed add leaves the
        // builder untouched.
        let mut seen = FxHashSet::default();
        let mut wires: Vec<Connection> = Vec::new();
        for reg in sig.lefts() {
            let soqs = self.take_for_reg(&mut in_soqs, reg, &mut seen)?;
            for (idx, soq) in reg.all_idxs().into_iter().zip(soqs) {
                wires.push(Connection {
                    left: soq,
                    right: Soquet {
                        node: Node::Binst(binst.clone()),
                        reg: reg.clone(),
                        idx,
                    },
                });
            }
        }
        if let Some(name) = in_soqs.names().next() {
            return Err(BuildError::UnknownRegister {
                bloq: bloq.pretty_name(),
                name: name.to_string(),
            });
        }

        for wire in &wires {
            self.available.remove(&wire.left);
        }
        self.connections.extend(wires);
        let mut out = SoqMap::new();
        for reg in sig.rights() {
            let issued = self.issue(Node::Binst(binst.clone()), reg);
            out.insert(&reg.name, Soqs::for_register(reg, issued));
        }
        self.binsts.push(binst);
        Ok(out)
    }

    /// Inlines `cbloq`'s instances into this builder, wiring its left edge to
    /// `in_soqs` and returning the soquets that reach its right edge.
    pub fn add_from(
        &mut self,
        cbloq: &CompositeBloq,
        mut in_soqs: SoqMap,
    ) -> Result<SoqMap, BuildError> {
        let sig = cbloq.signature();
        let preds = cbloq.predecessors();

        // inner producer soquet -> soquet in this builder
        let mut xlat: FxHashMap<Soquet, Soquet> = FxHashMap::default();
        let mut seen = FxHashSet::default();
        for reg in sig.lefts() {
            let soqs = self.take_for_reg(&mut in_soqs, reg, &mut seen)?;
            for (idx, soq) in reg.all_idxs().into_iter().zip(soqs) {
                let inner = Soquet {
                    node: Node::LeftDangle,
                    reg: reg.clone(),
                    idx,
                };
                xlat.insert(inner, soq);
            }
        }
        if let Some(name) = in_soqs.names().next() {
            return Err(BuildError::UnknownRegister {
                bloq: "CompositeBloq".to_string(),
                name: name.to_string(),
            });
        }

        for binst in cbloq.iter_binsts() {
            let inner_sig = binst.bloq.signature();
            let mut ins = SoqMap::new();
            for reg in inner_sig.lefts() {
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
                ins.insert(&reg.name, Soqs::for_register(reg, soqs));
            }
            let mut outs = self.add(binst.bloq.clone(), ins)?;
            for reg in inner_sig.rights() {
                let soqs = outs.take(&reg.name);
                for (idx, soq) in reg.all_idxs().into_iter().zip(soqs.into_vec()) {
                    let inner = Soquet {
                        node: Node::Binst(binst.clone()),
                        reg: reg.clone(),
                        idx,
                    };
                    xlat.insert(inner, soq);
                }
            }
        }

        let mut out = SoqMap::new();
        for reg in sig.rights() {
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
            out.insert(&reg.name, Soqs::for_register(reg, soqs));
        }
        Ok(out)
    }

    /// Splits a multi-qubit soquet into per-qubit soquets, most significant
    /// first.
    pub fn split(&mut self, soq: Soquet) -> Result<Vec<Soquet>, BuildError> {
        let n = soq.reg.dtype.num_qubits();
        if n < 2 {
            return Err(BuildError::SplitQBit);
        }
        let mut out = self.add(Split::of(soq.reg.dtype), [("reg", soq.into())].into())?;
        Ok(out.take_many("reg"))
    }

    /// Joins per-qubit soquets, most significant first, into one soquet.
    pub fn join(&mut self, soqs: Vec<Soquet>) -> Result<Soquet, BuildError> {
        if soqs.is_empty() {
            return Err(BuildError::JoinEmpty);
        }
        let n = soqs.len() as u32;
        let mut out = self.add(Join::new(n), [("reg", soqs.into())].into())?;
        Ok(out.take_one("reg"))
    }

    /// Allocates a fresh `n`-qubit soquet in the all-zeros state.
    pub fn allocate(&mut self, n: u32) -> Soquet {
        let mut out = self
            .add(Allocate::new(n), SoqMap::new())
            .expect("allocate has no inputs to miswire");
        out.take_one("reg")
    }

    /// Deallocates a soquet, asserting it is back in the all-zeros state.
    pub fn free(&mut self, soq: Soquet) -> Result<(), BuildError> {
        let dtype = soq.reg.dtype;
        self.add(Free::of(dtype), [("reg", soq.into())].into())?;
        Ok(())
    }

    /// Wires the right edge and returns the finished composite.
    ///
    /// `fin` must hold one entry per right register, and every soquet the
    /// builder issued must have been consumed.
    pub fn finalize(mut self, mut fin: SoqMap) -> Result<CompositeBloq, BuildError> {
        let signature = match self.signature.take() {
            Some(sig) => sig,
            None => self.infer_signature(&fin),
        };

        let mut seen = FxHashSet::default();
        let mut wires: Vec<Connection> = Vec::new();
        for reg in signature.rights() {
            let soqs = self.take_for_reg(&mut fin, reg, &mut seen)?;
            for (idx, soq) in reg.all_idxs().into_iter().zip(soqs) {
                wires.push(Connection {
                    left: soq,
                    right: Soquet {
                        node: Node::RightDangle,
                        reg: reg.clone(),
                        idx,
                    },
                });
            }
        }
        if let Some(name) = fin.names().next() {
            return Err(BuildError::UnknownRegister {
                bloq: "finalize".to_string(),
                name: name.to_string(),
            });
        }

        for wire in &wires {
            self.available.remove(&wire.left);
        }
        self.connections.extend(wires);
        if !self.available.is_empty() {
            let mut dangling: Vec<String> =
                self.available.iter().map(|s| s.to_string()).collect();
            dangling.sort();
            return Err(BuildError::Leftover(dangling.join(", ")));
        }
        Ok(CompositeBloq::new(self.binsts, self.connections, signature))
    }

    /// Growable mode: completes the declared registers with right registers
    /// inferred from the finalize arguments.
    fn infer_signature(&self, fin: &SoqMap) -> Signature {
        let mut regs = self.grown.clone();
        for (name, soqs) in fin.entries.iter() {
            if regs.iter().any(|r| r.name == *name && r.side.has_right()) {
                continue;
            }
            let reg = match soqs {
                Soqs::One(s) => Register::new(name.clone(), s.reg.dtype).with_side(Side::Right),
                Soqs::Many(v) => {
                    let dtype = v.first().map(|s| s.reg.dtype).unwrap_or(QDType::QBit);
                    Register::new(name.clone(), dtype)
                        .with_shape([v.len()])
                        .with_side(Side::Right)
                }
            };
            regs.push(reg);
        }
        Signature::new(regs)
    }
}

/// Errors from wiring bloqs together.
#[derive(Debug, derive_more::Display)]
pub enum BuildError {
    #[display("bloq {bloq} has no left register named {name}")]
    UnknownRegister { bloq: String, name: String },
    #[display("no soquet provided for register {name}")]
    MissingSoquet { name: String },
    #[display("register {name} expects {expected}, got {got}")]
    WrongShape {
        name: String,
        expected: String,
        got: String,
    },
    #[display("register {name} expects dtype {expected}, got {got}")]
    WrongDtype {
        name: String,
        expected: QDType,
        got: QDType,
    },
    #[display("soquet {_0} used twice")]
    SoquetUsedTwice(Soquet),
    #[display("soquet {_0} does not belong to this builder")]
    ForeignSoquet(Soquet),
    #[display("cannot split a single qubit")]
    SplitQBit,
    #[display("cannot join zero soquets")]
    JoinEmpty,
    #[display("dangling soquets at finalize: {_0}")]
    Leftover(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloqs::basic::{CNot, XGate};
    use crate::bloqs::util::Cast;

    #[test]
    fn chain_and_finalize() {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("q", 1)]));
        let q = soqs.take_one("q");
        let q = bb.add(XGate, [("q", q.into())].into()).unwrap().take_one("q");
        let cbloq = bb.finalize([("q", q.into())].into()).unwrap();
        assert_eq!(cbloq.bloq_instances().len(), 1);
        assert_eq!(cbloq.connections().len(), 2);
    }

    #[test]
    fn missing_soquet() {
        let (mut bb, _soqs) = BloqBuilder::from_signature(Signature::build([("q", 1)]));
        let err = bb.add(XGate, SoqMap::new()).unwrap_err();
        assert!(matches!(err, BuildError::MissingSoquet { .. }));
    }

    #[test]
    fn unknown_register() {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("q", 1)]));
        let q = soqs.take_one("q");
        let err = bb.add(XGate, [("nope", q.into())].into()).unwrap_err();
        assert!(matches!(err, BuildError::MissingSoquet { .. }));
    }

    #[test]
    fn soquet_used_twice() {
        let sig = Signature::build([("ctrl", 1), ("target", 1)]);
        let (mut bb, mut soqs) = BloqBuilder::from_signature(sig);
        let ctrl = soqs.take_one("ctrl");
        let _target = soqs.take_one("target");
        let err = bb
            .add(
                CNot,
                [("ctrl", ctrl.clone().into()), ("target", ctrl.into())].into(),
            )
            .unwrap_err();
        assert!(matches!(err, BuildError::SoquetUsedTwice(_)));
    }

    #[test]
    fn stale_soquet_rejected() {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("q", 1)]));
        let q = soqs.take_one("q");
        let _q2 = bb.add(XGate, [("q", q.clone().into())].into()).unwrap();
        // q was consumed by the X; wiring it again must fail
        let err = bb.add(XGate, [("q", q.into())].into()).unwrap_err();
        assert!(matches!(err, BuildError::SoquetUsedTwice(_)));
    }

    #[test]
    fn foreign_soquet_rejected() {
        let (_other, mut other_soqs) = BloqBuilder::from_signature(Signature::build([("q", 1)]));
        let foreign = other_soqs.take_one("q");
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("q", 1)]));
        let _q = soqs.take_one("q");
        let err = bb.add(XGate, [("q", foreign.into())].into()).unwrap_err();
        assert!(matches!(err, BuildError::ForeignSoquet(_)));
    }

    #[test]
    fn dtype_mismatch() {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("x", 3)]));
        let x = soqs.take_one("x");
        // Cast wants matching widths; feed a 3-qubit soquet to a 2->2 cast
        let err = bb
            .add(Cast::new(QDType::QAny(2), QDType::QUInt(2)), [("reg", x.into())].into())
            .unwrap_err();
        assert!(matches!(err, BuildError::WrongDtype { .. }));
    }

    #[test]
    fn leftover_allocation_detected() {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("q", 1)]));
        let q = soqs.take_one("q");
        let _stray = bb.allocate(2);
        let err = bb.finalize([("q", q.into())].into()).unwrap_err();
        assert!(matches!(err, BuildError::Leftover(_)));
    }

    #[test]
    fn split_then_join() {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("x", 4)]));
        let x = soqs.take_one("x");
        let bits = bb.split(x).unwrap();
        assert_eq!(bits.len(), 4);
        let x = bb.join(bits).unwrap();
        let cbloq = bb.finalize([("x", x.into())].into()).unwrap();
        assert_eq!(cbloq.bloq_instances().len(), 2);
    }

    #[test]
    fn split_single_qubit_errors() {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("q", 1)]));
        let q = soqs.take_one("q");
        assert!(matches!(bb.split(q), Err(BuildError::SplitQBit)));
    }

    #[test]
    fn allocate_then_free_balances() {
        let (bb, _) = BloqBuilder::from_signature(Signature::new(vec![]));
        let mut bb = bb;
        let anc = bb.allocate(3);
        bb.free(anc).unwrap();
        let cbloq = bb.finalize(SoqMap::new()).unwrap();
        assert_eq!(cbloq.bloq_instances().len(), 2);
    }

    #[test]
    fn growable_signature() {
        let mut bb = BloqBuilder::new();
        let q = bb
            .add_register(Register::new("q", QDType::QBit))
            .unwrap()
            .into_vec()
            .pop()
            .unwrap();
        let q = bb.add(XGate, [("q", q.into())].into()).unwrap().take_one("q");
        let cbloq = bb.finalize([("q", q.into())].into()).unwrap();
        let sig = crate::bloq::Bloq::signature(&cbloq);
        assert_eq!(sig.len(), 1);
        assert_eq!(sig[0].side, Side::Thru);
    }

    #[test]
    fn add_from_inlines() {
        // build a 2-CNot composite, then inline it twice
        let sig = Signature::build([("a", 1), ("b", 1)]);
        let (mut bb, mut soqs) = BloqBuilder::from_signature(sig.clone());
        let a = soqs.take_one("a");
        let b = soqs.take_one("b");
        let mut out = bb
            .add(CNot, [("ctrl", a.into()), ("target", b.into())].into())
            .unwrap();
        let inner = bb
            .finalize(
                [
                    ("a", out.take_one("ctrl").into()),
                    ("b", out.take_one("target").into()),
                ]
                .into(),
            )
            .unwrap();

        let (mut bb, mut soqs) = BloqBuilder::from_signature(sig);
        let a = soqs.take_one("a");
        let b = soqs.take_one("b");
        let mut mid = bb
            .add_from(&inner, [("a", a.into()), ("b", b.into())].into())
            .unwrap();
        let a = mid.take_one("a");
        let b = mid.take_one("b");
        let mut fin = bb
            .add_from(&inner, [("a", a.into()), ("b", b.into())].into())
            .unwrap();
        let cbloq = bb
            .finalize(
                [
                    ("a", fin.take_one("a").into()),
                    ("b", fin.take_one("b").into()),
                ]
                .into(),
            )
            .unwrap();
        assert_eq!(cbloq.counts_tally(), vec![(2, CNot.into())]);
    }
}
