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

//! Classical simulation of bloqs acting on computational-basis values.
//!
//! A bloq whose action is a permutation of basis states (X, CNOT, arithmetic,
//! modular exponentiation...) can be simulated by pushing one integer per
//! register element through the dataflow graph. This is the cheapest end-to-end
//! check that a decomposition computes what it claims.

use rustc_hash::FxHashMap;

use crate::bloq::{AnyBloq, Bloq, DecomposeError};
use crate::composite::{CompositeBloq, Node, Soquet};
use crate::dtype::QDType;
use crate::register::Register;

/// The classical value in one register: an integer, or an array of integers
/// for a shaped register (row-major).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassicalVal {
    Int(u64),
    Array(Vec<u64>),
}

impl ClassicalVal {
    /// Packs element values for `reg`: `Int` when the register is shapeless.
    pub fn for_register(reg: &Register, mut elems: Vec<u64>) -> ClassicalVal {
        if reg.shape.is_empty() {
            assert_eq!(elems.len(), 1, "shapeless register takes one value");
            ClassicalVal::Int(elems.pop().unwrap())
        } else {
            ClassicalVal::Array(elems)
        }
    }

    fn into_vec(self) -> Vec<u64> {
        match self {
            ClassicalVal::Int(v) => vec![v],
            ClassicalVal::Array(v) => v,
        }
    }

    fn len(&self) -> usize {
        match self {
            ClassicalVal::Int(_) => 1,
            ClassicalVal::Array(v) => v.len(),
        }
    }

    fn is_array(&self) -> bool {
        matches!(self, ClassicalVal::Array(_))
    }
}

impl From<u64> for ClassicalVal {
    fn from(v: u64) -> Self {
        ClassicalVal::Int(v)
    }
}

impl From<Vec<u64>> for ClassicalVal {
    fn from(v: Vec<u64>) -> Self {
        ClassicalVal::Array(v)
    }
}

/// Classical values keyed by register name, in insertion order.
///
/// Like [`SoqMap`](crate::builder::SoqMap), the `take_*` accessors panic:
/// inside `on_classical_vals` the simulator guarantees one validated entry
/// per left register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassicalVals {
    entries: Vec<(String, ClassicalVal)>,
}

impl ClassicalVals {
    pub fn new() -> Self {
        ClassicalVals::default()
    }

    pub fn insert(&mut self, name: &str, val: impl Into<ClassicalVal>) {
        assert!(
            self.entries.iter().all(|(n, _)| n != name),
            "duplicate classical value {name}"
        );
        self.entries.push((name.to_string(), val.into()));
    }

    pub fn get(&self, name: &str) -> Option<&ClassicalVal> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Removes and returns the entry for `name`. Panics if absent.
    pub fn take(&mut self, name: &str) -> ClassicalVal {
        self.try_take(name)
            .unwrap_or_else(|| panic!("no classical value named {name}"))
    }

    /// Like [`take`](Self::take), for a shapeless register.
    pub fn take_int(&mut self, name: &str) -> u64 {
        match self.take(name) {
            ClassicalVal::Int(v) => v,
            ClassicalVal::Array(_) => panic!("classical value {name} is an array"),
        }
    }

    /// Like [`take`](Self::take), for a shaped register.
    pub fn take_array(&mut self, name: &str) -> Vec<u64> {
        match self.take(name) {
            ClassicalVal::Int(_) => panic!("classical value {name} is not an array"),
            ClassicalVal::Array(v) => v,
        }
    }

    fn try_take(&mut self, name: &str) -> Option<ClassicalVal> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassicalVal)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<const N: usize> From<[(&str, ClassicalVal); N]> for ClassicalVals {
    fn from(arr: [(&str, ClassicalVal); N]) -> Self {
        let mut m = ClassicalVals::new();
        for (name, val) in arr {
            m.insert(name, val);
        }
        m
    }
}

/// Errors from classical simulation.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum ClassicalError {
    /// The trait-default answer of a bloq with no declared classical action.
    #[display("bloq does not act classically")]
    NotClassical,
    #[display("no classical action for {_0}")]
    Unsupported(String),
    #[display("missing classical value for register {name}")]
    MissingValue { name: String },
    #[display("no register named {name} for classical value")]
    UnknownRegister { name: String },
    #[display("register {name} expects {expected} values, got {got}")]
    WrongShape {
        name: String,
        expected: usize,
        got: usize,
    },
    #[display("value {val} out of range for {dtype}")]
    OutOfDomain { val: u64, dtype: QDType },
    #[display("register {name}: {msg}")]
    EffectMismatch { name: String, msg: String },
    #[display("decomposing for classical simulation failed: {_0}")]
    #[from]
    Decompose(DecomposeError),
}

/// Checks that `vals` holds exactly one well-shaped, in-domain value per
/// register of `regs`.
fn validate_vals<'a>(
    regs: impl Iterator<Item = &'a Register>,
    vals: &ClassicalVals,
) -> Result<(), ClassicalError> {
    let mut names: Vec<&str> = Vec::new();
    for reg in regs {
        names.push(&reg.name);
        let val = vals.get(&reg.name).ok_or_else(|| ClassicalError::MissingValue {
            name: reg.name.clone(),
        })?;
        let want_array = !reg.shape.is_empty();
        if val.is_array() != want_array || val.len() != reg.num_elements() {
            return Err(ClassicalError::WrongShape {
                name: reg.name.clone(),
                expected: reg.num_elements(),
                got: val.len(),
            });
        }
        let elems: &[u64] = match val {
            ClassicalVal::Int(v) => std::slice::from_ref(v),
            ClassicalVal::Array(v) => v,
        };
        for &v in elems {
            if !reg.dtype.is_valid_classical(v) {
                return Err(ClassicalError::OutOfDomain {
                    val: v,
                    dtype: reg.dtype,
                });
            }
        }
    }
    for (name, _) in vals.iter() {
        if !names.contains(&name) {
            return Err(ClassicalError::UnknownRegister {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Spreads one register's value over its element soquets.
fn assign(soq_vals: &mut FxHashMap<Soquet, u64>, node: &Node, reg: &Register, val: ClassicalVal) {
    for (idx, v) in reg.all_idxs().into_iter().zip(val.into_vec()) {
        let soq = Soquet {
            node: node.clone(),
            reg: reg.clone(),
            idx,
        };
        soq_vals.insert(soq, v);
    }
}

/// One bloq invocation: the declared action if any, else the decomposition.
fn binst_on_classical_vals(
    bloq: &AnyBloq,
    vals: ClassicalVals,
) -> Result<ClassicalVals, ClassicalError> {
    match bloq.on_classical_vals(vals.clone()) {
        Err(ClassicalError::NotClassical) => match bloq.decompose() {
            Ok(cbloq) => cbloq_on_classical_vals(&cbloq, vals),
            Err(DecomposeError::NotImplemented) => {
                Err(ClassicalError::Unsupported(bloq.pretty_name()))
            }
            Err(e) => Err(e.into()),
        },
        other => other,
    }
}

/// Pushes classical values through a composite's dataflow graph, validating
/// every instance's outputs along the way.
pub fn cbloq_on_classical_vals(
    cbloq: &CompositeBloq,
    mut vals: ClassicalVals,
) -> Result<ClassicalVals, ClassicalError> {
    let sig = cbloq.signature();
    validate_vals(sig.lefts(), &vals)?;
    let preds = cbloq.predecessors();

    let mut soq_vals: FxHashMap<Soquet, u64> = FxHashMap::default();
    for reg in sig.lefts() {
        let val = vals.take(&reg.name);
        assign(&mut soq_vals, &Node::LeftDangle, reg, val);
    }

    for binst in cbloq.iter_binsts() {
        let bsig = binst.bloq.signature();
        let node = Node::Binst(binst.clone());
        let mut ins = ClassicalVals::new();
        for reg in bsig.lefts() {
            let mut elems = Vec::with_capacity(reg.num_elements());
            for idx in reg.all_idxs() {
                let port = Soquet {
                    node: node.clone(),
                    reg: reg.clone(),
                    idx,
                };
                let producer = preds.get(&port).expect("every left port is connected");
                let v = soq_vals
                    .remove(producer)
                    .expect("producer value already computed");
                elems.push(v);
            }
            ins.insert(&reg.name, ClassicalVal::for_register(reg, elems));
        }

        let outs = binst_on_classical_vals(&binst.bloq, ins)?;
        validate_vals(bsig.rights(), &outs)?;
        let mut outs = outs;
        for reg in bsig.rights() {
            let val = outs.take(&reg.name);
            assign(&mut soq_vals, &node, reg, val);
        }
    }

    let mut out = ClassicalVals::new();
    for reg in sig.rights() {
        let mut elems = Vec::with_capacity(reg.num_elements());
        for idx in reg.all_idxs() {
            let port = Soquet {
                node: Node::RightDangle,
                reg: reg.clone(),
                idx,
            };
            let producer = preds.get(&port).expect("every right dangle is fed");
            let v = soq_vals
                .remove(producer)
                .expect("producer value already computed");
            elems.push(v);
        }
        out.insert(&reg.name, ClassicalVal::for_register(reg, elems));
    }
    Ok(out)
}

/// Applies `bloq` to classical values, with input and output validation.
pub fn call_classically(
    bloq: &AnyBloq,
    vals: ClassicalVals,
) -> Result<ClassicalVals, ClassicalError> {
    let sig = bloq.signature();
    validate_vals(sig.lefts(), &vals)?;
    let out = binst_on_classical_vals(bloq, vals)?;
    validate_vals(sig.rights(), &out)?;
    Ok(out)
}
