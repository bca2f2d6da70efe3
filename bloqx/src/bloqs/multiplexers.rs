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

//! Selection-indexed application of gates: the SELECT side of qubitization.
//!
//! Both bloqs here walk a selection register by unary iteration (Babbush et
//! al., arXiv:1805.03662): an `And` ladder turns the binary selection value
//! into a one-hot control wire, at one compute/uncompute pair per selectable
//! branch past the first.

use crate::bloq::{AnyBloq, Bloq};
use crate::bloqs::data_loading::bits_for;
use crate::bloqs::mcmt::And;
use crate::bloqs::util::ArbitraryClifford;
use crate::dtype::QDType;
use crate::register::{Register, Signature};

/// Applies a fixed single-qubit gate to the `l`-th qubit of the target,
/// where `l` is read from the selection register.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplyGateToLthQubit {
    pub gate: AnyBloq,
    pub num_targets: u32,
}

impl ApplyGateToLthQubit {
    /// # Panics
    ///
    /// Panics unless `gate` acts on exactly one thru qubit.
    pub fn new(gate: impl Into<AnyBloq>, num_targets: u32) -> Self {
        let gate = gate.into();
        let sig = gate.signature();
        assert!(
            sig.len() == 1 && sig[0].total_bits() == 1,
            "{} does not act on a single qubit",
            gate.pretty_name()
        );
        assert!(num_targets >= 1, "need at least one target qubit");
        ApplyGateToLthQubit { gate, num_targets }
    }

    pub fn selection_bitsize(&self) -> u32 {
        bits_for(u64::from(self.num_targets))
    }
}

impl Bloq for ApplyGateToLthQubit {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("selection", QDType::QUInt(self.selection_bitsize())),
            Register::new("target", QDType::QBit).with_shape([self.num_targets as usize]),
        ])
    }

    fn pretty_name(&self) -> String {
        format!("{}[l]", self.gate.pretty_name())
    }

    // One controlled application per branch; the unary-iteration tree
    // supplies the controls.
    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        let n = u64::from(self.num_targets);
        let mut counts: Vec<(u64, AnyBloq)> = Vec::new();
        if n > 1 {
            counts.push((n - 1, And::default().into()));
            counts.push((n - 1, And::default().uncompute().into()));
        }
        counts.push((n, self.gate.clone()));
        Some(counts)
    }
}

/// SELECT for a linear combination of Pauli strings: applies the `l`-th
/// string of the LCU to the target, indexed by the selection register.
///
/// Each string is Clifford, so the T cost is the iteration tree's `4(L-1)`
/// for `L` terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectPauliLcu {
    pub num_terms: u64,
    pub target_bitsize: u32,
}

impl SelectPauliLcu {
    pub fn new(num_terms: u64, target_bitsize: u32) -> Self {
        assert!(num_terms >= 1, "an LCU needs at least one term");
        SelectPauliLcu {
            num_terms,
            target_bitsize,
        }
    }

    pub fn selection_bitsize(&self) -> u32 {
        bits_for(self.num_terms)
    }
}

impl Bloq for SelectPauliLcu {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("selection", QDType::QUInt(self.selection_bitsize())),
            Register::new("target", QDType::QAny(self.target_bitsize)),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        let l = self.num_terms;
        let mut counts: Vec<(u64, AnyBloq)> = Vec::new();
        if l > 1 {
            counts.push((l - 1, And::default().into()));
            counts.push((l - 1, And::default().uncompute().into()));
        }
        counts.push((l, ArbitraryClifford(self.target_bitsize).into()));
        Some(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloqs::basic::{XGate, ZGate};
    use crate::tcomplexity::t_complexity;

    #[test]
    fn lth_qubit_signature_and_cost() {
        let b = ApplyGateToLthQubit::new(XGate, 6);
        assert_eq!(b.selection_bitsize(), 3);
        let sig = b.signature();
        assert_eq!(sig.get_left("target").unwrap().shape, vec![6]);
        let tc = t_complexity(&b.into()).unwrap();
        assert_eq!(tc.t, 4 * 5);
    }

    #[test]
    fn lth_qubit_names_its_gate() {
        assert_eq!(ApplyGateToLthQubit::new(ZGate, 4).pretty_name(), "ZGate[l]");
    }

    #[test]
    #[should_panic]
    fn rejects_wide_gates() {
        ApplyGateToLthQubit::new(crate::bloqs::basic::CNot, 4);
    }

    #[test]
    fn select_pauli_lcu_is_four_t_per_term() {
        let select = SelectPauliLcu::new(8, 10);
        assert_eq!(select.selection_bitsize(), 3);
        let tc = t_complexity(&select.into()).unwrap();
        assert_eq!(tc.t, 4 * 7);
        assert_eq!(tc.rotations, 0);
    }

    #[test]
    fn single_term_select_is_free_of_t() {
        let tc = t_complexity(&SelectPauliLcu::new(1, 4).into()).unwrap();
        assert_eq!(tc.t, 0);
    }
}
