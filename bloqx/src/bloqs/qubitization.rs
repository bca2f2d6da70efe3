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

//! Qubitization: walking a Hamiltonian given as SELECT and PREPARE oracles.
//!
//! For `H = sum_l w_l U_l`, the walk operator `W = SELECT * R` (with `R` the
//! reflection about the PREPARE state) has eigenphases `arccos(E_k/lambda)`,
//! so phase estimation on `W` reads out eigenenergies without Trotter error
//! (Low and Chuang, arXiv:1610.06546; Babbush et al., arXiv:1805.03662).

use crate::bloq::{AnyBloq, Bloq};
use crate::bloqs::basic::{XGate, ZGate, CZ};
use crate::bloqs::mcmt::And;
use crate::bloqs::multiplexers::{ApplyGateToLthQubit, SelectPauliLcu};
use crate::bloqs::state_preparation::{PrepareUniformSuperposition, StatePreparationAliasSampling};
use crate::dtype::QDType;
use crate::register::{Register, Side, Signature};

/// A bloq usable as the SELECT oracle of a block encoding: applies the
/// `l`-th term of the Hamiltonian, indexed by its selection registers.
pub trait SelectOracle: Bloq {
    fn selection_registers(&self) -> Vec<Register>;
    fn target_registers(&self) -> Vec<Register>;
}

/// A bloq usable as the PREPARE oracle of a block encoding: loads the
/// coefficient distribution onto its selection registers, possibly entangled
/// with junk registers.
pub trait PrepareOracle: Bloq {
    fn selection_registers(&self) -> Vec<Register>;

    fn junk_registers(&self) -> Vec<Register> {
        Vec::new()
    }
}

impl SelectOracle for SelectPauliLcu {
    fn selection_registers(&self) -> Vec<Register> {
        vec![Register::new(
            "selection",
            QDType::QUInt(self.selection_bitsize()),
        )]
    }

    fn target_registers(&self) -> Vec<Register> {
        vec![Register::new("target", QDType::QAny(self.target_bitsize))]
    }
}

impl SelectOracle for ApplyGateToLthQubit {
    fn selection_registers(&self) -> Vec<Register> {
        vec![Register::new(
            "selection",
            QDType::QUInt(self.selection_bitsize()),
        )]
    }

    fn target_registers(&self) -> Vec<Register> {
        vec![Register::new("target", QDType::QBit).with_shape([self.num_targets as usize])]
    }
}

impl PrepareOracle for StatePreparationAliasSampling {
    fn selection_registers(&self) -> Vec<Register> {
        vec![Register::new(
            "selection",
            QDType::QUInt(self.selection_bitsize()),
        )]
    }

    fn junk_registers(&self) -> Vec<Register> {
        self.signature()
            .iter()
            .filter(|r| r.name != "selection")
            .cloned()
            .collect()
    }
}

impl PrepareOracle for PrepareUniformSuperposition {
    fn selection_registers(&self) -> Vec<Register> {
        vec![Register::new("target", QDType::QUInt(self.bitsize()))]
    }
}

/// The reflection `2|p><p| - 1` about the state loaded by a PREPARE oracle:
/// unprepare, reflect about all-zeros, prepare again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReflectionUsingPrepare {
    pub prepare: AnyBloq,
    selection_registers: Vec<Register>,
}

impl ReflectionUsingPrepare {
    pub fn new<P: PrepareOracle>(prepare: P) -> Self {
        let selection_registers = prepare
            .selection_registers()
            .into_iter()
            .map(|r| r.with_side(Side::Thru))
            .collect();
        ReflectionUsingPrepare {
            prepare: prepare.into(),
            selection_registers,
        }
    }

    fn reflected_bits(&self) -> u64 {
        self.selection_registers
            .iter()
            .map(Register::total_bits)
            .sum()
    }
}

impl Bloq for ReflectionUsingPrepare {
    fn signature(&self) -> Signature {
        Signature::new(self.selection_registers.clone())
    }

    fn pretty_name(&self) -> String {
        format!("R[{}]", self.prepare.pretty_name())
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        let nb = self.reflected_bits();
        let mut counts: Vec<(u64, AnyBloq)> = vec![(1, self.prepare.adjoint())];
        // reflect about |0..0>: X-conjugated, (nb-1)-controlled Z
        counts.push((2 * nb, XGate.into()));
        if nb >= 2 {
            let pairs = nb - 2;
            if pairs > 0 {
                counts.push((pairs, And::default().into()));
                counts.push((pairs, And::default().uncompute().into()));
            }
            counts.push((1, CZ.into()));
        } else {
            counts.push((1, ZGate.into()));
        }
        counts.push((1, self.prepare.clone()));
        Some(counts)
    }
}

/// The qubitization walk operator `W = SELECT * R[PREPARE]`.
///
/// Its per-step cost is one SELECT plus one reflection; phase estimation
/// repeats it, so the call graph rooted here is the per-step resource bill.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QubitizationWalkOperator {
    pub select: AnyBloq,
    pub reflect: ReflectionUsingPrepare,
}

impl QubitizationWalkOperator {
    /// # Panics
    ///
    /// Panics if the PREPARE oracle's selection registers do not line up
    /// with the SELECT oracle's.
    pub fn new<S: SelectOracle, P: PrepareOracle>(select: S, prepare: P) -> Self {
        let s_regs = select.selection_registers();
        for p in prepare.selection_registers() {
            assert!(
                s_regs
                    .iter()
                    .any(|s| s.name == p.name && s.total_bits() == p.total_bits()),
                "PREPARE register {} has no matching SELECT selection register",
                p.name
            );
        }
        QubitizationWalkOperator {
            select: select.into(),
            reflect: ReflectionUsingPrepare::new(prepare),
        }
    }
}

impl Bloq for QubitizationWalkOperator {
    fn signature(&self) -> Signature {
        self.select.signature()
    }

    fn pretty_name(&self) -> String {
        "Walk".to_string()
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(vec![
            (1, self.select.clone()),
            (1, self.reflect.clone().into()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tcomplexity::t_complexity;

    #[test]
    fn oracles_group_their_registers() {
        let select = SelectPauliLcu::new(8, 6);
        assert_eq!(select.selection_registers()[0].name, "selection");
        assert_eq!(select.target_registers()[0].total_bits(), 6);

        let prep = StatePreparationAliasSampling::from_probabilities(&[0.125; 8], 0.05);
        assert_eq!(prep.selection_registers()[0].total_bits(), 3);
        let junk: Vec<String> = prep.junk_registers().iter().map(|r| r.name.clone()).collect();
        assert_eq!(junk, ["sigma_mu", "alt", "keep", "less_than_equal"]);
    }

    #[test]
    fn reflection_about_one_qubit_is_clifford() {
        // unprepare H, two Xs around a Z, prepare H
        let r = ReflectionUsingPrepare::new(PrepareUniformSuperposition::new(2));
        assert_eq!(r.pretty_name(), "R[UNIFORM(2)]");
        let tc = t_complexity(&r.into()).unwrap();
        assert_eq!(tc.t, 0);
        assert_eq!(tc.clifford, 1 + 2 + 1 + 1);
    }

    #[test]
    fn reflection_ladder_cost() {
        // three reflected qubits: one And pair for the 2-controlled Z
        let r = ReflectionUsingPrepare::new(PrepareUniformSuperposition::new(8));
        let tc = t_complexity(&r.into()).unwrap();
        assert_eq!(tc.t, 4);
    }

    #[test]
    fn walk_is_select_plus_reflection() {
        let prep = StatePreparationAliasSampling::from_probabilities(&[0.125; 8], 0.05);
        let walk = QubitizationWalkOperator::new(SelectPauliLcu::new(8, 6), prep.clone());
        assert_eq!(walk.signature().get_left("target").unwrap().total_bits(), 6);

        let walk_t = t_complexity(&walk.into()).unwrap();
        let select_t = t_complexity(&SelectPauliLcu::new(8, 6).into()).unwrap();
        let reflect_t = t_complexity(&ReflectionUsingPrepare::new(prep).into()).unwrap();
        assert_eq!(walk_t, select_t + reflect_t);
    }

    #[test]
    #[should_panic]
    fn walk_rejects_mismatched_oracles() {
        let prep = StatePreparationAliasSampling::from_probabilities(&[0.5, 0.5], 0.05);
        QubitizationWalkOperator::new(SelectPauliLcu::new(8, 6), prep);
    }
}
