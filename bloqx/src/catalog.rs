//! A registry of named, ready-made bloq instances.
//!
//! One entry per interesting catalog bloq, at parameters small enough to
//! decompose and contract quickly. The CLI resolves names against this
//! registry, the consistency suite sweeps it, and the benches pick their
//! workloads from it.

use crate::bloq::AnyBloq;
use crate::bloqs::arithmetic::{
    Add, BitonicSort, Comparator, Equals, GreaterThan, LessThanConstant, Negate,
    OutOfPlaceAdder, Product, Square, SumOfSquares, ToContiguousIndex,
};
use crate::bloqs::basic::{IntState, Rz, Toffoli, TwoBitCSwap, XGate};
use crate::bloqs::chemistry::{PrepareMuUnaryEncodedOneHot, PrepareNuState};
use crate::bloqs::data_loading::Qrom;
use crate::bloqs::factoring::{CtrlAddK, CtrlModMul, CtrlScaleModAdd, ModExp};
use crate::bloqs::gf_arithmetic::{GF2Addition, GF2Multiplication, GF2Square};
use crate::bloqs::ising::{IsingXUnitary, IsingZZUnitary, TrotterStepIsing};
use crate::bloqs::mcmt::{And, MultiAnd};
use crate::bloqs::multiplexers::{ApplyGateToLthQubit, SelectPauliLcu};
use crate::bloqs::qubitization::{QubitizationWalkOperator, ReflectionUsingPrepare};
use crate::bloqs::rotations::{
    AddIntoPhaseGrad, PhaseGradientState, PhaseGradientUnitary, RzViaPhaseGradient,
};
use crate::bloqs::state_preparation::{
    PrepareUniformSuperposition, StatePreparationAliasSampling,
};
use crate::bloqs::swap_network::{CSwap, CSwapApprox, SwapWithZero};

/// A named example: a label and a constructor for the instance behind it.
#[derive(Clone, Copy)]
pub struct BloqExample {
    pub name: &'static str,
    pub make: fn() -> AnyBloq,
}

impl BloqExample {
    pub fn bloq(&self) -> AnyBloq {
        (self.make)()
    }
}

fn ex(name: &'static str, make: fn() -> AnyBloq) -> BloqExample {
    BloqExample { name, make }
}

/// Every catalog example, grouped by module.
pub fn examples() -> Vec<BloqExample> {
    vec![
        ex("toffoli", || Toffoli.into()),
        ex("two_bit_cswap", || TwoBitCSwap.into()),
        ex("rz", || Rz::new((1, 8)).into()),
        ex("int_state", || IntState::new(5, 4).into()),
        ex("and", || And::new(1, 1).into()),
        ex("multi_and", || MultiAnd::new([1, 1, 1, 1]).into()),
        ex("add", || Add::new(8).into()),
        ex("out_of_place_adder", || OutOfPlaceAdder::new(6).into()),
        ex("negate", || Negate::new(6).into()),
        ex("product", || Product::new(6, 4).into()),
        ex("square", || Square::new(5).into()),
        ex("sum_of_squares", || SumOfSquares::new(4, 3).into()),
        ex("greater_than", || GreaterThan::new(4, 4).into()),
        ex("less_than_constant", || LessThanConstant::new(5, 19).into()),
        ex("equals", || Equals::new(4).into()),
        ex("comparator", || Comparator::new(4).into()),
        ex("bitonic_sort", || BitonicSort::new(4, 8).into()),
        ex("to_contiguous_index", || ToContiguousIndex::new(5, 9).into()),
        ex("phase_gradient_state", || PhaseGradientState::new(4).into()),
        ex("phase_gradient_unitary", || PhaseGradientUnitary::new(4).into()),
        ex("add_into_phase_grad", || AddIntoPhaseGrad::new(4, 6).into()),
        ex("rz_via_phase_gradient", || RzViaPhaseGradient::new((3, 8), 8).into()),
        ex("qrom", || Qrom::new(vec![1, 2, 3, 4, 5], 3).into()),
        ex("apply_x_to_lth_qubit", || ApplyGateToLthQubit::new(XGate, 6).into()),
        ex("select_pauli_lcu", || SelectPauliLcu::new(8, 4).into()),
        ex("cswap", || CSwap::new(6).into()),
        ex("cswap_approx", || CSwapApprox::new(6).into()),
        ex("swap_with_zero", || SwapWithZero::new(3, 4, 5).into()),
        ex("prepare_uniform", || PrepareUniformSuperposition::new(5).into()),
        ex("state_prep_alias", || {
            StatePreparationAliasSampling::from_probabilities(
                &[0.25, 0.5, 0.125, 0.125],
                0.05,
            )
            .into()
        }),
        ex("reflection_using_prepare", || {
            ReflectionUsingPrepare::new(PrepareUniformSuperposition::new(8)).into()
        }),
        ex("qubitization_walk", || {
            QubitizationWalkOperator::new(
                SelectPauliLcu::new(8, 4),
                StatePreparationAliasSampling::from_probabilities(&[0.125; 8], 0.05),
            )
            .into()
        }),
        ex("prepare_mu", || PrepareMuUnaryEncodedOneHot::new(6).into()),
        ex("prepare_nu", || PrepareNuState::new(6, 256).into()),
        ex("ctrl_add_k", || CtrlAddK::new(9, 4, 15).into()),
        ex("ctrl_scale_mod_add", || CtrlScaleModAdd::new(3, 4, 15).into()),
        ex("ctrl_mod_mul", || CtrlModMul::new(7, 4, 15).into()),
        ex("mod_exp_small", || ModExp::new(7, 15, 3, 4).into()),
        ex("gf2_addition", || GF2Addition::new(4).into()),
        ex("gf2_square", || GF2Square::new(4).into()),
        ex("gf2_multiplication", || GF2Multiplication::new(4).into()),
        ex("ising_zz", || IsingZZUnitary::new((1, 7)).into()),
        ex("ising_x", || IsingXUnitary::new((3, 7)).into()),
        ex("trotter_step_ising", || TrotterStepIsing::new(6, (1, 7), (3, 7)).into()),
    ]
}

/// Looks an example up by its registry name.
pub fn find(name: &str) -> Option<BloqExample> {
    examples().into_iter().find(|ex| ex.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn names_are_unique() {
        let exs = examples();
        let names: FxHashSet<&str> = exs.iter().map(|ex| ex.name).collect();
        assert_eq!(names.len(), exs.len());
    }

    #[test]
    fn lookup_by_name() {
        let ex = find("mod_exp_small").unwrap();
        let bloq = ex.bloq();
        assert_eq!(bloq.pretty_name(), "7^e % 15");
        assert!(find("not_a_bloq").is_none());
    }
}
