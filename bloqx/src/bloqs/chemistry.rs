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

//! Preparation of the momentum-transfer state for first-quantized chemistry.
//!
//! The U and V terms of the first-quantized Hamiltonian need a superposition
//! over the momentum transfer `nu`, weighted by `1/|nu|`. Su et al.
//! (arXiv:2105.12767, section II B) build it from nested boxes: a unary
//! register `mu` picks the box size, `nu` ranges over the box, and an
//! amplitude-amplification test against an ancilla `m` keeps the right
//! weight. The bloqs here are cost-only: they declare the Toffoli and
//! arithmetic bill of each stage without spelling out the circuits.

use crate::bloq::{AnyBloq, Bloq};
use crate::bloqs::arithmetic::{GreaterThan, Product, SumOfSquares};
use crate::bloqs::basic::Toffoli;
use crate::dtype::QDType;
use crate::register::{Register, Signature};

fn nu_register(num_bits_p: u32) -> Register {
    // sign-magnitude, one extra bit for the sign, one word per dimension
    Register::new("nu", QDType::QAny(num_bits_p + 1)).with_shape([3])
}

/// Prepares the unary-encoded superposition over the box level `mu`
/// (Eq. 77 of arXiv:2105.12767): amplitude `sqrt(2^mu)` on the string with
/// `mu` trailing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrepareMuUnaryEncodedOneHot {
    pub num_bits_p: u32,
}

impl PrepareMuUnaryEncodedOneHot {
    pub fn new(num_bits_p: u32) -> Self {
        assert!(num_bits_p >= 1, "momentum registers cannot be empty");
        PrepareMuUnaryEncodedOneHot { num_bits_p }
    }
}

impl Bloq for PrepareMuUnaryEncodedOneHot {
    fn signature(&self) -> Signature {
        Signature::new(vec![Register::new("mu", QDType::QAny(self.num_bits_p))])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        // a ladder of controlled Hadamards, which do not invert for free
        let n = u64::from(self.num_bits_p);
        Some(if n > 1 {
            vec![(n - 1, Toffoli.into())]
        } else {
            Vec::new()
        })
    }
}

/// Extends the `mu` state with the three-dimensional box superposition over
/// `nu` (Eq. 78 of arXiv:2105.12767).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrepareNuSuperPositionState {
    pub num_bits_p: u32,
}

impl PrepareNuSuperPositionState {
    pub fn new(num_bits_p: u32) -> Self {
        assert!(num_bits_p >= 1, "momentum registers cannot be empty");
        PrepareNuSuperPositionState { num_bits_p }
    }
}

impl Bloq for PrepareNuSuperPositionState {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("mu", QDType::QAny(self.num_bits_p)),
            nu_register(self.num_bits_p),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        // the mu ladder again, once per dimension
        let n = u64::from(self.num_bits_p);
        Some(if n > 1 {
            vec![(3 * (n - 1), Toffoli.into())]
        } else {
            Vec::new()
        })
    }
}

/// Flags the minus-zero strings of the sign-magnitude `nu` register, which
/// the box superposition produces but the Hamiltonian has no use for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagZeroAsFailure {
    pub num_bits_p: u32,
    pub adjoint: bool,
}

impl FlagZeroAsFailure {
    pub fn new(num_bits_p: u32) -> Self {
        assert!(num_bits_p >= 1, "momentum registers cannot be empty");
        FlagZeroAsFailure {
            num_bits_p,
            adjoint: false,
        }
    }

    pub fn dagger(self) -> Self {
        FlagZeroAsFailure {
            adjoint: !self.adjoint,
            ..self
        }
    }
}

impl Bloq for FlagZeroAsFailure {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            nu_register(self.num_bits_p),
            Register::new("flag_minus_zero", QDType::QBit),
        ])
    }

    fn pretty_name(&self) -> String {
        if self.adjoint {
            "FlagZeroAsFailure†".into()
        } else {
            "FlagZeroAsFailure".into()
        }
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(if self.adjoint {
            // inverts with Cliffords
            Vec::new()
        } else {
            // a (num_bits_p+1)-controlled Toffoli per dimension, plus two
            // Toffolis to combine the three verdicts
            vec![(3 * u64::from(self.num_bits_p) + 2, Toffoli.into())]
        })
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(self.dagger().into())
    }
}

/// Flags whether every component of `nu` is smaller in magnitude than
/// `2^(mu-2)`, i.e. whether `nu` actually lies inside the chosen box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestNuLessThanMu {
    pub num_bits_p: u32,
    pub adjoint: bool,
}

impl TestNuLessThanMu {
    pub fn new(num_bits_p: u32) -> Self {
        assert!(num_bits_p >= 1, "momentum registers cannot be empty");
        TestNuLessThanMu {
            num_bits_p,
            adjoint: false,
        }
    }

    pub fn dagger(self) -> Self {
        TestNuLessThanMu {
            adjoint: !self.adjoint,
            ..self
        }
    }
}

impl Bloq for TestNuLessThanMu {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("mu", QDType::QAny(self.num_bits_p)),
            nu_register(self.num_bits_p),
            Register::new("flag_nu_lt_mu", QDType::QBit),
        ])
    }

    fn pretty_name(&self) -> String {
        if self.adjoint {
            "TestNuLessThanMu†".into()
        } else {
            "TestNuLessThanMu".into()
        }
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(if self.adjoint {
            Vec::new()
        } else {
            // num_bits_p four-controlled Toffolis per dimension
            vec![(3 * u64::from(self.num_bits_p), Toffoli.into())]
        })
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(self.dagger().into())
    }
}

/// The amplitude-amplification inequality `(2^(mu-2))^2 M > m |nu|^2`, with
/// `m` an ancilla drawn uniformly from `[0, M)`. Success of the whole
/// preparation lands in `succ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestNuInequality {
    pub num_bits_p: u32,
    pub num_bits_m: u32,
    pub adjoint: bool,
}

impl TestNuInequality {
    pub fn new(num_bits_p: u32, num_bits_m: u32) -> Self {
        assert!(num_bits_p >= 1, "momentum registers cannot be empty");
        assert!(num_bits_m >= 1, "the m register cannot be empty");
        TestNuInequality {
            num_bits_p,
            num_bits_m,
            adjoint: false,
        }
    }

    pub fn dagger(self) -> Self {
        TestNuInequality {
            adjoint: !self.adjoint,
            ..self
        }
    }
}

impl Bloq for TestNuInequality {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("mu", QDType::QAny(self.num_bits_p)),
            nu_register(self.num_bits_p),
            Register::new("m", QDType::QUInt(self.num_bits_m)),
            Register::new("flag_minus_zero", QDType::QBit),
            Register::new("flag_nu_lt_mu", QDType::QBit),
            Register::new("flag_ineq", QDType::QBit),
            Register::new("succ", QDType::QBit),
        ])
    }

    fn pretty_name(&self) -> String {
        if self.adjoint {
            "TestNuInequality†".into()
        } else {
            "TestNuInequality".into()
        }
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        if self.adjoint {
            return Some(Vec::new());
        }
        let np = self.num_bits_p;
        Some(vec![
            // |nu|^2 = nu_x^2 + nu_y^2 + nu_z^2
            (1, SumOfSquares::new(np, 3).into()),
            // m |nu|^2
            (1, Product::new(2 * np + 2, self.num_bits_m).into()),
            (1, GreaterThan::new(self.num_bits_m, 2 * np + 2).into()),
            // combine the three flags into succ
            (3, Toffoli.into()),
        ])
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(self.dagger().into())
    }
}

/// PREPARE for the full `1/|nu|`-weighted momentum-transfer state
/// (arXiv:2105.12767, section II B): box level, box superposition, the two
/// validity flags, and the amplitude-amplification test, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrepareNuState {
    pub num_bits_p: u32,
    pub m_param: u64,
    pub adjoint: bool,
}

impl PrepareNuState {
    /// # Panics
    ///
    /// Panics if `m_param < 2`, which would leave the `m` register empty.
    pub fn new(num_bits_p: u32, m_param: u64) -> Self {
        assert!(num_bits_p >= 1, "momentum registers cannot be empty");
        assert!(m_param >= 2, "the amplification parameter must be at least 2");
        PrepareNuState {
            num_bits_p,
            m_param,
            adjoint: false,
        }
    }

    pub fn dagger(self) -> Self {
        PrepareNuState {
            adjoint: !self.adjoint,
            ..self
        }
    }

    /// Bits of the amplification ancilla `m`, drawn from `[0, m_param)`.
    pub fn num_bits_m(&self) -> u32 {
        u64::BITS - (self.m_param - 1).leading_zeros()
    }
}

impl Bloq for PrepareNuState {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("mu", QDType::QAny(self.num_bits_p)),
            nu_register(self.num_bits_p),
            Register::new("m", QDType::QUInt(self.num_bits_m())),
            Register::new("flag_nu", QDType::QBit),
        ])
    }

    fn pretty_name(&self) -> String {
        if self.adjoint {
            "PrepareNuState†".into()
        } else {
            "PrepareNuState".into()
        }
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        let np = self.num_bits_p;
        let mut flag_zero = FlagZeroAsFailure::new(np);
        let mut nu_lt_mu = TestNuLessThanMu::new(np);
        let mut ineq = TestNuInequality::new(np, self.num_bits_m());
        if self.adjoint {
            flag_zero = flag_zero.dagger();
            nu_lt_mu = nu_lt_mu.dagger();
            ineq = ineq.dagger();
        }
        // the superposition over m is over a power of two, so Clifford-only
        Some(vec![
            (1, PrepareMuUnaryEncodedOneHot::new(np).into()),
            (1, PrepareNuSuperPositionState::new(np).into()),
            (1, flag_zero.into()),
            (1, nu_lt_mu.into()),
            (1, ineq.into()),
        ])
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(self.dagger().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tcomplexity::t_complexity;

    #[test]
    fn nu_state_toffoli_bill() {
        // np = 6, M = 256: 5 + 15 + 20 + 18 + 3 = 61 Toffolis, plus the
        // arithmetic of the inequality test
        let prep = PrepareNuState::new(6, 256);
        assert_eq!(prep.num_bits_m(), 8);
        let tc = t_complexity(&prep.into()).unwrap();
        let sos = 16 * 3 * 36;
        let product = 8 * 14 * 14;
        let greater = 8 * 14;
        assert_eq!(tc.t, 61 * 4 + sos + product + greater);
        assert_eq!(tc.rotations, 0);
    }

    #[test]
    fn unpreparation_keeps_only_the_ladders() {
        // the flags and the inequality invert with Cliffords; the controlled
        // Hadamard ladders do not
        let tc = t_complexity(&PrepareNuState::new(6, 256).dagger().into()).unwrap();
        assert_eq!(tc.t, 4 * (5 + 15));
    }

    #[test]
    fn flag_daggers_to_nothing() {
        let tc = t_complexity(&FlagZeroAsFailure::new(4).dagger().into()).unwrap();
        assert_eq!(tc.t, 0);
        assert_eq!(tc.clifford, 0);

        let round_trip = FlagZeroAsFailure::new(4).dagger().dagger();
        assert_eq!(round_trip, FlagZeroAsFailure::new(4));
    }

    #[test]
    fn inequality_test_registers() {
        let sig = TestNuInequality::new(5, 7).signature();
        assert_eq!(sig.n_qubits(), 5 + 3 * 6 + 7 + 4);
        assert_eq!(sig.get_left("nu").unwrap().total_bits(), 18);
    }

    #[test]
    fn single_bit_box_needs_no_ladder() {
        let tc = t_complexity(&PrepareMuUnaryEncodedOneHot::new(1).into()).unwrap();
        assert_eq!(tc, crate::tcomplexity::TComplexity::ZERO);
    }
}
