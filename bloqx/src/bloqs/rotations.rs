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

//! Rotations through phase-gradient registers.
//!
//! A phase-gradient register is prepared once, at a one-off synthesis price,
//! and every later Z rotation against it costs only an addition (Gidney,
//! arXiv:1709.06648; Sanders et al., arXiv:2007.07391). This is how
//! algorithms with many rotations avoid paying the per-rotation synthesis
//! cost in T gates.

use ndarray::ArrayD;
use num::complex::Complex64;

use crate::bloq::{AnyBloq, Bloq};
use crate::bloqs::arithmetic::Add;
use crate::classical::{ClassicalError, ClassicalVals};
use crate::dtype::QDType;
use crate::phase::Phase;
use crate::register::{Register, Side, Signature};
use crate::tcomplexity::TComplexity;
use crate::tensor::Tensor;

fn grad_dtype(bitsize: u32) -> QDType {
    QDType::qfxp(bitsize, bitsize, false)
}

/// Cost of the rung ladder: qubit `j` carries the angle `2^-j` half-turns,
/// so the first two rungs are Clifford, the third is a T, and the rest are
/// arbitrary rotations.
fn rung_cost(bitsize: u32) -> TComplexity {
    let n = u64::from(bitsize);
    TComplexity {
        t: u64::from(bitsize >= 3),
        clifford: n.min(2),
        rotations: n.saturating_sub(3),
    }
}

/// Prepares the `n`-bit phase-gradient state
/// `2^{-n/2} sum_k e^{-2 pi i k / 2^n} |k>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseGradientState {
    pub bitsize: u32,
}

impl PhaseGradientState {
    pub fn new(bitsize: u32) -> Self {
        PhaseGradientState { bitsize }
    }
}

impl Bloq for PhaseGradientState {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("phase_grad", grad_dtype(self.bitsize)).with_side(Side::Right)
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        // a Hadamard per qubit, then one phase rung per qubit
        Some(TComplexity::clifford(u64::from(self.bitsize)) + rung_cost(self.bitsize))
    }

    fn my_tensor(&self) -> Option<Tensor> {
        if self.bitsize > 12 {
            return None;
        }
        let d = 1usize << self.bitsize;
        let norm = 1.0 / (d as f64).sqrt();
        let amps: Vec<Complex64> = (0..d)
            .map(|k| {
                Complex64::from_polar(
                    norm,
                    -2.0 * std::f64::consts::PI * k as f64 / d as f64,
                )
            })
            .collect();
        Some(crate::tensor::ket(&amps))
    }
}

/// The diagonal unitary `|k> -> e^{2 pi i k / 2^n} |k>`: one Z-power rung
/// per qubit of the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseGradientUnitary {
    pub bitsize: u32,
}

impl PhaseGradientUnitary {
    pub fn new(bitsize: u32) -> Self {
        PhaseGradientUnitary { bitsize }
    }
}

impl Bloq for PhaseGradientUnitary {
    fn signature(&self) -> Signature {
        Signature::new(vec![Register::new("phase_grad", grad_dtype(self.bitsize))])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(rung_cost(self.bitsize))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        // diagonal: basis states pass through
        let v = vals.take_int("phase_grad");
        let mut out = ClassicalVals::new();
        out.insert("phase_grad", v);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        if self.bitsize > 12 {
            return None;
        }
        let d = 1usize << self.bitsize;
        let mut t = ArrayD::zeros(ndarray::IxDyn(&[d, d]));
        for k in 0..d {
            let phase = 2.0 * std::f64::consts::PI * k as f64 / d as f64;
            t[ndarray::IxDyn(&[k, k])] = Complex64::from_polar(1.0, phase);
        }
        Some(t)
    }
}

/// In-place addition of an integer register into a phase-gradient register:
/// `phase_grad += x (mod 2^b)`, which kicks back the phase
/// `e^{2 pi i x / 2^b}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddIntoPhaseGrad {
    pub x_bitsize: u32,
    pub phase_bitsize: u32,
}

impl AddIntoPhaseGrad {
    pub fn new(x_bitsize: u32, phase_bitsize: u32) -> Self {
        AddIntoPhaseGrad {
            x_bitsize,
            phase_bitsize,
        }
    }
}

impl Bloq for AddIntoPhaseGrad {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("x", QDType::QUInt(self.x_bitsize)),
            Register::new("phase_grad", grad_dtype(self.phase_bitsize)),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(vec![(1, Add::new(self.phase_bitsize).into())])
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let x = vals.take_int("x");
        let pg = vals.take_int("phase_grad");
        let m = (1u64 << self.phase_bitsize) - 1;
        let mut out = ClassicalVals::new();
        out.insert("x", x);
        out.insert("phase_grad", pg.wrapping_add(x) & m);
        Ok(out)
    }
}

/// An Rz of a fixed angle, paid for with one addition into a shared
/// phase-gradient register instead of a synthesis sequence.
///
/// The angle is realized to `grad_bitsize` bits; the T cost is the adder's,
/// with zero rotations left over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RzViaPhaseGradient {
    pub phase: Phase,
    pub grad_bitsize: u32,
}

impl RzViaPhaseGradient {
    pub fn new(phase: impl Into<Phase>, grad_bitsize: u32) -> Self {
        RzViaPhaseGradient {
            phase: phase.into(),
            grad_bitsize,
        }
    }
}

impl Bloq for RzViaPhaseGradient {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("q", QDType::QBit),
            Register::new("phase_grad", grad_dtype(self.grad_bitsize)),
        ])
    }

    fn pretty_name(&self) -> String {
        format!("Rz({})~grad", self.phase)
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(vec![(
            1,
            AddIntoPhaseGrad::new(self.grad_bitsize, self.grad_bitsize).into(),
        )])
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(
            RzViaPhaseGradient {
                phase: -self.phase,
                grad_bitsize: self.grad_bitsize,
            }
            .into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tcomplexity::t_complexity;

    #[test]
    fn gradient_state_rungs() {
        let tc = t_complexity(&PhaseGradientState::new(5).into()).unwrap();
        assert_eq!(tc.clifford, 5 + 2);
        assert_eq!(tc.t, 1);
        assert_eq!(tc.rotations, 2);
        // two qubits stay entirely Clifford
        let tc = t_complexity(&PhaseGradientState::new(2).into()).unwrap();
        assert_eq!(tc.t, 0);
        assert_eq!(tc.rotations, 0);
    }

    #[test]
    fn add_into_gradient_wraps() {
        let mut out = AnyBloq::from(AddIntoPhaseGrad::new(4, 4))
            .call_classically([("x", 13.into()), ("phase_grad", 7.into())].into())
            .unwrap();
        assert_eq!(out.take_int("phase_grad"), (13 + 7) % 16);
    }

    #[test]
    fn rz_via_gradient_costs_one_adder() {
        let rz: AnyBloq = RzViaPhaseGradient::new((1, 16), 8).into();
        let adder = t_complexity(&Add::new(8).into()).unwrap();
        let tc = t_complexity(&rz).unwrap();
        assert_eq!(tc, adder);
        // in particular, no leftover rotations to synthesize
        assert_eq!(tc.rotations, 0);
    }

    #[test]
    fn gradient_unitary_passes_basis_states() {
        let mut out = AnyBloq::from(PhaseGradientUnitary::new(3))
            .call_classically([("phase_grad", 5.into())].into())
            .unwrap();
        assert_eq!(out.take_int("phase_grad"), 5);
    }
}
