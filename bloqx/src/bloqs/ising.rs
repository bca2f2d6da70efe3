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

//! Trotterized evolution of the transverse-field Ising model.
//!
//! A symmetric product formula for `H = -J sum_j Z_j Z_{j+1} - Gamma sum_j
//! X_j` on a ring: half of the X layer, the full layer of two-site ZZ
//! interactions, then the other half of the X layer. Every interaction
//! bottoms out in one `Rz`, so the cost of a step is dominated by rotation
//! synthesis unless the angles happen to land on Clifford values.

use ndarray::array;
use num::complex::Complex64;

use crate::bloq::{AnyBloq, Bloq, DecomposeError};
use crate::bloqs::basic::{CNot, Hadamard, Rz};
use crate::builder::{BloqBuilder, SoqMap};
use crate::dtype::QDType;
use crate::phase::Phase;
use crate::register::{Register, Signature};
use crate::tensor::{self, Tensor};

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// The two-site Ising interaction `exp(i pi theta (|01><01| + |10><10|))`:
/// the odd-parity basis states pick up the phase `e^{i pi theta}`.
///
/// Decomposes as a CNOT-conjugated `Rz` on the second site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsingZZUnitary {
    pub angle: Phase,
}

impl IsingZZUnitary {
    pub fn new(angle: impl Into<Phase>) -> Self {
        IsingZZUnitary { angle: angle.into() }
    }
}

impl Bloq for IsingZZUnitary {
    fn signature(&self) -> Signature {
        Signature::new(vec![Register::new("q", QDType::QBit).with_shape([2])])
    }

    fn pretty_name(&self) -> String {
        format!("ZZ({})", self.angle)
    }

    fn build_composite(
        &self,
        bb: &mut BloqBuilder,
        mut soqs: SoqMap,
    ) -> Result<SoqMap, DecomposeError> {
        let mut qs = soqs.take_many("q");
        let q1 = qs.pop().expect("two sites");
        let q0 = qs.pop().expect("two sites");
        let mut out = bb.add(CNot, [("ctrl", q0.into()), ("target", q1.into())].into())?;
        let q0 = out.take_one("ctrl");
        let q1 = out.take_one("target");
        let mut out = bb.add(Rz::new(self.angle), [("q", q1.into())].into())?;
        let q1 = out.take_one("q");
        let mut out = bb.add(CNot, [("ctrl", q0.into()), ("target", q1.into())].into())?;
        let q0 = out.take_one("ctrl");
        let q1 = out.take_one("target");
        Ok([("q", vec![q0, q1].into())].into())
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let o = c(0.0, 0.0);
        let l = c(1.0, 0.0);
        let p = self.angle.to_complex();
        let u = array![
            [l, o, o, o],
            [o, p, o, o],
            [o, o, p, o],
            [o, o, o, l]
        ];
        Some(tensor::from_unitary(&u, &[1, 1]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(IsingZZUnitary { angle: -self.angle }.into())
    }
}

/// A single-site X rotation, realized as `H Rz(theta) H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsingXUnitary {
    pub angle: Phase,
}

impl IsingXUnitary {
    pub fn new(angle: impl Into<Phase>) -> Self {
        IsingXUnitary { angle: angle.into() }
    }
}

impl Bloq for IsingXUnitary {
    fn signature(&self) -> Signature {
        Signature::build([("q", 1)])
    }

    fn pretty_name(&self) -> String {
        format!("Rx({})", self.angle)
    }

    fn build_composite(
        &self,
        bb: &mut BloqBuilder,
        mut soqs: SoqMap,
    ) -> Result<SoqMap, DecomposeError> {
        let q = soqs.take_one("q");
        let mut out = bb.add(Hadamard, [("q", q.into())].into())?;
        let q = out.take_one("q");
        let mut out = bb.add(Rz::new(self.angle), [("q", q.into())].into())?;
        let q = out.take_one("q");
        let mut out = bb.add(Hadamard, [("q", q.into())].into())?;
        let q = out.take_one("q");
        Ok([("q", q.into())].into())
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let p = self.angle.to_complex();
        let a = (c(1.0, 0.0) + p) * 0.5;
        let b = (c(1.0, 0.0) - p) * 0.5;
        Some(tensor::one_qubit([[a, b], [b, a]]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(IsingXUnitary { angle: -self.angle }.into())
    }
}

/// One symmetric Trotter step for the transverse-field Ising ring, second
/// order in the step size (Childs et al., arXiv:1912.08854).
///
/// The X layer is split around the ZZ layer, so a step on `nsites` sites
/// bills `2 * nsites` half-angle X rotations and `nsites` ZZ interactions,
/// one rotation each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrotterStepIsing {
    pub nsites: u32,
    pub zz_angle: Phase,
    pub x_angle: Phase,
}

impl TrotterStepIsing {
    pub fn new(nsites: u32, zz_angle: impl Into<Phase>, x_angle: impl Into<Phase>) -> Self {
        assert!(nsites >= 2, "an Ising ring needs at least two sites");
        TrotterStepIsing {
            nsites,
            zz_angle: zz_angle.into(),
            x_angle: x_angle.into(),
        }
    }
}

impl Bloq for TrotterStepIsing {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("system", QDType::QBit).with_shape([self.nsites as usize]),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(vec![
            (
                2 * u64::from(self.nsites),
                IsingXUnitary::new(self.x_angle / 2).into(),
            ),
            (
                u64::from(self.nsites),
                IsingZZUnitary::new(self.zz_angle).into(),
            ),
        ])
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        // the symmetric splitting reverses by negating both angles
        Some(
            TrotterStepIsing {
                nsites: self.nsites,
                zz_angle: -self.zz_angle,
                x_angle: -self.x_angle,
            }
            .into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloq::AnyBloq;
    use crate::bloqs::basic::XGate;
    use crate::tcomplexity::{t_complexity, TComplexity};
    use crate::tensor::tensor_contract;

    #[test]
    fn step_rotation_bill() {
        let step = TrotterStepIsing::new(4, (1, 7), (3, 7));
        let tc = t_complexity(&step.into()).unwrap();
        // 8 X rotations wrapped in Hadamards plus 4 CNOT-conjugated ZZs
        assert_eq!(tc, TComplexity { t: 0, clifford: 24, rotations: 12 });
    }

    #[test]
    fn pauli_angles_need_no_synthesis() {
        // zz angle Z and half the x angle S are both Clifford
        let step = TrotterStepIsing::new(3, (1, 1), (1, 1));
        let tc = t_complexity(&step.into()).unwrap();
        assert_eq!(tc.t, 0);
        assert_eq!(tc.rotations, 0);
    }

    #[test]
    fn zz_tensor_matches_decomposition() {
        let zz = IsingZZUnitary::new((1, 7));
        let declared = tensor_contract(&zz.into()).unwrap();
        assert_eq!(declared.shape(), [4, 4]);
        let cbloq = AnyBloq::from(zz).decompose().unwrap();
        let contracted = tensor_contract(&cbloq.into()).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert!((declared[(i, j)] - contracted[(i, j)]).norm() < 1e-10);
            }
        }
    }

    #[test]
    fn x_tensor_matches_decomposition() {
        let rx = IsingXUnitary::new((2, 5));
        let declared = tensor_contract(&rx.into()).unwrap();
        let cbloq = AnyBloq::from(rx).decompose().unwrap();
        let contracted = tensor_contract(&cbloq.into()).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert!((declared[(i, j)] - contracted[(i, j)]).norm() < 1e-10);
            }
        }
    }

    #[test]
    fn x_unitary_at_a_half_turn_is_pauli_x() {
        let m = tensor_contract(&IsingXUnitary::new((1, 1)).into()).unwrap();
        let x = tensor_contract(&XGate.into()).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert!((m[(i, j)] - x[(i, j)]).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn adjoint_negates_the_angles() {
        let zz = AnyBloq::from(IsingZZUnitary::new((1, 7)));
        assert_eq!(zz.adjoint(), IsingZZUnitary::new((-1, 7)).into());
        let step = AnyBloq::from(TrotterStepIsing::new(4, (1, 7), (3, 7)));
        assert_eq!(step.adjoint(), TrotterStepIsing::new(4, (-1, 7), (-3, 7)).into());
    }
}
