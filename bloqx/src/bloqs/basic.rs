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

//! Elementary gates, basis states and effects.
//!
//! These are the leaves most decompositions bottom out in. Each declares its
//! cost in the Clifford+T model directly; the small ones also declare dense
//! tensors so composite contractions have something to contract.

use ndarray::{array, Array2, ArrayD, IxDyn};
use num::complex::Complex64;

use crate::bloq::{AnyBloq, Bloq};
use crate::bloqs::mcmt::And;
use crate::builder::{BloqBuilder, SoqMap};
use crate::classical::{ClassicalError, ClassicalVals};
use crate::dtype::QDType;
use crate::phase::Phase;
use crate::register::{Register, Side, Signature};
use crate::tcomplexity::TComplexity;
use crate::tensor::{self, Tensor};

use crate::bloq::DecomposeError;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// The Pauli X gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XGate;

impl Bloq for XGate {
    fn signature(&self) -> Signature {
        Signature::build([("q", 1)])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::clifford(1))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let q = vals.take_int("q");
        let mut out = ClassicalVals::new();
        out.insert("q", q ^ 1);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(tensor::one_qubit([
            [c(0.0, 0.0), c(1.0, 0.0)],
            [c(1.0, 0.0), c(0.0, 0.0)],
        ]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(XGate.into())
    }
}

/// The Pauli Y gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YGate;

impl Bloq for YGate {
    fn signature(&self) -> Signature {
        Signature::build([("q", 1)])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::clifford(1))
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(tensor::one_qubit([
            [c(0.0, 0.0), c(0.0, -1.0)],
            [c(0.0, 1.0), c(0.0, 0.0)],
        ]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(YGate.into())
    }
}

/// The Pauli Z gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZGate;

impl Bloq for ZGate {
    fn signature(&self) -> Signature {
        Signature::build([("q", 1)])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::clifford(1))
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(tensor::one_qubit([
            [c(1.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(-1.0, 0.0)],
        ]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(ZGate.into())
    }
}

/// The Hadamard gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hadamard;

impl Bloq for Hadamard {
    fn signature(&self) -> Signature {
        Signature::build([("q", 1)])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::clifford(1))
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        Some(tensor::one_qubit([
            [c(h, 0.0), c(h, 0.0)],
            [c(h, 0.0), c(-h, 0.0)],
        ]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(Hadamard.into())
    }
}

/// The S gate `diag(1, i)`, or its adjoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SGate {
    pub is_adjoint: bool,
}

impl Bloq for SGate {
    fn signature(&self) -> Signature {
        Signature::build([("q", 1)])
    }

    fn pretty_name(&self) -> String {
        if self.is_adjoint { "SGate†".into() } else { "SGate".into() }
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::clifford(1))
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let i = if self.is_adjoint { -1.0 } else { 1.0 };
        Some(tensor::one_qubit([
            [c(1.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(0.0, i)],
        ]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(SGate { is_adjoint: !self.is_adjoint }.into())
    }
}

/// The T gate `diag(1, e^{i pi/4})`, or its adjoint. The unit of cost in the
/// fault-tolerant model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TGate {
    pub is_adjoint: bool,
}

impl Bloq for TGate {
    fn signature(&self) -> Signature {
        Signature::build([("q", 1)])
    }

    fn pretty_name(&self) -> String {
        if self.is_adjoint { "TGate†".into() } else { "TGate".into() }
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::t(1))
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let i = if self.is_adjoint { -h } else { h };
        Some(tensor::one_qubit([
            [c(1.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(h, i)],
        ]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(TGate { is_adjoint: !self.is_adjoint }.into())
    }
}

/// The controlled-NOT gate: `target ^= ctrl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CNot;

impl Bloq for CNot {
    fn signature(&self) -> Signature {
        Signature::build([("ctrl", 1), ("target", 1)])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::clifford(1))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let ctrl = vals.take_int("ctrl");
        let target = vals.take_int("target");
        let mut out = ClassicalVals::new();
        out.insert("ctrl", ctrl);
        out.insert("target", target ^ ctrl);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let o = c(0.0, 0.0);
        let l = c(1.0, 0.0);
        let u = array![
            [l, o, o, o],
            [o, l, o, o],
            [o, o, o, l],
            [o, o, l, o]
        ];
        Some(tensor::from_unitary(&u, &[1, 1]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(CNot.into())
    }
}

/// The controlled-Z gate `diag(1, 1, 1, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CZ;

impl Bloq for CZ {
    fn signature(&self) -> Signature {
        Signature::build([("q1", 1), ("q2", 1)])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::clifford(1))
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let o = c(0.0, 0.0);
        let l = c(1.0, 0.0);
        let u = array![
            [l, o, o, o],
            [o, l, o, o],
            [o, o, l, o],
            [o, o, o, -l]
        ];
        Some(tensor::from_unitary(&u, &[1, 1]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(CZ.into())
    }
}

/// The doubly-controlled NOT gate: `target ^= ctrl[0] & ctrl[1]`.
///
/// Decomposes as compute-[`And`], [`CNot`] off the ancilla, uncompute-[`And`],
/// which is where its 4-T price comes from (Gidney, arXiv:1709.06648). No
/// leaf cost is declared; the counter resolves it through the decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Toffoli;

impl Bloq for Toffoli {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("ctrl", QDType::QBit).with_shape([2]),
            Register::new("target", QDType::QBit),
        ])
    }

    fn build_composite(
        &self,
        bb: &mut BloqBuilder,
        mut soqs: SoqMap,
    ) -> Result<SoqMap, DecomposeError> {
        let ctrl = soqs.take_many("ctrl");
        let target = soqs.take_one("target");
        let mut out = bb.add(And::default(), [("ctrl", ctrl.into())].into())?;
        let ctrl = out.take_many("ctrl");
        let anc = out.take_one("target");
        let mut out = bb.add(
            CNot,
            [("ctrl", anc.into()), ("target", target.into())].into(),
        )?;
        let anc = out.take_one("ctrl");
        let target = out.take_one("target");
        let mut out = bb.add(
            And::default().uncompute(),
            [("ctrl", ctrl.into()), ("target", anc.into())].into(),
        )?;
        let ctrl = out.take_many("ctrl");
        Ok([("ctrl", ctrl.into()), ("target", target.into())].into())
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let ctrl = vals.take_array("ctrl");
        let target = vals.take_int("target");
        let mut out = ClassicalVals::new();
        out.insert("target", target ^ (ctrl[0] & ctrl[1]));
        out.insert("ctrl", ctrl);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let mut u = Array2::<Complex64>::zeros((8, 8));
        for i in 0..8 {
            let o = match i {
                6 => 7,
                7 => 6,
                _ => i,
            };
            u[(o, i)] = c(1.0, 0.0);
        }
        Some(tensor::from_unitary(&u, &[1, 1, 1]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(Toffoli.into())
    }
}

/// Swaps two qubits. Three alternating CNOTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TwoBitSwap;

impl Bloq for TwoBitSwap {
    fn signature(&self) -> Signature {
        Signature::build([("x", 1), ("y", 1)])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::clifford(1))
    }

    fn build_composite(
        &self,
        bb: &mut BloqBuilder,
        mut soqs: SoqMap,
    ) -> Result<SoqMap, DecomposeError> {
        let mut x = soqs.take_one("x");
        let mut y = soqs.take_one("y");
        for flip in [false, true, false] {
            let (ctrl, target) = if flip { (y, x) } else { (x, y) };
            let mut out = bb.add(
                CNot,
                [("ctrl", ctrl.into()), ("target", target.into())].into(),
            )?;
            let ctrl = out.take_one("ctrl");
            let target = out.take_one("target");
            if flip {
                y = ctrl;
                x = target;
            } else {
                x = ctrl;
                y = target;
            }
        }
        Ok([("x", x.into()), ("y", y.into())].into())
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let x = vals.take_int("x");
        let y = vals.take_int("y");
        let mut out = ClassicalVals::new();
        out.insert("x", y);
        out.insert("y", x);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let o = c(0.0, 0.0);
        let l = c(1.0, 0.0);
        let u = array![
            [l, o, o, o],
            [o, o, l, o],
            [o, l, o, o],
            [o, o, o, l]
        ];
        Some(tensor::from_unitary(&u, &[1, 1]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(TwoBitSwap.into())
    }
}

/// Swaps two qubits when the control is set (a Fredkin gate).
///
/// Declared at the 7-T accounting of Berry et al. (arXiv:1805.03662,
/// appendix B); the decomposition is the textbook CNOT-Toffoli-CNOT
/// identity, used by the classical and tensor checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TwoBitCSwap;

impl Bloq for TwoBitCSwap {
    fn signature(&self) -> Signature {
        Signature::build([("ctrl", 1), ("x", 1), ("y", 1)])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity { t: 7, clifford: 10, rotations: 0 })
    }

    fn build_composite(
        &self,
        bb: &mut BloqBuilder,
        mut soqs: SoqMap,
    ) -> Result<SoqMap, DecomposeError> {
        let ctrl = soqs.take_one("ctrl");
        let x = soqs.take_one("x");
        let y = soqs.take_one("y");
        let mut out = bb.add(CNot, [("ctrl", y.into()), ("target", x.into())].into())?;
        let y = out.take_one("ctrl");
        let x = out.take_one("target");
        let mut out = bb.add(
            Toffoli,
            [("ctrl", vec![ctrl, x].into()), ("target", y.into())].into(),
        )?;
        let mut cx = out.take_many("ctrl");
        let y = out.take_one("target");
        let x = cx.pop().expect("two controls");
        let ctrl = cx.pop().expect("two controls");
        let mut out = bb.add(CNot, [("ctrl", y.into()), ("target", x.into())].into())?;
        let y = out.take_one("ctrl");
        let x = out.take_one("target");
        Ok([("ctrl", ctrl.into()), ("x", x.into()), ("y", y.into())].into())
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let ctrl = vals.take_int("ctrl");
        let x = vals.take_int("x");
        let y = vals.take_int("y");
        let (x, y) = if ctrl == 1 { (y, x) } else { (x, y) };
        let mut out = ClassicalVals::new();
        out.insert("ctrl", ctrl);
        out.insert("x", x);
        out.insert("y", y);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let mut u = Array2::<Complex64>::zeros((8, 8));
        for i in 0..8 {
            // basis order (ctrl, x, y); swap x and y when ctrl is set
            let o = match i {
                5 => 6,
                6 => 5,
                _ => i,
            };
            u[(o, i)] = c(1.0, 0.0);
        }
        Some(tensor::from_unitary(&u, &[1, 1, 1]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(TwoBitCSwap.into())
    }
}

/// The Z-power gate `diag(1, e^{i pi r})` for a phase of `r` half-turns.
///
/// Clifford angles cost one Clifford, the T angle costs one T, anything else
/// counts as one arbitrary rotation to be synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rz {
    pub phase: Phase,
}

impl Rz {
    pub fn new(phase: impl Into<Phase>) -> Self {
        Rz { phase: phase.into() }
    }
}

impl Bloq for Rz {
    fn signature(&self) -> Signature {
        Signature::build([("q", 1)])
    }

    fn pretty_name(&self) -> String {
        format!("Rz({})", self.phase)
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        use num::Zero;
        Some(if self.phase.is_zero() {
            TComplexity::ZERO
        } else if self.phase.is_clifford() {
            TComplexity::clifford(1)
        } else if self.phase.is_t() {
            TComplexity::t(1)
        } else {
            TComplexity::rotations(1)
        })
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(tensor::one_qubit([
            [c(1.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), self.phase.to_complex()],
        ]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(Rz { phase: -self.phase }.into())
    }
}

/// Multiplies the global phase by `e^{i pi r}`. No registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalPhase(pub Phase);

impl Bloq for GlobalPhase {
    fn signature(&self) -> Signature {
        Signature::new(vec![])
    }

    fn pretty_name(&self) -> String {
        format!("GlobalPhase({})", self.0)
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::ZERO)
    }

    fn on_classical_vals(&self, _vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        Ok(ClassicalVals::new())
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(ArrayD::from_elem(IxDyn(&[]), self.0.to_complex()))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(GlobalPhase(-self.0).into())
    }
}

/// The single-qubit identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity;

impl Bloq for Identity {
    fn signature(&self) -> Signature {
        Signature::build([("q", 1)])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::ZERO)
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let q = vals.take_int("q");
        let mut out = ClassicalVals::new();
        out.insert("q", q);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(tensor::one_qubit([
            [c(1.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(1.0, 0.0)],
        ]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(Identity.into())
    }
}

/// Prepares `|0>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZeroState;

/// Prepares `|1>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OneState;

/// Prepares `|+>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlusState;

/// Projects onto `<0|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZeroEffect;

/// Projects onto `<1|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OneEffect;

/// Projects onto `<+|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlusEffect;

fn state_signature() -> Signature {
    Signature::new(vec![
        Register::new("q", QDType::QBit).with_side(Side::Right)
    ])
}

fn effect_signature() -> Signature {
    Signature::new(vec![
        Register::new("q", QDType::QBit).with_side(Side::Left)
    ])
}

impl Bloq for ZeroState {
    fn signature(&self) -> Signature {
        state_signature()
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::ZERO)
    }

    fn on_classical_vals(&self, _vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let mut out = ClassicalVals::new();
        out.insert("q", 0u64);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(tensor::basis_ket(0, 1))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(ZeroEffect.into())
    }
}

impl Bloq for OneState {
    fn signature(&self) -> Signature {
        state_signature()
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        // the X setting the bit
        Some(TComplexity::clifford(1))
    }

    fn on_classical_vals(&self, _vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let mut out = ClassicalVals::new();
        out.insert("q", 1u64);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(tensor::basis_ket(1, 1))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(OneEffect.into())
    }
}

impl Bloq for PlusState {
    fn signature(&self) -> Signature {
        state_signature()
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        // the Hadamard
        Some(TComplexity::clifford(1))
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let h = c(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        Some(tensor::ket(&[h, h]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(PlusEffect.into())
    }
}

impl Bloq for ZeroEffect {
    fn signature(&self) -> Signature {
        effect_signature()
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::ZERO)
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let q = vals.take_int("q");
        if q != 0 {
            return Err(ClassicalError::EffectMismatch {
                name: "q".to_string(),
                msg: format!("projected <0| onto |{q}>"),
            });
        }
        Ok(ClassicalVals::new())
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(tensor::basis_ket(0, 1))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(ZeroState.into())
    }
}

impl Bloq for OneEffect {
    fn signature(&self) -> Signature {
        effect_signature()
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::clifford(1))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let q = vals.take_int("q");
        if q != 1 {
            return Err(ClassicalError::EffectMismatch {
                name: "q".to_string(),
                msg: format!("projected <1| onto |{q}>"),
            });
        }
        Ok(ClassicalVals::new())
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(tensor::basis_ket(1, 1))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(OneState.into())
    }
}

impl Bloq for PlusEffect {
    fn signature(&self) -> Signature {
        effect_signature()
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::clifford(1))
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let h = c(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        Some(tensor::ket(&[h, h]))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(PlusState.into())
    }
}

/// Prepares the computational-basis state `|val>` on a fresh `bitsize`-bit
/// register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntState {
    pub val: u64,
    pub bitsize: u32,
}

impl IntState {
    /// # Panics
    ///
    /// Panics if `val` does not fit in `bitsize` bits.
    pub fn new(val: u64, bitsize: u32) -> Self {
        assert!(
            QDType::QUInt(bitsize).is_valid_classical(val),
            "{val} does not fit in {bitsize} bits"
        );
        IntState { val, bitsize }
    }
}

impl Bloq for IntState {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("val", QDType::QUInt(self.bitsize)).with_side(Side::Right)
        ])
    }

    fn pretty_name(&self) -> String {
        format!("IntState({})", self.val)
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        // one X per set bit
        Some(TComplexity::clifford(u64::from(self.val.count_ones())))
    }

    fn on_classical_vals(&self, _vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let mut out = ClassicalVals::new();
        out.insert("val", self.val);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        (self.bitsize <= 12).then(|| tensor::basis_ket(self.val, self.bitsize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Zero;
    use rstest::rstest;

    use crate::tcomplexity::t_complexity;

    #[test]
    fn swap_decomposes_to_three_cnots() {
        let cbloq = AnyBloq::from(TwoBitSwap).decompose().unwrap();
        assert_eq!(cbloq.counts_tally(), vec![(3, CNot.into())]);
    }

    #[test]
    fn swap_classical() {
        let mut out = AnyBloq::from(TwoBitSwap)
            .call_classically([("x", 1.into()), ("y", 0.into())].into())
            .unwrap();
        assert_eq!(out.take_int("x"), 0);
        assert_eq!(out.take_int("y"), 1);
    }

    #[rstest]
    #[case(0, 1, 0, 1, 0)]
    #[case(1, 1, 0, 0, 1)]
    fn cswap_classical(
        #[case] ctrl: u64,
        #[case] x: u64,
        #[case] y: u64,
        #[case] want_x: u64,
        #[case] want_y: u64,
    ) {
        let mut out = AnyBloq::from(TwoBitCSwap)
            .call_classically([("ctrl", ctrl.into()), ("x", x.into()), ("y", y.into())].into())
            .unwrap();
        assert_eq!(out.take_int("x"), want_x);
        assert_eq!(out.take_int("y"), want_y);
    }

    #[test]
    fn cswap_decomposition_swaps_classically() {
        // the declared action and the CNOT-Toffoli-CNOT identity agree
        for ctrl in [0u64, 1] {
            let direct = AnyBloq::from(TwoBitCSwap)
                .call_classically(
                    [("ctrl", ctrl.into()), ("x", 1.into()), ("y", 0.into())].into(),
                )
                .unwrap();
            let cbloq = AnyBloq::from(TwoBitCSwap).decompose().unwrap();
            let decomposed = AnyBloq::from(cbloq)
                .call_classically(
                    [("ctrl", ctrl.into()), ("x", 1.into()), ("y", 0.into())].into(),
                )
                .unwrap();
            assert_eq!(direct, decomposed);
        }
    }

    #[rstest]
    #[case(Phase::zero(), TComplexity::ZERO)]
    #[case(Phase::from((1, 1)), TComplexity::clifford(1))]
    #[case(Phase::from((1, 2)), TComplexity::clifford(1))]
    #[case(Phase::from((1, 4)), TComplexity::t(1))]
    #[case(Phase::from((1, 8)), TComplexity::rotations(1))]
    #[case(Phase::from((3, 7)), TComplexity::rotations(1))]
    fn rz_cost_follows_the_angle(#[case] phase: Phase, #[case] want: TComplexity) {
        assert_eq!(t_complexity(&Rz::new(phase).into()).unwrap(), want);
    }

    #[test]
    fn rz_adjoint_negates_the_angle() {
        let rz: AnyBloq = Rz::new((1, 8)).into();
        assert_eq!(rz.adjoint(), Rz::new((-1, 8)).into());
        assert_eq!(rz.adjoint().adjoint(), rz);
    }

    #[test]
    fn t_adjoint_flips() {
        let t: AnyBloq = TGate::default().into();
        assert_eq!(t.adjoint(), TGate { is_adjoint: true }.into());
        assert_eq!(t.adjoint().pretty_name(), "TGate†");
    }

    #[test]
    fn states_pair_with_effects() {
        assert_eq!(AnyBloq::from(ZeroState).adjoint(), ZeroEffect.into());
        assert_eq!(AnyBloq::from(OneEffect).adjoint(), OneState.into());
        assert_eq!(AnyBloq::from(PlusState).adjoint(), PlusEffect.into());
    }

    #[test]
    fn one_effect_rejects_zero() {
        let err = AnyBloq::from(OneEffect)
            .call_classically([("q", 0.into())].into())
            .unwrap_err();
        assert!(matches!(err, ClassicalError::EffectMismatch { .. }));
    }

    #[test]
    fn int_state_holds_its_value() {
        let mut out = AnyBloq::from(IntState::new(9, 4))
            .call_classically(ClassicalVals::new())
            .unwrap();
        assert_eq!(out.take_int("val"), 9);
        let tc = t_complexity(&IntState::new(9, 4).into()).unwrap();
        assert_eq!(tc, TComplexity::clifford(2));
    }

    #[test]
    #[should_panic]
    fn int_state_checks_the_width() {
        IntState::new(16, 4);
    }

    #[test]
    fn global_phase_has_no_registers() {
        let gp: AnyBloq = GlobalPhase(Phase::from((1, 4))).into();
        assert!(gp.signature().is_empty());
        assert_eq!(t_complexity(&gp).unwrap(), TComplexity::ZERO);
        assert_eq!(gp.adjoint(), GlobalPhase(Phase::from((-1, 4))).into());
    }

    #[test]
    fn hadamard_tensor_entries() {
        let t = Hadamard.my_tensor().unwrap();
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((t[[0, 0]].re - h).abs() < 1e-12);
        assert!((t[[1, 1]].re + h).abs() < 1e-12);
    }
}
