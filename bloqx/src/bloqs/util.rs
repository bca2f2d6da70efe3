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

//! Wire bookkeeping bloqs: reshaping, allocation and casts.
//!
//! None of these act on the quantum state; they cost nothing, and the call
//! graph generalizers in [`callgraph`](crate::callgraph) drop them from
//! resource tallies. They are typed through one-sided registers sharing the
//! name `reg`: a [`Split`] consumes `reg` as one wide wire and produces it as
//! an array of qubits, and its adjoint [`Join`] does the reverse.

use ndarray::{Array2, IxDyn};
use num::complex::Complex64;

use crate::bloq::{AnyBloq, Bloq};
use crate::classical::{ClassicalError, ClassicalVals};
use crate::dtype::QDType;
use crate::register::{Register, Side, Signature};
use crate::tcomplexity::TComplexity;
use crate::tensor::{self, Tensor};

/// | reg: dtype > -----> | reg: QBit [n] >
///
/// Splits one `n`-qubit wire into `n` qubit wires, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Split {
    pub dtype: QDType,
}

impl Split {
    pub fn of(dtype: QDType) -> Self {
        Split { dtype }
    }

    /// Split an opaque `n`-qubit wire.
    pub fn new(n: u32) -> Self {
        Split::of(QDType::QAny(n))
    }
}

impl Bloq for Split {
    fn signature(&self) -> Signature {
        let n = self.dtype.num_qubits() as usize;
        Signature::new(vec![
            Register::new("reg", self.dtype).with_side(Side::Left),
            Register::new("reg", QDType::QBit)
                .with_shape([n])
                .with_side(Side::Right),
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::ZERO)
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let v = vals.take_int("reg");
        let bits: Vec<u64> = self.dtype.to_bits(v).into_iter().map(u64::from).collect();
        let mut out = ClassicalVals::new();
        out.insert("reg", bits);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(reshape_identity(self.dtype.num_qubits(), true))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(Join::of(self.dtype).into())
    }
}

/// | reg: QBit [n] > -----> | reg: dtype >
///
/// Joins `n` qubit wires, most significant first, into one `n`-qubit wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Join {
    pub dtype: QDType,
}

impl Join {
    pub fn of(dtype: QDType) -> Self {
        Join { dtype }
    }

    /// Join into an opaque `n`-qubit wire.
    pub fn new(n: u32) -> Self {
        let dtype = if n == 1 { QDType::QBit } else { QDType::QAny(n) };
        Join::of(dtype)
    }
}

impl Bloq for Join {
    fn signature(&self) -> Signature {
        let n = self.dtype.num_qubits() as usize;
        Signature::new(vec![
            Register::new("reg", QDType::QBit)
                .with_shape([n])
                .with_side(Side::Left),
            Register::new("reg", self.dtype).with_side(Side::Right),
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::ZERO)
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let bits: Vec<u8> = vals
            .take_array("reg")
            .into_iter()
            .map(|b| b as u8)
            .collect();
        let mut out = ClassicalVals::new();
        out.insert("reg", self.dtype.from_bits(&bits));
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(reshape_identity(self.dtype.num_qubits(), false))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(Split::of(self.dtype).into())
    }
}

/// The identity on `n` qubits, reshaped with the wide wire on one side and
/// `n` qubit axes on the other.
fn reshape_identity(n: u32, wide_side_left: bool) -> Tensor {
    let d = 1usize << n;
    let mut shape = Vec::with_capacity(1 + n as usize);
    if wide_side_left {
        shape.push(d);
    }
    shape.extend(std::iter::repeat(2).take(n as usize));
    if !wide_side_left {
        shape.push(d);
    }
    Array2::<Complex64>::eye(d)
        .into_dyn()
        .into_shape_with_order(IxDyn(&shape))
        .expect("2^n x 2^n identity reshapes to qubit axes")
}

/// Produces a fresh wire in the all-zeros state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Allocate {
    pub dtype: QDType,
}

impl Allocate {
    pub fn of(dtype: QDType) -> Self {
        Allocate { dtype }
    }

    pub fn new(n: u32) -> Self {
        let dtype = if n == 1 { QDType::QBit } else { QDType::QAny(n) };
        Allocate::of(dtype)
    }
}

impl Bloq for Allocate {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("reg", self.dtype).with_side(Side::Right)
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::ZERO)
    }

    fn on_classical_vals(&self, _vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let mut out = ClassicalVals::new();
        out.insert("reg", 0u64);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        Some(tensor::basis_ket(0, self.dtype.num_qubits()))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(Free::of(self.dtype).into())
    }
}

/// Consumes a wire that must be back in the all-zeros state.
///
/// Classically, freeing a nonzero value is an
/// [`EffectMismatch`](ClassicalError::EffectMismatch): the decomposition
/// failed to uncompute something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Free {
    pub dtype: QDType,
}

impl Free {
    pub fn of(dtype: QDType) -> Self {
        Free { dtype }
    }

    pub fn new(n: u32) -> Self {
        let dtype = if n == 1 { QDType::QBit } else { QDType::QAny(n) };
        Free::of(dtype)
    }
}

impl Bloq for Free {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("reg", self.dtype).with_side(Side::Left)
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::ZERO)
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let v = vals.take_int("reg");
        if v != 0 {
            return Err(ClassicalError::EffectMismatch {
                name: "reg".to_string(),
                msg: format!("freed with value {v}, expected 0"),
            });
        }
        Ok(ClassicalVals::new())
    }

    fn my_tensor(&self) -> Option<Tensor> {
        // <0| as a single left axis
        Some(tensor::basis_ket(0, self.dtype.num_qubits()))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(Allocate::of(self.dtype).into())
    }
}

/// Reinterprets a wire under another dtype of the same width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cast {
    pub from: QDType,
    pub to: QDType,
}

impl Cast {
    /// # Panics
    ///
    /// Panics if the two dtypes differ in width.
    pub fn new(from: QDType, to: QDType) -> Self {
        assert_eq!(
            from.num_qubits(),
            to.num_qubits(),
            "cast cannot change the number of qubits"
        );
        Cast { from, to }
    }
}

impl Bloq for Cast {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("reg", self.from).with_side(Side::Left),
            Register::new("reg", self.to).with_side(Side::Right),
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::ZERO)
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let v = vals.take_int("reg");
        let mut out = ClassicalVals::new();
        out.insert("reg", v);
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let d = 1usize << self.from.num_qubits();
        Some(Array2::<Complex64>::eye(d).into_dyn())
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(Cast::new(self.to, self.from).into())
    }
}

/// A stand-in for one arbitrary Clifford operation on `n` qubits.
///
/// Decomposition counts quote Clifford totals against this placeholder
/// rather than spelling out the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArbitraryClifford(pub u32);

impl Bloq for ArbitraryClifford {
    fn signature(&self) -> Signature {
        Signature::build([("reg", self.0)])
    }

    fn pretty_name(&self) -> String {
        format!("ArbitraryClifford({})", self.0)
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(TComplexity::clifford(1))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some((*self).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BloqBuilder, SoqMap};
    use crate::tcomplexity::t_complexity;
    use crate::tensor::tensor_contract;

    #[test]
    fn split_bits_are_big_endian() {
        let mut out = AnyBloq::from(Split::new(3))
            .call_classically([("reg", 0b101.into())].into())
            .unwrap();
        assert_eq!(out.take_array("reg"), vec![1, 0, 1]);
    }

    #[test]
    fn join_reassembles() {
        let mut out = AnyBloq::from(Join::new(3))
            .call_classically([("reg", vec![1, 0, 1].into())].into())
            .unwrap();
        assert_eq!(out.take_int("reg"), 0b101);
    }

    #[test]
    fn allocate_starts_at_zero() {
        let mut out = AnyBloq::from(Allocate::new(4))
            .call_classically(ClassicalVals::new())
            .unwrap();
        assert_eq!(out.take_int("reg"), 0);
    }

    #[test]
    fn adjoint_pairs() {
        let split: AnyBloq = Split::new(3).into();
        assert_eq!(split.adjoint(), Join::new(3).into());
        let alloc: AnyBloq = Allocate::new(2).into();
        assert_eq!(alloc.adjoint(), Free::new(2).into());
        let cast: AnyBloq = Cast::new(QDType::QAny(2), QDType::QUInt(2)).into();
        assert_eq!(
            cast.adjoint(),
            Cast::new(QDType::QUInt(2), QDType::QAny(2)).into()
        );
    }

    #[test]
    #[should_panic]
    fn cast_rejects_width_change() {
        Cast::new(QDType::QAny(2), QDType::QBit);
    }

    #[test]
    fn reshaping_costs_nothing() {
        assert_eq!(
            t_complexity(&Split::new(4).into()).unwrap(),
            TComplexity::ZERO
        );
        assert_eq!(
            t_complexity(&ArbitraryClifford(2).into()).unwrap(),
            TComplexity::clifford(1)
        );
    }

    #[test]
    fn split_join_contracts_to_identity() {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("x", 2)]));
        let x = soqs.take_one("x");
        let bits = bb.split(x).unwrap();
        let x = bb.join(bits).unwrap();
        let cbloq = bb.finalize(SoqMap::from([("x", x.into())])).unwrap();
        let m = tensor_contract(&cbloq.into()).unwrap();
        let eye = Array2::<Complex64>::eye(4);
        for i in 0..4 {
            for j in 0..4 {
                assert!((m[(i, j)] - eye[(i, j)]).norm() < 1e-12);
            }
        }
    }
}
