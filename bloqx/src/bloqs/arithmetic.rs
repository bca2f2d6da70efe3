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

//! Integer arithmetic on quantum registers.
//!
//! Costs follow the Clifford+T accounting of the fault-tolerant arithmetic
//! literature: ripple-carry addition per Gidney (arXiv:1709.06648),
//! multiplication and comparison per the first-quantized chemistry paper
//! (arXiv:2105.12767). Each bloq with a closed-form action also declares it
//! classically, so decompositions that use these can be checked end to end.

use crate::bloq::{AnyBloq, Bloq};
use crate::bloqs::basic::{TwoBitCSwap, XGate};
use crate::bloqs::mcmt::And;
use crate::bloqs::util::ArbitraryClifford;
use crate::classical::{ClassicalError, ClassicalVals};
use crate::dtype::QDType;
use crate::register::{Register, Side, Signature};
use crate::tcomplexity::TComplexity;

fn mask(n: u32) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// In-place addition `b += a (mod 2^n)` by ripple carry.
///
/// One And pair plus a handful of Cliffords per carry, so `4(n-1)` T overall
/// (Gidney, arXiv:1709.06648).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Add {
    pub bitsize: u32,
}

impl Add {
    pub fn new(bitsize: u32) -> Self {
        Add { bitsize }
    }
}

impl Bloq for Add {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("a", QDType::QUInt(self.bitsize)),
            Register::new("b", QDType::QUInt(self.bitsize)),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        let carries = u64::from(self.bitsize) - 1;
        Some(vec![
            (carries, And::default().into()),
            (carries, And::default().uncompute().into()),
            (6 * carries, ArbitraryClifford(2).into()),
        ])
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let a = vals.take_int("a");
        let b = vals.take_int("b");
        let mut out = ClassicalVals::new();
        out.insert("a", a);
        out.insert("b", a.wrapping_add(b) & mask(self.bitsize));
        Ok(out)
    }
}

/// Out-of-place addition `c = a + b` into a fresh `n+1`-bit register.
///
/// Skipping the in-place uncomputation halves the And count to `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutOfPlaceAdder {
    pub bitsize: u32,
}

impl OutOfPlaceAdder {
    pub fn new(bitsize: u32) -> Self {
        OutOfPlaceAdder { bitsize }
    }
}

impl Bloq for OutOfPlaceAdder {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("a", QDType::QUInt(self.bitsize)),
            Register::new("b", QDType::QUInt(self.bitsize)),
            Register::new("c", QDType::QUInt(self.bitsize + 1)).with_side(Side::Right),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        let n = u64::from(self.bitsize);
        Some(vec![
            (n, And::default().into()),
            (5 * n, ArbitraryClifford(2).into()),
        ])
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let a = vals.take_int("a");
        let b = vals.take_int("b");
        let mut out = ClassicalVals::new();
        out.insert("a", a);
        out.insert("b", b);
        out.insert("c", a + b);
        Ok(out)
    }
}

/// In-place two's-complement negation `x -> -x (mod 2^n)`: flip every bit,
/// then increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Negate {
    pub bitsize: u32,
}

impl Negate {
    pub fn new(bitsize: u32) -> Self {
        Negate { bitsize }
    }
}

impl Bloq for Negate {
    fn signature(&self) -> Signature {
        Signature::new(vec![Register::new("x", QDType::QUInt(self.bitsize))])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(vec![
            (u64::from(self.bitsize), XGate.into()),
            (1, Add::new(self.bitsize).into()),
        ])
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let x = vals.take_int("x");
        let mut out = ClassicalVals::new();
        out.insert("x", x.wrapping_neg() & mask(self.bitsize));
        Ok(out)
    }
}

/// Out-of-place product `result = a * b` into a fresh `a+b`-bit register.
///
/// Schoolbook multiplication, `8 max(a,b)^2` T (arXiv:2105.12767).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Product {
    pub a_bitsize: u32,
    pub b_bitsize: u32,
}

impl Product {
    pub fn new(a_bitsize: u32, b_bitsize: u32) -> Self {
        Product {
            a_bitsize,
            b_bitsize,
        }
    }
}

impl Bloq for Product {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("a", QDType::QUInt(self.a_bitsize)),
            Register::new("b", QDType::QUInt(self.b_bitsize)),
            Register::new("result", QDType::QUInt(self.a_bitsize + self.b_bitsize))
                .with_side(Side::Right),
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        let n = u64::from(self.a_bitsize.max(self.b_bitsize));
        Some(TComplexity::t(8 * n * n))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        if self.a_bitsize + self.b_bitsize > 64 {
            return Err(ClassicalError::Unsupported(
                "product wider than 64 bits".to_string(),
            ));
        }
        let a = vals.take_int("a");
        let b = vals.take_int("b");
        let mut out = ClassicalVals::new();
        out.insert("a", a);
        out.insert("b", b);
        out.insert("result", (u128::from(a) * u128::from(b)) as u64);
        Ok(out)
    }
}

/// Out-of-place square `result = a^2` into a fresh `2n`-bit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub bitsize: u32,
}

impl Square {
    pub fn new(bitsize: u32) -> Self {
        Square { bitsize }
    }
}

impl Bloq for Square {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("a", QDType::QUInt(self.bitsize)),
            Register::new("result", QDType::QUInt(2 * self.bitsize)).with_side(Side::Right),
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        let n = u64::from(self.bitsize);
        Some(TComplexity::t(8 * n * n))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        if self.bitsize > 32 {
            return Err(ClassicalError::Unsupported(
                "square wider than 64 bits".to_string(),
            ));
        }
        let a = vals.take_int("a");
        let mut out = ClassicalVals::new();
        out.insert("a", a);
        out.insert("result", a * a);
        Ok(out)
    }
}

/// Out-of-place sum of `k` squares into a `2n + ceil(lg k)`-bit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SumOfSquares {
    pub bitsize: u32,
    pub k: u32,
}

impl SumOfSquares {
    pub fn new(bitsize: u32, k: u32) -> Self {
        assert!(k >= 2, "summing fewer than two squares");
        SumOfSquares { bitsize, k }
    }

    /// Width of the result register.
    pub fn result_bitsize(&self) -> u32 {
        2 * self.bitsize + self.k.next_power_of_two().trailing_zeros()
    }
}

impl Bloq for SumOfSquares {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("input", QDType::QUInt(self.bitsize)).with_shape([self.k as usize]),
            Register::new("result", QDType::QUInt(self.result_bitsize())).with_side(Side::Right),
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        let n = u64::from(self.bitsize);
        Some(TComplexity::t(16 * u64::from(self.k) * n * n))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        if self.result_bitsize() > 64 {
            return Err(ClassicalError::Unsupported(
                "sum of squares wider than 64 bits".to_string(),
            ));
        }
        let input = vals.take_array("input");
        let sum = input
            .iter()
            .map(|&v| u128::from(v) * u128::from(v))
            .sum::<u128>() as u64;
        let mut out = ClassicalVals::new();
        out.insert("input", input);
        out.insert("result", sum);
        Ok(out)
    }
}

/// Flips `target` when `a > b`, comparing bit-serially from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GreaterThan {
    pub a_bitsize: u32,
    pub b_bitsize: u32,
}

impl GreaterThan {
    pub fn new(a_bitsize: u32, b_bitsize: u32) -> Self {
        GreaterThan {
            a_bitsize,
            b_bitsize,
        }
    }
}

impl Bloq for GreaterThan {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("a", QDType::QUInt(self.a_bitsize)),
            Register::new("b", QDType::QUInt(self.b_bitsize)),
            Register::new("target", QDType::QBit),
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        // two Toffolis per bit: compute the comparison, then uncompute it
        let n = u64::from(self.a_bitsize.max(self.b_bitsize));
        Some(TComplexity::t(8 * n))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let a = vals.take_int("a");
        let b = vals.take_int("b");
        let target = vals.take_int("target");
        let mut out = ClassicalVals::new();
        out.insert("a", a);
        out.insert("b", b);
        out.insert("target", target ^ u64::from(a > b));
        Ok(out)
    }
}

/// Flips `target` when `x < k` for a classical constant `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LessThanConstant {
    pub bitsize: u32,
    pub k: u64,
}

impl LessThanConstant {
    pub fn new(bitsize: u32, k: u64) -> Self {
        LessThanConstant { bitsize, k }
    }
}

impl Bloq for LessThanConstant {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("x", QDType::QUInt(self.bitsize)),
            Register::new("target", QDType::QBit),
        ])
    }

    fn pretty_name(&self) -> String {
        format!("x<{}", self.k)
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        // one Toffoli per bit, uncomputed by measurement
        Some(TComplexity::t(4 * u64::from(self.bitsize)))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let x = vals.take_int("x");
        let target = vals.take_int("target");
        let mut out = ClassicalVals::new();
        out.insert("x", x);
        out.insert("target", target ^ u64::from(x < self.k));
        Ok(out)
    }
}

/// Flips `target` when `a == b`.
///
/// CNOTs fold the difference into `b`, an all-zeros check flips the target
/// through a [`MultiAnd`](crate::bloqs::mcmt::MultiAnd) ladder, and the
/// CNOTs restore `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Equals {
    pub bitsize: u32,
}

impl Equals {
    pub fn new(bitsize: u32) -> Self {
        Equals { bitsize }
    }
}

impl Bloq for Equals {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("a", QDType::QUInt(self.bitsize)),
            Register::new("b", QDType::QUInt(self.bitsize)),
            Register::new("target", QDType::QBit),
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        let n = u64::from(self.bitsize);
        Some(TComplexity::t(4 * n.saturating_sub(1)))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let a = vals.take_int("a");
        let b = vals.take_int("b");
        let target = vals.take_int("target");
        let mut out = ClassicalVals::new();
        out.insert("a", a);
        out.insert("b", b);
        out.insert("target", target ^ u64::from(a == b));
        Ok(out)
    }
}

/// Sorts a pair in place: `a` comes out holding the smaller value, `b` the
/// larger, and a fresh flag records whether a swap happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Comparator {
    pub bitsize: u32,
}

impl Comparator {
    pub fn new(bitsize: u32) -> Self {
        Comparator { bitsize }
    }
}

impl Bloq for Comparator {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("a", QDType::QUInt(self.bitsize)),
            Register::new("b", QDType::QUInt(self.bitsize)),
            Register::new("flag", QDType::QBit).with_side(Side::Right),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(vec![
            (1, GreaterThan::new(self.bitsize, self.bitsize).into()),
            (u64::from(self.bitsize), TwoBitCSwap.into()),
        ])
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let a = vals.take_int("a");
        let b = vals.take_int("b");
        let swapped = a > b;
        let mut out = ClassicalVals::new();
        out.insert("a", a.min(b));
        out.insert("b", a.max(b));
        out.insert("flag", u64::from(swapped));
        Ok(out)
    }
}

/// Sorts `k` registers with a bitonic network of [`Comparator`]s.
///
/// Each comparator leaves one flag bit behind, so the junk register grows
/// with the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitonicSort {
    pub bitsize: u32,
    pub k: u32,
}

impl BitonicSort {
    /// # Panics
    ///
    /// Panics unless `k` is a power of two; pad the input otherwise.
    pub fn new(bitsize: u32, k: u32) -> Self {
        assert!(k.is_power_of_two(), "bitonic network needs a power of two");
        BitonicSort { bitsize, k }
    }

    /// Comparators in the network: `k lg(k) (lg(k) + 1) / 4`.
    pub fn num_comparisons(&self) -> u64 {
        let lg = u64::from(self.k.trailing_zeros());
        u64::from(self.k) * lg * (lg + 1) / 4
    }
}

impl Bloq for BitonicSort {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("xs", QDType::QUInt(self.bitsize)).with_shape([self.k as usize]),
            Register::new("junk", QDType::QBit)
                .with_shape([self.num_comparisons() as usize])
                .with_side(Side::Right),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(vec![(
            self.num_comparisons(),
            Comparator::new(self.bitsize).into(),
        )])
    }
}

/// Maps the triangular pair `(mu, nu)` with `mu <= nu` to the contiguous
/// index `s ^= nu (nu + 1) / 2 + mu`.
///
/// `n^2 + n - 1` Toffolis (arXiv:2011.03494).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToContiguousIndex {
    pub bitsize: u32,
    pub s_bitsize: u32,
}

impl ToContiguousIndex {
    pub fn new(bitsize: u32, s_bitsize: u32) -> Self {
        ToContiguousIndex { bitsize, s_bitsize }
    }
}

impl Bloq for ToContiguousIndex {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("mu", QDType::QUInt(self.bitsize)),
            Register::new("nu", QDType::QUInt(self.bitsize)),
            Register::new("s", QDType::QUInt(self.s_bitsize)),
        ])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        let n = u64::from(self.bitsize);
        Some(TComplexity::t(4 * (n * n + n - 1)))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let mu = vals.take_int("mu");
        let nu = vals.take_int("nu");
        let s = vals.take_int("s");
        let mut out = ClassicalVals::new();
        out.insert("mu", mu);
        out.insert("nu", nu);
        out.insert("s", s ^ ((nu * (nu + 1) / 2 + mu) & mask(self.s_bitsize)));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tcomplexity::t_complexity;

    #[test]
    fn add_wraps_modulo() {
        let mut out = AnyBloq::from(Add::new(4))
            .call_classically([("a", 9.into()), ("b", 11.into())].into())
            .unwrap();
        assert_eq!(out.take_int("a"), 9);
        assert_eq!(out.take_int("b"), (9 + 11) % 16);
    }

    #[test]
    fn add_costs_one_and_pair_per_carry() {
        let tc = t_complexity(&Add::new(4).into()).unwrap();
        assert_eq!(tc.t, 4 * 3);
        assert_eq!(tc.rotations, 0);
    }

    #[test]
    fn out_of_place_keeps_the_carry() {
        let mut out = AnyBloq::from(OutOfPlaceAdder::new(3))
            .call_classically([("a", 7.into()), ("b", 6.into())].into())
            .unwrap();
        assert_eq!(out.take_int("c"), 13);
    }

    #[test]
    fn negate_is_twos_complement() {
        let mut out = AnyBloq::from(Negate::new(4))
            .call_classically([("x", 5.into())].into())
            .unwrap();
        assert_eq!(out.take_int("x"), 11);
        let mut out = AnyBloq::from(Negate::new(4))
            .call_classically([("x", 0.into())].into())
            .unwrap();
        assert_eq!(out.take_int("x"), 0);
    }

    #[test]
    fn product_and_square() {
        let mut out = AnyBloq::from(Product::new(3, 4))
            .call_classically([("a", 7.into()), ("b", 13.into())].into())
            .unwrap();
        assert_eq!(out.take_int("result"), 91);
        let mut out = AnyBloq::from(Square::new(4))
            .call_classically([("a", 13.into())].into())
            .unwrap();
        assert_eq!(out.take_int("result"), 169);
    }

    #[test]
    fn sum_of_squares_of_a_vector() {
        let sos = SumOfSquares::new(3, 3);
        assert_eq!(sos.result_bitsize(), 8);
        let mut out = AnyBloq::from(sos)
            .call_classically([("input", vec![3, 4, 5].into())].into())
            .unwrap();
        assert_eq!(out.take_int("result"), 9 + 16 + 25);
    }

    #[test]
    fn comparisons_toggle_the_target() {
        let mut out = AnyBloq::from(GreaterThan::new(4, 4))
            .call_classically([("a", 9.into()), ("b", 4.into()), ("target", 0.into())].into())
            .unwrap();
        assert_eq!(out.take_int("target"), 1);

        let mut out = AnyBloq::from(LessThanConstant::new(4, 7))
            .call_classically([("x", 7.into()), ("target", 1.into())].into())
            .unwrap();
        // 7 < 7 is false; the set target stays set
        assert_eq!(out.take_int("target"), 1);

        let mut out = AnyBloq::from(Equals::new(4))
            .call_classically([("a", 6.into()), ("b", 6.into()), ("target", 0.into())].into())
            .unwrap();
        assert_eq!(out.take_int("target"), 1);
    }

    #[test]
    fn comparator_sorts_the_pair() {
        let mut out = AnyBloq::from(Comparator::new(4))
            .call_classically([("a", 11.into()), ("b", 5.into())].into())
            .unwrap();
        assert_eq!(out.take_int("a"), 5);
        assert_eq!(out.take_int("b"), 11);
        assert_eq!(out.take_int("flag"), 1);
    }

    #[test]
    fn bitonic_network_size() {
        assert_eq!(BitonicSort::new(3, 2).num_comparisons(), 1);
        assert_eq!(BitonicSort::new(3, 4).num_comparisons(), 6);
        assert_eq!(BitonicSort::new(3, 8).num_comparisons(), 24);
    }

    #[test]
    fn contiguous_index_is_triangular() {
        let mut out = AnyBloq::from(ToContiguousIndex::new(3, 7))
            .call_classically([("mu", 2.into()), ("nu", 5.into()), ("s", 0.into())].into())
            .unwrap();
        assert_eq!(out.take_int("s"), 5 * 6 / 2 + 2);
    }
}
