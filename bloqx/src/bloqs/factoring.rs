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

//! Modular exponentiation, the quantum workload of Shor's algorithm.
//!
//! Factoring `N` reduces to finding the period of `f(e) = g^e mod N`. The
//! standard construction (Gidney and Ekerå, arXiv:1905.09749) initializes a
//! work register to one and walks the exponent bits from least significant
//! up, each bit controlling a modular multiplication by `g^(2^j) mod N`.
//! Each multiplication is in turn two controlled scaled additions into a
//! borrowed register plus a controlled swap, and each scaled addition is one
//! constant modular adder per source bit.

use rand::Rng;

use crate::bloq::{AnyBloq, Bloq, DecomposeError};
use crate::bloqs::arithmetic::{Add, LessThanConstant};
use crate::bloqs::basic::IntState;
use crate::bloqs::mcmt::And;
use crate::bloqs::swap_network::CSwap;
use crate::builder::{BloqBuilder, SoqMap};
use crate::classical::{ClassicalError, ClassicalVals};
use crate::composite::Soquet;
use crate::dtype::QDType;
use crate::register::{Register, Side, Signature};

pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// The multiplicative inverse of `k` modulo `n`, by the extended Euclidean
/// algorithm.
///
/// # Panics
///
/// Panics unless `gcd(k, n) == 1`.
pub fn mod_inv(k: u64, n: u64) -> u64 {
    let (mut r0, mut r1) = (i128::from(k % n), i128::from(n));
    let (mut s0, mut s1) = (1i128, 0i128);
    while r1 != 0 {
        let q = r0 / r1;
        (r0, r1) = (r1, r0 - q * r1);
        (s0, s1) = (s1, s0 - q * s1);
    }
    assert!(r0 == 1, "{k} has no inverse modulo {n}");
    s0.rem_euclid(i128::from(n)) as u64
}

pub(crate) fn mulmod(a: u64, b: u64, n: u64) -> u64 {
    (u128::from(a) * u128::from(b) % u128::from(n)) as u64
}

/// `g^e mod n` by square-and-multiply.
pub fn modexp(g: u64, mut e: u64, n: u64) -> u64 {
    let mut base = g % n;
    let mut acc = 1 % n;
    while e > 0 {
        if e & 1 == 1 {
            acc = mulmod(acc, base, n);
        }
        base = mulmod(base, base, n);
        e >>= 1;
    }
    acc
}

fn check_reduced(name: &str, val: u64, mod_n: u64) -> Result<(), ClassicalError> {
    if val >= mod_n {
        return Err(ClassicalError::EffectMismatch {
            name: name.to_string(),
            msg: format!("{val} is not reduced modulo {mod_n}"),
        });
    }
    Ok(())
}

/// Adds the classical constant `k` into `trg` modulo `mod_n` when `ctrl` is
/// set: two comparisons against the modulus and two additions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CtrlAddK {
    pub k: u64,
    pub bitsize: u32,
    pub mod_n: u64,
}

impl CtrlAddK {
    pub fn new(k: u64, bitsize: u32, mod_n: u64) -> Self {
        assert!(mod_n >= 2, "modulus must be at least 2");
        assert!(
            u64::BITS - (mod_n - 1).leading_zeros() <= bitsize,
            "register too narrow for values modulo {mod_n}"
        );
        CtrlAddK {
            k: k % mod_n,
            bitsize,
            mod_n,
        }
    }
}

impl Bloq for CtrlAddK {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("ctrl", QDType::QBit),
            Register::new("trg", QDType::QUInt(self.bitsize)),
        ])
    }

    fn pretty_name(&self) -> String {
        format!("trg += {} % {}", self.k, self.mod_n)
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(vec![
            (2, Add::new(self.bitsize).into()),
            (2, LessThanConstant::new(self.bitsize, self.mod_n).into()),
        ])
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let ctrl = vals.take_int("ctrl");
        let trg = vals.take_int("trg");
        check_reduced("trg", trg, self.mod_n)?;
        let mut out = ClassicalVals::new();
        out.insert("ctrl", ctrl);
        out.insert(
            "trg",
            if ctrl == 1 {
                (trg + self.k) % self.mod_n
            } else {
                trg
            },
        );
        Ok(out)
    }
}

/// `trg += k * src mod mod_n`, controlled.
///
/// One constant adder per source bit, each gated by an And of the control
/// with that bit so the whole block is a no-op when `ctrl` is clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CtrlScaleModAdd {
    pub k: u64,
    pub bitsize: u32,
    pub mod_n: u64,
}

impl CtrlScaleModAdd {
    pub fn new(k: u64, bitsize: u32, mod_n: u64) -> Self {
        assert!(bitsize >= 2, "modular registers need at least two bits");
        assert!(
            u64::BITS - (mod_n - 1).leading_zeros() <= bitsize,
            "register too narrow for values modulo {mod_n}"
        );
        CtrlScaleModAdd {
            k: k % mod_n,
            bitsize,
            mod_n,
        }
    }
}

impl Bloq for CtrlScaleModAdd {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("ctrl", QDType::QBit),
            Register::new("src", QDType::QUInt(self.bitsize)),
            Register::new("trg", QDType::QUInt(self.bitsize)),
        ])
    }

    fn pretty_name(&self) -> String {
        format!("trg += src*{} % {}", self.k, self.mod_n)
    }

    fn build_composite(
        &self,
        bb: &mut BloqBuilder,
        mut soqs: SoqMap,
    ) -> Result<SoqMap, DecomposeError> {
        let mut ctrl = soqs.take_one("ctrl");
        let mut trg = soqs.take_one("trg");
        let src_bits = bb.split(soqs.take_one("src"))?;
        let n = u64::from(self.bitsize);
        let mut done = Vec::with_capacity(src_bits.len());
        for (j, bit) in src_bits.into_iter().enumerate() {
            // bit j of the big-endian split carries weight 2^(n-1-j)
            let weight = mulmod(self.k, modexp(2, n - 1 - j as u64, self.mod_n), self.mod_n);
            let mut out = bb.add(
                And::default(),
                [("ctrl", vec![ctrl, bit].into())].into(),
            )?;
            let mut pair = out.take_many("ctrl");
            let anc = out.take_one("target");
            let bit = pair.pop().expect("two controls");
            ctrl = pair.pop().expect("two controls");

            let mut out = bb.add(
                CtrlAddK::new(weight, self.bitsize, self.mod_n),
                [("ctrl", anc.into()), ("trg", trg.into())].into(),
            )?;
            let anc = out.take_one("ctrl");
            trg = out.take_one("trg");

            let mut out = bb.add(
                And::default().uncompute(),
                [("ctrl", vec![ctrl, bit].into()), ("target", anc.into())].into(),
            )?;
            let mut pair = out.take_many("ctrl");
            let bit = pair.pop().expect("two controls");
            ctrl = pair.pop().expect("two controls");
            done.push(bit);
        }
        let src = bb.join(done)?;
        Ok([("ctrl", ctrl.into()), ("src", src.into()), ("trg", trg.into())].into())
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let ctrl = vals.take_int("ctrl");
        let src = vals.take_int("src");
        let trg = vals.take_int("trg");
        check_reduced("trg", trg, self.mod_n)?;
        let add = if ctrl == 1 {
            mulmod(src, self.k, self.mod_n)
        } else {
            0
        };
        let mut out = ClassicalVals::new();
        out.insert("ctrl", ctrl);
        out.insert("src", src);
        out.insert("trg", (trg + add) % self.mod_n);
        Ok(out)
    }
}

/// `x *= k mod mod_n`, controlled, with `k` a unit of `Z_N`.
///
/// Multiplies into a borrowed zero register, un-multiplies the original by
/// `k^-1`, then swaps conditioned on the control so the borrowed register is
/// provably zero before it is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CtrlModMul {
    pub k: u64,
    pub bitsize: u32,
    pub mod_n: u64,
}

impl CtrlModMul {
    /// # Panics
    ///
    /// Panics unless `gcd(k, mod_n) == 1`; a non-unit multiplier is not
    /// invertible, and the circuit could not uncompute its workspace.
    pub fn new(k: u64, bitsize: u32, mod_n: u64) -> Self {
        assert!(bitsize >= 2, "modular registers need at least two bits");
        assert!(
            u64::BITS - (mod_n - 1).leading_zeros() <= bitsize,
            "register too narrow for values modulo {mod_n}"
        );
        let k = k % mod_n;
        assert!(gcd(k, mod_n) == 1, "{k} is not a unit modulo {mod_n}");
        CtrlModMul { k, bitsize, mod_n }
    }

    fn scale_add(&self, k: u64) -> CtrlScaleModAdd {
        CtrlScaleModAdd::new(k, self.bitsize, self.mod_n)
    }
}

impl Bloq for CtrlModMul {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("ctrl", QDType::QBit),
            Register::new("x", QDType::QUInt(self.bitsize)),
        ])
    }

    fn pretty_name(&self) -> String {
        format!("x *= {} % {}", self.k, self.mod_n)
    }

    fn build_composite(
        &self,
        bb: &mut BloqBuilder,
        mut soqs: SoqMap,
    ) -> Result<SoqMap, DecomposeError> {
        let ctrl = soqs.take_one("ctrl");
        let x = soqs.take_one("x");
        let y = bb.allocate(self.bitsize);

        // y += k*x
        let mut out = bb.add(
            self.scale_add(self.k),
            [("ctrl", ctrl.into()), ("src", x.into()), ("trg", y.into())].into(),
        )?;
        let ctrl = out.take_one("ctrl");
        let x = out.take_one("src");
        let y = out.take_one("trg");

        // x -= k^-1 * y, leaving x at zero exactly when the control fired
        let neg_k_inv = self.mod_n - mod_inv(self.k, self.mod_n);
        let mut out = bb.add(
            self.scale_add(neg_k_inv),
            [("ctrl", ctrl.into()), ("src", y.into()), ("trg", x.into())].into(),
        )?;
        let ctrl = out.take_one("ctrl");
        let y = out.take_one("src");
        let x = out.take_one("trg");

        // with the control clear x still holds the input, so swap before
        // freeing: the zero ends up in y either way
        let mut out = bb.add(
            CSwap::new(self.bitsize),
            [("ctrl", ctrl.into()), ("x", x.into()), ("y", y.into())].into(),
        )?;
        let ctrl = out.take_one("ctrl");
        let x = out.take_one("x");
        bb.free(out.take_one("y"))?;

        Ok([("ctrl", ctrl.into()), ("x", x.into())].into())
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let ctrl = vals.take_int("ctrl");
        let x = vals.take_int("x");
        check_reduced("x", x, self.mod_n)?;
        let mut out = ClassicalVals::new();
        out.insert("ctrl", ctrl);
        out.insert(
            "x",
            if ctrl == 1 {
                mulmod(x, self.k, self.mod_n)
            } else {
                x
            },
        );
        Ok(out)
    }
}

/// `x = g^e mod mod_n` over a fresh work register, by iterated controlled
/// modular multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModExp {
    pub g: u64,
    pub mod_n: u64,
    pub exp_bitsize: u32,
    pub x_bitsize: u32,
}

impl ModExp {
    pub fn new(g: u64, mod_n: u64, exp_bitsize: u32, x_bitsize: u32) -> Self {
        assert!(exp_bitsize >= 2, "need at least two exponent bits");
        assert!(
            u64::BITS - (mod_n - 1).leading_zeros() <= x_bitsize,
            "work register too narrow for values modulo {mod_n}"
        );
        let g = g % mod_n;
        assert!(gcd(g, mod_n) == 1, "{g} is not a unit modulo {mod_n}");
        ModExp {
            g,
            mod_n,
            exp_bitsize,
            x_bitsize,
        }
    }

    /// Sizes the exponentiation for a run of Shor's algorithm on the
    /// composite `big_n`: `n`-bit work register, `2n`-bit exponent. Picks a
    /// random base coprime to `big_n` unless one is given.
    pub fn make_for_shor(big_n: u64, g: Option<u64>) -> Self {
        assert!(big_n >= 3, "nothing to factor below 3");
        let little_n = u64::BITS - (big_n - 1).leading_zeros();
        let g = g.unwrap_or_else(|| {
            let mut rng = rand::thread_rng();
            loop {
                let cand = rng.gen_range(2..big_n);
                if gcd(cand, big_n) == 1 {
                    break cand;
                }
            }
        });
        ModExp::new(g, big_n, 2 * little_n, little_n)
    }

    fn ctrl_mod_mul(&self, k: u64) -> CtrlModMul {
        CtrlModMul::new(k, self.x_bitsize, self.mod_n)
    }
}

impl Bloq for ModExp {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("exponent", QDType::QUInt(self.exp_bitsize)),
            Register::new("x", QDType::QUInt(self.x_bitsize)).with_side(Side::Right),
        ])
    }

    fn pretty_name(&self) -> String {
        format!("{}^e % {}", self.g, self.mod_n)
    }

    fn build_composite(
        &self,
        bb: &mut BloqBuilder,
        mut soqs: SoqMap,
    ) -> Result<SoqMap, DecomposeError> {
        let mut out = bb.add(IntState::new(1, self.x_bitsize), SoqMap::new())?;
        let mut x = out.take_one("val");
        let mut bits = bb.split(soqs.take_one("exponent"))?;

        // right-to-left binary: pop from the low end, squaring the base
        let mut done: Vec<Soquet> = Vec::with_capacity(bits.len());
        let mut base = self.g;
        while let Some(bit) = bits.pop() {
            let mut out = bb.add(
                self.ctrl_mod_mul(base),
                [("ctrl", bit.into()), ("x", x.into())].into(),
            )?;
            done.push(out.take_one("ctrl"));
            x = out.take_one("x");
            base = mulmod(base, base, self.mod_n);
        }
        done.reverse();
        let exponent = bb.join(done)?;
        Ok([("exponent", exponent.into()), ("x", x.into())].into())
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let e = vals.take_int("exponent");
        let mut out = ClassicalVals::new();
        out.insert("exponent", e);
        out.insert("x", modexp(self.g, e, self.mod_n));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tcomplexity::t_complexity;
    use rstest::rstest;

    #[test]
    fn euclid_inverse() {
        assert_eq!(mod_inv(7, 15), 13);
        assert_eq!(mulmod(7, 13, 15), 1);
        assert_eq!(mod_inv(1, 15), 1);
        assert_eq!(modexp(7, 0, 15), 1);
        assert_eq!(modexp(7, 4, 15), 1);
        assert_eq!(modexp(7, 6, 15), 4);
    }

    #[test]
    #[should_panic]
    fn no_inverse_without_coprimality() {
        mod_inv(6, 15);
    }

    #[test]
    fn constant_adder_wraps_and_costs() {
        let bloq = CtrlAddK::new(9, 4, 15);
        let mut out = AnyBloq::from(bloq)
            .call_classically([("ctrl", 1.into()), ("trg", 8.into())].into())
            .unwrap();
        assert_eq!(out.take_int("trg"), 2);

        let tc = t_complexity(&bloq.into()).unwrap();
        assert_eq!(tc.t, 2 * 4 * 3 + 2 * 4 * 4);
    }

    #[test]
    fn adder_rejects_unreduced_values() {
        let err = AnyBloq::from(CtrlAddK::new(9, 4, 15))
            .call_classically([("ctrl", 0.into()), ("trg", 15.into())].into())
            .unwrap_err();
        assert!(matches!(err, ClassicalError::EffectMismatch { .. }));
    }

    #[rstest]
    #[case(0, 5)]
    #[case(1, 11)]
    fn scale_add_matches_decomposition(#[case] ctrl: u64, #[case] want: u64) {
        // 5 + 7*3 = 26 = 11 mod 15
        let bloq: AnyBloq = CtrlScaleModAdd::new(3, 4, 15).into();
        let mut direct = bloq
            .call_classically(
                [("ctrl", ctrl.into()), ("src", 7.into()), ("trg", 5.into())].into(),
            )
            .unwrap();
        let decomposed = AnyBloq::from(bloq.decompose().unwrap())
            .call_classically(
                [("ctrl", ctrl.into()), ("src", 7.into()), ("trg", 5.into())].into(),
            )
            .unwrap();
        assert_eq!(direct, decomposed);
        assert_eq!(direct.take_int("trg"), want);
    }

    #[rstest]
    #[case(0, 7, 7)]
    #[case(1, 7, 13)]
    #[case(1, 0, 0)]
    fn mod_mul_matches_decomposition(#[case] ctrl: u64, #[case] x: u64, #[case] want: u64) {
        // 7*4 = 28 = 13 mod 15; the ctrl=0 row exercises returning the
        // borrowed register at zero without the multiply having fired
        let bloq: AnyBloq = CtrlModMul::new(4, 4, 15).into();
        let mut direct = bloq
            .call_classically([("ctrl", ctrl.into()), ("x", x.into())].into())
            .unwrap();
        assert_eq!(direct.take_int("x"), want);
        let mut decomposed = AnyBloq::from(bloq.decompose().unwrap())
            .call_classically([("ctrl", ctrl.into()), ("x", x.into())].into())
            .unwrap();
        assert_eq!(decomposed.take_int("x"), want);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(5)]
    #[case(7)]
    fn mod_exp_matches_decomposition(#[case] e: u64) {
        let bloq: AnyBloq = ModExp::new(7, 15, 3, 4).into();
        let direct = bloq
            .call_classically([("exponent", e.into())].into())
            .unwrap();
        let decomposed = AnyBloq::from(bloq.decompose().unwrap())
            .call_classically([("exponent", e.into())].into())
            .unwrap();
        assert_eq!(direct, decomposed);

        let mut direct = direct;
        assert_eq!(direct.take_int("exponent"), e);
        assert_eq!(direct.take_int("x"), modexp(7, e, 15));
    }

    #[test]
    fn shor_sizing() {
        let bloq = ModExp::make_for_shor(15, Some(7));
        assert_eq!(bloq.exp_bitsize, 8);
        assert_eq!(bloq.x_bitsize, 4);

        let random_base = ModExp::make_for_shor(15, None);
        assert!(random_base.g >= 2 && random_base.g < 15);
        assert_eq!(gcd(random_base.g, 15), 1);
    }

    #[test]
    fn exponentiation_cost() {
        // 8 multiplications of two 4-bit scaled adds plus a controlled swap:
        // 8 * (2 * 4 * (4 + 56) + 28)
        let tc = t_complexity(&ModExp::make_for_shor(15, Some(7)).into()).unwrap();
        assert_eq!(tc.t, 8 * 508);
    }

    #[test]
    #[should_panic]
    fn rejects_non_unit_base() {
        ModExp::new(6, 15, 8, 4);
    }
}
