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

//! Arithmetic in the binary fields GF(2^n).
//!
//! Field elements are coefficient vectors of polynomials over GF(2), reduced
//! by a fixed irreducible polynomial per degree. Addition is bitwise XOR and
//! squaring is linear (the Frobenius map), so both are Clifford circuits;
//! only general multiplication costs Toffolis.

use crate::bloq::{AnyBloq, Bloq};
use crate::bloqs::basic::{CNot, Toffoli};
use crate::classical::{ClassicalError, ClassicalVals};
use crate::dtype::QDType;
use crate::register::{Register, Side, Signature};
use crate::tcomplexity::TComplexity;

/// The reduction polynomial used for GF(2^n), with the degree-`n` term
/// included, from the standard low-weight tables (Seroussi, HPL-98-135).
/// `None` for degrees this module does not carry.
pub fn irreducible_poly(n: u32) -> Option<u64> {
    let poly: u64 = match n {
        1 => (1 << 1) | 1,
        2 => (1 << 2) | (1 << 1) | 1,
        3 => (1 << 3) | (1 << 1) | 1,
        4 => (1 << 4) | (1 << 1) | 1,
        5 => (1 << 5) | (1 << 2) | 1,
        6 => (1 << 6) | (1 << 1) | 1,
        7 => (1 << 7) | (1 << 1) | 1,
        // the AES polynomial x^8 + x^4 + x^3 + x + 1
        8 => (1 << 8) | (1 << 4) | (1 << 3) | (1 << 1) | 1,
        9 => (1 << 9) | (1 << 1) | 1,
        10 => (1 << 10) | (1 << 3) | 1,
        11 => (1 << 11) | (1 << 2) | 1,
        12 => (1 << 12) | (1 << 6) | (1 << 4) | (1 << 1) | 1,
        13 => (1 << 13) | (1 << 4) | (1 << 3) | (1 << 1) | 1,
        14 => (1 << 14) | (1 << 5) | (1 << 3) | (1 << 1) | 1,
        15 => (1 << 15) | (1 << 1) | 1,
        16 => (1 << 16) | (1 << 5) | (1 << 3) | (1 << 1) | 1,
        _ => return None,
    };
    Some(poly)
}

/// Carry-less product of two polynomials over GF(2).
fn clmul(a: u64, b: u64) -> u128 {
    let mut acc = 0u128;
    for i in 0..64 {
        if (a >> i) & 1 == 1 {
            acc ^= u128::from(b) << i;
        }
    }
    acc
}

/// Reduces a degree < `2n` polynomial modulo the degree-`n` reduction
/// polynomial of GF(2^n).
fn reduce(mut acc: u128, n: u32, poly: u64) -> u64 {
    for i in (n..2 * n).rev() {
        if (acc >> i) & 1 == 1 {
            acc ^= u128::from(poly) << (i - n);
        }
    }
    acc as u64
}

fn field_poly(n: u32) -> Result<u64, ClassicalError> {
    irreducible_poly(n).ok_or_else(|| {
        ClassicalError::Unsupported(format!("no reduction polynomial for GF(2^{n})"))
    })
}

/// In-place addition `y += x` in GF(2^n): one CNOT per coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GF2Addition {
    pub bitsize: u32,
}

impl GF2Addition {
    pub fn new(bitsize: u32) -> Self {
        assert!(bitsize >= 1, "a field element needs at least one bit");
        GF2Addition { bitsize }
    }
}

impl Bloq for GF2Addition {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("x", QDType::QGF2(self.bitsize)),
            Register::new("y", QDType::QGF2(self.bitsize)),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(vec![(u64::from(self.bitsize), CNot.into())])
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let x = vals.take_int("x");
        let y = vals.take_int("y");
        let mut out = ClassicalVals::new();
        out.insert("x", x);
        out.insert("y", y ^ x);
        Ok(out)
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some((*self).into())
    }
}

/// In-place Frobenius squaring `x = x^2` in GF(2^n).
///
/// Squaring spreads coefficient `i` to position `2i` and reduces, all of
/// which is an invertible linear map over GF(2), so a CNOT network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GF2Square {
    pub bitsize: u32,
}

impl GF2Square {
    pub fn new(bitsize: u32) -> Self {
        assert!(bitsize >= 1, "a field element needs at least one bit");
        GF2Square { bitsize }
    }
}

impl Bloq for GF2Square {
    fn signature(&self) -> Signature {
        Signature::new(vec![Register::new("x", QDType::QGF2(self.bitsize))])
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        let n = u64::from(self.bitsize);
        Some(TComplexity::clifford(n * n))
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let poly = field_poly(self.bitsize)?;
        let x = vals.take_int("x");
        let mut out = ClassicalVals::new();
        out.insert("x", reduce(clmul(x, x), self.bitsize, poly));
        Ok(out)
    }
}

/// Out-of-place multiplication in GF(2^n): `result = x * y` into a fresh
/// register, by the schoolbook method of Toffoli-AND per coefficient pair
/// with the reduction folded into the wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GF2Multiplication {
    pub bitsize: u32,
}

impl GF2Multiplication {
    pub fn new(bitsize: u32) -> Self {
        assert!(bitsize >= 1, "a field element needs at least one bit");
        GF2Multiplication { bitsize }
    }
}

impl Bloq for GF2Multiplication {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("x", QDType::QGF2(self.bitsize)),
            Register::new("y", QDType::QGF2(self.bitsize)),
            Register::new("result", QDType::QGF2(self.bitsize)).with_side(Side::Right),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        let n = u64::from(self.bitsize);
        Some(vec![(n * n, Toffoli.into())])
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let poly = field_poly(self.bitsize)?;
        let x = vals.take_int("x");
        let y = vals.take_int("y");
        let mut out = ClassicalVals::new();
        out.insert("x", x);
        out.insert("y", y);
        out.insert("result", reduce(clmul(x, y), self.bitsize, poly));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tcomplexity::t_complexity;

    #[test]
    fn poly_table_shape() {
        for n in 1..=16 {
            let poly = irreducible_poly(n).unwrap();
            assert_eq!(poly >> n, 1, "leading term of degree {n}");
            assert_eq!(poly & 1, 1, "constant term of degree {n}");
            if n >= 2 {
                // an even-weight polynomial has 1 as a root
                assert_eq!(poly.count_ones() % 2, 1, "weight of degree {n}");
            }
        }
        assert!(irreducible_poly(17).is_none());
    }

    #[test]
    fn gf16_product() {
        // (x^3+1)^2 = x^6+1 = x^3+x^2+1 mod x^4+x+1
        let mut out = AnyBloq::from(GF2Multiplication::new(4))
            .call_classically([("x", 9.into()), ("y", 9.into())].into())
            .unwrap();
        assert_eq!(out.take_int("result"), 13);
    }

    #[test]
    fn aes_inverse_pair() {
        // 0x53 * 0xCA = 1 in the AES field
        let mut out = AnyBloq::from(GF2Multiplication::new(8))
            .call_classically([("x", 0x53.into()), ("y", 0xCA.into())].into())
            .unwrap();
        assert_eq!(out.take_int("result"), 1);
    }

    #[test]
    fn square_is_the_multiplication_diagonal() {
        for v in 0..16u64 {
            let mut squared = AnyBloq::from(GF2Square::new(4))
                .call_classically([("x", v.into())].into())
                .unwrap();
            let mut product = AnyBloq::from(GF2Multiplication::new(4))
                .call_classically([("x", v.into()), ("y", v.into())].into())
                .unwrap();
            assert_eq!(squared.take_int("x"), product.take_int("result"));
        }
    }

    #[test]
    fn addition_is_xor_and_free_of_t() {
        let mut out = AnyBloq::from(GF2Addition::new(4))
            .call_classically([("x", 0b1010.into()), ("y", 0b0110.into())].into())
            .unwrap();
        assert_eq!(out.take_int("y"), 0b1100);
        assert_eq!(out.take_int("x"), 0b1010);

        let tc = t_complexity(&GF2Addition::new(4).into()).unwrap();
        assert_eq!(tc.t, 0);
        assert_eq!(tc.clifford, 4);
    }

    #[test]
    fn multiplication_toffoli_count() {
        let tc = t_complexity(&GF2Multiplication::new(8).into()).unwrap();
        assert_eq!(tc.t, 4 * 64);
    }

    #[test]
    fn wide_fields_have_no_classical_model() {
        let err = AnyBloq::from(GF2Multiplication::new(17))
            .call_classically([("x", 1.into()), ("y", 1.into())].into())
            .unwrap_err();
        assert!(matches!(err, ClassicalError::Unsupported(_)));
    }
}
