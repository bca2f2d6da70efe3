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

//! Quantum data types carried by registers.
//!
//! A [`QDType`] fixes the width of a register in qubits and gives classical
//! values an interpretation as bit strings. Bit order is big-endian
//! throughout: the first qubit of a register holds the most significant bit.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The type of the quantum data carried by a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QDType {
    /// A single qubit.
    QBit,
    /// An opaque collection of `n` qubits with no numeric interpretation.
    QAny(u32),
    /// An unsigned integer of `n` bits.
    QUInt(u32),
    /// A two's-complement signed integer of `n` bits.
    QInt(u32),
    /// A fixed-point number with `num_frac` fractional bits. When `signed`,
    /// the leading bit is a two's-complement sign bit and
    /// `num_frac <= bitsize - 1` must hold; otherwise `num_frac <= bitsize`.
    QFxp {
        bitsize: u32,
        num_frac: u32,
        signed: bool,
    },
    /// An element of the Galois field GF(2^n), stored as the coefficient
    /// vector of a degree < `n` polynomial over GF(2).
    QGF2(u32),
}

impl QDType {
    /// A `QFxp` with its invariant checked.
    ///
    /// # Panics
    ///
    /// Panics if the fractional bits do not fit in the bitsize.
    pub fn qfxp(bitsize: u32, num_frac: u32, signed: bool) -> Self {
        assert!(
            num_frac + u32::from(signed) <= bitsize,
            "QFxp({bitsize}, {num_frac}) leaves no room for the sign bit"
        );
        QDType::QFxp {
            bitsize,
            num_frac,
            signed,
        }
    }

    /// Width of this dtype in qubits.
    pub fn num_qubits(&self) -> u32 {
        match *self {
            QDType::QBit => 1,
            QDType::QAny(n) | QDType::QUInt(n) | QDType::QInt(n) | QDType::QGF2(n) => n,
            QDType::QFxp { bitsize, .. } => bitsize,
        }
    }

    /// The number of distinct classical values, or `None` when it does not
    /// fit in a `u128`.
    pub fn domain_size(&self) -> Option<u128> {
        let n = self.num_qubits();
        (n < 128).then(|| 1u128 << n)
    }

    /// Whether the raw bit pattern `v` fits in this dtype.
    pub fn is_valid_classical(&self, v: u64) -> bool {
        let n = self.num_qubits();
        n >= 64 || v < (1u64 << n)
    }

    /// Big-endian bits of `v`, most significant first.
    ///
    /// # Panics
    ///
    /// Panics if `v` does not fit in this dtype.
    pub fn to_bits(&self, v: u64) -> Vec<u8> {
        assert!(
            self.is_valid_classical(v),
            "value {v} does not fit in {self}"
        );
        let n = self.num_qubits();
        (0..n).rev().map(|i| ((v >> i) & 1) as u8).collect()
    }

    /// Reassembles a value from big-endian bits.
    ///
    /// # Panics
    ///
    /// Panics if the number of bits does not match the dtype width.
    pub fn from_bits(&self, bits: &[u8]) -> u64 {
        assert_eq!(
            bits.len(),
            self.num_qubits() as usize,
            "expected {} bits for {self}, got {}",
            self.num_qubits(),
            bits.len()
        );
        bits.iter().fold(0u64, |acc, &b| (acc << 1) | u64::from(b & 1))
    }

    /// Whether a wire of this dtype may be plugged into a port of dtype
    /// `other`.
    ///
    /// Widths must match exactly; beyond that, `QAny` (and `QBit` against
    /// `QAny(1)`) is compatible with anything of the same width, while two
    /// distinct numeric interpretations require an explicit cast.
    pub fn is_compatible(&self, other: &QDType) -> bool {
        if self.num_qubits() != other.num_qubits() {
            return false;
        }
        self == other
            || matches!(self, QDType::QAny(_))
            || matches!(other, QDType::QAny(_))
            || matches!(self, QDType::QBit)
            || matches!(other, QDType::QBit)
    }
}

impl Display for QDType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            QDType::QBit => write!(f, "QBit"),
            QDType::QAny(n) => write!(f, "QAny({n})"),
            QDType::QUInt(n) => write!(f, "QUInt({n})"),
            QDType::QInt(n) => write!(f, "QInt({n})"),
            QDType::QFxp {
                bitsize,
                num_frac,
                signed,
            } => {
                if signed {
                    write!(f, "QFxp({bitsize}, {num_frac}, signed)")
                } else {
                    write!(f, "QFxp({bitsize}, {num_frac})")
                }
            }
            QDType::QGF2(n) => write!(f, "QGF2({n})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(QDType::QBit.num_qubits(), 1);
        assert_eq!(QDType::QUInt(8).num_qubits(), 8);
        assert_eq!(QDType::qfxp(6, 4, false).num_qubits(), 6);
        assert_eq!(QDType::QGF2(3).domain_size(), Some(8));
    }

    #[test]
    fn bits_are_big_endian() {
        let d = QDType::QUInt(4);
        assert_eq!(d.to_bits(0b1011), vec![1, 0, 1, 1]);
        assert_eq!(d.from_bits(&[1, 0, 1, 1]), 0b1011);
        assert_eq!(d.from_bits(&d.to_bits(9)), 9);
    }

    #[test]
    fn classical_domain() {
        assert!(QDType::QUInt(4).is_valid_classical(15));
        assert!(!QDType::QUInt(4).is_valid_classical(16));
        assert!(QDType::QUInt(64).is_valid_classical(u64::MAX));
    }

    #[test]
    #[should_panic]
    fn rejects_overflowing_value() {
        QDType::QUInt(3).to_bits(8);
    }

    #[test]
    fn compatibility() {
        assert!(QDType::QUInt(4).is_compatible(&QDType::QAny(4)));
        assert!(QDType::QBit.is_compatible(&QDType::QAny(1)));
        assert!(!QDType::QUInt(4).is_compatible(&QDType::QInt(4)));
        assert!(!QDType::QUInt(4).is_compatible(&QDType::QUInt(5)));
        assert!(QDType::QGF2(4).is_compatible(&QDType::QGF2(4)));
    }

    #[test]
    #[should_panic]
    fn qfxp_invariant() {
        QDType::qfxp(4, 4, true);
    }
}
