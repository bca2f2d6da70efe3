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

//! Loading classical tables into quantum registers.

use crate::bloq::{AnyBloq, Bloq};
use crate::bloqs::basic::CNot;
use crate::bloqs::mcmt::And;
use crate::classical::{ClassicalError, ClassicalVals};
use crate::dtype::QDType;
use crate::register::{Register, Signature};

/// Qubits needed to index `0..n`, never less than one.
pub(crate) fn bits_for(n: u64) -> u32 {
    (u64::BITS - n.saturating_sub(1).leading_zeros()).max(1)
}

/// Quantum read-only memory: XORs the `selection`-th word of a classical
/// table into the target register.
///
/// `QROM|l>|t> = |l>|t ^ data[l]>`. Implemented by unary iteration over the
/// selection register (Babbush et al., arXiv:1805.03662 Fig. 7): one
/// compute/uncompute `And` pair per table entry past the first, so `4(N-1)` T
/// gates for `N` words, plus one CNOT per set data bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Qrom {
    pub data: Vec<u64>,
    pub target_bitsize: u32,
}

impl Qrom {
    /// # Panics
    ///
    /// Panics if the table is empty or a word does not fit the target width.
    pub fn new(data: Vec<u64>, target_bitsize: u32) -> Self {
        assert!(!data.is_empty(), "QROM table must hold at least one word");
        let dtype = QDType::QAny(target_bitsize);
        for &w in &data {
            assert!(
                dtype.is_valid_classical(w),
                "data word {w} does not fit in {target_bitsize} bits"
            );
        }
        Qrom {
            data,
            target_bitsize,
        }
    }

    pub fn selection_bitsize(&self) -> u32 {
        bits_for(self.data.len() as u64)
    }
}

impl Bloq for Qrom {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("selection", QDType::QUInt(self.selection_bitsize())),
            Register::new("target", QDType::QAny(self.target_bitsize)),
        ])
    }

    fn pretty_name(&self) -> String {
        "QROM".to_string()
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        let n = self.data.len() as u64;
        let writes: u64 = self.data.iter().map(|w| u64::from(w.count_ones())).sum();
        let mut counts: Vec<(u64, AnyBloq)> = Vec::new();
        if n > 1 {
            counts.push((n - 1, And::default().into()));
            counts.push((n - 1, And::default().uncompute().into()));
        }
        if writes > 0 {
            counts.push((writes, CNot.into()));
        }
        Some(counts)
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let sel = vals.take_int("selection");
        let target = vals.take_int("target");
        let word = self.data.get(sel as usize).ok_or_else(|| {
            ClassicalError::EffectMismatch {
                name: "selection".to_string(),
                msg: format!("index {sel} is past the {} data words", self.data.len()),
            }
        })?;
        let mut out = ClassicalVals::new();
        out.insert("selection", sel);
        out.insert("target", target ^ word);
        Ok(out)
    }

    // XOR-loading twice restores the target
    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(self.clone().into())
    }
}
