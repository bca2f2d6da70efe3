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

//! Controlled swaps of whole registers and selection-driven swap networks.

use crate::bloq::{AnyBloq, Bloq};
use crate::bloqs::basic::TwoBitCSwap;
use crate::classical::{ClassicalError, ClassicalVals};
use crate::dtype::QDType;
use crate::register::{Register, Signature};
use crate::tcomplexity::TComplexity;

fn conditional_swap(
    vals: &mut ClassicalVals,
) -> (u64, u64, u64) {
    let ctrl = vals.take_int("ctrl");
    let mut x = vals.take_int("x");
    let mut y = vals.take_int("y");
    if ctrl == 1 {
        std::mem::swap(&mut x, &mut y);
    }
    (ctrl, x, y)
}

/// Swaps two `n`-qubit registers under a control qubit: one Fredkin per
/// qubit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CSwap {
    pub bitsize: u32,
}

impl CSwap {
    pub fn new(bitsize: u32) -> Self {
        CSwap { bitsize }
    }

    fn registers(&self) -> Signature {
        Signature::new(vec![
            Register::new("ctrl", QDType::QBit),
            Register::new("x", QDType::QAny(self.bitsize)),
            Register::new("y", QDType::QAny(self.bitsize)),
        ])
    }
}

impl Bloq for CSwap {
    fn signature(&self) -> Signature {
        self.registers()
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(vec![(u64::from(self.bitsize), TwoBitCSwap.into())])
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let (ctrl, x, y) = conditional_swap(&mut vals);
        let mut out = ClassicalVals::new();
        out.insert("ctrl", ctrl);
        out.insert("x", x);
        out.insert("y", y);
        Ok(out)
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some((*self).into())
    }
}

/// A controlled swap that is correct up to a relative phase on each
/// computational basis state.
///
/// The phase never matters when the swap is later undone or measured out,
/// which buys a cheaper circuit: `4n` T versus the exact `7n`
/// (Berry et al., arXiv:1805.03662 appendix B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CSwapApprox {
    pub bitsize: u32,
}

impl CSwapApprox {
    pub fn new(bitsize: u32) -> Self {
        CSwapApprox { bitsize }
    }
}

impl Bloq for CSwapApprox {
    fn signature(&self) -> Signature {
        CSwap::new(self.bitsize).registers()
    }

    fn pretty_name(&self) -> String {
        "CSwap~".to_string()
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        let n = u64::from(self.bitsize);
        Some(TComplexity {
            t: 4 * n,
            clifford: 22 * n - 1,
            rotations: 0,
        })
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let (ctrl, x, y) = conditional_swap(&mut vals);
        let mut out = ClassicalVals::new();
        out.insert("ctrl", ctrl);
        out.insert("x", x);
        out.insert("y", y);
        Ok(out)
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some((*self).into())
    }
}

/// Moves the `selection`-th target word into target position zero through a
/// tree of approximate controlled swaps, one layer per selection bit.
///
/// Follows the swap network of Low, Kliuchnikov, Schaeffer
/// (arXiv:1812.00954): layer `j` swaps words `2^j` apart, controlled on
/// selection bit `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapWithZero {
    pub selection_bitsize: u32,
    pub target_bitsize: u32,
    pub n_target_registers: u32,
}

impl SwapWithZero {
    /// # Panics
    ///
    /// Panics if the selection register cannot address every target.
    pub fn new(selection_bitsize: u32, target_bitsize: u32, n_target_registers: u32) -> Self {
        assert!(n_target_registers >= 1, "need at least one target word");
        assert!(
            1u64 << selection_bitsize >= u64::from(n_target_registers),
            "{selection_bitsize} selection bits cannot address {n_target_registers} words"
        );
        SwapWithZero {
            selection_bitsize,
            target_bitsize,
            n_target_registers,
        }
    }

    /// The `(layer, low, high)` swaps of the network, layer 0 first.
    fn swaps(&self) -> Vec<(u32, usize, usize)> {
        let n = self.n_target_registers as usize;
        let mut out = Vec::new();
        for j in 0..self.selection_bitsize {
            let step = 1usize << j;
            let mut k = 0;
            while k + step < n {
                out.push((j, k, k + step));
                k += 2 * step;
            }
        }
        out
    }
}

impl Bloq for SwapWithZero {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("selection", QDType::QUInt(self.selection_bitsize)),
            Register::new("targets", QDType::QAny(self.target_bitsize))
                .with_shape([self.n_target_registers as usize]),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        Some(vec![(
            self.swaps().len() as u64,
            CSwapApprox::new(self.target_bitsize).into(),
        )])
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let sel = vals.take_int("selection");
        let mut targets = vals.take_array("targets");
        if sel >= u64::from(self.n_target_registers) {
            return Err(ClassicalError::EffectMismatch {
                name: "selection".to_string(),
                msg: format!(
                    "index {sel} is past the {} target words",
                    self.n_target_registers
                ),
            });
        }
        for (j, lo, hi) in self.swaps() {
            if (sel >> j) & 1 == 1 {
                targets.swap(lo, hi);
            }
        }
        let mut out = ClassicalVals::new();
        out.insert("selection", sel);
        out.insert("targets", targets);
        Ok(out)
    }
}
