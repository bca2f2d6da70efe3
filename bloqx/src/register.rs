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

//! Typed dataflow registers and bloq signatures.
//!
//! A [`Register`] names one port group of a bloq; a [`Signature`] is the
//! ordered collection of them. Registers are *directed*: a `Thru` register
//! flows through the bloq, a `Left`-only register is consumed by it and a
//! `Right`-only register is produced by it. Allocation, de-allocation and
//! reshaping bloqs are typed entirely through one-sided registers.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::dtype::QDType;

/// Which sides of a bloq a register appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Consumed by the bloq; absent from its right edge.
    Left,
    /// Produced by the bloq; absent from its left edge.
    Right,
    /// Flows through the bloq.
    Thru,
}

impl Side {
    pub fn has_left(&self) -> bool {
        matches!(self, Side::Left | Side::Thru)
    }

    pub fn has_right(&self) -> bool {
        matches!(self, Side::Right | Side::Thru)
    }

    /// The side seen when reading the bloq right-to-left.
    pub fn flipped(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Thru => Side::Thru,
        }
    }
}

/// A named, typed, optionally multi-dimensional port group of a bloq.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    pub name: String,
    pub dtype: QDType,
    /// Array shape; an empty shape is a single wire of `dtype`.
    pub shape: Vec<usize>,
    pub side: Side,
}

impl Register {
    /// A plain `Thru` register with no shape.
    pub fn new(name: impl Into<String>, dtype: QDType) -> Self {
        Register {
            name: name.into(),
            dtype,
            shape: vec![],
            side: Side::Thru,
        }
    }

    pub fn with_shape(mut self, shape: impl Into<Vec<usize>>) -> Self {
        self.shape = shape.into();
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Width of a single element in qubits.
    pub fn bitsize(&self) -> u32 {
        self.dtype.num_qubits()
    }

    /// Number of wires in this register.
    pub fn num_elements(&self) -> usize {
        self.shape.iter().product()
    }

    /// Total width in qubits across all elements.
    pub fn total_bits(&self) -> u64 {
        u64::from(self.bitsize()) * self.num_elements() as u64
    }

    /// All element indices in row-major order. A shapeless register has the
    /// single empty index.
    pub fn all_idxs(&self) -> Vec<Vec<usize>> {
        let mut idxs = vec![vec![]];
        for &d in &self.shape {
            idxs = idxs
                .into_iter()
                .flat_map(|base| {
                    (0..d).map(move |i| {
                        let mut idx = base.clone();
                        idx.push(i);
                        idx
                    })
                })
                .collect();
        }
        idxs
    }

    /// This register as seen from the adjoint bloq.
    pub fn adjoint(&self) -> Register {
        Register {
            side: self.side.flipped(),
            ..self.clone()
        }
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.dtype)?;
        if !self.shape.is_empty() {
            write!(f, "{:?}", self.shape)?;
        }
        match self.side {
            Side::Left => write!(f, " (left)"),
            Side::Right => write!(f, " (right)"),
            Side::Thru => Ok(()),
        }
    }
}

/// The ordered collection of registers defining a bloq's interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    regs: Vec<Register>,
}

impl Signature {
    /// Creates a signature from registers.
    ///
    /// # Panics
    ///
    /// Panics if two left-facing or two right-facing registers share a name.
    /// A `Left`-only and a `Right`-only register may share a name; this is
    /// how reshaping bloqs relate their input to their output.
    pub fn new(regs: Vec<Register>) -> Self {
        for (i, a) in regs.iter().enumerate() {
            for b in &regs[..i] {
                if a.name == b.name {
                    let both_left = a.side.has_left() && b.side.has_left();
                    let both_right = a.side.has_right() && b.side.has_right();
                    assert!(
                        !(both_left || both_right),
                        "register name {} is not unique within a side",
                        a.name
                    );
                }
            }
        }
        Signature { regs }
    }

    /// Shorthand for all-`Thru` registers: `QBit` for width 1, `QAny`
    /// otherwise. Zero-width entries are skipped.
    pub fn build<S: Into<String>>(pairs: impl IntoIterator<Item = (S, u32)>) -> Self {
        let regs = pairs
            .into_iter()
            .filter(|&(_, n)| n > 0)
            .map(|(name, n)| {
                let dtype = if n == 1 { QDType::QBit } else { QDType::QAny(n) };
                Register::new(name, dtype)
            })
            .collect();
        Signature::new(regs)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Register> {
        self.regs.iter()
    }

    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Registers present on the left edge, in signature order.
    pub fn lefts(&self) -> impl Iterator<Item = &Register> {
        self.regs.iter().filter(|r| r.side.has_left())
    }

    /// Registers present on the right edge, in signature order.
    pub fn rights(&self) -> impl Iterator<Item = &Register> {
        self.regs.iter().filter(|r| r.side.has_right())
    }

    pub fn get_left(&self, name: &str) -> Option<&Register> {
        self.lefts().find(|r| r.name == name)
    }

    pub fn get_right(&self, name: &str) -> Option<&Register> {
        self.rights().find(|r| r.name == name)
    }

    /// The number of qubits the bloq acts on: the wider of its two edges.
    pub fn n_qubits(&self) -> u64 {
        let left: u64 = self.lefts().map(Register::total_bits).sum();
        let right: u64 = self.rights().map(Register::total_bits).sum();
        left.max(right)
    }

    /// The signature of the adjoint bloq: same registers, sides flipped.
    pub fn adjoint(&self) -> Signature {
        Signature {
            regs: self.regs.iter().map(Register::adjoint).collect(),
        }
    }
}

impl std::ops::Index<usize> for Signature {
    type Output = Register;

    fn index(&self, i: usize) -> &Register {
        &self.regs[i]
    }
}

impl<'a> IntoIterator for &'a Signature {
    type Item = &'a Register;
    type IntoIter = std::slice::Iter<'a, Register>;

    fn into_iter(self) -> Self::IntoIter {
        self.regs.iter()
    }
}
