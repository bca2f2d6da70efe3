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

//! PREPARE oracles: loading coefficient distributions into superpositions.

use crate::bloq::{AnyBloq, Bloq};
use crate::bloqs::arithmetic::{GreaterThan, LessThanConstant};
use crate::bloqs::basic::{Hadamard, Rz};
use crate::bloqs::data_loading::{bits_for, Qrom};
use crate::bloqs::swap_network::CSwap;
use crate::dtype::QDType;
use crate::phase::Phase;
use crate::register::{Register, Side, Signature};

/// Prepares `sum_{l<n} |l> / sqrt(n)` on a `ceil(log2 n)`-qubit register.
///
/// A power-of-two `n` is Hadamards only. Otherwise one round of amplitude
/// amplification does it: Hadamards, compare against `n`, a rotation on the
/// flag, and a reflection (Babbush et al., arXiv:1805.03662 section III.A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrepareUniformSuperposition {
    pub n: u64,
}

impl PrepareUniformSuperposition {
    pub fn new(n: u64) -> Self {
        assert!(n >= 1, "cannot prepare a superposition over nothing");
        PrepareUniformSuperposition { n }
    }

    pub fn bitsize(&self) -> u32 {
        bits_for(self.n)
    }
}

impl Bloq for PrepareUniformSuperposition {
    fn signature(&self) -> Signature {
        Signature::new(vec![Register::new(
            "target",
            QDType::QUInt(self.bitsize()),
        )])
    }

    fn pretty_name(&self) -> String {
        format!("UNIFORM({})", self.n)
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        let k = u64::from(self.bitsize());
        if self.n.is_power_of_two() {
            return Some(vec![(k, Hadamard.into())]);
        }
        // the amplification rotation angle depends on how far n is from the
        // enclosing power of two
        let frac = self.n as f64 / (1u64 << self.bitsize()) as f64;
        let angle = Phase::from_f64(frac.sqrt().asin() / std::f64::consts::PI);
        Some(vec![
            (2, LessThanConstant::new(self.bitsize(), self.n).into()),
            (2, Rz::new(angle).into()),
            (2 * k + 2, Hadamard.into()),
        ])
    }
}

/// PREPARE by alias sampling (Babbush et al., arXiv:1805.03662 section
/// III.D): loads `sum_l sqrt(p_l) |l>` up to junk entanglement, using a
/// `keep/alt` table instead of rotations.
///
/// The circuit draws a uniform `l`, a uniform `mu`-bit `sigma`, looks up
/// `keep[l]` and `alt[l]` from QROM, and swaps in `alt[l]` when
/// `sigma > keep[l]`. Probabilities are realized to `mu` fractional bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatePreparationAliasSampling {
    pub mu: u32,
    pub alt: Vec<u64>,
    pub keep: Vec<u64>,
}

impl StatePreparationAliasSampling {
    /// # Panics
    ///
    /// Panics if the tables are empty or their lengths differ.
    pub fn new(mu: u32, alt: Vec<u64>, keep: Vec<u64>) -> Self {
        assert!(!alt.is_empty(), "alias tables must hold at least one slot");
        assert_eq!(alt.len(), keep.len(), "alt and keep tables must pair up");
        StatePreparationAliasSampling { mu, alt, keep }
    }

    /// Builds the alias tables for a coefficient distribution.
    ///
    /// `probability_epsilon` sets the precision: probabilities are kept to
    /// `mu = ceil(log2(1/eps))` fractional bits. Preprocessing is Vose's
    /// alias method on the integer weights; slots left untouched keep
    /// `alt[l] = l`, which yields `l` on either comparator outcome.
    pub fn from_probabilities(probs: &[f64], probability_epsilon: f64) -> Self {
        assert!(!probs.is_empty(), "need at least one coefficient");
        assert!(
            probability_epsilon > 0.0 && probability_epsilon < 1.0,
            "probability precision out of range"
        );
        let n = probs.len();
        let mu = ((1.0 / probability_epsilon).log2().ceil() as u32).max(1);
        let denom = 1u64 << mu;

        // integer weights summing to exactly n * 2^mu
        let total: f64 = probs.iter().sum();
        let budget = n as u64 * denom;
        let mut weights: Vec<u64> = probs
            .iter()
            .map(|p| (p / total * budget as f64).floor() as u64)
            .collect();
        let mut deficit = budget - weights.iter().sum::<u64>();
        let mut i = 0;
        while deficit > 0 {
            weights[i % n] += 1;
            deficit -= 1;
            i += 1;
        }

        let mut alt: Vec<u64> = (0..n as u64).collect();
        let mut keep = vec![0u64; n];
        let mut small: Vec<usize> = (0..n).filter(|&l| weights[l] < denom).collect();
        let mut large: Vec<usize> = (0..n).filter(|&l| weights[l] > denom).collect();
        while let (Some(&s), Some(&l)) = (small.last(), large.last()) {
            small.pop();
            large.pop();
            // slot s keeps its own weight and hands the rest of its bucket
            // to l
            keep[s] = weights[s];
            alt[s] = l as u64;
            weights[l] -= denom - weights[s];
            match weights[l].cmp(&denom) {
                std::cmp::Ordering::Less => small.push(l),
                std::cmp::Ordering::Greater => large.push(l),
                std::cmp::Ordering::Equal => {}
            }
        }
        StatePreparationAliasSampling::new(mu, alt, keep)
    }

    pub fn num_coeffs(&self) -> u64 {
        self.alt.len() as u64
    }

    pub fn selection_bitsize(&self) -> u32 {
        bits_for(self.num_coeffs())
    }
}

impl Bloq for StatePreparationAliasSampling {
    fn signature(&self) -> Signature {
        Signature::new(vec![
            Register::new("selection", QDType::QUInt(self.selection_bitsize())),
            Register::new("sigma_mu", QDType::QAny(self.mu)).with_side(Side::Right),
            Register::new("alt", QDType::QUInt(self.selection_bitsize()))
                .with_side(Side::Right),
            Register::new("keep", QDType::QAny(self.mu)).with_side(Side::Right),
            Register::new("less_than_equal", QDType::QBit).with_side(Side::Right),
        ])
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        let sel_bits = self.selection_bitsize();
        let words: Vec<u64> = self
            .alt
            .iter()
            .zip(&self.keep)
            .map(|(&a, &k)| (a << self.mu) | k)
            .collect();
        Some(vec![
            (1, PrepareUniformSuperposition::new(self.num_coeffs()).into()),
            (u64::from(self.mu), Hadamard.into()),
            (1, Qrom::new(words, sel_bits + self.mu).into()),
            (1, GreaterThan::new(self.mu, self.mu).into()),
            (1, CSwap::new(sel_bits).into()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tcomplexity::t_complexity;

    #[test]
    fn uniform_over_a_power_of_two_is_hadamards() {
        let tc = t_complexity(&PrepareUniformSuperposition::new(8).into()).unwrap();
        assert_eq!(tc.t, 0);
        assert_eq!(tc.rotations, 0);
        assert_eq!(tc.clifford, 3);
    }

    #[test]
    fn uniform_otherwise_amplifies_once() {
        let prep = PrepareUniformSuperposition::new(5);
        assert_eq!(prep.bitsize(), 3);
        assert_eq!(prep.pretty_name(), "UNIFORM(5)");
        let tc = t_complexity(&prep.into()).unwrap();
        // two comparisons against the constant, two rotations, Hadamards
        assert_eq!(tc.t, 2 * 4 * 3);
        assert_eq!(tc.rotations, 2);
        assert_eq!(tc.clifford, 2 * 3 + 2);
    }

    #[test]
    fn alias_tables_preserve_the_distribution() {
        let prep = StatePreparationAliasSampling::from_probabilities(&[0.5, 0.25, 0.25], 0.01);
        assert_eq!(prep.mu, 7);
        let denom = 1u64 << prep.mu;
        let n = prep.alt.len();

        // mass of slot l: kept weight plus everything aliased over to it
        let kept = |l: usize| {
            if prep.keep[l] == 0 && prep.alt[l] == l as u64 {
                denom
            } else {
                prep.keep[l]
            }
        };
        let mut mass = vec![0u64; n];
        for l in 0..n {
            mass[l] += kept(l);
            if prep.alt[l] != l as u64 {
                mass[prep.alt[l] as usize] += denom - kept(l);
            }
        }
        assert_eq!(mass, vec![192, 96, 96]);
        assert_eq!(mass.iter().sum::<u64>(), n as u64 * denom);
    }

    #[test]
    fn alias_sampling_cost() {
        let prep = StatePreparationAliasSampling::from_probabilities(&[0.5, 0.25, 0.25], 0.01);
        assert_eq!(prep.selection_bitsize(), 2);
        let sig = prep.signature();
        assert_eq!(sig.get_right("sigma_mu").unwrap().bitsize(), 7);
        assert_eq!(sig.get_right("alt").unwrap().bitsize(), 2);
        let tc = t_complexity(&prep.into()).unwrap();
        // uniform prep 16, QROM 8, comparator 56, swap 14
        assert_eq!(tc.t, 94);
        assert_eq!(tc.rotations, 2);
    }

    #[test]
    fn degenerate_single_coefficient() {
        let prep = StatePreparationAliasSampling::from_probabilities(&[1.0], 0.1);
        assert_eq!(prep.alt, vec![0]);
        assert_eq!(prep.keep, vec![0]);
    }
}
