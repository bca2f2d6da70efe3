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

//! Physical-resource estimates on the surface code.
//!
//! An [`AlgorithmSummary`] condenses a call graph's leaf tally into the gate
//! totals physical estimates consume. A [`TFactory`] converts those totals
//! into factory cycles and footprints, and [`LogicalErrorModel`] is the
//! one-parameter logical-failure fit used to size code distances, with the
//! constants of Beverland et al. (arXiv:2211.07629) as the default.

use crate::bloq::AnyBloq;
use crate::bloqs::basic::Toffoli;
use crate::callgraph::CountError;
use crate::tcomplexity::TComplexityCounter;

/// Gate and qubit totals of an algorithm, in the units physical estimates
/// consume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AlgorithmSummary {
    pub algorithm_qubits: u64,
    pub measurements: u64,
    pub t_gates: u64,
    pub toffoli_gates: u64,
    pub rotation_gates: u64,
}

impl AlgorithmSummary {
    /// Folds a leaf tally into gate totals. Toffoli leaves stay Toffolis;
    /// every other leaf contributes its resolved T and rotation counts.
    ///
    /// Qubit and measurement totals are not derivable from a tally and are
    /// left at zero for the caller to fill in.
    pub fn from_sigma(sigma: &[(AnyBloq, u64)]) -> Result<Self, CountError> {
        let mut counter = TComplexityCounter::new();
        let mut summary = AlgorithmSummary::default();
        for (bloq, n) in sigma {
            if bloq.is::<Toffoli>() {
                summary.toffoli_gates += n;
                continue;
            }
            let tc = counter.count(bloq)?;
            summary.t_gates += n * tc.t;
            summary.rotation_gates += n * tc.rotations;
        }
        Ok(summary)
    }

    /// Magic states consumed, counting each Toffoli as four T gates.
    pub fn total_t_gates(&self) -> u64 {
        self.t_gates + 4 * self.toffoli_gates
    }
}

/// A magic-state factory characterized by its footprint and production
/// rate, after the factory presets of Litinski (arXiv:1905.06903).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TFactory {
    pub num_qubits: u64,
    pub generation_cycle_duration_ns: f64,
    pub num_t_per_cycle: f64,
    pub error_rate: f64,
}

impl TFactory {
    /// Physical qubits tied up by the factory.
    pub fn footprint(&self) -> u64 {
        self.num_qubits
    }

    /// Generation cycles needed to supply an algorithm's magic states.
    pub fn n_cycles(&self, summary: &AlgorithmSummary) -> u64 {
        (summary.total_t_gates() as f64 / self.num_t_per_cycle).ceil() as u64
    }

    /// Qubit-nanoseconds spent per magic state produced.
    pub fn spacetime_footprint(&self) -> f64 {
        self.num_qubits as f64 * self.generation_cycle_duration_ns / self.num_t_per_cycle
    }

    /// Probability that distillation fails somewhere in the run. No failure
    /// model is attached to the factory parameters, so this is `None`.
    pub fn distillation_error(
        &self,
        _summary: &AlgorithmSummary,
        _physical_error_rate: f64,
    ) -> Option<f64> {
        None
    }
}

/// The standard one-parameter fit for surface-code logical failure:
/// `scaler * (p / threshold)^((d+1)/2)` per logical qubit per cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalErrorModel {
    pub error_rate_scaler: f64,
    pub error_rate_threshold: f64,
}

impl Default for LogicalErrorModel {
    fn default() -> Self {
        LogicalErrorModel {
            error_rate_scaler: 0.03,
            error_rate_threshold: 0.01,
        }
    }
}

impl LogicalErrorModel {
    /// Logical error rate at code distance `d` and physical rate `p`.
    pub fn logical_error_rate(&self, d: u32, p: f64) -> f64 {
        self.error_rate_scaler * (p / self.error_rate_threshold).powf(f64::from(d + 1) / 2.0)
    }

    /// The smallest odd code distance, starting at 3, whose logical rate
    /// meets `budget`. `None` when the physical rate is at or past the
    /// threshold, where no distance helps.
    pub fn code_distance_for(&self, budget: f64, p: f64) -> Option<u32> {
        if p >= self.error_rate_threshold {
            return None;
        }
        let mut d = 3;
        while self.logical_error_rate(d, p) > budget {
            d += 2;
        }
        Some(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloqs::basic::{Rz, TGate};
    use crate::bloqs::mcmt::And;
    use approx::assert_abs_diff_eq;

    fn factory() -> TFactory {
        TFactory {
            num_qubits: 5,
            generation_cycle_duration_ns: 3.0,
            num_t_per_cycle: 0.1,
            error_rate: 1e-9,
        }
    }

    #[test]
    fn factory_footprint() {
        let magic = AlgorithmSummary {
            t_gates: 1,
            toffoli_gates: 1,
            ..Default::default()
        };
        let factory = factory();
        assert_eq!(factory.footprint(), 5);
        assert_eq!(factory.n_cycles(&magic), 50);
        assert_abs_diff_eq!(factory.spacetime_footprint(), 150.0, epsilon = 1e-9);
        assert!(factory.distillation_error(&magic, 1e-3).is_none());
    }

    #[test]
    fn summary_from_leaf_tally() {
        let sigma: Vec<(AnyBloq, u64)> = vec![
            (TGate::default().into(), 100),
            (Toffoli.into(), 8),
            (Rz::new((1, 7)).into(), 3),
        ];
        let summary = AlgorithmSummary::from_sigma(&sigma).unwrap();
        assert_eq!(summary.t_gates, 100);
        assert_eq!(summary.toffoli_gates, 8);
        assert_eq!(summary.rotation_gates, 3);
        assert_eq!(summary.total_t_gates(), 100 + 4 * 8);
    }

    #[test]
    fn non_toffoli_leaves_resolve_through_their_cost() {
        let sigma: Vec<(AnyBloq, u64)> = vec![(And::default().into(), 2)];
        let summary = AlgorithmSummary::from_sigma(&sigma).unwrap();
        assert_eq!(summary.t_gates, 8);
        assert_eq!(summary.toffoli_gates, 0);
    }

    #[test]
    fn code_distance_scaling() {
        let model = LogicalErrorModel::default();
        // 0.03 * (1e-4 / 1e-2)^7
        assert_abs_diff_eq!(model.logical_error_rate(13, 1e-4), 3e-16, epsilon = 1e-22);
        let d = model.code_distance_for(1e-12, 1e-4).unwrap();
        assert_eq!(d, 11);
        // tighter budgets cost more distance
        assert!(model.code_distance_for(1e-18, 1e-4).unwrap() > d);
        assert!(model.code_distance_for(1e-12, 1e-2).is_none());
    }
}
