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

//! T-complexity: the (T, Clifford, rotation) cost vector of a bloq.
//!
//! In fault-tolerant cost models, T gates dominate; Clifford gates are
//! essentially free and arbitrary-angle rotations are synthesized into T
//! gates at a per-rotation price depending on the target precision
//! (Bocharov, Roetteler, Svore, arXiv:1404.5320).

use std::fmt::{self, Display};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::bloq::{AnyBloq, Bloq, DecomposeError};
use crate::callgraph::CountError;

/// Default synthesis precision for counting a rotation in T gates.
pub const DEFAULT_SYNTHESIS_EPS: f64 = 1e-11;

/// T gates needed to synthesize one arbitrary Z rotation to precision `eps`,
/// `ceil(1.149 log2(1/eps) + 9.2)`.
pub fn rotation_synthesis_t_count(eps: f64) -> u64 {
    assert!(eps > 0.0 && eps < 1.0, "synthesis precision out of range");
    (1.149 * (1.0 / eps).log2() + 9.2).ceil() as u64
}

/// Gate counts in the Clifford+T+rotation cost model.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct TComplexity {
    pub t: u64,
    pub clifford: u64,
    pub rotations: u64,
}

impl TComplexity {
    pub const ZERO: TComplexity = TComplexity {
        t: 0,
        clifford: 0,
        rotations: 0,
    };

    pub fn t(n: u64) -> Self {
        TComplexity { t: n, ..Self::ZERO }
    }

    pub fn clifford(n: u64) -> Self {
        TComplexity {
            clifford: n,
            ..Self::ZERO
        }
    }

    pub fn rotations(n: u64) -> Self {
        TComplexity {
            rotations: n,
            ..Self::ZERO
        }
    }

    /// Total T gates once every rotation is synthesized to precision `eps`.
    pub fn total_t(&self, eps: f64) -> u64 {
        self.t + self.rotations * rotation_synthesis_t_count(eps)
    }
}

impl Add for TComplexity {
    type Output = TComplexity;

    fn add(self, rhs: TComplexity) -> TComplexity {
        TComplexity {
            t: self.t + rhs.t,
            clifford: self.clifford + rhs.clifford,
            rotations: self.rotations + rhs.rotations,
        }
    }
}

impl AddAssign for TComplexity {
    fn add_assign(&mut self, rhs: TComplexity) {
        *self = *self + rhs;
    }
}

impl Mul<u64> for TComplexity {
    type Output = TComplexity;

    fn mul(self, n: u64) -> TComplexity {
        TComplexity {
            t: self.t * n,
            clifford: self.clifford * n,
            rotations: self.rotations * n,
        }
    }
}

impl Sum for TComplexity {
    fn sum<I: Iterator<Item = TComplexity>>(iter: I) -> TComplexity {
        iter.fold(TComplexity::ZERO, Add::add)
    }
}

impl Display for TComplexity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "t: {}, clifford: {}, rotations: {}",
            self.t, self.clifford, self.rotations
        )
    }
}

/// Resolves T-complexities recursively, memoizing on the bloq.
///
/// Resolution order per bloq: a declared
/// [`my_t_complexity`](Bloq::my_t_complexity), then declared
/// [`bloq_counts`](Bloq::bloq_counts), then the full decomposition. A bloq
/// with none of the three is an error.
#[derive(Default)]
pub struct TComplexityCounter {
    cache: FxHashMap<AnyBloq, TComplexity>,
}

impl TComplexityCounter {
    pub fn new() -> Self {
        TComplexityCounter::default()
    }

    pub fn count(&mut self, bloq: &AnyBloq) -> Result<TComplexity, CountError> {
        if let Some(&tc) = self.cache.get(bloq) {
            return Ok(tc);
        }
        let tc = self.resolve(bloq)?;
        self.cache.insert(bloq.clone(), tc);
        Ok(tc)
    }

    fn resolve(&mut self, bloq: &AnyBloq) -> Result<TComplexity, CountError> {
        if let Some(tc) = bloq.my_t_complexity() {
            return Ok(tc);
        }
        let counts = match bloq.bloq_counts() {
            Some(counts) => counts,
            None => match bloq.decompose() {
                Ok(cbloq) => cbloq.counts_tally(),
                Err(DecomposeError::NotImplemented) => {
                    return Err(CountError::Unresolvable(bloq.pretty_name()))
                }
                Err(e) => return Err(CountError::Decompose(e)),
            },
        };
        let mut total = TComplexity::ZERO;
        for (n, callee) in counts {
            total += self.count(&callee)? * n;
        }
        Ok(total)
    }
}

/// One-shot T-complexity of a bloq. See [`TComplexityCounter`].
pub fn t_complexity(bloq: &AnyBloq) -> Result<TComplexity, CountError> {
    TComplexityCounter::new().count(bloq)
}

/// Total T gates in a leaf tally, synthesizing rotations to precision `eps`.
pub fn t_counts_from_sigma(
    sigma: &[(AnyBloq, u64)],
    eps: f64,
) -> Result<u64, CountError> {
    let mut counter = TComplexityCounter::new();
    let mut total = 0u64;
    for (bloq, n) in sigma {
        total += n * counter.count(bloq)?.total_t(eps);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloq::BlackBoxBloq;
    use crate::bloqs::basic::{CNot, TGate, Toffoli};
    use crate::bloqs::mcmt::And;
    use crate::register::Signature;

    #[test]
    fn rotation_synthesis() {
        assert_eq!(rotation_synthesis_t_count(1e-11), 52);
        // coarser precision, fewer T gates
        assert!(rotation_synthesis_t_count(1e-3) < 52);
    }

    #[test]
    fn arithmetic() {
        let a = TComplexity::t(4) + TComplexity::clifford(9);
        assert_eq!(
            a,
            TComplexity {
                t: 4,
                clifford: 9,
                rotations: 0
            }
        );
        assert_eq!((a * 3).t, 12);
        let s: TComplexity = [TComplexity::t(1), TComplexity::rotations(2)]
            .into_iter()
            .sum();
        assert_eq!(s.t, 1);
        assert_eq!(s.rotations, 2);
        assert_eq!(s.total_t(1e-11), 1 + 2 * 52);
    }

    #[test]
    fn declared_leaf() {
        let tc = t_complexity(&TGate::default().into()).unwrap();
        assert_eq!(tc, TComplexity::t(1));
        let tc = t_complexity(&CNot.into()).unwrap();
        assert_eq!(tc, TComplexity::clifford(1));
    }

    #[test]
    fn resolved_through_decomposition() {
        // Toffoli = compute-And, CNOT, uncompute-And
        let tc = t_complexity(&Toffoli.into()).unwrap();
        assert_eq!(tc.t, 4);
        let and = t_complexity(&And::default().into()).unwrap();
        let and_dag = t_complexity(&And::default().uncompute().into()).unwrap();
        assert_eq!(and.t, 4);
        assert_eq!(and_dag.t, 0);
        assert_eq!(tc.clifford, and.clifford + and_dag.clifford + 1);
    }

    #[test]
    fn unresolvable_leaf() {
        let opaque: AnyBloq = BlackBoxBloq {
            name: "Opaque".into(),
            signature: Signature::build([("x", 2)]),
        }
        .into();
        assert!(matches!(
            t_complexity(&opaque),
            Err(CountError::Unresolvable(_))
        ));
    }

    #[test]
    fn sigma_totals() {
        let sigma = vec![
            (AnyBloq::from(TGate::default()), 7),
            (And::default().into(), 2),
            (CNot.into(), 100),
        ];
        assert_eq!(t_counts_from_sigma(&sigma, 1e-11).unwrap(), 7 + 2 * 4);
    }
}
