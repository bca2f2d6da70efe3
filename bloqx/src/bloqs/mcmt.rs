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

//! Multi-controlled multi-target gates, built on the And primitive.

use ndarray::{ArrayD, IxDyn};
use num::complex::Complex64;

use crate::bloq::{AnyBloq, Bloq, DecomposeError};
use crate::builder::{BloqBuilder, SoqMap};
use crate::classical::{ClassicalError, ClassicalVals};
use crate::dtype::QDType;
use crate::register::{Register, Side, Signature};
use crate::tcomplexity::TComplexity;
use crate::tensor::Tensor;

/// Computes the AND of two control bits into a fresh target qubit, or
/// uncomputes it by measurement.
///
/// `cv1`/`cv2` are the control values the AND fires on. The compute
/// direction costs 4 T and 9 Cliffords, the uncompute direction is
/// measurement-based and costs no T at all (Gidney, arXiv:1709.06648).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct And {
    pub cv1: u8,
    pub cv2: u8,
    pub uncompute: bool,
}

impl Default for And {
    fn default() -> Self {
        And::new(1, 1)
    }
}

impl And {
    pub fn new(cv1: u8, cv2: u8) -> Self {
        And {
            cv1,
            cv2,
            uncompute: false,
        }
    }

    /// The uncompute direction of this And.
    pub fn uncompute(self) -> Self {
        And {
            uncompute: true,
            ..self
        }
    }

    fn fires(&self, c0: u64, c1: u64) -> u64 {
        u64::from(c0 == u64::from(self.cv1) && c1 == u64::from(self.cv2))
    }
}

impl Bloq for And {
    fn signature(&self) -> Signature {
        let target_side = if self.uncompute { Side::Left } else { Side::Right };
        Signature::new(vec![
            Register::new("ctrl", QDType::QBit).with_shape([2]),
            Register::new("target", QDType::QBit).with_side(target_side),
        ])
    }

    fn pretty_name(&self) -> String {
        if self.uncompute { "And†".into() } else { "And".into() }
    }

    fn my_t_complexity(&self) -> Option<TComplexity> {
        Some(if self.uncompute {
            TComplexity::clifford(4)
        } else {
            TComplexity::t(4) + TComplexity::clifford(9)
        })
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let ctrl = vals.take_array("ctrl");
        let fires = self.fires(ctrl[0], ctrl[1]);
        let mut out = ClassicalVals::new();
        if self.uncompute {
            let target = vals.take_int("target");
            if target != fires {
                return Err(ClassicalError::EffectMismatch {
                    name: "target".to_string(),
                    msg: format!("uncomputing And of {ctrl:?} against {target}"),
                });
            }
            out.insert("ctrl", ctrl);
        } else {
            out.insert("ctrl", ctrl);
            out.insert("target", fires);
        }
        Ok(out)
    }

    fn my_tensor(&self) -> Option<Tensor> {
        // compute: [c0, c1 | c0, c1, target]; uncompute the reverse
        let mut t = ArrayD::zeros(IxDyn(&[2, 2, 2, 2, 2]));
        for a in 0..2usize {
            for b in 0..2usize {
                let f = self.fires(a as u64, b as u64) as usize;
                let idx = if self.uncompute {
                    [a, b, f, a, b]
                } else {
                    [a, b, a, b, f]
                };
                t[IxDyn(&idx)] = Complex64::new(1.0, 0.0);
            }
        }
        Some(t)
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(
            And {
                uncompute: !self.uncompute,
                ..*self
            }
            .into(),
        )
    }
}

/// The AND of `n >= 3` control bits, as a ladder of two-bit [`And`]s.
///
/// The `n - 2` intermediate AND values stay live as `junk` outputs; callers
/// uncompute them by running the adjoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiAnd {
    pub cvs: Vec<u8>,
}

impl MultiAnd {
    /// # Panics
    ///
    /// Panics on fewer than three controls; use [`And`] for two.
    pub fn new(cvs: impl Into<Vec<u8>>) -> Self {
        let cvs = cvs.into();
        assert!(cvs.len() >= 3, "MultiAnd needs at least three controls");
        MultiAnd { cvs }
    }
}

impl Bloq for MultiAnd {
    fn signature(&self) -> Signature {
        let n = self.cvs.len();
        Signature::new(vec![
            Register::new("ctrl", QDType::QBit).with_shape([n]),
            Register::new("junk", QDType::QBit)
                .with_shape([n - 2])
                .with_side(Side::Right),
            Register::new("target", QDType::QBit).with_side(Side::Right),
        ])
    }

    fn build_composite(
        &self,
        bb: &mut BloqBuilder,
        mut soqs: SoqMap,
    ) -> Result<SoqMap, DecomposeError> {
        let ctrl = soqs.take_many("ctrl");
        let mut it = ctrl.into_iter();
        let c0 = it.next().expect("at least three controls");
        let c1 = it.next().expect("at least three controls");
        let mut out = bb.add(
            And::new(self.cvs[0], self.cvs[1]),
            [("ctrl", vec![c0, c1].into())].into(),
        )?;
        let mut done = out.take_many("ctrl");
        let mut acc = out.take_one("target");
        let mut junk = Vec::with_capacity(self.cvs.len() - 2);
        for (cv, c) in self.cvs[2..].iter().zip(it) {
            let mut out = bb.add(And::new(1, *cv), [("ctrl", vec![acc, c].into())].into())?;
            let mut pair = out.take_many("ctrl");
            let c_back = pair.pop().expect("two controls");
            let acc_back = pair.pop().expect("two controls");
            junk.push(acc_back);
            done.push(c_back);
            acc = out.take_one("target");
        }
        Ok([
            ("ctrl", done.into()),
            ("junk", junk.into()),
            ("target", acc.into()),
        ]
        .into())
    }

    fn on_classical_vals(&self, mut vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        let ctrl = vals.take_array("ctrl");
        let mut acc = u64::from(
            ctrl[0] == u64::from(self.cvs[0]) && ctrl[1] == u64::from(self.cvs[1]),
        );
        let mut junk = Vec::with_capacity(self.cvs.len() - 2);
        for (cv, c) in self.cvs[2..].iter().zip(&ctrl[2..]) {
            let next = acc & u64::from(*c == u64::from(*cv));
            junk.push(acc);
            acc = next;
        }
        let mut out = ClassicalVals::new();
        out.insert("ctrl", ctrl);
        out.insert("junk", junk);
        out.insert("target", acc);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::tcomplexity::t_complexity;

    #[rstest]
    #[case(1, 1, vec![1, 1], 1)]
    #[case(1, 1, vec![1, 0], 0)]
    #[case(0, 1, vec![0, 1], 1)]
    #[case(0, 0, vec![1, 1], 0)]
    fn and_truth_table(
        #[case] cv1: u8,
        #[case] cv2: u8,
        #[case] ctrl: Vec<u64>,
        #[case] want: u64,
    ) {
        let mut out = AnyBloq::from(And::new(cv1, cv2))
            .call_classically([("ctrl", ctrl.clone().into())].into())
            .unwrap();
        assert_eq!(out.take_int("target"), want);
        assert_eq!(out.take_array("ctrl"), ctrl);
    }

    #[test]
    fn uncompute_checks_the_target() {
        let and_dag: AnyBloq = And::default().uncompute().into();
        // ctrl = [1,1] computes 1; handing back 0 is a bug in the caller
        let err = and_dag
            .call_classically([("ctrl", vec![1, 1].into()), ("target", 0.into())].into())
            .unwrap_err();
        assert!(matches!(err, ClassicalError::EffectMismatch { .. }));
        let ok = and_dag
            .call_classically([("ctrl", vec![1, 1].into()), ("target", 1.into())].into());
        assert!(ok.is_ok());
    }

    #[test]
    fn adjoint_toggles_direction() {
        let and: AnyBloq = And::default().into();
        assert_eq!(and.adjoint(), And::default().uncompute().into());
        assert_eq!(and.adjoint().adjoint(), and);
        assert_eq!(and.adjoint().pretty_name(), "And†");
    }

    #[test]
    fn multi_and_matches_its_ladder() {
        let bloq: AnyBloq = MultiAnd::new(vec![1, 1, 1, 1]).into();
        let direct = bloq
            .call_classically([("ctrl", vec![1, 1, 0, 1].into())].into())
            .unwrap();
        let decomposed = AnyBloq::from(bloq.decompose().unwrap())
            .call_classically([("ctrl", vec![1, 1, 0, 1].into())].into())
            .unwrap();
        assert_eq!(direct, decomposed);

        let mut direct = direct;
        assert_eq!(direct.take_array("junk"), vec![1, 0]);
        assert_eq!(direct.take_int("target"), 0);
    }

    #[test]
    fn multi_and_costs_one_and_per_rung() {
        let tc = t_complexity(&MultiAnd::new(vec![1; 4]).into()).unwrap();
        assert_eq!(tc.t, 3 * 4);
    }

    #[test]
    #[should_panic]
    fn multi_and_rejects_two_controls() {
        MultiAnd::new(vec![1, 1]);
    }
}
