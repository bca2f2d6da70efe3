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

//! Dense tensor semantics and contraction of composite bloqs.
//!
//! A bloq's tensor has one axis per left register element followed by one
//! axis per right register element, each of dimension `2^bitsize`, so states
//! (right-only registers) and effects (left-only registers) fall out of the
//! same convention as unitaries. Contraction walks the dataflow graph in
//! topological order, absorbing one instance tensor at a time; this is
//! exponential in width and is meant for verifying small decompositions, not
//! for simulating at scale.

use ndarray::{Array2, ArrayD, IxDyn};
use num::complex::Complex64;

use crate::bloq::{AnyBloq, Bloq, DecomposeError};
use crate::composite::{CompositeBloq, Node, Soquet};
use crate::register::{Register, Signature};

pub type Tensor = ArrayD<Complex64>;
pub type Matrix = Array2<Complex64>;

/// Caps intermediate tensors at `2^24` elements (256 MiB of complex values).
const MAX_TENSOR_ELEMS: usize = 1 << 24;

/// Errors from tensor construction and contraction.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum TensorError {
    #[display("bloq {_0} has no tensor representation")]
    NoTensor(String),
    #[display("intermediate tensor would have {_0} elements")]
    TooLarge(usize),
    #[display("decomposing for tensor contraction failed: {_0}")]
    #[from]
    Decompose(DecomposeError),
}

/// Tensor for a single-qubit gate given as a matrix with row = output index.
pub(crate) fn one_qubit(u: [[Complex64; 2]; 2]) -> Tensor {
    let mut t = ArrayD::zeros(IxDyn(&[2, 2]));
    for i in 0..2 {
        for o in 0..2 {
            t[IxDyn(&[i, o])] = u[o][i];
        }
    }
    t
}

/// Tensor for a unitary on elements of the given qubit widths, with row =
/// output index over the elements in register order.
pub(crate) fn from_unitary(u: &Matrix, widths: &[u32]) -> Tensor {
    let dims: Vec<usize> = widths.iter().map(|&w| 1usize << w).collect();
    let d: usize = dims.iter().product();
    assert_eq!(u.shape(), [d, d], "unitary shape mismatch");
    let shape: Vec<usize> = dims.iter().chain(dims.iter()).copied().collect();
    let mut t = ArrayD::zeros(IxDyn(&shape));
    let n = dims.len();
    let mut idx = vec![0usize; 2 * n];
    for i in 0..d {
        for o in 0..d {
            let (mut ii, mut oo) = (i, o);
            for ax in (0..n).rev() {
                idx[ax] = ii % dims[ax];
                ii /= dims[ax];
                idx[n + ax] = oo % dims[ax];
                oo /= dims[ax];
            }
            t[IxDyn(&idx)] = u[(o, i)];
        }
    }
    t
}

/// Tensor of the computational-basis state `|val>` on `n` qubits.
pub(crate) fn basis_ket(val: u64, n: u32) -> Tensor {
    let dim = 1usize << n;
    let mut t = ArrayD::zeros(IxDyn(&[dim]));
    t[IxDyn(&[val as usize])] = Complex64::new(1.0, 0.0);
    t
}

/// Tensor of a single-register state with the given amplitudes.
pub(crate) fn ket(amps: &[Complex64]) -> Tensor {
    ArrayD::from_shape_vec(IxDyn(&[amps.len()]), amps.to_vec())
        .expect("amplitude count matches shape")
}

/// The conjugate-transposed tensor, for the adjoint of a bloq with signature
/// `sig`.
pub fn adjoint_tensor(sig: &Signature, t: &Tensor) -> Tensor {
    let nl: usize = sig.lefts().map(|r| r.num_elements()).sum();
    let nr: usize = sig.rights().map(|r| r.num_elements()).sum();
    debug_assert_eq!(t.ndim(), nl + nr);
    let perm: Vec<usize> = (nl..nl + nr).chain(0..nl).collect();
    t.clone().permuted_axes(perm).map(|c| c.conj())
}

/// One port per register element, in signature order, with its qubit width.
fn element_ports<'a>(
    node: &'a Node,
    regs: impl Iterator<Item = &'a Register> + 'a,
) -> impl Iterator<Item = (Soquet, u32)> + 'a {
    regs.flat_map(move |reg| {
        reg.all_idxs().into_iter().map(move |idx| {
            (
                Soquet {
                    node: node.clone(),
                    reg: reg.clone(),
                    idx,
                },
                reg.bitsize(),
            )
        })
    })
}

/// The tensor of one bloq: declared if available, else contracted from its
/// decomposition.
pub fn bloq_to_tensor(bloq: &AnyBloq) -> Result<Tensor, TensorError> {
    if let Some(t) = bloq.my_tensor() {
        return Ok(t);
    }
    match bloq.decompose() {
        Ok(cbloq) => cbloq_to_tensor(&cbloq),
        Err(DecomposeError::NotImplemented) => Err(TensorError::NoTensor(bloq.pretty_name())),
        Err(e) => Err(e.into()),
    }
}

/// Contracts a composite's dataflow graph into its tensor.
pub fn cbloq_to_tensor(cbloq: &CompositeBloq) -> Result<Tensor, TensorError> {
    let sig = cbloq.signature();
    let preds = cbloq.predecessors();

    // The accumulator keeps a fixed block of axes for the composite's left
    // edge, then one axis per open (produced, unconsumed) soquet.
    let left_ports: Vec<(Soquet, u32)> = element_ports(&Node::LeftDangle, sig.lefts()).collect();
    let fixed_dims: Vec<usize> = left_ports.iter().map(|&(_, w)| 1usize << w).collect();
    let d: usize = fixed_dims.iter().product();
    if d.checked_mul(d).map_or(true, |n| n > MAX_TENSOR_ELEMS) {
        return Err(TensorError::TooLarge(d.saturating_mul(d)));
    }
    let shape: Vec<usize> = fixed_dims.iter().chain(fixed_dims.iter()).copied().collect();
    let mut acc: Tensor = Array2::<Complex64>::eye(d)
        .into_dyn()
        .into_shape_with_order(IxDyn(&shape))
        .expect("identity tensor is contiguous");
    let mut frontier: Vec<(Soquet, usize)> = left_ports
        .into_iter()
        .map(|(s, w)| (s, 1usize << w))
        .collect();

    for binst in cbloq.iter_binsts() {
        let t_b = bloq_to_tensor(&binst.bloq)?;
        let bsig = binst.bloq.signature();
        let node = Node::Binst(binst.clone());

        // frontier positions feeding this instance, in its left element order
        let mut consumed: Vec<usize> = Vec::new();
        for (port, _) in element_ports(&node, bsig.lefts()) {
            let producer = preds.get(&port).expect("every left port is connected");
            let pos = frontier
                .iter()
                .position(|(s, _)| s == producer)
                .expect("producer is on the frontier");
            debug_assert!(!consumed.contains(&pos));
            consumed.push(pos);
        }
        let out_ports: Vec<(Soquet, usize)> = element_ports(&node, bsig.rights())
            .map(|(s, w)| (s, 1usize << w))
            .collect();

        acc = contract_step(acc, &fixed_dims, &mut frontier, &consumed, &t_b, &out_ports)?;
    }

    // order the open axes as the right edge expects
    let nl = fixed_dims.len();
    let mut perm: Vec<usize> = (0..nl).collect();
    for (port, _) in element_ports(&Node::RightDangle, sig.rights()) {
        let producer = preds.get(&port).expect("every right dangle is fed");
        let pos = frontier
            .iter()
            .position(|(s, _)| s == producer)
            .expect("producer is on the frontier");
        perm.push(nl + pos);
    }
    debug_assert_eq!(perm.len(), acc.ndim());
    Ok(acc.permuted_axes(perm).as_standard_layout().into_owned())
}

/// Absorbs one instance tensor into the accumulator.
///
/// `consumed` lists frontier positions in the instance's left element order;
/// the surviving frontier keeps its relative order and the instance's
/// outputs are appended.
fn contract_step(
    acc: Tensor,
    fixed_dims: &[usize],
    frontier: &mut Vec<(Soquet, usize)>,
    consumed: &[usize],
    t_b: &Tensor,
    out_ports: &[(Soquet, usize)],
) -> Result<Tensor, TensorError> {
    let nl = fixed_dims.len();
    let keep: Vec<usize> = (0..frontier.len())
        .filter(|p| !consumed.contains(p))
        .collect();

    // move the contracted axes to the back, in the instance's own order
    let mut perm: Vec<usize> = (0..nl).collect();
    perm.extend(keep.iter().map(|&p| nl + p));
    perm.extend(consumed.iter().map(|&p| nl + p));
    let acc = acc.permuted_axes(perm).as_standard_layout().into_owned();

    let k: usize = consumed.iter().map(|&p| frontier[p].1).product();
    let m = acc.len() / k;
    let n_out: usize = out_ports.iter().map(|(_, d)| d).product();
    if m.checked_mul(n_out).map_or(true, |n| n > MAX_TENSOR_ELEMS) {
        return Err(TensorError::TooLarge(m.saturating_mul(n_out)));
    }

    let lhs = acc
        .into_shape_with_order((m, k))
        .expect("standard layout reshapes cleanly");
    let rhs = t_b
        .as_standard_layout()
        .into_owned()
        .into_shape_with_order((k, n_out))
        .expect("instance tensor matches its signature dims");
    let prod = lhs.dot(&rhs);

    let mut new_frontier: Vec<(Soquet, usize)> =
        keep.iter().map(|&p| frontier[p].clone()).collect();
    new_frontier.extend_from_slice(out_ports);
    let mut dims: Vec<usize> = fixed_dims.to_vec();
    dims.extend(new_frontier.iter().map(|&(_, d)| d));
    let out = prod
        .into_dyn()
        .into_shape_with_order(IxDyn(&dims))
        .expect("contraction output reshapes cleanly");
    *frontier = new_frontier;
    Ok(out)
}

/// Contracts a bloq to a dense matrix with row index over its right edge and
/// column index over its left edge.
pub fn tensor_contract(bloq: &AnyBloq) -> Result<Matrix, TensorError> {
    let t = bloq_to_tensor(bloq)?;
    let sig = bloq.signature();
    let nl: usize = sig.lefts().map(|r| r.num_elements()).sum();
    let l: usize = t.shape()[..nl].iter().product();
    let r: usize = t.shape()[nl..].iter().product();
    let m = t
        .as_standard_layout()
        .into_owned()
        .into_shape_with_order((l, r))
        .expect("tensor matches its signature dims");
    Ok(m.reversed_axes().as_standard_layout().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloqs::basic::{CNot, Hadamard, Toffoli, XGate, ZGate, ZeroEffect, ZeroState};
    use crate::builder::BloqBuilder;
    use crate::register::Signature;
    use ndarray::array;

    fn assert_close(a: &Matrix, b: &Matrix) {
        assert_eq!(a.shape(), b.shape(), "shape mismatch: {a} vs {b}");
        for (x, y) in a.iter().zip(b.iter()) {
            assert!(
                (x - y).norm() < 1e-9,
                "matrices differ:\n{a}\nvs\n{b}"
            );
        }
    }

    fn chain(bloqs: Vec<AnyBloq>) -> CompositeBloq {
        let (mut bb, mut soqs) = BloqBuilder::from_signature(Signature::build([("q", 1)]));
        let mut q = soqs.take_one("q");
        for bloq in bloqs {
            q = bb.add(bloq, [("q", q.into())].into()).unwrap().take_one("q");
        }
        bb.finalize([("q", q.into())].into()).unwrap()
    }

    #[test]
    fn x_matrix() {
        let m = tensor_contract(&XGate.into()).unwrap();
        let want = array![
            [Complex64::new(0., 0.), Complex64::new(1., 0.)],
            [Complex64::new(1., 0.), Complex64::new(0., 0.)],
        ];
        assert_close(&m, &want);
    }

    #[test]
    fn h_squared_is_identity() {
        let cbloq = chain(vec![Hadamard.into(), Hadamard.into()]);
        let m = tensor_contract(&cbloq.into()).unwrap();
        let want = Array2::<Complex64>::eye(2);
        assert_close(&m, &want);
    }

    #[test]
    fn zxzx_is_minus_identity() {
        let cbloq = chain(vec![XGate.into(), ZGate.into(), XGate.into(), ZGate.into()]);
        let m = tensor_contract(&cbloq.into()).unwrap();
        let want = Array2::<Complex64>::eye(2).map(|c| -c);
        assert_close(&m, &want);
    }

    #[test]
    fn cnot_permutation() {
        let m = tensor_contract(&CNot.into()).unwrap();
        let mut want = Array2::<Complex64>::zeros((4, 4));
        for (l, r) in [(0, 0), (1, 1), (2, 3), (3, 2)] {
            want[(r, l)] = Complex64::new(1., 0.);
        }
        assert_close(&m, &want);
    }

    #[test]
    fn toffoli_decomposition_matches_declared() {
        let declared = tensor_contract(&Toffoli.into()).unwrap();
        // force the decomposition path by contracting the composite
        let cbloq = AnyBloq::from(Toffoli).decompose().unwrap();
        let contracted = tensor_contract(&cbloq.into()).unwrap();
        assert_close(&contracted, &declared);
    }

    #[test]
    fn state_is_a_column_and_effect_a_row() {
        let m = tensor_contract(&ZeroState.into()).unwrap();
        assert_eq!(m.shape(), [2, 1]);
        assert!((m[(0, 0)].re - 1.0).abs() < 1e-12);
        let m = tensor_contract(&ZeroEffect.into()).unwrap();
        assert_eq!(m.shape(), [1, 2]);
        assert!((m[(0, 0)].re - 1.0).abs() < 1e-12);
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct XNest;

    impl Bloq for XNest {
        fn signature(&self) -> Signature {
            Signature::build([("r", 1)])
        }

        fn build_composite(
            &self,
            bb: &mut BloqBuilder,
            mut soqs: crate::builder::SoqMap,
        ) -> Result<crate::builder::SoqMap, DecomposeError> {
            let r = soqs.take_one("r");
            let r = bb.add(XGate, [("q", r.into())].into())?.take_one("q");
            Ok([("r", r.into())].into())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct XDoubleNest;

    impl Bloq for XDoubleNest {
        fn signature(&self) -> Signature {
            Signature::build([("s", 1)])
        }

        fn build_composite(
            &self,
            bb: &mut BloqBuilder,
            mut soqs: crate::builder::SoqMap,
        ) -> Result<crate::builder::SoqMap, DecomposeError> {
            let s = soqs.take_one("s");
            let s = bb.add(XNest, [("r", s.into())].into())?.take_one("r");
            Ok([("s", s.into())].into())
        }
    }

    #[test]
    fn nested_decompositions_contract_to_x() {
        let want = tensor_contract(&XGate.into()).unwrap();
        let got = tensor_contract(&XNest.into()).unwrap();
        assert_close(&got, &want);
        let got = tensor_contract(&XDoubleNest.into()).unwrap();
        assert_close(&got, &want);
    }

    #[test]
    fn adjoint_tensor_conjugates_and_flips() {
        let sig = AnyBloq::from(ZeroState).signature();
        let t = bloq_to_tensor(&ZeroState.into()).unwrap();
        let adj = adjoint_tensor(&sig, &t);
        let want = bloq_to_tensor(&ZeroEffect.into()).unwrap();
        assert_eq!(adj.shape(), want.shape());
        for (x, y) in adj.iter().zip(want.iter()) {
            assert!((x - y).norm() < 1e-12);
        }
    }
}
