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

//! The [`Bloq`] trait and the type-erased [`AnyBloq`] handle.
//!
//! A bloq is a quantum operation with a typed [`Signature`]. Everything else
//! about it is optional: a decomposition into other bloqs, a callee count
//! shortcut, a T-complexity, a classical action, a dense tensor. Algorithms
//! over bloq graphs only see `AnyBloq`, which adds equality and hashing on
//! top of `Arc<dyn Bloq>` so that bloqs can key count tables and memo caches.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::builder::{BloqBuilder, BuildError, SoqMap};
use crate::callgraph::{CallGraph, CallGraphBuilder, CountError};
use crate::classical::{ClassicalError, ClassicalVals};
use crate::composite::CompositeBloq;
use crate::register::Signature;
use crate::tcomplexity::TComplexity;
use crate::tensor::{self, Tensor, TensorError};

/// Object-safe identity plumbing for bloqs.
///
/// Implemented blanket-wise for every `Any + PartialEq + Hash` type, so a
/// concrete bloq only ever derives `PartialEq` and `Hash` and gets dynamic
/// equality across `dyn Bloq` for free.
pub trait DynBloq: Any {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
    fn type_name(&self) -> &'static str;
}

impl<T: Any + PartialEq + Hash> DynBloq for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|o| self == o)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        // Two bloqs of different types must not collide just because their
        // fields do.
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A quantum operation with typed registers.
///
/// The only required method is [`signature`](Bloq::signature). The `my_*` and
/// `build_*` methods are *declarations*: they say what this bloq knows about
/// itself, and return `None`/`Err` when it knows nothing. The corresponding
/// resolved quantities (a full decomposition, a T-count, a call graph) are
/// derived on [`AnyBloq`], which can fall back from one declaration to
/// another.
pub trait Bloq: DynBloq + fmt::Debug + Send + Sync {
    /// The bloq's register interface.
    fn signature(&self) -> Signature;

    /// A short display name. Defaults to the type name.
    fn pretty_name(&self) -> String {
        short_type_name(self.type_name()).to_string()
    }

    /// Wires up this bloq's decomposition on `bb`, consuming the soquets in
    /// `soqs` (one entry per left register) and returning one entry per right
    /// register.
    ///
    /// Atomic bloqs leave the default, which reports no decomposition.
    fn build_composite(
        &self,
        _bb: &mut BloqBuilder,
        _soqs: SoqMap,
    ) -> Result<SoqMap, DecomposeError> {
        Err(DecomposeError::NotImplemented)
    }

    /// The multiset of callees this bloq invokes, if it can be stated more
    /// cheaply than by building the full decomposition.
    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        None
    }

    /// A directly-declared T-complexity, overriding any decomposition.
    fn my_t_complexity(&self) -> Option<TComplexity> {
        None
    }

    /// Applies this bloq to classical register values.
    ///
    /// `vals` holds one value per left register; the result holds one value
    /// per right register. Bloqs without classical action leave the default.
    fn on_classical_vals(&self, _vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        Err(ClassicalError::NotClassical)
    }

    /// A directly-declared dense tensor, with one axis per left register
    /// element followed by one axis per right register element.
    fn my_tensor(&self) -> Option<Tensor> {
        None
    }

    /// A directly-declared adjoint.
    ///
    /// The returned bloq's signature must carry the same registers as
    /// `self.signature().adjoint()`, names included (their order may differ,
    /// as with `Split` and `Join`). Bloqs leaving the default get wrapped in
    /// [`Adjoint`].
    fn my_adjoint(&self) -> Option<AnyBloq> {
        None
    }
}

/// A cheaply clonable, hashable handle to a `dyn Bloq`.
#[derive(Clone)]
pub struct AnyBloq(Arc<dyn Bloq>);

impl AnyBloq {
    pub fn new<B: Bloq>(bloq: B) -> Self {
        AnyBloq(Arc::new(bloq))
    }

    pub fn downcast_ref<B: Bloq>(&self) -> Option<&B> {
        self.0.as_any().downcast_ref()
    }

    pub fn is<B: Bloq>(&self) -> bool {
        self.downcast_ref::<B>().is_some()
    }

    /// Wraps this bloq as a one-instance composite without decomposing it.
    pub fn as_composite(&self) -> CompositeBloq {
        let (mut bb, soqs) = BloqBuilder::from_signature(self.signature());
        let out = bb
            .add(self.clone(), soqs)
            .expect("wiring a bloq to its own dangles cannot fail");
        bb.finalize(out)
            .expect("wiring a bloq to its own dangles cannot fail")
    }

    /// Builds this bloq's full decomposition as a composite bloq.
    pub fn decompose(&self) -> Result<CompositeBloq, DecomposeError> {
        let (mut bb, soqs) = BloqBuilder::from_signature(self.signature());
        let out = self.build_composite(&mut bb, soqs)?;
        Ok(bb.finalize(out)?)
    }

    /// The adjoint bloq: [`Bloq::my_adjoint`] if declared, otherwise an
    /// [`Adjoint`] wrapper.
    pub fn adjoint(&self) -> AnyBloq {
        self.my_adjoint()
            .unwrap_or_else(|| Adjoint { subbloq: self.clone() }.into())
    }

    /// The resolved T-complexity of this bloq, recursing through
    /// declarations, counts and decompositions.
    pub fn t_complexity(&self) -> Result<TComplexity, CountError> {
        crate::tcomplexity::t_complexity(self)
    }

    /// The call graph rooted at this bloq, with default settings.
    pub fn call_graph(&self) -> Result<CallGraph, CountError> {
        CallGraphBuilder::new().build(self.clone())
    }

    /// Applies the bloq to classical values, returning one value per right
    /// register. Falls back to simulating the decomposition.
    pub fn call_classically(&self, vals: ClassicalVals) -> Result<ClassicalVals, ClassicalError> {
        crate::classical::call_classically(self, vals)
    }

    /// Contracts this bloq down to a dense matrix with row index over right
    /// registers and column index over left registers.
    pub fn tensor_contract(&self) -> Result<tensor::Matrix, TensorError> {
        tensor::tensor_contract(self)
    }
}

impl Deref for AnyBloq {
    type Target = dyn Bloq;

    fn deref(&self) -> &(dyn Bloq + 'static) {
        &*self.0
    }
}

impl<B: Bloq> From<B> for AnyBloq {
    fn from(bloq: B) -> Self {
        AnyBloq::new(bloq)
    }
}

impl PartialEq for AnyBloq {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_any())
    }
}

impl Eq for AnyBloq {}

impl Hash for AnyBloq {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

impl fmt::Debug for AnyBloq {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for AnyBloq {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty_name())
    }
}

/// The adjoint of a bloq that does not declare one itself.
///
/// Its decomposition is the reversed decomposition of the wrapped bloq, and
/// its callee counts are the wrapped bloq's callees, each adjointed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Adjoint {
    pub subbloq: AnyBloq,
}

impl Bloq for Adjoint {
    fn signature(&self) -> Signature {
        self.subbloq.signature().adjoint()
    }

    fn pretty_name(&self) -> String {
        format!("{}†", self.subbloq.pretty_name())
    }

    fn build_composite(&self, bb: &mut BloqBuilder, soqs: SoqMap) -> Result<SoqMap, DecomposeError> {
        let cbloq = self.subbloq.decompose()?.adjoint();
        Ok(bb.add_from(&cbloq, soqs)?)
    }

    fn bloq_counts(&self) -> Option<Vec<(u64, AnyBloq)>> {
        let counts = self.subbloq.bloq_counts()?;
        Some(counts.into_iter().map(|(n, b)| (n, b.adjoint())).collect())
    }

    // leaf costs are adjoint-invariant: T <-> T-dagger, rotations negate
    fn my_t_complexity(&self) -> Option<TComplexity> {
        self.subbloq.my_t_complexity()
    }

    fn my_tensor(&self) -> Option<Tensor> {
        let t = self.subbloq.my_tensor()?;
        Some(tensor::adjoint_tensor(&self.subbloq.signature(), &t))
    }

    fn my_adjoint(&self) -> Option<AnyBloq> {
        Some(self.subbloq.clone())
    }
}

/// An opaque stand-in for a bloq known only by name and signature, e.g. one
/// read back from a serialized graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlackBoxBloq {
    pub name: String,
    pub signature: Signature,
}

impl Bloq for BlackBoxBloq {
    fn signature(&self) -> Signature {
        self.signature.clone()
    }

    fn pretty_name(&self) -> String {
        self.name.clone()
    }
}

/// Errors from building a bloq's decomposition.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum DecomposeError {
    #[display("bloq does not define a decomposition")]
    NotImplemented,
    #[display("error wiring decomposition: {_0}")]
    #[from]
    Build(BuildError),
}

/// Strips the module path (and any generics) off a type name.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloqs::arithmetic::Add;
    use crate::bloqs::basic::{TGate, Toffoli, XGate};
    use rustc_hash::FxHashSet;

    #[test]
    fn dyn_equality() {
        let x: AnyBloq = XGate.into();
        assert_eq!(x, XGate.into());
        assert_ne!(x, TGate::default().into());
        assert_ne!(
            AnyBloq::from(TGate::default()),
            AnyBloq::from(TGate { is_adjoint: true })
        );
    }

    #[test]
    fn dyn_hash_dedupes() {
        let mut set = FxHashSet::default();
        set.insert(AnyBloq::from(XGate));
        set.insert(AnyBloq::from(XGate));
        set.insert(AnyBloq::from(TGate::default()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn downcasting() {
        let b: AnyBloq = Toffoli.into();
        assert!(b.is::<Toffoli>());
        assert!(!b.is::<XGate>());
        assert_eq!(b.downcast_ref::<Toffoli>(), Some(&Toffoli));
    }

    #[test]
    fn pretty_names() {
        assert_eq!(AnyBloq::from(XGate).pretty_name(), "XGate");
        assert_eq!(short_type_name("a::b::C"), "C");
        assert_eq!(short_type_name("C"), "C");
    }

    #[test]
    fn declared_adjoint_round_trips() {
        let t: AnyBloq = TGate::default().into();
        let t_dag = t.adjoint();
        assert_eq!(t_dag, TGate { is_adjoint: true }.into());
        assert_eq!(t_dag.adjoint(), t);
    }

    #[test]
    fn wrapper_adjoint_collapses() {
        // Add declares no adjoint, so it gets the wrapper.
        let add: AnyBloq = Add::new(4).into();
        let adj = add.adjoint();
        assert!(adj.is::<Adjoint>());
        assert_eq!(adj.pretty_name(), "Add†");
        assert_eq!(adj.adjoint(), add);
    }

    #[test]
    fn wrapper_flips_signature() {
        use crate::bloqs::util::Split;
        let split: AnyBloq = Split::new(4).into();
        let joinish = split.adjoint();
        let sig = joinish.signature();
        assert_eq!(sig.lefts().count(), 1);
        assert_eq!(sig.get_left("reg").unwrap().shape, vec![4]);
        assert_eq!(sig.rights().count(), 1);
        assert!(sig.get_right("reg").unwrap().shape.is_empty());
    }

    #[test]
    fn as_composite_wraps_once() {
        let b: AnyBloq = Toffoli.into();
        let cbloq = b.as_composite();
        assert_eq!(cbloq.bloq_instances().len(), 1);
        assert_eq!(cbloq.bloq_instances()[0].bloq, b);
    }

    #[test]
    fn black_box_is_opaque() {
        let bb = BlackBoxBloq {
            name: "Mystery".into(),
            signature: Signature::build([("x", 3)]),
        };
        let b: AnyBloq = bb.into();
        assert_eq!(b.pretty_name(), "Mystery");
        assert!(matches!(b.decompose(), Err(DecomposeError::NotImplemented)));
    }
}
