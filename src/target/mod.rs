//! Targets: pluggable sinks for lifted flux coefficients.
//!
//! The flux kernel hands every lifted coefficient to a target through a single
//! call, [`FluxTarget::add_coefficient`]`(row, col, value)`. What the target
//! does with it decides whether the flux operator is discarded, applied to a
//! vector, or materialized as a sparse matrix:
//!
//! | Target | Effect of `add_coefficient(row, col, v)` |
//! |---|---|
//! | [`NullTarget`] | nothing |
//! | [`VectorTarget`] | `result[row] += v * operand[col]` |
//! | [`CoordMatrixTarget`] | append `(row, col, v)` |
//!
//! A target never owns its destination storage; it borrows it mutably for the
//! duration of the evaluation.
//!
//! ## Legal pairings
//! The kernel takes one target per face side. Only five pairings are
//! supported, and [`TargetPair`] is implemented for exactly those:
//!
//! | interior | exterior |
//! |---|---|
//! | Null | Null |
//! | Vector | Null |
//! | Null | Vector |
//! | Vector | Vector |
//! | CoordMatrix | CoordMatrix |
//!
//! Any other pairing fails to compile against
//! [`perform_flux`](crate::algs::perform_flux::perform_flux). Callers that only
//! know target kinds at run time go through
//! [`perform_flux_dyn`](crate::algs::dispatch::perform_flux_dyn), which rejects
//! the same pairings with a contract violation.

pub mod coord;
pub mod null;
#[cfg(feature = "rayon")]
pub mod shard;
pub mod vector;

pub use coord::CoordMatrixTarget;
pub use null::NullTarget;
#[cfg(feature = "rayon")]
pub use shard::{CoordShard, ShardTarget, VectorShard};
pub use vector::VectorTarget;

use static_assertions::{assert_impl_all, assert_not_impl_any};

/// Closed set of target kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TargetKind {
    Null,
    Vector,
    CoordMatrix,
}

/// A sink for `(row, col, value)` flux coefficients.
pub trait FluxTarget {
    /// Kind reported in errors and statistics.
    const KIND: TargetKind;

    /// Addressable `(rows, cols)`; `None` accepts any index.
    fn extent(&self) -> Option<(usize, usize)>;

    /// Deposit one coefficient. Indices have been checked against
    /// [`extent`](Self::extent) before the first call of an evaluation.
    fn add_coefficient(&mut self, row: usize, col: usize, value: f64);

    /// Hint that about `additional` coefficients are coming.
    #[inline]
    fn reserve(&mut self, _additional: usize) {}

    #[inline]
    fn kind(&self) -> TargetKind {
        Self::KIND
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Marker for the five supported `(interior, exterior)` target pairings.
///
/// Sealed: the set of legal pairings is fixed by this crate.
pub trait TargetPair: sealed::Sealed {}

macro_rules! legal_pair {
    ($($interior:ty, $exterior:ty);+ $(;)?) => {
        $(
            impl sealed::Sealed for ($interior, $exterior) {}
            impl TargetPair for ($interior, $exterior) {}
        )+
    };
}

legal_pair! {
    NullTarget, NullTarget;
    VectorTarget<'_>, NullTarget;
    NullTarget, VectorTarget<'_>;
    VectorTarget<'_>, VectorTarget<'_>;
    CoordMatrixTarget<'_>, CoordMatrixTarget<'_>;
}

/// The supported pairings as kinds, in registration order.
pub const SUPPORTED_TARGET_PAIRS: [(TargetKind, TargetKind); 5] = [
    (TargetKind::Null, TargetKind::Null),
    (TargetKind::Vector, TargetKind::Null),
    (TargetKind::Null, TargetKind::Vector),
    (TargetKind::Vector, TargetKind::Vector),
    (TargetKind::CoordMatrix, TargetKind::CoordMatrix),
];

/// Whether `(interior, exterior)` is one of [`SUPPORTED_TARGET_PAIRS`].
pub fn is_supported_pair(interior: TargetKind, exterior: TargetKind) -> bool {
    SUPPORTED_TARGET_PAIRS.contains(&(interior, exterior))
}

assert_impl_all!(NullTarget: Send, Sync, Copy, Default);
assert_impl_all!(VectorTarget<'static>: Send, Sync);
assert_impl_all!(CoordMatrixTarget<'static>: Send, Sync);
assert_impl_all!((VectorTarget<'static>, NullTarget): TargetPair);
assert_impl_all!((CoordMatrixTarget<'static>, CoordMatrixTarget<'static>): TargetPair);
assert_not_impl_any!((VectorTarget<'static>, CoordMatrixTarget<'static>): TargetPair);
assert_not_impl_any!((CoordMatrixTarget<'static>, VectorTarget<'static>): TargetPair);
assert_not_impl_any!((NullTarget, CoordMatrixTarget<'static>): TargetPair);
assert_not_impl_any!((CoordMatrixTarget<'static>, NullTarget): TargetPair);
