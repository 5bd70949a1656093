#![cfg_attr(docsrs, feature(doc_cfg))]
//! # dg-flux
//!
//! dg-flux evaluates numerical fluxes on the faces of a discontinuous Galerkin
//! discretization and deposits the lifted result into interchangeable output
//! targets. The same kernel applies the flux operator to a vector, assembles
//! it as a coordinate-format sparse matrix, or runs for its side effects only.
//!
//! ## Features
//! - Immutable [`FaceGroup`](topology::FaceGroup) batches of face pairs with
//!   shared face-node index lists and tagged boundary faces
//! - Caller-supplied flux classes through the [`FluxClass`](flux::FluxClass)
//!   trait (closures included) plus a few reference advection fluxes
//! - Null, vector and coordinate-matrix targets, with the five legal
//!   (interior, exterior) pairings enforced at compile time
//! - Runtime dispatch over target kinds for drivers configured at run time
//! - Optional sharded parallel evaluation on the rayon pool (`rayon` feature)
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! dg-flux = "0.3"
//! # Optional features:
//! # features = ["rayon", "check-invariants"]
//! ```
//!
//! ```
//! use dg_flux::prelude::*;
//!
//! let mut b = FaceGroup::builder(1);
//! let list = b.index_list(vec![0]);
//! b.interior_face(
//!     FaceSide::new(0, 0, list).with_normal(&[1.0]),
//!     FaceSide::new(1, 1, list).with_normal(&[-1.0]),
//! );
//! let group = b.build()?;
//! let mass = LocalMatrix::identity(1)?;
//! let flux = UpwindFlux::new(&[1.0]);
//!
//! let u = [1.0, 0.0];
//! let mut rhs = [0.0; 2];
//! let mut target = VectorTarget::new(&u, &mut rhs)?;
//! perform_flux(&group, &mass, &flux, &mut target, &flux, &mut NullTarget)?;
//! assert_eq!(rhs, [1.0, 0.0]);
//! # Ok::<(), dg_flux::flux_error::FluxError>(())
//! ```
//!
//! ## Sign convention
//! Every face side stores its own outward normal and the kernel never flips a
//! sign: the exterior half of a face is evaluated with the exterior side as
//! `local`. Conservative fluxes therefore produce interior and exterior
//! contributions that cancel.

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod flux;
pub mod flux_error;
pub mod target;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::dispatch::{AnyTarget, perform_flux_dyn};
    pub use crate::algs::options::{FluxMode, FluxOptions};
    #[cfg(feature = "rayon")]
    pub use crate::algs::parallel::{par_perform_flux, par_perform_flux_detailed};
    pub use crate::algs::perform_flux::{EvaluationStats, perform_flux, perform_flux_detailed};
    pub use crate::data::coord_matrix::{CoordEntry, CoordMatrix};
    pub use crate::data::local_matrix::LocalMatrix;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::flux::{
        BoundaryCondition, BoundaryExterior, BoundaryPolicy, CentralFlux, ConstantFlux,
        FluxClass, FluxCoefficients, FluxInput, LaxFriedrichsFlux, UpwindFlux,
    };
    pub use crate::flux_error::{ErrorClass, FluxError};
    #[cfg(feature = "rayon")]
    pub use crate::target::ShardTarget;
    pub use crate::target::{
        CoordMatrixTarget, FluxTarget, NullTarget, SUPPORTED_TARGET_PAIRS, TargetKind,
        TargetPair, VectorTarget,
    };
    pub use crate::topology::boundary::BoundaryTag;
    pub use crate::topology::face_group::{
        BoundarySide, FaceGroup, FaceGroupBuilder, FacePair, FaceSide, Opposite,
    };
}
