//! Runtime dispatch over target kinds.
//!
//! Generic callers should use
//! [`perform_flux`](crate::algs::perform_flux::perform_flux), where illegal
//! target pairings do not compile. Drivers that pick targets from
//! configuration or from a scripting layer hold an [`AnyTarget`] instead and
//! go through [`perform_flux_dyn`], which forwards the five supported
//! pairings to the generic kernel and rejects everything else before either
//! target is touched.

use crate::algs::options::FluxOptions;
use crate::algs::perform_flux::{EvaluationStats, perform_flux_detailed};
use crate::data::local_matrix::LocalMatrix;
use crate::flux::FluxClass;
use crate::flux_error::FluxError;
use crate::target::{CoordMatrixTarget, FluxTarget, NullTarget, TargetKind, VectorTarget};
use crate::topology::face_group::FaceGroup;

/// A target whose kind is only known at run time.
#[derive(Debug)]
pub enum AnyTarget<'a> {
    Null(NullTarget),
    Vector(VectorTarget<'a>),
    CoordMatrix(CoordMatrixTarget<'a>),
}

impl AnyTarget<'_> {
    pub fn kind(&self) -> TargetKind {
        match self {
            AnyTarget::Null(t) => t.kind(),
            AnyTarget::Vector(t) => t.kind(),
            AnyTarget::CoordMatrix(t) => t.kind(),
        }
    }
}

impl From<NullTarget> for AnyTarget<'_> {
    fn from(t: NullTarget) -> Self {
        AnyTarget::Null(t)
    }
}

impl<'a> From<VectorTarget<'a>> for AnyTarget<'a> {
    fn from(t: VectorTarget<'a>) -> Self {
        AnyTarget::Vector(t)
    }
}

impl<'a> From<CoordMatrixTarget<'a>> for AnyTarget<'a> {
    fn from(t: CoordMatrixTarget<'a>) -> Self {
        AnyTarget::CoordMatrix(t)
    }
}

/// [`perform_flux_detailed`] with run-time target kinds.
///
/// # Errors
/// `UnsupportedTargetPair` for any pairing outside
/// [`SUPPORTED_TARGET_PAIRS`](crate::target::SUPPORTED_TARGET_PAIRS);
/// otherwise whatever the kernel reports.
pub fn perform_flux_dyn<FI, FO>(
    group: &FaceGroup,
    matrix: &LocalMatrix,
    flux_in: &FI,
    target_in: &mut AnyTarget<'_>,
    flux_out: &FO,
    target_out: &mut AnyTarget<'_>,
    options: &FluxOptions,
) -> Result<EvaluationStats, FluxError>
where
    FI: FluxClass + ?Sized,
    FO: FluxClass + ?Sized,
{
    use AnyTarget as T;
    match (target_in, target_out) {
        (T::Null(ti), T::Null(to)) => {
            perform_flux_detailed(group, matrix, flux_in, ti, flux_out, to, options)
        }
        (T::Vector(ti), T::Null(to)) => {
            perform_flux_detailed(group, matrix, flux_in, ti, flux_out, to, options)
        }
        (T::Null(ti), T::Vector(to)) => {
            perform_flux_detailed(group, matrix, flux_in, ti, flux_out, to, options)
        }
        (T::Vector(ti), T::Vector(to)) => {
            perform_flux_detailed(group, matrix, flux_in, ti, flux_out, to, options)
        }
        (T::CoordMatrix(ti), T::CoordMatrix(to)) => {
            perform_flux_detailed(group, matrix, flux_in, ti, flux_out, to, options)
        }
        (ti, to) => {
            let err = FluxError::UnsupportedTargetPair {
                interior: ti.kind(),
                exterior: to.kind(),
            };
            log::error!("perform_flux_dyn rejected: {err}");
            Err(err)
        }
    }
}
