//! Flux classes: the caller-supplied numerical flux, seen as a black box.
//!
//! The kernel asks a flux class for the linear coefficients of the numerical
//! flux at one face node,
//!
//! ```text
//! f*(u_local, u_neighbor) = local * u_local + neighbor * u_neighbor
//! ```
//!
//! and never interprets them. The kernel always evaluates from the point of
//! view of the side it is depositing into: `local` is that side, `neighbor` is
//! the other one, and the normal in [`FluxInput::local`] is the outward normal
//! of the local side. No sign is flipped by the kernel; a conservative flux
//! (`f*(a, b; n) = -f*(b, a; -n)`) therefore yields interior and exterior
//! contributions that cancel.
//!
//! Any `Fn(&FluxInput) -> Result<FluxCoefficients, FluxError> + Sync` is a
//! flux class, so one-off fluxes can be written as closures.

pub mod library;

pub use library::{
    BoundaryCondition, BoundaryPolicy, CentralFlux, ConstantFlux, LaxFriedrichsFlux, UpwindFlux,
};

use crate::flux_error::FluxError;
use crate::topology::boundary::BoundaryTag;
use crate::topology::face_group::FaceSide;

/// Everything a flux class may look at for one face node.
#[derive(Clone, Copy, Debug)]
pub struct FluxInput<'a> {
    /// Face number within the group.
    pub face: usize,
    /// Node number within the face, `0..face_length`.
    pub node: usize,
    /// Side receiving the deposit.
    pub local: &'a FaceSide,
    /// Opposite side; the mirrored boundary side on boundary faces.
    pub neighbor: &'a FaceSide,
    /// Boundary tag when the face has no exterior element.
    pub boundary: Option<&'a BoundaryTag>,
}

impl FluxInput<'_> {
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.boundary.is_some()
    }
}

/// Linear flux coefficients at one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FluxCoefficients {
    /// Multiplies the local trace.
    pub local: f64,
    /// Multiplies the neighbor trace.
    pub neighbor: f64,
}

impl FluxCoefficients {
    #[inline]
    pub const fn new(local: f64, neighbor: f64) -> Self {
        Self { local, neighbor }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.local.is_finite() && self.neighbor.is_finite()
    }
}

/// Whether a boundary face's exterior side receives contributions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BoundaryExterior {
    /// No exterior state: the exterior deposit is skipped.
    #[default]
    Absent,
    /// The flux class synthesizes an exterior state; the exterior side is
    /// evaluated and deposited at the boundary block's DOFs.
    Synthetic,
}

/// Capability: compute flux coefficients from interior/exterior trace data.
pub trait FluxClass: Sync {
    /// Coefficients at `input.node` of `input.face`.
    fn coefficients(&self, input: &FluxInput<'_>) -> Result<FluxCoefficients, FluxError>;

    /// Boundary policy for faces tagged `tag`.
    fn boundary_exterior(&self, _tag: &BoundaryTag) -> BoundaryExterior {
        BoundaryExterior::Absent
    }
}

impl<F> FluxClass for F
where
    F: Fn(&FluxInput<'_>) -> Result<FluxCoefficients, FluxError> + Sync,
{
    #[inline]
    fn coefficients(&self, input: &FluxInput<'_>) -> Result<FluxCoefficients, FluxError> {
        self(input)
    }
}
