//! Reference flux classes for scalar linear advection `u_t + a . grad u = 0`.
//!
//! These cover the common textbook fluxes and serve the tests and benchmarks;
//! applications are expected to bring their own [`FluxClass`] implementations.

use super::{BoundaryExterior, FluxClass, FluxCoefficients, FluxInput};
use crate::flux_error::FluxError;
use crate::topology::boundary::BoundaryTag;
use hashbrown::HashMap;

/// Same coefficients at every node of every face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantFlux {
    pub coefficients: FluxCoefficients,
}

impl ConstantFlux {
    pub const fn new(local: f64, neighbor: f64) -> Self {
        Self {
            coefficients: FluxCoefficients::new(local, neighbor),
        }
    }
}

impl FluxClass for ConstantFlux {
    #[inline]
    fn coefficients(&self, _input: &FluxInput<'_>) -> Result<FluxCoefficients, FluxError> {
        Ok(self.coefficients)
    }
}

fn velocity_from(velocity: &[f64]) -> [f64; 3] {
    let mut a = [0.0; 3];
    for (dst, src) in a.iter_mut().zip(velocity) {
        *dst = *src;
    }
    a
}

/// Central flux `(a.n) (u_l + u_n) / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CentralFlux {
    pub velocity: [f64; 3],
}

impl CentralFlux {
    pub fn new(velocity: &[f64]) -> Self {
        Self {
            velocity: velocity_from(velocity),
        }
    }
}

impl FluxClass for CentralFlux {
    #[inline]
    fn coefficients(&self, input: &FluxInput<'_>) -> Result<FluxCoefficients, FluxError> {
        let an = input.local.normal_dot(&self.velocity);
        Ok(FluxCoefficients::new(0.5 * an, 0.5 * an))
    }
}

/// Upwind flux: `(a.n) u_l` on outflow sides, `(a.n) u_n` on inflow sides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpwindFlux {
    pub velocity: [f64; 3],
}

impl UpwindFlux {
    pub fn new(velocity: &[f64]) -> Self {
        Self {
            velocity: velocity_from(velocity),
        }
    }
}

impl FluxClass for UpwindFlux {
    #[inline]
    fn coefficients(&self, input: &FluxInput<'_>) -> Result<FluxCoefficients, FluxError> {
        let an = input.local.normal_dot(&self.velocity);
        if an > 0.0 {
            Ok(FluxCoefficients::new(an, 0.0))
        } else {
            Ok(FluxCoefficients::new(0.0, an))
        }
    }
}

/// Lax-Friedrichs flux `(a.n)(u_l + u_n)/2 + lambda (u_l - u_n)/2`.
///
/// `lambda` must bound `|a.n|` for the flux to be stable; `new` uses `|a|`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaxFriedrichsFlux {
    pub velocity: [f64; 3],
    pub lambda: f64,
}

impl LaxFriedrichsFlux {
    pub fn new(velocity: &[f64]) -> Self {
        let velocity = velocity_from(velocity);
        let lambda = velocity.iter().map(|c| c * c).sum::<f64>().sqrt();
        Self { velocity, lambda }
    }

    /// Override the penalty.
    ///
    /// # Errors
    /// A flux evaluation error if `lambda` is negative or NaN.
    pub fn with_lambda(mut self, lambda: f64) -> Result<Self, FluxError> {
        check_penalty(lambda)?;
        self.lambda = lambda;
        Ok(self)
    }
}

fn check_penalty(lambda: f64) -> Result<(), FluxError> {
    if lambda.is_nan() || lambda < 0.0 {
        return Err(FluxError::flux(format!(
            "Lax-Friedrichs penalty {lambda} must be non-negative"
        )));
    }
    Ok(())
}

impl FluxClass for LaxFriedrichsFlux {
    fn coefficients(&self, input: &FluxInput<'_>) -> Result<FluxCoefficients, FluxError> {
        // `lambda` is a public field and may bypass `with_lambda`.
        check_penalty(self.lambda)?;
        let an = input.local.normal_dot(&self.velocity);
        Ok(FluxCoefficients::new(
            0.5 * (an + self.lambda),
            0.5 * (an - self.lambda),
        ))
    }
}

/// How the exterior trace of a tagged boundary is obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BoundaryCondition {
    /// Exterior trace is caller-supplied boundary data at the boundary block.
    #[default]
    Data,
    /// Synthetic exterior `u_ext = u_int` (outflow / zero gradient).
    Extrapolate,
    /// Synthetic exterior `u_ext = -u_int` (reflecting wall).
    Reflect,
}

impl BoundaryCondition {
    fn sign(self) -> Option<f64> {
        match self {
            BoundaryCondition::Data => None,
            BoundaryCondition::Extrapolate => Some(1.0),
            BoundaryCondition::Reflect => Some(-1.0),
        }
    }
}

/// Wraps a flux class with per-tag boundary conditions.
///
/// Tags without an entry behave as [`BoundaryCondition::Data`]. For
/// synthetic conditions the exterior trace is a multiple of the interior
/// trace, so the coefficient of the exterior trace is folded onto the
/// interior trace and the boundary block column receives zero.
#[derive(Clone, Debug)]
pub struct BoundaryPolicy<F> {
    inner: F,
    conditions: HashMap<BoundaryTag, BoundaryCondition>,
}

impl<F: FluxClass> BoundaryPolicy<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            conditions: HashMap::new(),
        }
    }

    pub fn with_condition(mut self, tag: impl Into<BoundaryTag>, bc: BoundaryCondition) -> Self {
        self.conditions.insert(tag.into(), bc);
        self
    }

    pub fn condition(&self, tag: &BoundaryTag) -> BoundaryCondition {
        self.conditions.get(tag).copied().unwrap_or_default()
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: FluxClass> FluxClass for BoundaryPolicy<F> {
    fn coefficients(&self, input: &FluxInput<'_>) -> Result<FluxCoefficients, FluxError> {
        let c = self.inner.coefficients(input)?;
        let Some(tag) = input.boundary else {
            return Ok(c);
        };
        let Some(sign) = self.condition(tag).sign() else {
            return Ok(c);
        };
        if input.local.is_boundary() {
            // Evaluating on the synthetic exterior: its trace is sign * u_int.
            Ok(FluxCoefficients::new(0.0, c.neighbor + sign * c.local))
        } else {
            Ok(FluxCoefficients::new(c.local + sign * c.neighbor, 0.0))
        }
    }

    fn boundary_exterior(&self, tag: &BoundaryTag) -> BoundaryExterior {
        match self.condition(tag) {
            BoundaryCondition::Data => BoundaryExterior::Absent,
            BoundaryCondition::Extrapolate | BoundaryCondition::Reflect => {
                BoundaryExterior::Synthetic
            }
        }
    }
}
