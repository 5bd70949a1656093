//! The flux kernel: evaluate, lift, and deposit for one face group.
//!
//! For every face `f` with interior side `I` and exterior side `E` (the
//! mirrored boundary side on boundary faces), and every pair of face nodes
//! `(i, j)`:
//!
//! ```text
//! w_I = scale(I) * M[i][j]
//! target_in  += (dof_I(i), dof_I(j), w_I * c_in[j].local)
//! target_in  += (dof_I(i), dof_E(j), w_I * c_in[j].neighbor)
//! target_out += (dof_E(i), dof_E(j), w_E * c_out[j].local)
//! target_out += (dof_E(i), dof_I(j), w_E * c_out[j].neighbor)
//! ```
//!
//! where `c_in[j]` is the flux class evaluated with `I` local and `c_out[j]`
//! with `E` local. The exterior half is skipped on boundary faces unless the
//! exterior flux class reports [`BoundaryExterior::Synthetic`] for the tag.
//!
//! Faces are independent; the only shared mutable state is the targets.
//!
//! # Failure
//! Shape and index checks run before the first deposit. A flux-class failure
//! aborts the group at the failing face; deposits of earlier faces stay in the
//! targets, so callers should discard target state after an error.

use crate::algs::options::{FluxMode, FluxOptions};
use crate::data::local_matrix::LocalMatrix;
use crate::flux::{BoundaryExterior, FluxClass, FluxCoefficients, FluxInput};
use crate::flux_error::FluxError;
use crate::target::{FluxTarget, TargetKind, TargetPair};
use crate::topology::face_group::{FaceGroup, FacePair, FaceSide};
use std::ops::AddAssign;

/// Work counters for one evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct EvaluationStats {
    /// Faces visited.
    pub faces: usize,
    /// Of which boundary faces.
    pub boundary_faces: usize,
    /// Flux-class calls, both sides.
    pub flux_evaluations: usize,
    /// `add_coefficient` calls, both targets, null targets included.
    pub deposits: usize,
    /// Boundary faces whose exterior half was skipped.
    pub skipped_exterior_faces: usize,
}

impl AddAssign for EvaluationStats {
    fn add_assign(&mut self, rhs: Self) {
        self.faces += rhs.faces;
        self.boundary_faces += rhs.boundary_faces;
        self.flux_evaluations += rhs.flux_evaluations;
        self.deposits += rhs.deposits;
        self.skipped_exterior_faces += rhs.skipped_exterior_faces;
    }
}

/// Evaluate with [`FluxOptions::default`].
pub fn perform_flux<FI, TI, FO, TO>(
    group: &FaceGroup,
    matrix: &LocalMatrix,
    flux_in: &FI,
    target_in: &mut TI,
    flux_out: &FO,
    target_out: &mut TO,
) -> Result<EvaluationStats, FluxError>
where
    FI: FluxClass + ?Sized,
    FO: FluxClass + ?Sized,
    TI: FluxTarget,
    TO: FluxTarget,
    (TI, TO): TargetPair,
{
    perform_flux_detailed(
        group,
        matrix,
        flux_in,
        target_in,
        flux_out,
        target_out,
        &FluxOptions::default(),
    )
}

/// Evaluate `flux_in`/`flux_out` over every face of `group`, depositing into
/// `target_in`/`target_out`.
///
/// # Errors
/// - `MatrixShapeMismatch` if `matrix` is not `face_length x face_length`.
/// - `DofOutOfRange` if the group addresses DOFs outside a target.
/// - `FluxEvaluation` / `NonFiniteCoefficient` from the flux classes.
pub fn perform_flux_detailed<FI, TI, FO, TO>(
    group: &FaceGroup,
    matrix: &LocalMatrix,
    flux_in: &FI,
    target_in: &mut TI,
    flux_out: &FO,
    target_out: &mut TO,
    options: &FluxOptions,
) -> Result<EvaluationStats, FluxError>
where
    FI: FluxClass + ?Sized,
    FO: FluxClass + ?Sized,
    TI: FluxTarget,
    TO: FluxTarget,
    (TI, TO): TargetPair,
{
    check_preconditions(group, matrix, &*target_in, &*target_out)?;

    let kernel = FaceKernel::new(group, matrix, options);
    let (reserve_in, reserve_out) = deposit_counts(group.pairs(), group.face_length(), flux_out);
    target_in.reserve(reserve_in);
    target_out.reserve(reserve_out);

    let mut stats = EvaluationStats::default();
    let mut scratch = FaceScratch::new(group.face_length());
    for (face, pair) in group.pairs().iter().enumerate() {
        kernel.evaluate_face(
            face,
            pair,
            flux_in,
            target_in,
            flux_out,
            target_out,
            &mut scratch,
            &mut stats,
        )?;
    }

    log::debug!(
        "perform_flux ({:?}, {:?}): {} faces, {} flux evaluations, {} deposits, {} exterior halves skipped",
        TI::KIND,
        TO::KIND,
        stats.faces,
        stats.flux_evaluations,
        stats.deposits,
        stats.skipped_exterior_faces
    );
    Ok(stats)
}

/// Shape and index checks shared by the serial and parallel entry points.
pub(crate) fn check_preconditions<TI, TO>(
    group: &FaceGroup,
    matrix: &LocalMatrix,
    target_in: &TI,
    target_out: &TO,
) -> Result<(), FluxError>
where
    TI: FluxTarget,
    TO: FluxTarget,
{
    matrix.require_square(group.face_length())?;
    check_extent("interior", group.max_dof(), target_in.extent())?;
    check_extent("exterior", group.max_dof(), target_out.extent())?;
    Ok(())
}

fn check_extent(
    side: &'static str,
    max_dof: usize,
    extent: Option<(usize, usize)>,
) -> Result<(), FluxError> {
    match extent {
        Some((rows, cols)) if max_dof >= rows || max_dof >= cols => Err(FluxError::DofOutOfRange {
            side,
            dof: max_dof,
            rows,
            cols,
        }),
        _ => Ok(()),
    }
}

/// Whether the exterior half of `pair` is evaluated and deposited.
#[inline]
pub(crate) fn deposits_exterior<FO>(pair: &FacePair, flux_out: &FO) -> bool
where
    FO: FluxClass + ?Sized,
{
    match pair.boundary_tag() {
        None => true,
        Some(tag) => flux_out.boundary_exterior(tag) == BoundaryExterior::Synthetic,
    }
}

/// `add_coefficient` calls each target will receive for `pairs`.
pub(crate) fn deposit_counts<FO>(
    pairs: &[FacePair],
    face_length: usize,
    flux_out: &FO,
) -> (usize, usize)
where
    FO: FluxClass + ?Sized,
{
    let per_face = face_length.saturating_mul(face_length).saturating_mul(2);
    let exterior = pairs
        .iter()
        .filter(|pair| deposits_exterior(*pair, flux_out))
        .count();
    (
        pairs.len().saturating_mul(per_face),
        exterior.saturating_mul(per_face),
    )
}

/// Per-worker scratch buffers, reused across faces.
pub(crate) struct FaceScratch {
    int_dofs: Vec<usize>,
    ext_dofs: Vec<usize>,
    coeff_in: Vec<FluxCoefficients>,
    coeff_out: Vec<FluxCoefficients>,
}

impl FaceScratch {
    pub(crate) fn new(face_length: usize) -> Self {
        Self {
            int_dofs: Vec::with_capacity(face_length),
            ext_dofs: Vec::with_capacity(face_length),
            coeff_in: Vec::with_capacity(face_length),
            coeff_out: Vec::with_capacity(face_length),
        }
    }
}

/// Read-only state shared by all faces of one evaluation.
pub(crate) struct FaceKernel<'g> {
    group: &'g FaceGroup,
    matrix: &'g LocalMatrix,
    mode: FluxMode,
    check_finite: bool,
}

impl<'g> FaceKernel<'g> {
    pub(crate) fn new(group: &'g FaceGroup, matrix: &'g LocalMatrix, options: &FluxOptions) -> Self {
        Self {
            group,
            matrix,
            mode: options.mode,
            check_finite: options.check_finite,
        }
    }

    #[inline]
    fn scale(&self, side: &FaceSide) -> f64 {
        match self.mode {
            FluxMode::Mass => side.face_jacobian,
            FluxMode::Lift => side.face_jacobian / side.element_jacobian,
        }
    }

    /// Evaluate the flux class at every node of `face` with `local` as the
    /// receiving side.
    fn evaluate_side<F>(
        &self,
        face: usize,
        flux: &F,
        local: &FaceSide,
        neighbor: &FaceSide,
        pair: &FacePair,
        out: &mut Vec<FluxCoefficients>,
    ) -> Result<(), FluxError>
    where
        F: FluxClass + ?Sized,
    {
        out.clear();
        for node in 0..self.group.face_length() {
            let input = FluxInput {
                face,
                node,
                local,
                neighbor,
                boundary: pair.boundary_tag(),
            };
            let c = flux
                .coefficients(&input)
                .map_err(|e| e.at_face(face, node, local.element))?;
            if self.check_finite && !c.is_finite() {
                return Err(FluxError::NonFiniteCoefficient {
                    face,
                    node,
                    element: local.element,
                });
            }
            out.push(c);
        }
        Ok(())
    }

    /// Lift `coeffs` through the local matrix and deposit rows at `rows`.
    #[inline]
    fn deposit<T: FluxTarget>(
        &self,
        target: &mut T,
        scale: f64,
        rows: &[usize],
        neighbor_cols: &[usize],
        coeffs: &[FluxCoefficients],
    ) -> usize {
        let n = rows.len();
        for (i, &row) in rows.iter().enumerate() {
            let m_row = self.matrix.row(i);
            for j in 0..n {
                let w = scale * m_row[j];
                target.add_coefficient(row, rows[j], w * coeffs[j].local);
                target.add_coefficient(row, neighbor_cols[j], w * coeffs[j].neighbor);
            }
        }
        2 * n * n
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn evaluate_face<FI, TI, FO, TO>(
        &self,
        face: usize,
        pair: &FacePair,
        flux_in: &FI,
        target_in: &mut TI,
        flux_out: &FO,
        target_out: &mut TO,
        scratch: &mut FaceScratch,
        stats: &mut EvaluationStats,
    ) -> Result<(), FluxError>
    where
        FI: FluxClass + ?Sized,
        FO: FluxClass + ?Sized,
        TI: FluxTarget,
        TO: FluxTarget,
    {
        let interior = &pair.interior;
        let exterior = pair.exterior();
        let n = self.group.face_length();

        let with_exterior = deposits_exterior(pair, flux_out);

        self.group
            .side_dofs(interior.el_base_index, interior.face_index_list, &mut scratch.int_dofs);
        self.group
            .side_dofs(exterior.el_base_index, exterior.face_index_list, &mut scratch.ext_dofs);

        self.evaluate_side(face, flux_in, interior, &exterior, pair, &mut scratch.coeff_in)?;
        stats.flux_evaluations += n;
        if with_exterior {
            self.evaluate_side(face, flux_out, &exterior, interior, pair, &mut scratch.coeff_out)?;
            stats.flux_evaluations += n;
        }

        stats.deposits += self.deposit(
            target_in,
            self.scale(interior),
            &scratch.int_dofs,
            &scratch.ext_dofs,
            &scratch.coeff_in,
        );
        if with_exterior {
            stats.deposits += self.deposit(
                target_out,
                self.scale(&exterior),
                &scratch.ext_dofs,
                &scratch.int_dofs,
                &scratch.coeff_out,
            );
        } else {
            stats.skipped_exterior_faces += 1;
            if TO::KIND != TargetKind::Null {
                log::trace!(
                    "face {face}: boundary `{}` supplies no exterior state, exterior target untouched",
                    pair.boundary_tag().map(|t| t.as_str()).unwrap_or_default()
                );
            }
        }

        stats.faces += 1;
        if pair.is_boundary() {
            stats.boundary_faces += 1;
        }
        Ok(())
    }
}
