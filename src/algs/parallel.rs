//! Parallel face-group evaluation on the rayon pool.
//!
//! Faces are split into chunks of [`FluxOptions::chunk_size`]. Chunks are
//! folded into private [`ShardTarget`] shards, at most one live shard pair per
//! pool thread; neighboring shards are joined left to right and the final
//! shard is merged into the caller's targets. Vector results therefore match
//! the serial kernel up to floating-point reassociation, and coordinate
//! entries come out in serial order.
//!
//! If any chunk fails, nothing is merged and the caller's targets are left
//! exactly as they were.

use crate::algs::options::FluxOptions;
use crate::algs::perform_flux::{
    EvaluationStats, FaceKernel, FaceScratch, check_preconditions, deposit_counts,
};
use crate::data::local_matrix::LocalMatrix;
use crate::flux::FluxClass;
use crate::flux_error::FluxError;
use crate::target::{FluxTarget, ShardTarget, TargetPair};
use crate::topology::face_group::FaceGroup;
use rayon::prelude::*;

/// Parallel [`perform_flux`](crate::algs::perform_flux::perform_flux) with
/// default options.
pub fn par_perform_flux<FI, TI, FO, TO>(
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
    TI: ShardTarget,
    TO: ShardTarget,
    (TI, TO): TargetPair,
{
    par_perform_flux_detailed(
        group,
        matrix,
        flux_in,
        target_in,
        flux_out,
        target_out,
        &FluxOptions::default(),
    )
}

/// Parallel [`perform_flux_detailed`](crate::algs::perform_flux::perform_flux_detailed).
///
/// # Errors
/// Same as the serial kernel. When several chunks fail, the error of the
/// lowest-numbered face is not guaranteed; some failing face is reported.
pub fn par_perform_flux_detailed<FI, TI, FO, TO>(
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
    TI: ShardTarget,
    TO: ShardTarget,
    (TI, TO): TargetPair,
{
    check_preconditions(group, matrix, &*target_in, &*target_out)?;
    evaluate_sharded(group, matrix, flux_in, target_in, flux_out, target_out, options)
}

/// Chunk count below which a fold leaf is not split further, so that no
/// more than `threads` shard pairs exist at once.
fn min_chunks_per_leaf(n_chunks: usize, threads: usize) -> usize {
    n_chunks.div_ceil(threads.max(1)).max(1)
}

pub(crate) fn evaluate_sharded<FI, TI, FO, TO>(
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
    TI: ShardTarget,
    TO: ShardTarget,
{
    let kernel = FaceKernel::new(group, matrix, options);
    let face_length = group.face_length();
    let chunk = options.chunk_size.max(1);
    let n_chunks = group.len().div_ceil(chunk);
    let min_len = min_chunks_per_leaf(n_chunks, rayon::current_num_threads());
    let tin = &*target_in;
    let tout = &*target_out;

    let joined = group
        .pairs()
        .par_chunks(chunk)
        .enumerate()
        .with_min_len(min_len)
        .try_fold(
            || {
                (
                    tin.shard(),
                    tout.shard(),
                    FaceScratch::new(face_length),
                    EvaluationStats::default(),
                )
            },
            |(mut shard_in, mut shard_out, mut scratch, mut stats), (c, pairs)| {
                let (reserve_in, reserve_out) = deposit_counts(pairs, face_length, flux_out);
                shard_in.reserve(reserve_in);
                shard_out.reserve(reserve_out);
                for (k, pair) in pairs.iter().enumerate() {
                    kernel.evaluate_face(
                        c * chunk + k,
                        pair,
                        flux_in,
                        &mut shard_in,
                        flux_out,
                        &mut shard_out,
                        &mut scratch,
                        &mut stats,
                    )?;
                }
                Ok::<_, FluxError>((shard_in, shard_out, scratch, stats))
            },
        )
        .map(|leaf| leaf.map(|(shard_in, shard_out, _, stats)| (shard_in, shard_out, stats)))
        .try_reduce_with(|(left_in, left_out, mut stats), (right_in, right_out, right_stats)| {
            stats += right_stats;
            Ok((
                TI::join(left_in, right_in)?,
                TO::join(left_out, right_out)?,
                stats,
            ))
        });

    let stats = match joined {
        Some(result) => {
            let (shard_in, shard_out, stats) = result?;
            target_in.merge(shard_in)?;
            target_out.merge(shard_out)?;
            stats
        }
        None => EvaluationStats::default(),
    };

    log::debug!(
        "par_perform_flux ({:?}, {:?}): {} faces in {} chunks of {}, {} deposits",
        TI::KIND,
        TO::KIND,
        stats.faces,
        n_chunks,
        chunk,
        stats.deposits
    );
    Ok(stats)
}
