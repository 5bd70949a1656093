//! Per-worker target shards for parallel evaluation.
//!
//! A shard owns private storage so workers never share a mutable
//! destination. Shards covering neighboring face ranges are joined left to
//! right, and the single surviving shard is merged into the caller's target,
//! which keeps results deterministic.

use super::{CoordMatrixTarget, FluxTarget, NullTarget, TargetKind, VectorTarget};
use crate::data::coord_matrix::CoordMatrix;
use crate::flux_error::FluxError;

/// A target that can be split into independent worker-private shards.
pub trait ShardTarget: FluxTarget + Sync {
    type Shard: FluxTarget + Send;

    /// Fresh, empty shard compatible with this target.
    fn shard(&self) -> Self::Shard;

    /// Fold a shard's contributions back into this target.
    fn merge(&mut self, shard: Self::Shard) -> Result<(), FluxError>;

    /// Combine two shards; `right` covers faces after those of `left`.
    fn join(left: Self::Shard, right: Self::Shard) -> Result<Self::Shard, FluxError>;
}

impl ShardTarget for NullTarget {
    type Shard = NullTarget;

    fn shard(&self) -> NullTarget {
        NullTarget
    }

    fn merge(&mut self, _shard: NullTarget) -> Result<(), FluxError> {
        Ok(())
    }

    fn join(_left: NullTarget, _right: NullTarget) -> Result<NullTarget, FluxError> {
        Ok(NullTarget)
    }
}

/// Private result buffer sharing the read-only operand.
#[derive(Debug)]
pub struct VectorShard<'a> {
    operand: &'a [f64],
    result: Vec<f64>,
}

impl FluxTarget for VectorShard<'_> {
    const KIND: TargetKind = TargetKind::Vector;

    #[inline]
    fn extent(&self) -> Option<(usize, usize)> {
        Some((self.result.len(), self.operand.len()))
    }

    #[inline(always)]
    fn add_coefficient(&mut self, row: usize, col: usize, value: f64) {
        self.result[row] += value * self.operand[col];
    }
}

impl<'a> ShardTarget for VectorTarget<'a> {
    type Shard = VectorShard<'a>;

    fn shard(&self) -> VectorShard<'a> {
        VectorShard {
            operand: self.operand(),
            result: vec![0.0; self.len()],
        }
    }

    fn merge(&mut self, shard: VectorShard<'a>) -> Result<(), FluxError> {
        if shard.result.len() != self.len() {
            return Err(FluxError::OperandLengthMismatch {
                operand: shard.result.len(),
                result: self.len(),
            });
        }
        self.accumulate(&shard.result);
        Ok(())
    }

    fn join(mut left: VectorShard<'a>, right: VectorShard<'a>) -> Result<VectorShard<'a>, FluxError> {
        if left.result.len() != right.result.len() {
            return Err(FluxError::OperandLengthMismatch {
                operand: right.result.len(),
                result: left.result.len(),
            });
        }
        for (dst, src) in left.result.iter_mut().zip(&right.result) {
            *dst += *src;
        }
        Ok(left)
    }
}

/// Private coordinate entry list.
#[derive(Debug)]
pub struct CoordShard {
    matrix: CoordMatrix,
}

impl FluxTarget for CoordShard {
    const KIND: TargetKind = TargetKind::CoordMatrix;

    #[inline]
    fn extent(&self) -> Option<(usize, usize)> {
        Some((self.matrix.rows(), self.matrix.cols()))
    }

    #[inline(always)]
    fn add_coefficient(&mut self, row: usize, col: usize, value: f64) {
        self.matrix.push(row, col, value);
    }

    fn reserve(&mut self, additional: usize) {
        self.matrix.reserve(additional);
    }
}

impl ShardTarget for CoordMatrixTarget<'_> {
    type Shard = CoordShard;

    fn shard(&self) -> CoordShard {
        CoordShard {
            matrix: CoordMatrix::new(self.matrix().rows(), self.matrix().cols()),
        }
    }

    fn merge(&mut self, shard: CoordShard) -> Result<(), FluxError> {
        self.matrix_mut().extend_from(shard.matrix)
    }

    fn join(mut left: CoordShard, right: CoordShard) -> Result<CoordShard, FluxError> {
        left.matrix.extend_from(right.matrix)?;
        Ok(left)
    }
}
