use super::{FluxTarget, TargetKind};
use crate::data::coord_matrix::CoordMatrix;

/// Materializes the flux operator as coordinate-format entries.
///
/// Every coefficient becomes one `(row, col, value)` entry in the borrowed
/// [`CoordMatrix`]. Duplicate coordinates are kept; sum them afterwards with
/// [`CoordMatrix::sum_duplicates`].
#[derive(Debug)]
pub struct CoordMatrixTarget<'a> {
    matrix: &'a mut CoordMatrix,
}

impl<'a> CoordMatrixTarget<'a> {
    pub fn new(matrix: &'a mut CoordMatrix) -> Self {
        Self { matrix }
    }

    #[inline]
    pub fn matrix(&self) -> &CoordMatrix {
        &*self.matrix
    }

    #[cfg(feature = "rayon")]
    pub(crate) fn matrix_mut(&mut self) -> &mut CoordMatrix {
        &mut *self.matrix
    }
}

impl FluxTarget for CoordMatrixTarget<'_> {
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
