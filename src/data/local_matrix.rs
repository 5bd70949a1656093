//! Dense face-local matrices (face mass or lift matrices).
//!
//! One `LocalMatrix` is shared read-only by every face in a group. Storage is
//! row-major, matching the element matrices produced by the assembly helpers
//! of the mesh layer this crate is used with.

use crate::debug_invariants::DebugInvariants;
use crate::flux_error::FluxError;

/// Dense `rows x cols` matrix in row-major order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawLocalMatrix")]
pub struct LocalMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[derive(serde::Deserialize)]
struct RawLocalMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<RawLocalMatrix> for LocalMatrix {
    type Error = FluxError;

    fn try_from(raw: RawLocalMatrix) -> Result<Self, Self::Error> {
        LocalMatrix::from_row_major(raw.rows, raw.cols, raw.data)
    }
}

impl LocalMatrix {
    /// Wrap row-major storage.
    ///
    /// # Errors
    /// `InvalidMatrix` if `data.len() != rows * cols`, if either dimension is
    /// zero, or if any entry is not finite.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, FluxError> {
        let m = Self { rows, cols, data };
        m.validate_invariants()?;
        Ok(m)
    }

    /// Build from nested rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, FluxError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(FluxError::InvalidMatrix(format!(
                    "row {i} has {} entries, expected {n_cols}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Self::from_row_major(n_rows, n_cols, data)
    }

    /// `n x n` identity.
    pub fn identity(n: usize) -> Result<Self, FluxError> {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self::from_row_major(n, n, data)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry `(i, j)`. Panics when out of bounds, like slice indexing.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    /// Row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Ensure the matrix is `n x n`.
    pub fn require_square(&self, n: usize) -> Result<(), FluxError> {
        if self.rows != n || self.cols != n {
            return Err(FluxError::MatrixShapeMismatch {
                rows: self.rows,
                cols: self.cols,
                face_length: n,
            });
        }
        Ok(())
    }
}

impl DebugInvariants for LocalMatrix {
    fn validate_invariants(&self) -> Result<(), FluxError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(FluxError::InvalidMatrix(format!(
                "degenerate shape {}x{}",
                self.rows, self.cols
            )));
        }
        if self.data.len() != self.rows * self.cols {
            return Err(FluxError::InvalidMatrix(format!(
                "{} entries for shape {}x{}",
                self.data.len(),
                self.rows,
                self.cols
            )));
        }
        if let Some(pos) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(FluxError::InvalidMatrix(format!(
                "non-finite entry at ({}, {})",
                pos / self.cols,
                pos % self.cols
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_entries() {
        let m = LocalMatrix::identity(3).unwrap();
        assert_eq!(m.get(1, 1), 1.0);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.row(2), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            LocalMatrix::from_row_major(2, 2, vec![1.0; 3]),
            Err(FluxError::InvalidMatrix(_))
        ));
        assert!(LocalMatrix::identity(0).is_err());
        assert!(LocalMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(LocalMatrix::from_row_major(1, 1, vec![f64::NAN]).is_err());
    }

    #[test]
    fn require_square_reports_face_length() {
        let m = LocalMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(
            m.require_square(2),
            Err(FluxError::MatrixShapeMismatch {
                rows: 2,
                cols: 3,
                face_length: 2
            })
        );
    }

    #[test]
    fn deserialize_validates() {
        let bad = r#"{"rows":2,"cols":2,"data":[1.0]}"#;
        assert!(serde_json::from_str::<LocalMatrix>(bad).is_err());
        let good = r#"{"rows":1,"cols":2,"data":[0.5,0.5]}"#;
        let m: LocalMatrix = serde_json::from_str(good).unwrap();
        assert_eq!(m.cols(), 2);
    }
}
