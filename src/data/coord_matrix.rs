//! Coordinate-format (COO) sparse matrix storage.
//!
//! Entries are `(row, col, value)` triples appended in evaluation order.
//! Duplicate coordinates are legal and mean "sum these"; the flux kernel never
//! merges them, summation is deferred to [`CoordMatrix::sum_duplicates`] or
//! applied implicitly by [`CoordMatrix::matvec`].

use crate::debug_invariants::DebugInvariants;
use crate::flux_error::FluxError;
use itertools::Itertools;

/// One `(row, col, value)` entry.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CoordEntry {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

/// Growable list of sparse entries with a declared shape.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawCoordMatrix")]
pub struct CoordMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<CoordEntry>,
}

#[derive(serde::Deserialize)]
struct RawCoordMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<CoordEntry>,
}

impl TryFrom<RawCoordMatrix> for CoordMatrix {
    type Error = FluxError;

    fn try_from(raw: RawCoordMatrix) -> Result<Self, Self::Error> {
        let m = CoordMatrix {
            rows: raw.rows,
            cols: raw.cols,
            entries: raw.entries,
        };
        m.validate_invariants()?;
        Ok(m)
    }
}

impl CoordMatrix {
    /// Empty matrix of the given shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entries: Vec::new(),
        }
    }

    /// Empty matrix with room for `cap` entries.
    pub fn with_capacity(rows: usize, cols: usize, cap: usize) -> Self {
        Self {
            rows,
            cols,
            entries: Vec::with_capacity(cap),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[CoordEntry] {
        &self.entries
    }

    /// Append an entry. Bounds are the caller's responsibility; the flux
    /// evaluator checks them once per group before appending.
    #[inline]
    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows && col < self.cols);
        self.entries.push(CoordEntry { row, col, value });
    }

    /// Append every entry of `other`, keeping order.
    ///
    /// Used to concatenate per-worker entry lists.
    ///
    /// # Errors
    /// `InvalidMatrix` if the shapes differ.
    pub fn extend_from(&mut self, other: CoordMatrix) -> Result<(), FluxError> {
        if other.rows != self.rows || other.cols != self.cols {
            return Err(FluxError::InvalidMatrix(format!(
                "cannot concatenate {}x{} entries into {}x{}",
                other.rows, other.cols, self.rows, self.cols
            )));
        }
        self.entries.extend(other.entries);
        crate::debug_invariants!(self.validate_invariants(), "CoordMatrix::extend_from");
        Ok(())
    }

    /// Reserve room for `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    /// Remove all entries, keeping shape and capacity.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sorted copy with duplicate coordinates summed.
    ///
    /// Entries are ordered by `(row, col)`.
    pub fn sum_duplicates(&self) -> CoordMatrix {
        let entries = self
            .entries
            .iter()
            .copied()
            .sorted_by_key(|e| (e.row, e.col))
            .coalesce(|a, b| {
                if a.row == b.row && a.col == b.col {
                    Ok(CoordEntry {
                        row: a.row,
                        col: a.col,
                        value: a.value + b.value,
                    })
                } else {
                    Err((a, b))
                }
            })
            .collect();
        CoordMatrix {
            rows: self.rows,
            cols: self.cols,
            entries,
        }
    }

    /// `y = A x`, summing duplicates implicitly.
    ///
    /// # Errors
    /// `OperandLengthMismatch` if `x.len() != cols`.
    pub fn matvec(&self, x: &[f64]) -> Result<Vec<f64>, FluxError> {
        if x.len() != self.cols {
            return Err(FluxError::OperandLengthMismatch {
                operand: x.len(),
                result: self.cols,
            });
        }
        let mut y = vec![0.0; self.rows];
        for e in &self.entries {
            y[e.row] += e.value * x[e.col];
        }
        Ok(y)
    }

    /// Dense row-major copy. Intended for tests and small diagnostics.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.rows * self.cols];
        for e in &self.entries {
            dense[e.row * self.cols + e.col] += e.value;
        }
        dense
    }
}

impl DebugInvariants for CoordMatrix {
    fn validate_invariants(&self) -> Result<(), FluxError> {
        for (k, e) in self.entries.iter().enumerate() {
            if e.row >= self.rows || e.col >= self.cols {
                return Err(FluxError::InvalidMatrix(format!(
                    "entry {k} at ({}, {}) outside {}x{}",
                    e.row, e.col, self.rows, self.cols
                )));
            }
        }
        Ok(())
    }
}
