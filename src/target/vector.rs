use super::{FluxTarget, TargetKind};
use crate::flux_error::FluxError;

/// Applies the flux operator to `operand`, accumulating into `result`.
///
/// `add_coefficient(row, col, v)` performs `result[row] += v * operand[col]`.
/// Contributions are superposed; nothing is ever overwritten, so several
/// face groups can be evaluated into the same result in sequence.
#[derive(Debug)]
pub struct VectorTarget<'a> {
    operand: &'a [f64],
    result: &'a mut [f64],
}

impl<'a> VectorTarget<'a> {
    /// Borrow an operand and a result buffer of equal length.
    ///
    /// # Errors
    /// `OperandLengthMismatch` if the lengths differ.
    pub fn new(operand: &'a [f64], result: &'a mut [f64]) -> Result<Self, FluxError> {
        if operand.len() != result.len() {
            return Err(FluxError::OperandLengthMismatch {
                operand: operand.len(),
                result: result.len(),
            });
        }
        Ok(Self { operand, result })
    }

    #[inline]
    pub fn operand(&self) -> &'a [f64] {
        self.operand
    }

    #[inline]
    pub fn result(&self) -> &[f64] {
        &*self.result
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.result.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    /// Add `other` into the result element-wise.
    #[cfg(feature = "rayon")]
    pub(crate) fn accumulate(&mut self, other: &[f64]) {
        debug_assert_eq!(other.len(), self.result.len());
        for (dst, src) in self.result.iter_mut().zip(other) {
            *dst += *src;
        }
    }
}

impl FluxTarget for VectorTarget<'_> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_instead_of_overwriting() {
        let operand = [2.0, 3.0];
        let mut result = [1.0, 0.0];
        let mut t = VectorTarget::new(&operand, &mut result).unwrap();
        t.add_coefficient(0, 1, 0.5);
        t.add_coefficient(0, 0, 1.0);
        t.add_coefficient(1, 0, -1.0);
        assert_eq!(t.result(), &[1.0 + 1.5 + 2.0, -2.0]);
        assert_eq!(t.extent(), Some((2, 2)));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let operand = [1.0; 3];
        let mut result = [0.0; 2];
        assert_eq!(
            VectorTarget::new(&operand, &mut result).unwrap_err(),
            FluxError::OperandLengthMismatch {
                operand: 3,
                result: 2
            }
        );
    }
}
