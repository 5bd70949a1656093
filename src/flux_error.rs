//! FluxError: Unified error type for dg-flux public APIs
//!
//! Every fallible operation in the crate returns this type. Variants fall into
//! three classes (see [`ErrorClass`]); callers that only care about retry policy
//! can match on [`FluxError::class`] instead of individual variants.

use crate::target::TargetKind;
use thiserror::Error;

/// Coarse classification used by callers to decide abort/retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Caller broke a precondition of the call (shapes, indices, target pairing).
    ContractViolation,
    /// A flux class failed while the group was being evaluated.
    ComputationFailure,
    /// A face group or matrix was malformed at construction time.
    ConfigurationFailure,
}

/// Unified error type for dg-flux operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FluxError {
    /// The local matrix does not match the face length of the group.
    #[error("local matrix is {rows}x{cols}, face group expects {face_length}x{face_length}")]
    MatrixShapeMismatch {
        rows: usize,
        cols: usize,
        face_length: usize,
    },
    /// The requested (interior, exterior) target pairing is not one of the supported five.
    #[error("unsupported target pair ({interior:?}, {exterior:?})")]
    UnsupportedTargetPair {
        interior: TargetKind,
        exterior: TargetKind,
    },
    /// A face group references a DOF outside a target's destination storage.
    #[error("{side} target: DOF {dof} out of range for extent {rows}x{cols}")]
    DofOutOfRange {
        side: &'static str,
        dof: usize,
        rows: usize,
        cols: usize,
    },
    /// Operand and result of a vector target disagree in length.
    #[error("vector target operand has length {operand}, result has length {result}")]
    OperandLengthMismatch { operand: usize, result: usize },

    /// The flux class reported a failure.
    #[error("flux evaluation failed at face {face}, node {node} (element {element}): {reason}")]
    FluxEvaluation {
        face: usize,
        node: usize,
        element: usize,
        reason: String,
    },
    /// The flux class produced NaN or infinity.
    #[error("non-finite flux coefficient at face {face}, node {node} (element {element})")]
    NonFiniteCoefficient {
        face: usize,
        node: usize,
        element: usize,
    },

    /// A face group must contain at least one face.
    #[error("face group contains no faces")]
    EmptyFaceGroup,
    /// A face group must contain at least one index list.
    #[error("face group contains no face index lists")]
    EmptyIndexLists,
    /// Index lists disagree on the number of face nodes.
    #[error("index list {list} has {found} nodes, expected {expected}")]
    InconsistentFaceLength {
        list: usize,
        expected: usize,
        found: usize,
    },
    /// A face side names an index list that does not exist.
    #[error("face {face} references index list {list}, group has {available}")]
    MissingIndexList {
        face: usize,
        list: usize,
        available: usize,
    },
    /// Normal, jacobian, or dimension data is unusable.
    #[error("invalid face geometry: {0}")]
    InvalidGeometry(String),
    /// Matrix storage does not match its declared shape.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),
}

impl FluxError {
    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            FluxError::MatrixShapeMismatch { .. }
            | FluxError::UnsupportedTargetPair { .. }
            | FluxError::DofOutOfRange { .. }
            | FluxError::OperandLengthMismatch { .. } => ErrorClass::ContractViolation,
            FluxError::FluxEvaluation { .. } | FluxError::NonFiniteCoefficient { .. } => {
                ErrorClass::ComputationFailure
            }
            FluxError::EmptyFaceGroup
            | FluxError::EmptyIndexLists
            | FluxError::InconsistentFaceLength { .. }
            | FluxError::MissingIndexList { .. }
            | FluxError::InvalidGeometry(_)
            | FluxError::InvalidMatrix(_) => ErrorClass::ConfigurationFailure,
        }
    }

    /// Build a computation failure from inside a flux class.
    ///
    /// Face, node, and element are filled in by the evaluator; flux classes
    /// only supply the reason.
    pub fn flux(reason: impl Into<String>) -> Self {
        FluxError::FluxEvaluation {
            face: usize::MAX,
            node: usize::MAX,
            element: usize::MAX,
            reason: reason.into(),
        }
    }

    pub(crate) fn at_face(self, face: usize, node: usize, element: usize) -> Self {
        match self {
            FluxError::FluxEvaluation { reason, .. } => FluxError::FluxEvaluation {
                face,
                node,
                element,
                reason,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_cover_taxonomy() {
        let e = FluxError::UnsupportedTargetPair {
            interior: TargetKind::Vector,
            exterior: TargetKind::CoordMatrix,
        };
        assert_eq!(e.class(), ErrorClass::ContractViolation);
        assert_eq!(FluxError::flux("x").class(), ErrorClass::ComputationFailure);
        assert_eq!(FluxError::EmptyFaceGroup.class(), ErrorClass::ConfigurationFailure);
    }

    #[test]
    fn at_face_fills_context() {
        let e = FluxError::flux("sqrt of negative").at_face(3, 1, 17);
        assert_eq!(
            e.to_string(),
            "flux evaluation failed at face 3, node 1 (element 17): sqrt of negative"
        );
        // Other variants pass through untouched.
        assert_eq!(FluxError::EmptyFaceGroup.at_face(1, 2, 3), FluxError::EmptyFaceGroup);
    }
}
