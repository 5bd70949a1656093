//! Plain-data matrices consumed and produced by the flux kernel.

pub mod coord_matrix;
pub mod local_matrix;

pub use crate::debug_invariants::DebugInvariants;
pub use coord_matrix::{CoordEntry, CoordMatrix};
pub use local_matrix::LocalMatrix;
