//! Face-group topology: which element sides meet at each face and how their
//! nodes map to global DOFs.
//!
//! A [`FaceGroup`] is built once by mesh preparation and only read by the
//! flux kernel. Faces without an exterior element carry a
//! [`BoundarySide`] naming the boundary condition through a [`BoundaryTag`].

pub mod boundary;
pub mod face_group;

pub use boundary::BoundaryTag;
pub use face_group::{BoundarySide, FaceGroup, FaceGroupBuilder, FacePair, FaceSide, Opposite};
