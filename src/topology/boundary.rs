//! Boundary tags: names attached to faces without an exterior element.
//!
//! Tags play the role of boundary labels in the mesh layer ("inflow",
//! "wall", ...). A flux class decides per tag whether the exterior side of a
//! boundary face receives contributions (see
//! [`FluxClass::boundary_exterior`](crate::flux::FluxClass::boundary_exterior)).

use std::fmt;

/// Name of a boundary condition region.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BoundaryTag(String);

impl BoundaryTag {
    /// Tag applied when the mesh layer did not classify a boundary face.
    pub const NONE: &'static str = "none";

    pub fn new(name: impl Into<String>) -> Self {
        BoundaryTag(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BoundaryTag {
    fn default() -> Self {
        BoundaryTag::new(Self::NONE)
    }
}

impl fmt::Debug for BoundaryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoundaryTag").field(&self.0).finish()
    }
}

impl fmt::Display for BoundaryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BoundaryTag {
    fn from(s: &str) -> Self {
        BoundaryTag::new(s)
    }
}

impl From<String> for BoundaryTag {
    fn from(s: String) -> Self {
        BoundaryTag(s)
    }
}
