//! FaceGroup: an immutable batch of mesh faces sharing one interpolation layout.
//!
//! A face group is produced once by the mesh-preparation step and then only
//! read. Every face is a [`FacePair`]: the interior side, which always belongs
//! to an element, and the opposite side, which is either another element or a
//! boundary (the sentinel for "no exterior element").
//!
//! Node addressing follows the element-block layout of the mesh layer: the
//! global DOF of face node `j` on a side is
//! `el_base_index + index_lists[face_index_list][j]`. Index lists are shared
//! between faces, and node `j` of the interior list and node `j` of the
//! exterior list refer to the same physical point on the face.
//!
//! # Invariants
//!
//! - At least one face and at least one index list.
//! - All index lists share one non-zero length, the group's `face_length`.
//! - Every side references an existing index list.
//! - Normals are unit length and vanish beyond `dimensions`.
//! - Face and element jacobians are finite and positive.
//!
//! Construction fails with a configuration error when any of these is
//! violated; evaluation never sees a malformed group.

use crate::debug_invariants::DebugInvariants;
use crate::flux_error::FluxError;
use crate::topology::boundary::BoundaryTag;
use hashbrown::HashMap;

/// Maximum deviation of `|n|` from one accepted for face normals.
pub const NORMAL_TOLERANCE: f64 = 1e-8;

/// Relative difference allowed between the face jacobians of the two sides
/// of an interior face.
pub const FACE_JACOBIAN_TOLERANCE: f64 = 1e-10;

/// One side of a face, seen from the element that owns it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FaceSide {
    /// Element number, used for diagnostics.
    pub element: usize,
    /// Face number within the element.
    pub local_face: usize,
    /// First global DOF of the element (or boundary data block).
    pub el_base_index: usize,
    /// Which shared index list maps face nodes to element-local nodes.
    pub face_index_list: usize,
    /// Outward unit normal of this side; components past `dimensions` are zero.
    pub normal: [f64; 3],
    /// Ratio of physical to reference face measure. Both sides of an interior
    /// face describe the same surface and must agree to within
    /// [`FACE_JACOBIAN_TOLERANCE`].
    pub face_jacobian: f64,
    /// Ratio of physical to reference element volume; used when lifting.
    pub element_jacobian: f64,
}

impl FaceSide {
    /// Element id carried by the mirrored side of a boundary face.
    pub const BOUNDARY_ELEMENT: usize = usize::MAX;

    /// Side with unit jacobians and normal `+x`.
    pub fn new(element: usize, el_base_index: usize, face_index_list: usize) -> Self {
        Self {
            element,
            local_face: 0,
            el_base_index,
            face_index_list,
            normal: [1.0, 0.0, 0.0],
            face_jacobian: 1.0,
            element_jacobian: 1.0,
        }
    }

    pub fn with_local_face(mut self, local_face: usize) -> Self {
        self.local_face = local_face;
        self
    }

    /// Set the outward normal from up to three components.
    pub fn with_normal(mut self, normal: &[f64]) -> Self {
        let mut n = [0.0; 3];
        for (dst, src) in n.iter_mut().zip(normal) {
            *dst = *src;
        }
        self.normal = n;
        self
    }

    pub fn with_face_jacobian(mut self, face_jacobian: f64) -> Self {
        self.face_jacobian = face_jacobian;
        self
    }

    pub fn with_element_jacobian(mut self, element_jacobian: f64) -> Self {
        self.element_jacobian = element_jacobian;
        self
    }

    /// `true` for the synthetic side produced by [`BoundarySide::mirror`].
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.element == Self::BOUNDARY_ELEMENT
    }

    /// Dot product of the normal with `v`.
    #[inline]
    pub fn normal_dot(&self, v: &[f64; 3]) -> f64 {
        self.normal[0] * v[0] + self.normal[1] * v[1] + self.normal[2] * v[2]
    }
}

/// Opposite side of a boundary face: where the boundary data lives.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundarySide {
    pub tag: BoundaryTag,
    /// First global DOF of the boundary data block for this face.
    pub el_base_index: usize,
    /// Index list mapping face nodes into the boundary data block.
    pub face_index_list: usize,
}

impl BoundarySide {
    pub fn new(tag: impl Into<BoundaryTag>, el_base_index: usize, face_index_list: usize) -> Self {
        Self {
            tag: tag.into(),
            el_base_index,
            face_index_list,
        }
    }

    /// Geometry of the exterior as seen from outside the domain.
    ///
    /// The normal is the negated interior normal, jacobians are copied from
    /// the interior side, and DOFs address the boundary data block.
    pub fn mirror(&self, interior: &FaceSide) -> FaceSide {
        FaceSide {
            element: FaceSide::BOUNDARY_ELEMENT,
            local_face: interior.local_face,
            el_base_index: self.el_base_index,
            face_index_list: self.face_index_list,
            normal: interior.normal.map(|c| -c),
            face_jacobian: interior.face_jacobian,
            element_jacobian: interior.element_jacobian,
        }
    }
}

/// What lies across the face from the interior side.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Opposite {
    /// Another element.
    Element(FaceSide),
    /// No exterior element; boundary data instead.
    Boundary(BoundarySide),
}

/// One face of the group.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FacePair {
    pub interior: FaceSide,
    pub opposite: Opposite,
}

impl FacePair {
    #[inline]
    pub fn is_boundary(&self) -> bool {
        matches!(self.opposite, Opposite::Boundary(_))
    }

    pub fn boundary_tag(&self) -> Option<&BoundaryTag> {
        match &self.opposite {
            Opposite::Boundary(b) => Some(&b.tag),
            Opposite::Element(_) => None,
        }
    }

    /// Exterior side; the mirrored boundary side for boundary faces.
    #[inline]
    pub fn exterior(&self) -> FaceSide {
        match &self.opposite {
            Opposite::Element(side) => *side,
            Opposite::Boundary(b) => b.mirror(&self.interior),
        }
    }
}

/// Immutable, validated batch of faces.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawFaceGroup")]
pub struct FaceGroup {
    dimensions: usize,
    face_length: usize,
    index_lists: Vec<Vec<usize>>,
    pairs: Vec<FacePair>,
    #[serde(skip)]
    max_dof: usize,
    #[serde(skip)]
    boundary_faces: HashMap<BoundaryTag, Vec<usize>>,
}

#[derive(serde::Deserialize)]
struct RawFaceGroup {
    dimensions: usize,
    index_lists: Vec<Vec<usize>>,
    pairs: Vec<FacePair>,
}

impl TryFrom<RawFaceGroup> for FaceGroup {
    type Error = FluxError;

    fn try_from(raw: RawFaceGroup) -> Result<Self, Self::Error> {
        FaceGroup::from_parts(raw.dimensions, raw.index_lists, raw.pairs)
    }
}

impl FaceGroup {
    /// Validate and assemble a face group.
    ///
    /// # Errors
    /// A configuration error naming the first offending face or index list.
    pub fn from_parts(
        dimensions: usize,
        index_lists: Vec<Vec<usize>>,
        pairs: Vec<FacePair>,
    ) -> Result<Self, FluxError> {
        let face_length = check_layout(dimensions, &index_lists, &pairs)?;

        let mut max_dof = 0usize;
        let mut boundary_faces: HashMap<BoundaryTag, Vec<usize>> = HashMap::new();
        for (face, pair) in pairs.iter().enumerate() {
            check_side(face, dimensions, &pair.interior)?;
            max_dof = max_dof.max(side_max_dof(
                face,
                &index_lists,
                pair.interior.el_base_index,
                pair.interior.face_index_list,
            )?);
            match &pair.opposite {
                Opposite::Element(ext) => {
                    check_side(face, dimensions, ext)?;
                    check_shared_jacobian(face, &pair.interior, ext)?;
                    max_dof = max_dof.max(side_max_dof(
                        face,
                        &index_lists,
                        ext.el_base_index,
                        ext.face_index_list,
                    )?);
                }
                Opposite::Boundary(b) => {
                    max_dof = max_dof.max(side_max_dof(
                        face,
                        &index_lists,
                        b.el_base_index,
                        b.face_index_list,
                    )?);
                    boundary_faces.entry(b.tag.clone()).or_default().push(face);
                }
            }
        }

        let group = Self {
            dimensions,
            face_length,
            index_lists,
            pairs,
            max_dof,
            boundary_faces,
        };
        log::debug!(
            "face group: {} faces ({} boundary), face_length {}, max DOF {}",
            group.len(),
            group.boundary_face_count(),
            group.face_length,
            group.max_dof
        );
        crate::debug_invariants!(group.validate_invariants(), "FaceGroup::from_parts");
        Ok(group)
    }

    /// Start a builder for a group in `dimensions` space dimensions.
    pub fn builder(dimensions: usize) -> FaceGroupBuilder {
        FaceGroupBuilder::new(dimensions)
    }

    /// Number of faces.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always `false` for a constructed group; kept for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Nodes per face, identical for every face.
    #[inline]
    pub fn face_length(&self) -> usize {
        self.face_length
    }

    #[inline]
    pub fn pairs(&self) -> &[FacePair] {
        &self.pairs
    }

    #[inline]
    pub fn pair(&self, face: usize) -> Option<&FacePair> {
        self.pairs.get(face)
    }

    #[inline]
    pub fn index_lists(&self) -> &[Vec<usize>] {
        &self.index_lists
    }

    #[inline]
    pub fn index_list(&self, n: usize) -> Option<&[usize]> {
        self.index_lists.get(n).map(Vec::as_slice)
    }

    /// Largest global DOF referenced by any side of any face.
    #[inline]
    pub fn max_dof(&self) -> usize {
        self.max_dof
    }

    pub fn boundary_face_count(&self) -> usize {
        self.boundary_faces.values().map(Vec::len).sum()
    }

    pub fn interior_face_count(&self) -> usize {
        self.len() - self.boundary_face_count()
    }

    /// Distinct boundary tags, sorted.
    pub fn boundary_tags(&self) -> Vec<&BoundaryTag> {
        let mut tags: Vec<_> = self.boundary_faces.keys().collect();
        tags.sort_unstable();
        tags
    }

    /// Face numbers carrying `tag`, ascending.
    pub fn boundary_faces(&self, tag: &BoundaryTag) -> &[usize] {
        self.boundary_faces
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Global DOFs of the face nodes of a side, written into `out`.
    #[inline]
    pub(crate) fn side_dofs(&self, el_base_index: usize, face_index_list: usize, out: &mut Vec<usize>) {
        out.clear();
        out.extend(
            self.index_lists[face_index_list]
                .iter()
                .map(|&local| el_base_index + local),
        );
    }
}

impl DebugInvariants for FaceGroup {
    fn validate_invariants(&self) -> Result<(), FluxError> {
        let face_length = check_layout(self.dimensions, &self.index_lists, &self.pairs)?;
        if face_length != self.face_length {
            return Err(FluxError::InconsistentFaceLength {
                list: 0,
                expected: self.face_length,
                found: face_length,
            });
        }
        let mut tagged = 0usize;
        for (face, pair) in self.pairs.iter().enumerate() {
            check_side(face, self.dimensions, &pair.interior)?;
            match &pair.opposite {
                Opposite::Element(ext) => {
                    check_side(face, self.dimensions, ext)?;
                    check_shared_jacobian(face, &pair.interior, ext)?;
                }
                Opposite::Boundary(b) => {
                    if !self.boundary_faces(&b.tag).contains(&face) {
                        return Err(FluxError::InvalidGeometry(format!(
                            "boundary face {face} missing from tag index `{}`",
                            b.tag
                        )));
                    }
                    tagged += 1;
                }
            }
        }
        if tagged != self.boundary_face_count() {
            return Err(FluxError::InvalidGeometry(format!(
                "tag index lists {} faces, group has {tagged} boundary faces",
                self.boundary_face_count()
            )));
        }
        Ok(())
    }
}

fn check_layout(
    dimensions: usize,
    index_lists: &[Vec<usize>],
    pairs: &[FacePair],
) -> Result<usize, FluxError> {
    if !(1..=3).contains(&dimensions) {
        return Err(FluxError::InvalidGeometry(format!(
            "dimensions must be 1, 2 or 3, got {dimensions}"
        )));
    }
    if pairs.is_empty() {
        return Err(FluxError::EmptyFaceGroup);
    }
    let first = index_lists.first().ok_or(FluxError::EmptyIndexLists)?;
    let face_length = first.len();
    if face_length == 0 {
        return Err(FluxError::InvalidGeometry(
            "index list 0 has no nodes".to_string(),
        ));
    }
    for (list, nodes) in index_lists.iter().enumerate().skip(1) {
        if nodes.len() != face_length {
            return Err(FluxError::InconsistentFaceLength {
                list,
                expected: face_length,
                found: nodes.len(),
            });
        }
    }
    Ok(face_length)
}

fn check_side(face: usize, dimensions: usize, side: &FaceSide) -> Result<(), FluxError> {
    if side.normal[dimensions..].iter().any(|&c| c != 0.0) {
        return Err(FluxError::InvalidGeometry(format!(
            "face {face} (element {}): normal {:?} has components beyond dimension {dimensions}",
            side.element, side.normal
        )));
    }
    let norm = side.normal.iter().map(|c| c * c).sum::<f64>().sqrt();
    if !norm.is_finite() || (norm - 1.0).abs() > NORMAL_TOLERANCE {
        return Err(FluxError::InvalidGeometry(format!(
            "face {face} (element {}): normal {:?} is not unit length",
            side.element, side.normal
        )));
    }
    for (name, value) in [
        ("face jacobian", side.face_jacobian),
        ("element jacobian", side.element_jacobian),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(FluxError::InvalidGeometry(format!(
                "face {face} (element {}): {name} {value} must be finite and positive",
                side.element
            )));
        }
    }
    Ok(())
}

fn check_shared_jacobian(
    face: usize,
    interior: &FaceSide,
    exterior: &FaceSide,
) -> Result<(), FluxError> {
    let (a, b) = (interior.face_jacobian, exterior.face_jacobian);
    if (a - b).abs() > FACE_JACOBIAN_TOLERANCE * a.max(b) {
        return Err(FluxError::InvalidGeometry(format!(
            "face {face}: face jacobians {a} (element {}) and {b} (element {}) differ",
            interior.element, exterior.element
        )));
    }
    Ok(())
}

fn side_max_dof(
    face: usize,
    index_lists: &[Vec<usize>],
    el_base_index: usize,
    face_index_list: usize,
) -> Result<usize, FluxError> {
    let nodes = index_lists
        .get(face_index_list)
        .ok_or(FluxError::MissingIndexList {
            face,
            list: face_index_list,
            available: index_lists.len(),
        })?;
    let local_max = nodes.iter().copied().max().unwrap_or(0);
    el_base_index.checked_add(local_max).ok_or_else(|| {
        FluxError::InvalidGeometry(format!(
            "face {face}: base index {el_base_index} + node {local_max} overflows"
        ))
    })
}

/// Incremental construction of a [`FaceGroup`].
///
/// Nothing is validated until [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct FaceGroupBuilder {
    dimensions: usize,
    index_lists: Vec<Vec<usize>>,
    pairs: Vec<FacePair>,
}

impl FaceGroupBuilder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            index_lists: Vec::new(),
            pairs: Vec::new(),
        }
    }

    /// Register a shared index list and return its number.
    pub fn index_list(&mut self, nodes: Vec<usize>) -> usize {
        self.index_lists.push(nodes);
        self.index_lists.len() - 1
    }

    /// Add a face between two elements. Returns the face number.
    pub fn interior_face(&mut self, interior: FaceSide, exterior: FaceSide) -> usize {
        self.pairs.push(FacePair {
            interior,
            opposite: Opposite::Element(exterior),
        });
        self.pairs.len() - 1
    }

    /// Add a face on the domain boundary. Returns the face number.
    pub fn boundary_face(&mut self, interior: FaceSide, boundary: BoundarySide) -> usize {
        self.pairs.push(FacePair {
            interior,
            opposite: Opposite::Boundary(boundary),
        });
        self.pairs.len() - 1
    }

    pub fn reserve_faces(&mut self, additional: usize) -> &mut Self {
        self.pairs.reserve(additional);
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<FaceGroup, FluxError> {
        FaceGroup::from_parts(self.dimensions, self.index_lists, self.pairs)
    }
}
