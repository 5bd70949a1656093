#![allow(dead_code)]
use dg_flux::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Two faces of two nodes each, both between element 0 (DOFs 0..2) and
/// element 1 (DOFs 2..4). The second face walks the nodes in reverse.
pub fn two_face_group() -> FaceGroup {
    let mut b = FaceGroup::builder(1);
    let fwd = b.index_list(vec![0, 1]);
    let rev = b.index_list(vec![1, 0]);
    b.interior_face(
        FaceSide::new(0, 0, fwd).with_normal(&[1.0]),
        FaceSide::new(1, 2, fwd).with_normal(&[-1.0]),
    );
    b.interior_face(
        FaceSide::new(0, 0, rev).with_normal(&[1.0]).with_local_face(1),
        FaceSide::new(1, 2, rev).with_normal(&[-1.0]).with_local_face(1),
    );
    b.build().unwrap()
}

/// Shape of a generated group.
#[derive(Clone, Copy, Debug)]
pub struct GroupShape {
    pub dimensions: usize,
    pub face_length: usize,
    pub elements: usize,
    pub faces: usize,
    /// Every `boundary_every`-th face is a boundary face; 0 for none.
    pub boundary_every: usize,
}

impl Default for GroupShape {
    fn default() -> Self {
        Self {
            dimensions: 2,
            face_length: 3,
            elements: 6,
            faces: 12,
            boundary_every: 0,
        }
    }
}

pub struct Generated {
    pub group: FaceGroup,
    /// Total DOFs, element blocks followed by one boundary block per boundary face.
    pub dofs: usize,
}

fn unit_normal(rng: &mut SmallRng, dimensions: usize) -> Vec<f64> {
    loop {
        let v: Vec<f64> = (0..dimensions).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let norm = v.iter().map(|c| c * c).sum::<f64>().sqrt();
        if norm > 0.1 {
            return v.iter().map(|c| c / norm).collect();
        }
    }
}

/// Random but valid face group. Both sides of an interior face share the
/// face jacobian and carry opposite normals.
pub fn random_group(seed: u64, shape: GroupShape) -> Generated {
    let mut rng = SmallRng::seed_from_u64(seed);
    let n = shape.face_length;
    let mut b = FaceGroup::builder(shape.dimensions);

    let identity: Vec<usize> = (0..n).collect();
    let mut reversed = identity.clone();
    reversed.reverse();
    let lists = [b.index_list(identity), b.index_list(reversed)];

    let mut next_boundary_block = shape.elements * n;
    for face in 0..shape.faces {
        let e1 = rng.gen_range(0..shape.elements);
        let mut e2 = rng.gen_range(0..shape.elements);
        if shape.elements > 1 {
            while e2 == e1 {
                e2 = rng.gen_range(0..shape.elements);
            }
        }
        let list = lists[rng.gen_range(0..lists.len())];
        let normal = unit_normal(&mut rng, shape.dimensions);
        let flipped: Vec<f64> = normal.iter().map(|c| -c).collect();
        let face_jac = rng.gen_range(0.5..2.0);

        let interior = FaceSide::new(e1, e1 * n, list)
            .with_normal(&normal)
            .with_face_jacobian(face_jac)
            .with_element_jacobian(rng.gen_range(0.5..2.0));

        if shape.boundary_every > 0 && face % shape.boundary_every == 0 {
            let tag = if face % 2 == 0 { "wall" } else { "inflow" };
            b.boundary_face(interior, BoundarySide::new(tag, next_boundary_block, lists[0]));
            next_boundary_block += n;
        } else {
            let exterior = FaceSide::new(e2, e2 * n, list)
                .with_normal(&flipped)
                .with_face_jacobian(face_jac)
                .with_element_jacobian(rng.gen_range(0.5..2.0));
            b.interior_face(interior, exterior);
        }
    }

    Generated {
        group: b.build().unwrap(),
        dofs: next_boundary_block,
    }
}

/// Dense random `n x n` matrix with entries in `[-1, 1)`.
pub fn random_matrix(seed: u64, n: usize) -> LocalMatrix {
    let mut rng = SmallRng::seed_from_u64(seed ^ 0x5eed);
    let data = (0..n * n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    LocalMatrix::from_row_major(n, n, data).unwrap()
}

pub fn random_vector(seed: u64, len: usize) -> Vec<f64> {
    let mut rng = SmallRng::seed_from_u64(seed ^ 0xfeed);
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// `|a - b| <= tol * max(1, |a|, |b|)` elementwise.
pub fn assert_close(got: &[f64], want: &[f64], tol: f64) {
    assert_eq!(got.len(), want.len(), "length mismatch");
    for (i, (a, b)) in got.iter().zip(want).enumerate() {
        let scale = 1.0f64.max(a.abs()).max(b.abs());
        assert!(
            (a - b).abs() <= tol * scale,
            "entry {i}: got {a}, want {b}\n got={got:?}\nwant={want:?}"
        );
    }
}
