mod util;
use dg_flux::prelude::*;
use util::*;

#[test]
fn constant_flux_vector_null_accumulates_per_incident_face() {
    let group = two_face_group();
    let mass = LocalMatrix::identity(2).unwrap();
    let flux = ConstantFlux::new(1.0, 0.0);
    let operand = [1.0; 4];
    let mut dest = [0.0; 4];
    let mut target = VectorTarget::new(&operand, &mut dest).unwrap();

    let stats = perform_flux(&group, &mass, &flux, &mut target, &flux, &mut NullTarget).unwrap();

    assert_eq!(dest, [2.0, 2.0, 0.0, 0.0]);
    assert_eq!(stats.faces, 2);
    assert_eq!(stats.flux_evaluations, 8);
    assert_eq!(stats.deposits, 2 * 2 * 8);
}

#[test]
fn null_vector_writes_only_exterior_dofs() {
    let group = two_face_group();
    let mass = LocalMatrix::identity(2).unwrap();
    let flux = ConstantFlux::new(1.0, 0.0);
    let operand = [1.0; 4];
    let mut dest = [0.0; 4];
    let mut target = VectorTarget::new(&operand, &mut dest).unwrap();

    perform_flux(&group, &mass, &flux, &mut NullTarget, &flux, &mut target).unwrap();

    assert_eq!(dest, [0.0, 0.0, 2.0, 2.0]);
}

#[test]
fn vector_targets_superpose_onto_existing_values() {
    let group = two_face_group();
    let mass = LocalMatrix::identity(2).unwrap();
    let flux = ConstantFlux::new(1.0, 0.0);
    let operand = [1.0; 4];
    let mut dest = [10.0, 20.0, 30.0, 40.0];
    let mut target = VectorTarget::new(&operand, &mut dest).unwrap();

    perform_flux(&group, &mass, &flux, &mut target, &flux, &mut NullTarget).unwrap();

    assert_eq!(dest, [12.0, 22.0, 30.0, 40.0]);
}

#[test]
fn neighbor_coefficient_couples_across_the_face() {
    // Node 0 of the reversed list is element node 1, so both faces pull the
    // matching exterior node into each interior row.
    let group = two_face_group();
    let mass = LocalMatrix::identity(2).unwrap();
    let flux = ConstantFlux::new(0.0, 1.0);
    let operand = [0.0, 0.0, 5.0, 7.0];
    let mut dest = [0.0; 4];
    let mut target = VectorTarget::new(&operand, &mut dest).unwrap();

    perform_flux(&group, &mass, &flux, &mut target, &flux, &mut NullTarget).unwrap();

    assert_eq!(dest, [10.0, 14.0, 0.0, 0.0]);
}

#[test]
fn dense_local_matrix_mixes_face_nodes() {
    let group = two_face_group();
    let mass = LocalMatrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
    let flux = ConstantFlux::new(1.0, 0.0);
    let operand = [1.0, 3.0, 0.0, 0.0];
    let mut dest = [0.0; 4];
    let mut target = VectorTarget::new(&operand, &mut dest).unwrap();

    perform_flux(&group, &mass, &flux, &mut target, &flux, &mut NullTarget).unwrap();

    // Face 0: rows (0, 1) = M (1, 3) = (5, 7). Face 1 walks (1, 0): rows
    // (1, 0) = M (3, 1) = (7, 5).
    assert_eq!(dest, [10.0, 14.0, 0.0, 0.0]);
}
