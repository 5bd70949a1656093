#![cfg(feature = "rayon")]
mod util;
use dg_flux::prelude::*;
use proptest::prelude::*;
use util::*;

fn serial_and_parallel(seed: u64, shape: GroupShape, chunk: usize) {
    let Generated { group, dofs } = random_group(seed, shape);
    let mass = random_matrix(seed, shape.face_length);
    let operand = random_vector(seed, dofs);
    let flux_in = UpwindFlux::new(&[1.0, -0.5]);
    let flux_out = BoundaryPolicy::new(UpwindFlux::new(&[1.0, -0.5]))
        .with_condition("wall", BoundaryCondition::Reflect);
    let opts = FluxOptions::default().with_chunk_size(chunk);

    let mut want_a = vec![0.0; dofs];
    let mut want_b = vec![0.0; dofs];
    let want_stats = perform_flux_detailed(
        &group,
        &mass,
        &flux_in,
        &mut VectorTarget::new(&operand, &mut want_a).unwrap(),
        &flux_out,
        &mut VectorTarget::new(&operand, &mut want_b).unwrap(),
        &opts,
    )
    .unwrap();

    let mut got_a = vec![0.0; dofs];
    let mut got_b = vec![0.0; dofs];
    let got_stats = par_perform_flux_detailed(
        &group,
        &mass,
        &flux_in,
        &mut VectorTarget::new(&operand, &mut got_a).unwrap(),
        &flux_out,
        &mut VectorTarget::new(&operand, &mut got_b).unwrap(),
        &opts,
    )
    .unwrap();

    assert_eq!(got_stats, want_stats);
    assert_close(&got_a, &want_a, 1e-12);
    assert_close(&got_b, &want_b, 1e-12);

    let mut serial_in = CoordMatrix::new(dofs, dofs);
    let mut serial_out = CoordMatrix::new(dofs, dofs);
    perform_flux_detailed(
        &group,
        &mass,
        &flux_in,
        &mut CoordMatrixTarget::new(&mut serial_in),
        &flux_out,
        &mut CoordMatrixTarget::new(&mut serial_out),
        &opts,
    )
    .unwrap();
    let mut par_in = CoordMatrix::new(dofs, dofs);
    let mut par_out = CoordMatrix::new(dofs, dofs);
    par_perform_flux_detailed(
        &group,
        &mass,
        &flux_in,
        &mut CoordMatrixTarget::new(&mut par_in),
        &flux_out,
        &mut CoordMatrixTarget::new(&mut par_out),
        &opts,
    )
    .unwrap();
    assert_eq!(par_in, serial_in);
    assert_eq!(par_out, serial_out);
}

#[test]
fn parallel_matches_serial_on_a_mixed_group() {
    let shape = GroupShape {
        faces: 200,
        elements: 40,
        boundary_every: 5,
        ..GroupShape::default()
    };
    serial_and_parallel(99, shape, 16);
}

#[test]
fn parallel_null_targets_count_the_same_work() {
    let Generated { group, .. } = random_group(4, GroupShape::default());
    let mass = random_matrix(4, group.face_length());
    let flux = CentralFlux::new(&[0.0, 1.0]);
    let serial = perform_flux(&group, &mass, &flux, &mut NullTarget, &flux, &mut NullTarget)
        .unwrap();
    let parallel =
        par_perform_flux(&group, &mass, &flux, &mut NullTarget, &flux, &mut NullTarget).unwrap();
    assert_eq!(serial, parallel);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn parallel_matches_serial_random(
        seed in any::<u64>(),
        faces in 1usize..64,
        chunk in 1usize..9,
        boundary_every in 0usize..4,
    ) {
        let shape = GroupShape {
            faces,
            boundary_every,
            ..GroupShape::default()
        };
        serial_and_parallel(seed, shape, chunk);
    }
}
