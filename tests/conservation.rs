mod util;
use dg_flux::prelude::*;
use proptest::prelude::*;
use util::*;

/// Interior deposits plus exterior deposits, summed over all DOFs.
fn net_flux<F: FluxClass>(seed: u64, shape: GroupShape, flux: &F) -> (f64, f64) {
    let Generated { group, dofs } = random_group(seed, shape);
    let mass = random_matrix(seed, shape.face_length);
    let operand = random_vector(seed, dofs);
    let mut dest_a = vec![0.0; dofs];
    let mut dest_b = vec![0.0; dofs];
    perform_flux(
        &group,
        &mass,
        flux,
        &mut VectorTarget::new(&operand, &mut dest_a).unwrap(),
        flux,
        &mut VectorTarget::new(&operand, &mut dest_b).unwrap(),
    )
    .unwrap();
    let a: f64 = dest_a.iter().sum();
    let b: f64 = dest_b.iter().sum();
    let scale = dest_a.iter().chain(&dest_b).map(|v| v.abs()).sum::<f64>();
    (a + b, scale.max(1.0))
}

#[test]
fn central_flux_is_conservative() {
    let shape = GroupShape::default();
    let (net, scale) = net_flux(7, shape, &CentralFlux::new(&[1.0, -0.5]));
    assert!(net.abs() <= 1e-12 * scale, "net flux {net}");
}

#[test]
fn upwind_flux_is_conservative_in_3d() {
    let shape = GroupShape {
        dimensions: 3,
        face_length: 4,
        ..GroupShape::default()
    };
    let (net, scale) = net_flux(11, shape, &UpwindFlux::new(&[0.3, 1.0, -2.0]));
    assert!(net.abs() <= 1e-12 * scale, "net flux {net}");
}

#[test]
fn one_sided_flux_is_not_conservative() {
    // Sanity check of the measure itself.
    let shape = GroupShape::default();
    let (net, _) = net_flux(3, shape, &ConstantFlux::new(1.0, 0.0));
    assert!(net.abs() > 1e-6);
}

#[test]
fn extrapolated_boundary_conserves_with_its_mirror() {
    let mut b = FaceGroup::builder(1);
    let l = b.index_list(vec![0]);
    b.boundary_face(
        FaceSide::new(0, 0, l).with_normal(&[1.0]),
        BoundarySide::new("outflow", 1, l),
    );
    let group = b.build().unwrap();
    let mass = LocalMatrix::identity(1).unwrap();
    let flux = BoundaryPolicy::new(CentralFlux::new(&[2.0]))
        .with_condition("outflow", BoundaryCondition::Extrapolate);

    let operand = [3.0, 100.0];
    let mut dest_in = [0.0; 2];
    let mut dest_out = [0.0; 2];
    perform_flux(
        &group,
        &mass,
        &flux,
        &mut VectorTarget::new(&operand, &mut dest_in).unwrap(),
        &flux,
        &mut VectorTarget::new(&operand, &mut dest_out).unwrap(),
    )
    .unwrap();

    // Outflow carries (a.n) u_int out of the domain; the boundary data at
    // DOF 1 is never read.
    assert_eq!(dest_in, [6.0, 0.0]);
    assert_eq!(dest_out, [0.0, -6.0]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn lax_friedrichs_is_conservative(
        seed in any::<u64>(),
        dimensions in 1usize..=3,
        face_length in 1usize..5,
        ax in -2.0f64..2.0,
        ay in -2.0f64..2.0,
    ) {
        let shape = GroupShape {
            dimensions,
            face_length,
            elements: 5,
            faces: 9,
            boundary_every: 0,
        };
        let flux = LaxFriedrichsFlux::new(&[ax, ay, 0.0][..dimensions]);
        let (net, scale) = net_flux(seed, shape, &flux);
        prop_assert!(net.abs() <= 1e-11 * scale, "net flux {}", net);
    }
}
