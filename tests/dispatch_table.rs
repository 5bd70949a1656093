mod util;
use dg_flux::prelude::*;
use util::*;

#[test]
fn vector_with_coord_matrix_is_rejected_untouched() {
    let group = two_face_group();
    let mass = LocalMatrix::identity(2).unwrap();
    let flux = ConstantFlux::new(1.0, 1.0);
    let operand = [1.0; 4];
    let mut dest = [0.5; 4];
    let mut coo = CoordMatrix::new(4, 4);

    let err = {
        let mut target_in = AnyTarget::from(VectorTarget::new(&operand, &mut dest).unwrap());
        let mut target_out = AnyTarget::from(CoordMatrixTarget::new(&mut coo));
        perform_flux_dyn(
            &group,
            &mass,
            &flux,
            &mut target_in,
            &flux,
            &mut target_out,
            &FluxOptions::default(),
        )
        .unwrap_err()
    };

    assert_eq!(err.class(), ErrorClass::ContractViolation);
    assert_eq!(
        err,
        FluxError::UnsupportedTargetPair {
            interior: TargetKind::Vector,
            exterior: TargetKind::CoordMatrix,
        }
    );
    assert_eq!(dest, [0.5; 4]);
    assert!(coo.is_empty());
}

#[test]
fn every_unsupported_kind_pair_is_rejected() {
    let group = two_face_group();
    let mass = LocalMatrix::identity(2).unwrap();
    let flux = ConstantFlux::new(1.0, 0.0);
    let operand = [1.0; 4];
    let kinds = [TargetKind::Null, TargetKind::Vector, TargetKind::CoordMatrix];

    for a in kinds {
        for b in kinds {
            let mut dest_a = [0.0; 4];
            let mut dest_b = [0.0; 4];
            let mut coo_a = CoordMatrix::new(4, 4);
            let mut coo_b = CoordMatrix::new(4, 4);
            let mut ta = match a {
                TargetKind::Null => AnyTarget::from(NullTarget),
                TargetKind::Vector => VectorTarget::new(&operand, &mut dest_a).unwrap().into(),
                TargetKind::CoordMatrix => CoordMatrixTarget::new(&mut coo_a).into(),
            };
            let mut tb = match b {
                TargetKind::Null => AnyTarget::from(NullTarget),
                TargetKind::Vector => VectorTarget::new(&operand, &mut dest_b).unwrap().into(),
                TargetKind::CoordMatrix => CoordMatrixTarget::new(&mut coo_b).into(),
            };
            assert_eq!((ta.kind(), tb.kind()), (a, b));
            let res = perform_flux_dyn(
                &group,
                &mass,
                &flux,
                &mut ta,
                &flux,
                &mut tb,
                &FluxOptions::default(),
            );
            let supported = SUPPORTED_TARGET_PAIRS.contains(&(a, b));
            assert_eq!(res.is_ok(), supported, "pair ({a:?}, {b:?})");
        }
    }
}

#[test]
fn dispatch_matches_generic_kernel() {
    let Generated { group, dofs } = random_group(17, GroupShape::default());
    let mass = random_matrix(17, group.face_length());
    let flux = UpwindFlux::new(&[1.0, 2.0]);
    let operand = random_vector(17, dofs);
    let opts = FluxOptions::default().with_mode(FluxMode::Lift);

    let mut want = vec![0.0; dofs];
    perform_flux_detailed(
        &group,
        &mass,
        &flux,
        &mut NullTarget,
        &flux,
        &mut VectorTarget::new(&operand, &mut want).unwrap(),
        &opts,
    )
    .unwrap();

    let mut got = vec![0.0; dofs];
    perform_flux_dyn(
        &group,
        &mass,
        &flux,
        &mut AnyTarget::Null(NullTarget),
        &flux,
        &mut AnyTarget::Vector(VectorTarget::new(&operand, &mut got).unwrap()),
        &opts,
    )
    .unwrap();

    assert_eq!(got, want);
}
