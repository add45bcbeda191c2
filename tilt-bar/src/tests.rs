use crate::*;
use approx::{assert_abs_diff_eq, assert_relative_eq};
use std::f64::consts::{FRAC_PI_2, TAU};

#[test]
fn neutral_pose() {
    let fb = Linkage::example();
    let angles = fb.angles(FRAC_PI_2).unwrap();
    // cosine law by hand on the level pose
    let d1_2: f64 = 35. * 35. + 32.5 * 32.5;
    assert_abs_diff_eq!(d1_2.sqrt(), 47.7624, epsilon = 1e-3);
    let beta = ((d1_2 - 2. * 35. * 35.) / (-2. * 35. * 35.)).acos();
    assert_abs_diff_eq!(angles.beta, beta, epsilon = 1e-12);
    // the driver-coupler triangle reproduces the diagonal
    let d1_rt = 35. * 35. + 35. * 35. - 2. * 35. * 35. * angles.beta.cos();
    assert_relative_eq!(d1_rt, d1_2, max_relative = 1e-9);
    // interior angles close the quadrilateral
    let Angles { alpha, beta, gamma } = angles;
    assert_relative_eq!(alpha + beta + gamma + FRAC_PI_2, TAU, max_relative = 1e-9);
}

#[test]
fn open_loop_is_infeasible() {
    // the coupler-driver triangle cannot reach across the diagonal
    let fb = Linkage::new(100., 1., 1., 32.5);
    assert_eq!(fb.angles(65_f64.to_radians()), None);
    assert_eq!(fb.advantage(65_f64.to_radians()), None);
}

#[test]
fn solver_is_deterministic() {
    let fb = Linkage::example();
    let theta = 1.2;
    let a = fb.angles(theta).unwrap();
    let b = fb.angles(theta).unwrap();
    assert_eq!(a.alpha.to_bits(), b.alpha.to_bits());
    assert_eq!(a.beta.to_bits(), b.beta.to_bits());
    assert_eq!(a.gamma.to_bits(), b.gamma.to_bits());
}

#[test]
fn mirrored_linkage_swaps_alpha_gamma() {
    // swapping driver with coupler and follower with frame mirrors the
    // loop, so the end angles trade places
    let theta = 80_f64.to_radians();
    let a = Linkage::new(30., 40., 45., 35.).angles(theta).unwrap();
    let b = Linkage::new(40., 30., 35., 45.).angles(theta).unwrap();
    assert_abs_diff_eq!(a.alpha, b.gamma, epsilon = 1e-12);
    assert_abs_diff_eq!(a.gamma, b.alpha, epsilon = 1e-12);
    assert_abs_diff_eq!(a.beta, b.beta, epsilon = 1e-12);
}

#[test]
fn worst_case_binds() {
    let fb = Linkage::example();
    let span = AngleSpan::from_plate_tilt(25_f64.to_radians(), 3);
    let adv = fb.min_advantage(span.iter());
    assert!(adv.is_finite());
    for t in span.iter() {
        assert!(fb.advantage(t).unwrap() >= adv);
    }
    // one open sample poisons the whole sweep
    let nan = Linkage::new(100., 1., 1., 32.5).min_advantage(span.iter());
    assert!(nan.is_nan());
}

#[test]
fn classification() {
    assert_eq!(Linkage::example().ty(), LinkageTy::DoubleCrank);
    assert!(Linkage::example().ty().is_grashof());
    assert!(Linkage::example().is_valid());
    assert_eq!(LinkageTy::DoubleCrank.name(), "Grashof double crank");
    assert_eq!(LinkageTy::from_loop([100., 1., 1., 32.5]), LinkageTy::Invalid);
    assert!(!Linkage::new(100., 1., 1., 32.5).is_valid());
    assert_eq!(LinkageTy::from_loop([10., 35., 30., 32.]), LinkageTy::CrankRocker);
    assert_eq!(LinkageTy::from_loop([30., 31., 32., 33.]), LinkageTy::TripleRocker);
}

#[test]
fn sampling_includes_endpoints() {
    let span = AngleSpan::from_plate_tilt(25_f64.to_radians(), 3).values();
    assert_eq!(span.len(), 3);
    assert_abs_diff_eq!(span[0], 65_f64.to_radians(), epsilon = 1e-12);
    assert_abs_diff_eq!(span[1], 90_f64.to_radians(), epsilon = 1e-12);
    assert_abs_diff_eq!(span[2], 115_f64.to_radians(), epsilon = 1e-12);
    let range = LinkRange::new(30., 50., 20).values();
    assert_eq!(range.len(), 20);
    assert_abs_diff_eq!(range[0], 30.);
    assert_abs_diff_eq!(range[19], 50., epsilon = 1e-12);
    assert_eq!(LinkRange::fixed(35.).values(), vec![35.]);
}

#[test]
fn default_sweep() {
    let field = AdvantageField::make(&SweepCfg::default()).unwrap();
    assert_eq!(field.len(), 8000);
    let adv = field.advantage();
    // the wide follower range reaches open loops as well as closed ones
    assert!(adv.iter().any(|a| a.is_nan()));
    assert!(adv.iter().any(|a| a.is_finite()));
    let best = field.optimum().unwrap();
    for &a in adv.iter() {
        if a.is_finite() {
            assert!(best.advantage >= a);
        }
    }
}

#[test]
fn degenerate_sweep_has_no_solution() {
    let cfg = SweepCfg::default()
        .driver(LinkRange::fixed(100.))
        .coupler(LinkRange::fixed(1.))
        .follower(LinkRange::fixed(1.))
        .frame(32.5);
    let field = AdvantageField::make(&cfg).unwrap();
    assert!(field.advantage().iter().all(|a| a.is_nan()));
    assert_eq!(field.optimum(), None);
}

#[test]
fn malformed_cfg_fails_fast() {
    let cfg = SweepCfg::default().driver(LinkRange::new(0., 50., 5));
    assert_eq!(AdvantageField::make(&cfg).unwrap_err(), CfgError::Length("driver"));
    let cfg = SweepCfg::default().coupler(LinkRange::new(50., 30., 5));
    assert_eq!(cfg.validate().unwrap_err(), CfgError::Reversed("coupler"));
    let cfg = SweepCfg::default().follower(LinkRange::new(30., 50., 0));
    assert_eq!(cfg.validate().unwrap_err(), CfgError::Empty("follower"));
    let cfg = SweepCfg::default().frame(-1.);
    assert_eq!(cfg.validate().unwrap_err(), CfgError::Length("frame"));
    let cfg = SweepCfg::default().theta(AngleSpan::new(1., 2., 0));
    assert_eq!(cfg.validate().unwrap_err(), CfgError::Empty("theta"));
    let cfg = SweepCfg::default().theta(AngleSpan::new(f64::NAN, 2., 3));
    assert_eq!(cfg.validate().unwrap_err(), CfgError::Angle);
}

#[test]
fn full_range_search() {
    let cfg = SweepCfg::default()
        .driver(LinkRange::new(30., 100., 30))
        .coupler(LinkRange::new(30., 100., 30))
        .follower(LinkRange::new(30., 100., 30))
        .frame(35.)
        .theta(AngleSpan::new(65_f64.to_radians(), 115_f64.to_radians(), 30));
    let field = AdvantageField::make(&cfg).unwrap();
    assert_eq!(field.len(), 27000);
    // lengths between 45 and 55 form well-behaved quadrilaterals with
    // the 35 frame over the whole sweep
    let adv = field.advantage();
    for i in 7..=10 {
        for j in 7..=10 {
            for k in 7..=10 {
                assert!(adv[[i, j, k]].is_finite());
            }
        }
    }
    let best = field.optimum().unwrap();
    assert_eq!(best.linkage, field.linkage_at(best.index));
    for &a in adv.iter() {
        if a.is_finite() {
            assert!(best.advantage >= a);
        }
    }
}

#[test]
#[cfg(feature = "npy")]
fn npz_roundtrip() {
    let cfg = SweepCfg::default()
        .driver(LinkRange::new(45., 55., 4))
        .coupler(LinkRange::new(45., 55., 4))
        .follower(LinkRange::new(45., 55., 4));
    let field = AdvantageField::make(&cfg).unwrap();
    assert!(field.advantage().iter().all(|a| a.is_finite()));
    let mut buf = Vec::new();
    field.write(std::io::Cursor::new(&mut buf)).unwrap();
    let read = AdvantageField::read(std::io::Cursor::new(buf)).unwrap();
    assert_eq!(read, field);
}

#[test]
#[cfg(feature = "csv")]
fn csv_dump() {
    let cfg = SweepCfg::default()
        .driver(LinkRange::fixed(35.))
        .coupler(LinkRange::fixed(35.))
        .follower(LinkRange::fixed(35.));
    let field = AdvantageField::make(&cfg).unwrap();
    let s = crate::csv::dump_csv(field.entries()).unwrap();
    assert_eq!(s.lines().count(), 1);
    assert!(s.starts_with("35.0,35.0,35.0,"));
}
