//! Switching between the three demonstrations

use glam::Vec3;
use optics_lab::{LensKind, Mode, OpticsBench, OpticsTuning, Surface};

#[test]
fn each_mode_has_its_own_optics() {
    let mut bench = OpticsBench::new(OpticsTuning::default());

    bench.set_mode(Mode::Direct);
    assert!(bench.surfaces().is_empty());
    assert_eq!(bench.rays().len(), 1);

    bench.set_mode(Mode::Reflection);
    assert!(matches!(bench.surfaces().as_slice(), [Surface::Mirror { .. }]));

    bench.set_mode(Mode::Refraction);
    assert!(matches!(bench.surfaces().as_slice(), [Surface::ThinLens { .. }]));
    assert_eq!(bench.rays().len(), 3);
}

#[test]
fn lens_swap_changes_where_rays_go() {
    let mut bench = OpticsBench::new(OpticsTuning::default());
    bench.set_mode(Mode::Refraction);

    let ends = |bench: &OpticsBench| -> Vec<Vec3> {
        bench.rays().iter().filter_map(|path| path.last().copied()).collect()
    };

    let convex = ends(&bench);
    // Upper ray crosses below the axis after the focus, lower crosses above
    assert!(convex[1].y < 0.0);
    assert!(convex[2].y > 0.0);
    assert!(convex[0].y.abs() < 1e-4);

    assert!(bench.set_lens(LensKind::Concave));
    let concave = ends(&bench);
    assert!(concave[1].y > 0.5);
    assert!(concave[2].y < -0.5);
}

#[test]
fn lens_choice_survives_mode_changes() {
    let mut bench = OpticsBench::new(OpticsTuning::default());
    bench.set_mode(Mode::Refraction);
    bench.set_lens(LensKind::Concave);
    bench.set_mode(Mode::Reflection);
    assert!(!bench.set_lens(LensKind::Convex));
    bench.set_mode(Mode::Refraction);
    assert_eq!(bench.lens(), LensKind::Concave);
}
