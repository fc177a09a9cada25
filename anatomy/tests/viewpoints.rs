//! Every tour stop and muscle caption must be on screen where it is used

use anatomy::arm::build_arm;
use anatomy::tour::default_stops;
use anatomy::{ArmAction, ArmMotion, ArmTuning, Destination, Muscle, Tour, TourTuning};
use common::camera::{Camera3D, CameraPose};
use common::picking::{Picker, Viewport};
use glam::Vec3;

fn on_screen(picker: &Picker, world: Vec3) -> bool {
    picker
        .project(world)
        .is_some_and(|p| p.x >= 0.0 && p.y >= 0.0 && p.x <= picker.viewport.width && p.y <= picker.viewport.height)
}

#[test]
fn labels_are_visible_from_home_and_centered_on_arrival() {
    let tuning = TourTuning::default();
    let mut tour = Tour::new(default_stops(), &tuning);
    let mut camera = Camera3D::new(16.0 / 9.0);
    camera.set_pose(tuning.home());
    let viewport = Viewport::from_size(1280, 720);

    for stop in tour.stops() {
        assert!(on_screen(&Picker::new(&camera, viewport), stop.anchor), "{}", stop.label);
    }

    for index in 0..tour.stops().len() {
        assert!(tour.request(Destination::Stop(index)));
        while !tour.update(&mut camera, 0.05) {}

        let anchor = tour.stops()[index].anchor;
        let screen = Picker::new(&camera, viewport).project(anchor).unwrap();
        assert!((screen.x - 640.0).abs() < 1.0 && (screen.y - 360.0).abs() < 1.0);

        assert!(tour.request(Destination::Home));
        while !tour.update(&mut camera, 0.05) {}
    }
}

#[test]
fn muscle_captions_stay_in_view_while_folding() {
    let mut arm = ArmMotion::new(build_arm(), ArmTuning::default());
    let mut camera = Camera3D::new(16.0 / 9.0);
    camera.set_pose(CameraPose::new(Vec3::new(0.05, 0.25, 0.9), Vec3::new(0.2, 0.05, 0.0)));
    let picker = Picker::new(&camera, Viewport::from_size(1280, 720));

    for action in [ArmAction::Extend, ArmAction::Fold] {
        arm.set_action(action);
        for _ in 0..120 {
            arm.update(1.0 / 60.0);
            for muscle in Muscle::ALL {
                assert!(on_screen(&picker, arm.label_position(muscle)));
            }
        }
    }
}
