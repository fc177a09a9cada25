//! A click resolved through the camera grabs a handle, the drag finishes the
//! experiment, and the terminal delay-then-fade plays out.

use common::interaction::{
    Axis, Bounds, DraggableHandle, Gesture, PointerOutcome, ScreenAxis, Step, StepMachine, Threshold,
};
use common::{Camera3D, CameraPose, FadeEffect, Picker, Shape, TimerEvent, Timeline, Viewport};
use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Part {
    Lid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Timer {
    PreFade,
    Flame,
}

fn camera() -> Camera3D {
    let mut camera = Camera3D::new(1280.0 / 720.0);
    camera.set_pose(CameraPose::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO));
    camera
}

#[test]
fn pointer_resolves_through_camera() {
    let camera = camera();
    let picker = Picker::new(&camera, Viewport::from_size(1280, 720));
    let lid = [Shape::aabb(Vec3::ZERO, Vec3::splat(0.5))];

    let center = picker.project(Vec3::ZERO).expect("origin is in front of the camera");
    assert!((center - Vec2::new(640.0, 360.0)).length() < 1.0);
    assert!(picker.hits(center, &lid));
    assert!(!picker.hits(Vec2::new(10.0, 10.0), &lid));
}

#[test]
fn drag_to_terminal_then_fade() {
    let camera = camera();
    let picker = Picker::new(&camera, Viewport::from_size(1280, 720));
    let lid = [Shape::aabb(Vec3::ZERO, Vec3::splat(0.5))];

    let mut machine = StepMachine::new(vec![Gesture::Drag {
        handle: Part::Lid,
        screen_axis: ScreenAxis::Vertical,
        sensitivity: 100.0,
        bounds: Bounds::Fixed { min: -1.0, max: 2.0 },
        until: Threshold::AtLeast(1.0),
    }]);
    machine.insert_handle(Part::Lid, DraggableHandle::new(Axis::Y, 0.0));

    let grab = Vec2::new(640.0, 360.0);
    assert_eq!(
        machine.pointer_down(grab, |_| picker.hits(grab, &lid)),
        PointerOutcome::Grabbed(Part::Lid)
    );
    machine.pointer_move(grab - Vec2::new(0.0, 150.0));
    assert_eq!(machine.step(), Step(2));
    assert!(machine.is_terminal());
    assert_eq!(machine.pointer_down(grab, |_| true), PointerOutcome::Locked);

    let mut timeline = Timeline::new();
    timeline.start_delay(Timer::PreFade, 1.0);

    let dt = 1.0 / 60.0;
    let mut elapsed = 0.0;
    let mut flame = 1.0;
    let mut finished_at = None;
    for _ in 0..600 {
        elapsed += dt;
        for event in timeline.advance(dt) {
            match event {
                TimerEvent::DelayElapsed(Timer::PreFade) => {
                    assert!((elapsed - 1.0_f32).abs() < 0.05);
                    timeline.start_fade(Timer::Flame, FadeEffect::new(1.0, 0.02, 0.1));
                }
                TimerEvent::FadeValue(Timer::Flame, value) => {
                    assert!(value <= flame);
                    flame = value;
                }
                TimerEvent::FadeCompleted(Timer::Flame) => finished_at = Some(elapsed),
                other => panic!("unexpected {:?}", other),
            }
        }
        if finished_at.is_some() {
            break;
        }
    }

    let finished_at = finished_at.expect("fade never completed");
    assert_eq!(flame, 0.0);
    assert!((finished_at - 6.0).abs() < 0.1, "finished at {}", finished_at);
    assert!(timeline.is_empty());
}
