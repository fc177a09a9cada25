//! End-to-end runs of the candle experiment

use candle_lab::layout::{build_bench, LEFT_BEAKER};
use candle_lab::{CandleExperiment, CandleTuning, Part};
use common::camera::{Camera3D, CameraPose};
use common::interaction::{PointerOutcome, Step};
use common::picking::{project, Picker, Viewport};
use glam::{Vec2, Vec3};

fn drag(exp: &mut CandleExperiment, part: Part, delta: Vec2) {
    let start = Vec2::new(500.0, 400.0);
    exp.pointer_down(start, |p| p == part);
    exp.pointer_move(start + delta);
    exp.pointer_up();
}

fn run_to_terminal(exp: &mut CandleExperiment) {
    drag(exp, Part::LeftBeaker, Vec2::new(0.0, -24.0));
    drag(exp, Part::RightBeaker, Vec2::new(0.0, -24.0));
    drag(exp, Part::Oxygen, Vec2::new(-30.0, 0.0));
    exp.pointer_down(Vec2::ZERO, |p| p == Part::LeftCandle);
    drag(exp, Part::LeftBeaker, Vec2::new(0.0, 300.0));
    drag(exp, Part::RightBeaker, Vec2::new(0.0, 300.0));
}

#[test]
fn lifting_left_beaker_from_rest_advances_step() {
    let mut graph = build_bench();
    let beaker = graph.find_by_name(LEFT_BEAKER).unwrap();
    graph.node_mut(beaker).unwrap().transform.translation.y = 0.0;

    let mut exp = CandleExperiment::new(graph, CandleTuning::default());
    let first_prompt = exp.prompt();
    assert_eq!(exp.position(Part::LeftBeaker), Some(0.0));

    // 162 px upward at 120 px per unit is 1.35
    drag(&mut exp, Part::LeftBeaker, Vec2::new(0.0, -162.0));

    assert!((exp.position(Part::LeftBeaker).unwrap() - 1.35).abs() < 1e-4);
    assert_eq!(exp.step(), Step(2));
    assert_ne!(exp.prompt(), first_prompt);
}

#[test]
fn lowering_right_beaker_starts_delayed_fade() {
    let mut exp = CandleExperiment::new(build_bench(), CandleTuning::default());
    drag(&mut exp, Part::LeftBeaker, Vec2::new(0.0, -24.0));
    drag(&mut exp, Part::RightBeaker, Vec2::new(0.0, -24.0));
    drag(&mut exp, Part::Oxygen, Vec2::new(-30.0, 0.0));
    exp.pointer_down(Vec2::ZERO, |p| p == Part::RightCandle);
    drag(&mut exp, Part::LeftBeaker, Vec2::new(0.0, 300.0));
    assert_eq!(exp.step(), Step(6));

    // Lower the right beaker to its floor plus 0.05
    let start = Vec2::new(500.0, 400.0);
    let from = exp.position(Part::RightBeaker).unwrap();
    let target = 1.16 + 0.05;
    exp.pointer_down(start, |p| p == Part::RightBeaker);
    exp.pointer_move(start + Vec2::new(0.0, (from - target) * 120.0));
    exp.pointer_up();

    assert_eq!(exp.step(), Step(7));
    assert!(exp.flames_lit());

    // Nothing fades during the first second
    for _ in 0..9 {
        exp.update(0.1);
    }
    assert_eq!(exp.left_flame_opacity(), 1.0);

    let mut completions = 0;
    let mut last = exp.left_flame_opacity();
    for _ in 0..80 {
        let was_complete = exp.is_complete();
        exp.update(0.1);
        let now = exp.left_flame_opacity();
        assert!(now <= last);
        last = now;
        if exp.is_complete() && !was_complete {
            completions += 1;
        }
    }

    assert_eq!(exp.left_flame_opacity(), 0.0);
    assert_eq!(completions, 1);
    assert!(exp.is_complete());
    assert_eq!(exp.prompt(), candle_lab::experiment::COMPLETION_PROMPT);
}

#[test]
fn terminal_step_ignores_pointer() {
    let mut exp = CandleExperiment::new(build_bench(), CandleTuning::default());
    run_to_terminal(&mut exp);
    assert_eq!(exp.step(), Step(7));

    let before = exp.position(Part::LeftBeaker);
    assert_eq!(exp.pointer_down(Vec2::ZERO, |_| true), PointerOutcome::Locked);
    exp.pointer_move(Vec2::new(0.0, -500.0));
    assert!(!exp.is_dragging());
    assert_eq!(exp.position(Part::LeftBeaker), before);
}

#[test]
fn picking_finds_the_left_beaker_on_screen() {
    let exp = CandleExperiment::new(build_bench(), CandleTuning::default());
    let mut camera = Camera3D::new(1.0);
    camera.set_pose(CameraPose::new(Vec3::new(0.0, 1.4, 3.4), Vec3::new(0.0, 0.6, 0.0)));
    let viewport = Viewport::from_size(900, 900);
    let picker = Picker::new(&camera, viewport);

    let shapes = exp.shapes(Part::LeftBeaker);
    let common::picking::Shape::Aabb { min, max } = shapes[0] else {
        panic!("beaker should be a box");
    };
    let screen = project(&camera, &viewport, (min + max) * 0.5).unwrap();
    assert!(picker.hits(screen, &shapes));
    assert!(!picker.hits(Vec2::new(5.0, 5.0), &shapes));
}
