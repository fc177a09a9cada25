//! The candle combustion experiment
//!
//! Six gestures lead to the observation step: lift both beakers, push the
//! oxygen supply against the right beaker, light the candles, then lower
//! both beakers again. One second after the last beaker is down, the flame
//! starved of oxygen fades out.

use common::animation::{FadeEffect, Timeline, TimerEvent};
use common::interaction::{
    Axis, Bounds, DragUpdate, DraggableHandle, Gesture, PointerOutcome, ScreenAxis, Step, StepChange, StepMachine,
    Threshold,
};
use common::picking::Shape;
use common::renderer::FrameBuilder;
use common::scene_graph::SceneGraph;
use glam::{Vec2, Vec3};
use serde::Deserialize;

use crate::layout::{prepare_bench, BenchNodes, Part};

/// Tuning values; every field can be overridden from a JSON config
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CandleTuning {
    /// Pixels per unit of beaker travel
    pub beaker_sensitivity: f32,
    /// Pixels per unit of oxygen-supply travel
    pub oxygen_sensitivity: f32,
    pub lift_min: f32,
    pub lift_max: f32,
    pub lift_threshold: f32,
    pub oxygen_min: f32,
    pub oxygen_max: f32,
    pub oxygen_start_x: f32,
    pub oxygen_threshold: f32,
    pub left_beaker_min: f32,
    pub right_beaker_min: f32,
    /// How close to its floor a lowered beaker must come
    pub lowering_margin: f32,
    pub fade_delay: f32,
    pub fade_step: f32,
    pub fade_interval: f32,
}

impl Default for CandleTuning {
    fn default() -> Self {
        Self {
            beaker_sensitivity: 120.0,
            oxygen_sensitivity: 100.0,
            lift_min: -2.0,
            lift_max: 1.5,
            lift_threshold: 1.3,
            oxygen_min: 0.0,
            oxygen_max: 1.5,
            oxygen_start_x: 0.3,
            oxygen_threshold: 0.1,
            left_beaker_min: 1.22,
            right_beaker_min: 1.16,
            lowering_margin: 0.1,
            fade_delay: 1.0,
            fade_step: 0.02,
            fade_interval: 0.1,
        }
    }
}

impl CandleTuning {
    pub fn gestures(&self) -> Vec<Gesture<Part>> {
        let lift = |handle| Gesture::Drag {
            handle,
            screen_axis: ScreenAxis::Vertical,
            sensitivity: self.beaker_sensitivity,
            bounds: Bounds::Fixed {
                min: self.lift_min,
                max: self.lift_max,
            },
            until: Threshold::AtLeast(self.lift_threshold),
        };
        let lower = |handle, min: f32| Gesture::Drag {
            handle,
            screen_axis: ScreenAxis::Vertical,
            sensitivity: self.beaker_sensitivity,
            bounds: Bounds::Lowering { min },
            until: Threshold::AtMost(min + self.lowering_margin),
        };

        vec![
            lift(Part::LeftBeaker),
            lift(Part::RightBeaker),
            Gesture::Drag {
                handle: Part::Oxygen,
                screen_axis: ScreenAxis::Horizontal,
                sensitivity: self.oxygen_sensitivity,
                bounds: Bounds::Fixed {
                    min: self.oxygen_min,
                    max: self.oxygen_max,
                },
                until: Threshold::AtMost(self.oxygen_threshold),
            },
            Gesture::Click {
                targets: vec![Part::LeftCandle, Part::RightCandle],
            },
            lower(Part::LeftBeaker, self.left_beaker_min),
            lower(Part::RightBeaker, self.right_beaker_min),
        ]
    }
}

pub const PROMPTS: [&str; 7] = [
    "Drag the left beaker upward.",
    "Good! Now drag the right beaker upward.",
    "Great! Drag the oxygen supply to the left until it touches the right beaker.",
    "Oxygen is flowing. Click a candle to light it.",
    "The candles are lit! Now lower the left beaker again.",
    "Now lower the right beaker as well.",
    "Watch closely... the flame in the left beaker is slowly going out.",
];

pub const COMPLETION_PROMPT: &str = "Experiment complete! Burning needs oxygen.";

/// Step at which the candles are lit
const LIT_STEP: Step = Step(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandleTimer {
    /// Wait between the last beaker landing and the fade
    PreFade,
    LeftFlameFade,
}

pub struct CandleExperiment {
    tuning: CandleTuning,
    graph: SceneGraph,
    nodes: BenchNodes,
    machine: StepMachine<Part>,
    timers: Timeline<CandleTimer>,
    flames_lit: bool,
    left_flame_opacity: f32,
    completed: bool,
    prompt: &'static str,
}

impl CandleExperiment {
    /// Take ownership of a raw bench asset and prepare it
    pub fn new(mut graph: SceneGraph, tuning: CandleTuning) -> Self {
        let nodes = prepare_bench(&mut graph, tuning.oxygen_start_x);
        let mut machine = StepMachine::new(tuning.gestures());

        let translation = |part: Part| {
            nodes
                .get(part)
                .and_then(|id| graph.node(id))
                .map(|node| node.transform.translation)
        };

        for (part, axis) in [
            (Part::LeftBeaker, Axis::Y),
            (Part::RightBeaker, Axis::Y),
            (Part::Oxygen, Axis::X),
        ] {
            if let Some(at) = translation(part) {
                machine.insert_handle(part, DraggableHandle::new(axis, axis_value(at, axis)));
            }
        }
        for (ring, beaker) in [(Part::LeftRing, Part::LeftBeaker), (Part::RightRing, Part::RightBeaker)] {
            if let Some(at) = translation(ring) {
                machine.attach_dependent(ring, beaker, at.y);
            }
        }

        log::info!("candle experiment ready at step {}", machine.step());

        Self {
            tuning,
            graph,
            nodes,
            machine,
            timers: Timeline::new(),
            flames_lit: false,
            left_flame_opacity: 1.0,
            completed: false,
            prompt: PROMPTS[0],
        }
    }

    pub fn step(&self) -> Step {
        self.machine.step()
    }

    pub fn terminal_step(&self) -> Step {
        self.machine.terminal_step()
    }

    pub fn prompt(&self) -> &'static str {
        self.prompt
    }

    pub fn flames_lit(&self) -> bool {
        self.flames_lit
    }

    pub fn left_flame_opacity(&self) -> f32 {
        self.left_flame_opacity
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn is_dragging(&self) -> bool {
        self.machine.is_dragging()
    }

    pub fn timers(&self) -> &Timeline<CandleTimer> {
        &self.timers
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Tracked position of a part along its axis
    pub fn position(&self, part: Part) -> Option<f32> {
        self.machine.position(part)
    }

    /// World-space pick volumes of a part
    pub fn shapes(&self, part: Part) -> Vec<Shape> {
        self.nodes
            .get(part)
            .and_then(|id| self.graph.world_bounds(id))
            .map(|bounds| vec![Shape::Aabb { min: bounds.min, max: bounds.max }])
            .unwrap_or_default()
    }

    pub fn pointer_down(&mut self, pointer: Vec2, hit: impl FnMut(Part) -> bool) -> PointerOutcome<Part> {
        let outcome = self.machine.pointer_down(pointer, hit);
        match outcome {
            PointerOutcome::Clicked { change, .. } => self.on_step_change(change),
            PointerOutcome::MissingHandle(part) => log::debug!("{:?} is not on the bench", part),
            _ => {}
        }
        outcome
    }

    pub fn pointer_move(&mut self, pointer: Vec2) -> DragUpdate<Part> {
        let update = self.machine.pointer_move(pointer);
        if let DragUpdate::Moved { handle, change, .. } = update {
            self.sync_node(handle);
            if let Some(change) = change {
                self.on_step_change(change);
            }
        }
        update
    }

    pub fn pointer_up(&mut self) {
        self.machine.pointer_up();
    }

    /// Advance the pre-fade delay and the flame fade
    pub fn update(&mut self, dt: f32) {
        for event in self.timers.advance(dt) {
            match event {
                TimerEvent::DelayElapsed(CandleTimer::PreFade) => {
                    log::info!("left flame starts fading");
                    self.timers.start_fade(
                        CandleTimer::LeftFlameFade,
                        FadeEffect::new(self.left_flame_opacity, self.tuning.fade_step, self.tuning.fade_interval),
                    );
                }
                TimerEvent::FadeValue(CandleTimer::LeftFlameFade, value) => {
                    self.left_flame_opacity = value;
                }
                TimerEvent::FadeCompleted(CandleTimer::LeftFlameFade) => {
                    self.left_flame_opacity = 0.0;
                    self.completed = true;
                    self.prompt = COMPLETION_PROMPT;
                    log::info!("experiment complete");
                }
                other => log::debug!("unhandled timer event {:?}", other),
            }
        }
    }

    /// Back to step 1 with every part where it started
    pub fn reset(&mut self) {
        self.machine.reset();
        self.timers.clear();
        self.flames_lit = false;
        self.left_flame_opacity = 1.0;
        self.completed = false;
        self.prompt = PROMPTS[0];
        for part in [Part::LeftBeaker, Part::RightBeaker, Part::Oxygen] {
            self.sync_node(part);
        }
    }

    fn on_step_change(&mut self, change: StepChange) {
        let index = (change.to.0 as usize).saturating_sub(1);
        self.prompt = PROMPTS.get(index).copied().unwrap_or(COMPLETION_PROMPT);

        if change.to == LIT_STEP {
            self.flames_lit = true;
        }
        if change.to >= self.machine.terminal_step() {
            self.timers.start_delay(CandleTimer::PreFade, self.tuning.fade_delay);
        }
    }

    /// Write a handle (and whatever rides it) back into the scene graph
    fn sync_node(&mut self, part: Part) {
        let ring = match part {
            Part::LeftBeaker => Some(Part::LeftRing),
            Part::RightBeaker => Some(Part::RightRing),
            _ => None,
        };
        for rider in std::iter::once(part).chain(ring) {
            let axis = match rider {
                Part::Oxygen => Axis::X,
                _ => Axis::Y,
            };
            let (Some(id), Some(value)) = (self.nodes.get(rider), self.machine.position(rider)) else {
                continue;
            };
            if let Some(node) = self.graph.node_mut(id) {
                set_axis_value(&mut node.transform.translation, axis, value);
            }
        }
    }

    /// Flame position above a candle's wick, in world space
    fn flame_at(&self, candle: Part) -> Option<Vec3> {
        let bounds = self.graph.world_bounds(self.nodes.get(candle)?)?;
        Some(Vec3::new(bounds.center().x, bounds.max.y + 0.1, bounds.center().z))
    }

    pub fn build_frame(&self, frame: &mut FrameBuilder) {
        frame.push_scene(&self.graph);

        if !self.flames_lit {
            return;
        }
        for (candle, opacity) in [(Part::RightCandle, 1.0), (Part::LeftCandle, self.left_flame_opacity)] {
            if let Some(at) = self.flame_at(candle) {
                frame.push_sphere(at, 0.09, [1.0, 0.55, 0.1, opacity]);
                frame.push_sphere(at + Vec3::new(0.0, -0.02, 0.0), 0.05, [1.0, 0.9, 0.4, opacity]);
            }
        }
    }
}

fn axis_value(v: Vec3, axis: Axis) -> f32 {
    match axis {
        Axis::X => v.x,
        Axis::Y => v.y,
        Axis::Z => v.z,
    }
}

fn set_axis_value(v: &mut Vec3, axis: Axis, value: f32) {
    match axis {
        Axis::X => v.x = value,
        Axis::Y => v.y = value,
        Axis::Z => v.z = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::build_bench;

    fn experiment() -> CandleExperiment {
        CandleExperiment::new(build_bench(), CandleTuning::default())
    }

    /// Press on `part`, move the pointer by `delta` pixels, release
    fn drag(exp: &mut CandleExperiment, part: Part, delta: Vec2) -> PointerOutcome<Part> {
        let start = Vec2::new(400.0, 300.0);
        let outcome = exp.pointer_down(start, |p| p == part);
        exp.pointer_move(start + delta);
        exp.pointer_up();
        outcome
    }

    #[test]
    fn test_rings_ride_beakers() {
        let mut exp = experiment();
        let offset = exp.position(Part::LeftRing).unwrap() - exp.position(Part::LeftBeaker).unwrap();
        drag(&mut exp, Part::LeftBeaker, Vec2::new(0.0, -30.0));

        let beaker = exp.position(Part::LeftBeaker).unwrap();
        let ring = exp.position(Part::LeftRing).unwrap();
        assert!((ring - (beaker + offset)).abs() < 1e-6);

        let ring_node = exp.graph().find_by_name(crate::layout::LEFT_RING).unwrap();
        assert!((exp.graph().node(ring_node).unwrap().transform.translation.y - ring).abs() < 1e-6);
    }

    #[test]
    fn test_held_beaker_keeps_moving_after_advance() {
        let mut exp = experiment();
        let start = exp.position(Part::LeftBeaker).unwrap();
        let grab = Vec2::new(400.0, 300.0);
        exp.pointer_down(grab, |p| p == Part::LeftBeaker);

        exp.pointer_move(grab - Vec2::new(0.0, (1.35 - start) * 120.0));
        assert_eq!(exp.step(), Step(2));
        assert!(exp.is_dragging());

        // Same drag carries the beaker up to its lift limit
        exp.pointer_move(grab - Vec2::new(0.0, (1.5 - start) * 120.0 + 60.0));
        assert_eq!(exp.position(Part::LeftBeaker), Some(1.5));
        assert_eq!(exp.step(), Step(2));
        let node = exp.graph().find_by_name(crate::layout::LEFT_BEAKER).unwrap();
        assert_eq!(exp.graph().node(node).unwrap().transform.translation.y, 1.5);

        // The right beaker cannot be grabbed until the left one is released
        assert_eq!(exp.pointer_down(grab, |p| p == Part::RightBeaker), PointerOutcome::Busy);
        exp.pointer_up();
        assert_eq!(exp.pointer_down(grab, |p| p == Part::RightBeaker), PointerOutcome::Grabbed(Part::RightBeaker));
    }

    #[test]
    fn test_wrong_part_is_not_grabbed() {
        let mut exp = experiment();
        assert_eq!(drag(&mut exp, Part::RightBeaker, Vec2::new(0.0, -100.0)), PointerOutcome::Ignored);
        assert_eq!(exp.step(), Step(1));
        assert_eq!(exp.position(Part::RightBeaker), Some(1.16));
    }

    #[test]
    fn test_clicking_candle_lights_flames() {
        let mut exp = experiment();
        drag(&mut exp, Part::LeftBeaker, Vec2::new(0.0, -20.0));
        drag(&mut exp, Part::RightBeaker, Vec2::new(0.0, -30.0));
        drag(&mut exp, Part::Oxygen, Vec2::new(-25.0, 0.0));
        assert_eq!(exp.step(), Step(4));
        assert!(!exp.flames_lit());

        let outcome = exp.pointer_down(Vec2::ZERO, |p| p == Part::RightCandle);
        assert!(matches!(outcome, PointerOutcome::Clicked { target: Part::RightCandle, .. }));
        assert!(exp.flames_lit());
        assert_eq!(exp.prompt(), PROMPTS[4]);
    }

    #[test]
    fn test_reset_clears_pending_fade() {
        let mut exp = experiment();
        drag(&mut exp, Part::LeftBeaker, Vec2::new(0.0, -20.0));
        drag(&mut exp, Part::RightBeaker, Vec2::new(0.0, -30.0));
        drag(&mut exp, Part::Oxygen, Vec2::new(-25.0, 0.0));
        exp.pointer_down(Vec2::ZERO, |p| p == Part::LeftCandle);
        drag(&mut exp, Part::LeftBeaker, Vec2::new(0.0, 200.0));
        drag(&mut exp, Part::RightBeaker, Vec2::new(0.0, 200.0));
        assert_eq!(exp.step(), Step(7));
        assert!(exp.timers().is_running(CandleTimer::PreFade));

        exp.reset();
        assert!(exp.timers().is_empty());
        assert_eq!(exp.step(), Step(1));
        assert!(!exp.flames_lit());
        assert_eq!(exp.position(Part::Oxygen), Some(0.3));

        exp.update(5.0);
        assert_eq!(exp.left_flame_opacity(), 1.0);
        assert!(!exp.is_complete());
    }
}
