//! Sugar dissolution: carry a spoonful of sugar to the beaker, lower it into
//! the water and stir until it disappears.

use common::animation::{FadeEffect, Timeline, TimerEvent};
use common::interaction::{
    Axis, Bounds, DragUpdate, DraggableHandle, Gesture, PointerOutcome, ScreenAxis, Step, StepChange, StepMachine,
    Threshold,
};
use common::picking::Shape;
use common::renderer::FrameBuilder;
use common::scene_graph::{NodeId, NodeSchema, SceneGraph, Transform};
use glam::{Vec2, Vec3};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SugarPart {
    /// The spoon moving sideways
    SpoonSlide,
    /// The same spoon moving down into the water
    SpoonDip,
    StirringRod,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SugarTuning {
    pub sensitivity: f32,
    pub spoon_start: [f32; 2],
    pub slide_min: f32,
    pub slide_max: f32,
    pub slide_threshold: f32,
    pub dip_min: f32,
    pub dip_margin: f32,
    /// Opacity lost per dissolve tick
    pub dissolve_step: f32,
    pub dissolve_interval: f32,
    pub stir_speed: f32,
}

impl Default for SugarTuning {
    fn default() -> Self {
        Self {
            sensitivity: 150.0,
            spoon_start: [0.9, 0.95],
            slide_min: 0.0,
            slide_max: 1.2,
            slide_threshold: 0.1,
            dip_min: 0.45,
            dip_margin: 0.1,
            dissolve_step: 0.025,
            dissolve_interval: 0.05,
            stir_speed: 4.0,
        }
    }
}

impl SugarTuning {
    pub fn gestures(&self) -> Vec<Gesture<SugarPart>> {
        vec![
            Gesture::Drag {
                handle: SugarPart::SpoonSlide,
                screen_axis: ScreenAxis::Horizontal,
                sensitivity: self.sensitivity,
                bounds: Bounds::Fixed {
                    min: self.slide_min,
                    max: self.slide_max,
                },
                until: Threshold::AtMost(self.slide_threshold),
            },
            Gesture::Drag {
                handle: SugarPart::SpoonDip,
                screen_axis: ScreenAxis::Vertical,
                sensitivity: self.sensitivity,
                bounds: Bounds::Lowering { min: self.dip_min },
                until: Threshold::AtMost(self.dip_min + self.dip_margin),
            },
            Gesture::Click {
                targets: vec![SugarPart::StirringRod],
            },
        ]
    }
}

pub const PROMPTS: [&str; 4] = [
    "Drag the spoon of sugar over the beaker.",
    "Lower the spoon into the water.",
    "Click the stirring rod to stir.",
    "Stirring... watch the sugar crystals.",
];

pub const COMPLETION_PROMPT: &str = "The sugar dissolved! It is still there, spread evenly through the water.";

const TABLE: &str = "table";
const BEAKER: &str = "beaker";
const WATER: &str = "water";
const SPOON: &str = "spoon";
const SUGAR: &str = "sugar";
const ROD: &str = "stirring_rod";

const CLEAR_WATER: [f32; 4] = [0.55, 0.75, 0.95, 0.45];
const SWEET_WATER: [f32; 4] = [0.85, 0.8, 0.6, 0.55];

pub fn beaker_schema() -> NodeSchema {
    NodeSchema::new(1, &[(TABLE, 0), (BEAKER, 1), (WATER, 2), (SPOON, 3), (ROD, 4)])
}

/// Beaker scene in asset child order
pub fn build_beaker_scene(spoon_start: [f32; 2]) -> SceneGraph {
    let mut graph = SceneGraph::new("beaker_scene");
    let root = graph.root();

    graph.add_box(root, TABLE, Vec3::new(0.0, -0.02, 0.0), Vec3::new(1.6, 0.02, 0.8), [0.6, 0.45, 0.3, 1.0]);
    graph.add_box(root, BEAKER, Vec3::new(0.0, 0.35, 0.0), Vec3::new(0.25, 0.35, 0.25), [0.8, 0.9, 0.95, 0.25]);
    graph.add_box(root, WATER, Vec3::new(0.0, 0.25, 0.0), Vec3::new(0.23, 0.25, 0.23), CLEAR_WATER);

    let spoon = graph.add(
        root,
        SPOON,
        Transform::from_translation(Vec3::new(spoon_start[0], spoon_start[1], 0.0)),
    );
    graph.add_box(spoon, "spoon_bowl", Vec3::ZERO, Vec3::new(0.07, 0.015, 0.05), [0.8, 0.8, 0.82, 1.0]);
    graph.add_box(spoon, "spoon_handle", Vec3::new(0.25, 0.06, 0.0), Vec3::new(0.2, 0.01, 0.015), [0.8, 0.8, 0.82, 1.0]);
    graph.add_box(spoon, SUGAR, Vec3::new(0.0, 0.03, 0.0), Vec3::new(0.05, 0.02, 0.04), [1.0, 1.0, 1.0, 1.0]);

    graph.add_box(root, ROD, Vec3::new(-0.7, 0.3, 0.3), Vec3::new(0.012, 0.3, 0.012), [0.85, 0.9, 0.95, 0.9]);

    graph
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SugarTimer {
    Dissolve,
}

pub struct SugarExperiment {
    tuning: SugarTuning,
    graph: SceneGraph,
    spoon: Option<NodeId>,
    sugar: Option<NodeId>,
    water: Option<NodeId>,
    rod: Option<NodeId>,
    rod_rest: Vec3,
    machine: StepMachine<SugarPart>,
    timers: Timeline<SugarTimer>,
    dissolved: f32,
    stir_angle: f32,
    stirring: bool,
    completed: bool,
    prompt: &'static str,
}

impl SugarExperiment {
    pub fn new(graph: SceneGraph, tuning: SugarTuning) -> Self {
        let root = graph.root();
        let schema = beaker_schema();
        schema.validate(&graph, root);

        let spoon = schema.resolve(&graph, root, SPOON);
        let water = schema.resolve(&graph, root, WATER);
        let rod = schema.resolve(&graph, root, ROD);
        let sugar = graph.find_by_name(SUGAR);

        let mut machine = StepMachine::new(tuning.gestures());
        if let Some(at) = spoon.and_then(|id| graph.node(id)).map(|n| n.transform.translation) {
            machine.insert_handle(SugarPart::SpoonSlide, DraggableHandle::new(Axis::X, at.x));
            machine.insert_handle(SugarPart::SpoonDip, DraggableHandle::new(Axis::Y, at.y));
        }
        let rod_rest = rod
            .and_then(|id| graph.node(id))
            .map(|n| n.transform.translation)
            .unwrap_or(Vec3::ZERO);

        Self {
            tuning,
            graph,
            spoon,
            sugar,
            water,
            rod,
            rod_rest,
            machine,
            timers: Timeline::new(),
            dissolved: 0.0,
            stir_angle: 0.0,
            stirring: false,
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

    /// 0 while the sugar is intact, 1 once it has fully dissolved
    pub fn dissolved(&self) -> f32 {
        self.dissolved
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn spoon_position(&self) -> Option<Vec3> {
        self.spoon.and_then(|id| self.graph.node(id)).map(|n| n.transform.translation)
    }

    pub fn shapes(&self, part: SugarPart) -> Vec<Shape> {
        let node = match part {
            SugarPart::SpoonSlide | SugarPart::SpoonDip => self.spoon,
            SugarPart::StirringRod => self.rod,
        };
        node.and_then(|id| self.graph.world_bounds(id))
            // Thin parts get a little slack around them
            .map(|b| vec![Shape::Aabb { min: b.min - Vec3::splat(0.03), max: b.max + Vec3::splat(0.03) }])
            .unwrap_or_default()
    }

    pub fn pointer_down(&mut self, pointer: Vec2, hit: impl FnMut(SugarPart) -> bool) -> PointerOutcome<SugarPart> {
        let outcome = self.machine.pointer_down(pointer, hit);
        if let PointerOutcome::Clicked { change, .. } = outcome {
            self.on_step_change(change);
        }
        outcome
    }

    pub fn pointer_move(&mut self, pointer: Vec2) -> DragUpdate<SugarPart> {
        let update = self.machine.pointer_move(pointer);
        if let DragUpdate::Moved { handle, position, change } = update {
            if let Some(node) = self.spoon.and_then(|id| self.graph.node_mut(id)) {
                match handle {
                    SugarPart::SpoonSlide => node.transform.translation.x = position,
                    SugarPart::SpoonDip => node.transform.translation.y = position,
                    SugarPart::StirringRod => {}
                }
            }
            if let Some(change) = change {
                self.on_step_change(change);
            }
        }
        update
    }

    pub fn pointer_up(&mut self) {
        self.machine.pointer_up();
    }

    fn on_step_change(&mut self, change: StepChange) {
        self.prompt = PROMPTS.get(change.to.0 as usize - 1).copied().unwrap_or(COMPLETION_PROMPT);
        if change.to >= self.machine.terminal_step() {
            self.stirring = true;
            self.timers.start_fade(
                SugarTimer::Dissolve,
                FadeEffect::new(1.0, self.tuning.dissolve_step, self.tuning.dissolve_interval),
            );
        }
    }

    pub fn update(&mut self, dt: f32) {
        for event in self.timers.advance(dt) {
            match event {
                TimerEvent::FadeValue(SugarTimer::Dissolve, value) => self.set_dissolved(1.0 - value),
                TimerEvent::FadeCompleted(SugarTimer::Dissolve) => {
                    self.set_dissolved(1.0);
                    self.stirring = false;
                    self.completed = true;
                    self.prompt = COMPLETION_PROMPT;
                    log::info!("sugar fully dissolved");
                }
                TimerEvent::DelayElapsed(_) => {}
            }
        }

        let Some(rod) = self.rod.and_then(|id| self.graph.node_mut(id)) else {
            return;
        };
        if self.stirring {
            self.stir_angle += dt * self.tuning.stir_speed;
            rod.transform.translation = Vec3::new(self.stir_angle.cos() * 0.12, 0.4, self.stir_angle.sin() * 0.12);
        } else {
            rod.transform.translation = self.rod_rest;
        }
    }

    fn set_dissolved(&mut self, amount: f32) {
        self.dissolved = amount.clamp(0.0, 1.0);
        if let Some(node) = self.sugar.and_then(|id| self.graph.node_mut(id)) {
            node.color[3] = 1.0 - self.dissolved;
        }
        if let Some(node) = self.water.and_then(|id| self.graph.node_mut(id)) {
            for i in 0..4 {
                node.color[i] = CLEAR_WATER[i] + (SWEET_WATER[i] - CLEAR_WATER[i]) * self.dissolved;
            }
        }
    }

    pub fn reset(&mut self) {
        self.machine.reset();
        self.timers.clear();
        self.stirring = false;
        self.completed = false;
        self.stir_angle = 0.0;
        self.prompt = PROMPTS[0];
        self.set_dissolved(0.0);
        let slide = self.machine.position(SugarPart::SpoonSlide);
        let dip = self.machine.position(SugarPart::SpoonDip);
        if let Some(node) = self.spoon.and_then(|id| self.graph.node_mut(id)) {
            if let Some(x) = slide {
                node.transform.translation.x = x;
            }
            if let Some(y) = dip {
                node.transform.translation.y = y;
            }
        }
        if let Some(node) = self.rod.and_then(|id| self.graph.node_mut(id)) {
            node.transform.translation = self.rod_rest;
        }
    }

    pub fn build_frame(&self, frame: &mut FrameBuilder) {
        frame.push_scene(&self.graph);

        // Crystals drifting in the water while they dissolve
        if self.stirring {
            let remaining = 1.0 - self.dissolved;
            for i in 0..12 {
                let a = self.stir_angle * 0.5 + i as f32 * 0.52;
                let r = 0.05 + (i % 4) as f32 * 0.04;
                let at = Vec3::new(a.cos() * r, 0.05 + (i % 3) as f32 * 0.12, a.sin() * r);
                frame.push_sphere(at, 0.012 * remaining + 0.002, [1.0, 1.0, 1.0, remaining]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experiment() -> SugarExperiment {
        let tuning = SugarTuning::default();
        SugarExperiment::new(build_beaker_scene(tuning.spoon_start), tuning)
    }

    fn drag(exp: &mut SugarExperiment, part: SugarPart, delta: Vec2) {
        let start = Vec2::new(300.0, 300.0);
        exp.pointer_down(start, |p| p == part);
        exp.pointer_move(start + delta);
        exp.pointer_up();
    }

    #[test]
    fn test_full_dissolve() {
        let mut exp = experiment();

        // 0.9 -> 0.0 at 150 px per unit
        drag(&mut exp, SugarPart::SpoonSlide, Vec2::new(-135.0, 0.0));
        assert_eq!(exp.step(), Step(2));

        // Raising is not allowed while dipping
        drag(&mut exp, SugarPart::SpoonDip, Vec2::new(0.0, -50.0));
        assert_eq!(exp.spoon_position().unwrap().y, 0.95);

        drag(&mut exp, SugarPart::SpoonDip, Vec2::new(0.0, 100.0));
        assert_eq!(exp.step(), Step(3));
        assert!((exp.spoon_position().unwrap().y - 0.45).abs() < 1e-5);

        let outcome = exp.pointer_down(Vec2::ZERO, |p| p == SugarPart::StirringRod);
        assert!(matches!(outcome, PointerOutcome::Clicked { .. }));
        assert_eq!(exp.step(), exp.terminal_step());

        let mut last = exp.dissolved();
        for _ in 0..60 {
            exp.update(0.05);
            assert!(exp.dissolved() >= last);
            last = exp.dissolved();
        }
        assert!(exp.is_complete());
        assert_eq!(exp.dissolved(), 1.0);
        assert_eq!(exp.prompt(), COMPLETION_PROMPT);
    }

    #[test]
    fn test_rod_is_not_clickable_early() {
        let mut exp = experiment();
        let outcome = exp.pointer_down(Vec2::ZERO, |p| p == SugarPart::StirringRod);
        assert_eq!(outcome, PointerOutcome::Ignored);
        assert_eq!(exp.step(), Step(1));
    }

    #[test]
    fn test_reset_restores_sugar() {
        let mut exp = experiment();
        drag(&mut exp, SugarPart::SpoonSlide, Vec2::new(-135.0, 0.0));
        drag(&mut exp, SugarPart::SpoonDip, Vec2::new(0.0, 100.0));
        exp.pointer_down(Vec2::ZERO, |p| p == SugarPart::StirringRod);
        exp.update(0.5);
        assert!(exp.dissolved() > 0.0);

        exp.reset();
        assert_eq!(exp.dissolved(), 0.0);
        assert_eq!(exp.step(), Step(1));
        assert_eq!(exp.spoon_position(), Some(Vec3::new(0.9, 0.95, 0.0)));
        exp.update(1.0);
        assert_eq!(exp.dissolved(), 0.0);
    }

    #[test]
    fn test_reset_returns_spoon_to_scene_position() {
        // The asset places the spoon away from the tuned start
        let tuning = SugarTuning::default();
        let mut exp = SugarExperiment::new(build_beaker_scene([0.6, 0.8]), tuning);
        drag(&mut exp, SugarPart::SpoonSlide, Vec2::new(-90.0, 0.0));
        assert_eq!(exp.step(), Step(2));
        drag(&mut exp, SugarPart::SpoonDip, Vec2::new(0.0, 30.0));

        exp.reset();
        assert_eq!(exp.spoon_position(), Some(Vec3::new(0.6, 0.8, 0.0)));

        // The next drag starts from where the spoon is drawn
        drag(&mut exp, SugarPart::SpoonSlide, Vec2::new(-15.0, 0.0));
        let at = exp.spoon_position().unwrap();
        assert!((at.x - 0.5).abs() < 1e-5);
        assert_eq!(exp.step(), Step(1));
    }
}
