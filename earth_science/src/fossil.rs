//! Fossil formation in five stages
//!
//! Each stage swaps in its own model and camera viewpoint. In the sinking
//! stage the lake fills 1.5 s after the model is in place, easing toward its
//! final level and snapping once close.

use common::animation::{approach, Timeline, TimerEvent};
use common::camera::CameraPose;
use common::renderer::FrameBuilder;
use common::scene_graph::{SceneGraph, Transform};
use glam::Vec3;
use serde::Deserialize;

pub struct Stage {
    pub title: &'static str,
    pub description: &'static str,
    pub eye: Vec3,
    pub model_offset: Vec3,
    pub shows_water: bool,
}

impl Stage {
    pub fn camera_pose(&self) -> CameraPose {
        CameraPose::new(self.eye, Vec3::ZERO)
    }
}

pub static STAGES: [Stage; 5] = [
    Stage {
        title: "Alive",
        description: "This is the dinosaur while it was still alive.",
        eye: Vec3::new(0.0, 20.0, 6.0),
        model_offset: Vec3::new(0.0, -8.0, 0.0),
        shows_water: false,
    },
    Stage {
        title: "Sinking",
        description: "After it dies, the body sinks to the bottom of a lake or sea.",
        eye: Vec3::new(0.0, 20.0, 6.0),
        model_offset: Vec3::new(0.0, -8.0, 0.0),
        shows_water: true,
    },
    Stage {
        title: "Burial",
        description: "Sediment quickly piles up on top of the body.",
        eye: Vec3::new(0.0, 20.0, 9.0),
        model_offset: Vec3::new(-2.5, -8.0, -2.0),
        shows_water: true,
    },
    Stage {
        title: "Fossilization",
        description: "Layer after layer of sediment turns to rock, and the body inside becomes a fossil.",
        eye: Vec3::new(0.0, 16.0, 6.0),
        model_offset: Vec3::new(0.0, -8.0, 0.0),
        shows_water: false,
    },
    Stage {
        title: "Exposure",
        description: "The rock is lifted and worn away until the fossil shows.",
        eye: Vec3::new(0.0, 16.0, 6.0),
        model_offset: Vec3::new(0.0, -8.0, 0.0),
        shows_water: false,
    },
];

/// Stage whose water rises after loading
const SINKING_STAGE: usize = 1;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FossilTuning {
    pub water_start: f32,
    pub water_target: f32,
    pub rise_rate: f32,
    pub snap: f32,
    pub rise_delay: f32,
}

impl Default for FossilTuning {
    fn default() -> Self {
        Self {
            water_start: -5.0,
            water_target: 4.0,
            rise_rate: 1.0,
            snap: 0.1,
            rise_delay: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FossilTimer {
    WaterRise,
}

const LAKE_BED: f32 = -6.0;
const WATER_COLOR: [f32; 4] = [0.15, 0.4, 0.65, 0.45];

pub struct FossilViewer {
    tuning: FossilTuning,
    stage: usize,
    graph: SceneGraph,
    water_level: f32,
    rising: bool,
    timers: Timeline<FossilTimer>,
    camera_request: Option<CameraPose>,
}

impl FossilViewer {
    pub fn new(tuning: FossilTuning, first_stage: SceneGraph) -> Self {
        let mut viewer = Self {
            water_level: tuning.water_start,
            tuning,
            stage: 0,
            graph: SceneGraph::new("empty"),
            rising: false,
            timers: Timeline::new(),
            camera_request: None,
        };
        viewer.show_stage(0, first_stage);
        viewer
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn stage_info(&self) -> &'static Stage {
        &STAGES[self.stage]
    }

    pub fn water_level(&self) -> f32 {
        self.water_level
    }

    pub fn is_rising(&self) -> bool {
        self.rising
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Switch to `index` with its model already loaded. Returns false for an
    /// unknown stage.
    pub fn show_stage(&mut self, index: usize, mut graph: SceneGraph) -> bool {
        let Some(stage) = STAGES.get(index) else {
            log::debug!("no fossil stage {}", index);
            return false;
        };

        let root = graph.root();
        if let Some(node) = graph.node_mut(root) {
            node.transform.translation = stage.model_offset;
        }

        self.stage = index;
        self.graph = graph;
        self.water_level = self.tuning.water_start;
        self.rising = false;
        self.timers.clear();
        self.camera_request = Some(stage.camera_pose());

        if index == SINKING_STAGE {
            self.timers.start_delay(FossilTimer::WaterRise, self.tuning.rise_delay);
        }
        log::info!("fossil stage {}: {}", index, stage.title);
        true
    }

    /// Camera pose the viewer wants applied, at most once per stage change
    pub fn take_camera_request(&mut self) -> Option<CameraPose> {
        self.camera_request.take()
    }

    pub fn update(&mut self, dt: f32) {
        for event in self.timers.advance(dt) {
            if let TimerEvent::DelayElapsed(FossilTimer::WaterRise) = event {
                log::info!("water starts rising");
                self.rising = true;
            }
        }

        if self.rising {
            let (level, arrived) = approach(
                self.water_level,
                self.tuning.water_target,
                self.tuning.rise_rate,
                dt,
                self.tuning.snap,
            );
            self.water_level = level;
            if arrived {
                self.rising = false;
                log::info!("water reached {:.1}", level);
            }
        }
    }

    pub fn build_frame(&self, frame: &mut FrameBuilder) {
        frame.push_scene(&self.graph);

        if self.stage_info().shows_water && self.water_level > LAKE_BED {
            let half_height = (self.water_level - LAKE_BED) / 2.0;
            frame.push_box(
                Vec3::new(0.0, LAKE_BED + half_height, 0.0),
                Vec3::new(9.0, half_height, 9.0),
                WATER_COLOR,
            );
        }
    }
}

const ROCK: [f32; 4] = [0.45, 0.36, 0.28, 1.0];
const SAND: [f32; 4] = [0.82, 0.72, 0.5, 1.0];
const SKIN: [f32; 4] = [0.35, 0.55, 0.3, 1.0];
const BONE: [f32; 4] = [0.93, 0.9, 0.8, 1.0];

/// Procedural model for a stage, in model space (bed top at y = 2)
pub fn build_stage_scene(index: usize) -> SceneGraph {
    let mut graph = SceneGraph::new(&format!("fossil_stage_{}", index));
    let root = graph.root();
    graph.add_box(root, "bedrock", Vec3::new(0.0, 1.0, 0.0), Vec3::new(8.0, 1.0, 8.0), ROCK);

    match index {
        0 => {
            graph.add_box(root, "ground", Vec3::new(0.0, 2.1, 0.0), Vec3::new(8.0, 0.1, 8.0), [0.4, 0.6, 0.3, 1.0]);
            add_body(&mut graph, 3.4, SKIN, true);
        }
        1 => add_body(&mut graph, 2.4, [0.4, 0.45, 0.35, 1.0], false),
        2 => {
            add_body(&mut graph, 2.4, [0.45, 0.45, 0.4, 1.0], false);
            graph.add_box(root, "sediment_1", Vec3::new(0.0, 2.5, 0.0), Vec3::new(8.0, 0.5, 8.0), [SAND[0], SAND[1], SAND[2], 0.7]);
        }
        3 => {
            add_skeleton(&mut graph, 2.3);
            for (layer, shade) in [0.9f32, 0.8, 0.7].into_iter().enumerate() {
                let color = [SAND[0] * shade, SAND[1] * shade, SAND[2] * shade, 0.55];
                let y = 2.5 + layer as f32;
                graph.add_box(root, &format!("sediment_{}", layer + 1), Vec3::new(0.0, y, 0.0), Vec3::new(8.0, 0.5, 8.0), color);
            }
        }
        _ => {
            add_skeleton(&mut graph, 2.3);
            graph.add_box(root, "sediment_1", Vec3::new(0.0, 2.2, 0.0), Vec3::new(8.0, 0.2, 8.0), SAND);
            graph.add_box(root, "hill_left", Vec3::new(-6.0, 3.0, 0.0), Vec3::new(2.0, 1.0, 8.0), [0.7, 0.6, 0.42, 1.0]);
            graph.add_box(root, "hill_right", Vec3::new(6.5, 2.6, 0.0), Vec3::new(1.5, 0.6, 8.0), [0.7, 0.6, 0.42, 1.0]);
        }
    }
    graph
}

fn add_body(graph: &mut SceneGraph, y: f32, color: [f32; 4], standing: bool) {
    let body = graph.add(graph.root(), "dinosaur", Transform::from_translation(Vec3::new(0.0, y, 0.0)));
    graph.add_box(body, "torso", Vec3::ZERO, Vec3::new(1.4, 0.5, 0.5), color);
    graph.add_box(body, "neck", Vec3::new(1.7, 0.4, 0.0), Vec3::new(0.4, 0.2, 0.2), color);
    graph.add_box(body, "head", Vec3::new(2.2, 0.6, 0.0), Vec3::new(0.3, 0.2, 0.2), color);
    graph.add_box(body, "tail", Vec3::new(-2.2, 0.1, 0.0), Vec3::new(0.9, 0.15, 0.15), color);
    if standing {
        for (x, z) in [(0.8, 0.35), (0.8, -0.35), (-0.8, 0.35), (-0.8, -0.35)] {
            graph.add_box(body, "leg", Vec3::new(x, -0.9, z), Vec3::new(0.15, 0.5, 0.15), color);
        }
    }
}

fn add_skeleton(graph: &mut SceneGraph, y: f32) {
    let skeleton = graph.add(graph.root(), "fossil", Transform::from_translation(Vec3::new(0.0, y, 0.0)));
    for i in 0..14 {
        let x = -2.8 + i as f32 * 0.38;
        graph.add_box(skeleton, "vertebra", Vec3::new(x, 0.0, 0.0), Vec3::new(0.14, 0.08, 0.08), BONE);
    }
    for i in 0..6 {
        let x = -0.8 + i as f32 * 0.3;
        graph.add_box(skeleton, "rib", Vec3::new(x, 0.0, 0.0), Vec3::new(0.04, 0.04, 0.45), BONE);
    }
    graph.add_box(skeleton, "skull", Vec3::new(2.6, 0.05, 0.0), Vec3::new(0.3, 0.12, 0.18), BONE);
}
