//! Candle combustion lab
//!
//! Controls:
//! - Left mouse drag on the highlighted part: move it
//! - Left mouse drag elsewhere: orbit camera
//! - Scroll: Zoom in/out
//! - R: Restart the experiment

use std::collections::HashMap;

use anyhow::Result;
use candle_lab::layout::{build_bench, ALL_PARTS};
use candle_lab::{CandleExperiment, CandleTuning, Part};
use clap::Parser;
use common::assets::load_or_build;
use common::interaction::PointerOutcome;
use common::ui::{draw_lesson_panel, draw_prompt_banner, LessonView, Note};
use common::{Camera3D, CameraPose, FrameBuilder, Lab, LabArgs, LabUi, Picker, Shape};
use glam::{Vec2, Vec3};
use winit::keyboard::KeyCode;

const NOTES: &[Note] = &[
    Note {
        name: "Combustion",
        detail: "A flame needs fuel, heat and oxygen. Take one away and it goes out.",
    },
    Note {
        name: "Closed beaker",
        detail: "An inverted beaker traps a fixed amount of air around the candle.",
    },
    Note {
        name: "Oxygen supply",
        detail: "Fresh oxygen keeps the right candle burning after the left one dies.",
    },
];

struct CandleLab {
    experiment: CandleExperiment,
}

impl Lab for CandleLab {
    fn title(&self) -> &str {
        "Candle Combustion Lab"
    }

    fn setup_camera(&self, camera: &mut Camera3D) {
        camera.set_pose(CameraPose::new(Vec3::new(0.0, 1.4, 3.4), Vec3::new(0.0, 0.6, 0.0)));
    }

    fn pointer_down(&mut self, pointer: Vec2, picker: &Picker) -> bool {
        let shapes: HashMap<Part, Vec<Shape>> = ALL_PARTS
            .iter()
            .map(|part| (*part, self.experiment.shapes(*part)))
            .collect();
        let outcome = self.experiment.pointer_down(pointer, |part| {
            shapes.get(&part).is_some_and(|s| picker.hits(pointer, s))
        });
        matches!(outcome, PointerOutcome::Grabbed(_) | PointerOutcome::Clicked { .. })
    }

    fn pointer_move(&mut self, pointer: Vec2, _picker: &Picker) {
        self.experiment.pointer_move(pointer);
    }

    fn pointer_up(&mut self) {
        self.experiment.pointer_up();
    }

    fn key(&mut self, key: KeyCode) {
        if key == KeyCode::KeyR {
            self.experiment.reset();
        }
    }

    fn update(&mut self, dt: f32, _camera: &mut Camera3D) {
        self.experiment.update(dt);
    }

    fn build_frame(&self, frame: &mut FrameBuilder) {
        self.experiment.build_frame(frame);
    }

    fn ui(&mut self, ui: &LabUi) {
        if !ui.show_panel {
            draw_prompt_banner(ui.egui, self.experiment.prompt());
            return;
        }
        let step = self.experiment.step().0;
        let total = self.experiment.terminal_step().0;
        draw_lesson_panel(
            ui.egui,
            &LessonView {
                title: self.title(),
                prompt: self.experiment.prompt(),
                progress: Some((step, total)),
                notes: NOTES,
                completion: self.experiment.is_complete().then_some("Press R to run it again."),
            },
        );
    }
}

fn main() -> Result<()> {
    common::init_logging();
    let args = LabArgs::parse();
    let tuning: CandleTuning = args.tuning()?;

    let graph = load_or_build(args.asset.as_deref(), build_bench);
    let lab = CandleLab {
        experiment: CandleExperiment::new(graph, tuning),
    };

    common::run(lab, &args)
}
