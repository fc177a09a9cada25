//! Sugar dissolution lab
//!
//! Controls:
//! - Left mouse drag on the spoon: carry and lower it
//! - Click the stirring rod: stir
//! - Left mouse drag elsewhere: orbit camera
//! - R: Restart

use anyhow::Result;
use clap::Parser;
use common::assets::load_or_build;
use common::interaction::PointerOutcome;
use common::ui::{draw_lesson_panel, draw_prompt_banner, LessonView, Note};
use common::{Camera3D, CameraPose, FrameBuilder, Lab, LabArgs, LabUi, Picker};
use glam::{Vec2, Vec3};
use sugar_lab::dissolve::build_beaker_scene;
use sugar_lab::{SugarExperiment, SugarPart, SugarTuning};
use winit::keyboard::KeyCode;

const NOTES: &[Note] = &[
    Note {
        name: "Dissolving",
        detail: "Sugar crystals break apart into particles too small to see.",
    },
    Note {
        name: "Solution",
        detail: "The sugar is still in the water: the total mass does not change.",
    },
    Note {
        name: "Stirring",
        detail: "Stirring brings fresh water to the crystals and speeds things up.",
    },
];

struct SugarLab {
    experiment: SugarExperiment,
}

impl Lab for SugarLab {
    fn title(&self) -> &str {
        "Sugar Dissolution Lab"
    }

    fn setup_camera(&self, camera: &mut Camera3D) {
        camera.set_pose(CameraPose::new(Vec3::new(0.0, 1.0, 3.0), Vec3::new(0.0, 0.4, 0.0)));
    }

    fn pointer_down(&mut self, pointer: Vec2, picker: &Picker) -> bool {
        let spoon = self.experiment.shapes(SugarPart::SpoonSlide);
        let rod = self.experiment.shapes(SugarPart::StirringRod);
        let outcome = self.experiment.pointer_down(pointer, |part| match part {
            SugarPart::SpoonSlide | SugarPart::SpoonDip => picker.hits(pointer, &spoon),
            SugarPart::StirringRod => picker.hits(pointer, &rod),
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
        frame.clear_color = [1.0, 1.0, 1.0];
        self.experiment.build_frame(frame);
    }

    fn ui(&mut self, ui: &LabUi) {
        if !ui.show_panel {
            draw_prompt_banner(ui.egui, self.experiment.prompt());
            return;
        }
        draw_lesson_panel(
            ui.egui,
            &LessonView {
                title: self.title(),
                prompt: self.experiment.prompt(),
                progress: Some((self.experiment.step().0, self.experiment.terminal_step().0)),
                notes: NOTES,
                completion: self
                    .experiment
                    .is_complete()
                    .then_some("Press R to try again."),
            },
        );
    }
}

fn main() -> Result<()> {
    common::init_logging();
    let args = LabArgs::parse();
    let tuning: SugarTuning = args.tuning()?;

    let graph = load_or_build(args.asset.as_deref(), || build_beaker_scene(tuning.spoon_start));
    let lab = SugarLab {
        experiment: SugarExperiment::new(graph, tuning),
    };

    common::run(lab, &args)
}
