//! Arm motion
//!
//! Controls:
//! - Extend / Fold buttons: play that half of the arm clip
//! - Left mouse drag: orbit camera
//! - Scroll: Zoom in/out

use anatomy::arm::build_arm;
use anatomy::{ArmAction, ArmMotion, ArmTuning, Muscle};
use anyhow::Result;
use clap::Parser;
use common::assets::load_or_build;
use common::ui::{draw_lesson_panel, to_color32, world_text, LessonView, Note};
use common::{Camera3D, CameraPose, FrameBuilder, Lab, LabArgs, LabUi};
use egui::RichText;
use glam::Vec3;
use winit::keyboard::KeyCode;

const NOTES: &[Note] = &[
    Note {
        name: "Muscle pairs",
        detail: "Muscles can only pull. The biceps and triceps pull the forearm in opposite directions.",
    },
    Note {
        name: "Folding",
        detail: "The biceps contracts and the triceps relaxes.",
    },
    Note {
        name: "Extending",
        detail: "The triceps contracts and the biceps relaxes.",
    },
];

struct ArmLab {
    arm: ArmMotion,
}

impl Lab for ArmLab {
    fn title(&self) -> &str {
        "Arm Muscles"
    }

    fn setup_camera(&self, camera: &mut Camera3D) {
        camera.min_distance = 0.3;
        camera.max_distance = 2.5;
        camera.set_pose(CameraPose::new(Vec3::new(0.05, 0.25, 0.9), Vec3::new(0.2, 0.05, 0.0)));
    }

    fn key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyE => self.arm.set_action(ArmAction::Extend),
            KeyCode::KeyF => self.arm.set_action(ArmAction::Fold),
            _ => {}
        }
    }

    fn update(&mut self, dt: f32, _camera: &mut Camera3D) {
        self.arm.update(dt);
    }

    fn build_frame(&self, frame: &mut FrameBuilder) {
        frame.clear_color = [0.94, 0.94, 0.94];
        self.arm.build_frame(frame);
    }

    fn ui(&mut self, ui: &LabUi) {
        for muscle in Muscle::ALL {
            if let Some(screen) = ui.picker.project(self.arm.label_position(muscle)) {
                let id = format!("{:?}_label", muscle);
                world_text(ui.egui, &id, screen, self.arm.label_text(muscle), to_color32(self.arm.highlight(muscle)));
            }
        }

        egui::TopBottomPanel::bottom("arm_controls").show(ui.egui, |panel| {
            panel.horizontal(|row| {
                if row.button(RichText::new("Extend arm").strong()).clicked() {
                    self.arm.set_action(ArmAction::Extend);
                }
                if row.button(RichText::new("Fold arm").strong()).clicked() {
                    self.arm.set_action(ArmAction::Fold);
                }
            });
        });

        if ui.show_panel {
            let prompt = match self.arm.action() {
                ArmAction::Extend => "Extending: watch which muscle shortens.",
                ArmAction::Fold => "Folding: watch which muscle shortens.",
            };
            draw_lesson_panel(
                ui.egui,
                &LessonView {
                    title: self.title(),
                    prompt,
                    progress: None,
                    notes: NOTES,
                    completion: None,
                },
            );
        }
    }
}

fn main() -> Result<()> {
    common::init_logging();
    let args = LabArgs::parse();
    let tuning: ArmTuning = args.tuning()?;

    let graph = load_or_build(args.asset.as_deref(), build_arm);
    let lab = ArmLab {
        arm: ArmMotion::new(graph, tuning),
    };

    common::run(lab, &args)
}
