//! Sieve lab
//!
//! Controls:
//! - Sieve buttons or keys 1-3: swap the sieve
//! - Space: pour a handful of mixed grains
//! - Arrow keys: tilt to shake the grains around
//! - C: clear all grains
//! - Left mouse drag: orbit camera
//! - Scroll: Zoom in/out

use anyhow::Result;
use clap::Parser;
use common::ui::{draw_lesson_panel, LessonView, Note};
use common::{Camera3D, CameraPose, FrameBuilder, Lab, LabArgs, LabUi};
use egui::RichText;
use glam::Vec3;
use materials_lab::{GrainTuning, SieveBench, SieveLevel, SieveTuning};
use serde::Deserialize;
use winit::keyboard::KeyCode;

const HANDFUL: usize = 60;
const TILT_STEP: f32 = 0.05;

const NOTES: &[Note] = &[
    Note {
        name: "Sieving",
        detail: "A sieve separates a mixture of solids whose particles differ in size.",
    },
    Note {
        name: "Hole size",
        detail: "Only particles smaller than the holes fall through.",
    },
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SieveLabTuning {
    sieve: SieveTuning,
    grains: GrainTuning,
}

struct SieveLab {
    bench: SieveBench,
}

impl Lab for SieveLab {
    fn title(&self) -> &str {
        "Sieving"
    }

    fn setup_camera(&self, camera: &mut Camera3D) {
        camera.set_pose(CameraPose::new(Vec3::new(0.0, 6.0, 8.0), Vec3::new(0.0, -0.5, 0.0)));
    }

    fn key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Digit1 => {
                self.bench.set_level(SieveLevel::Large);
            }
            KeyCode::Digit2 => {
                self.bench.set_level(SieveLevel::Blocked);
            }
            KeyCode::Digit3 => {
                self.bench.set_level(SieveLevel::Medium);
            }
            KeyCode::Space => {
                self.bench.spawn(HANDFUL);
            }
            KeyCode::KeyC => self.bench.clear(),
            KeyCode::ArrowUp => self.bench.tilt(-TILT_STEP, 0.0),
            KeyCode::ArrowDown => self.bench.tilt(TILT_STEP, 0.0),
            KeyCode::ArrowLeft => self.bench.tilt(0.0, TILT_STEP),
            KeyCode::ArrowRight => self.bench.tilt(0.0, -TILT_STEP),
            _ => {}
        }
    }

    fn update(&mut self, dt: f32, _camera: &mut Camera3D) {
        self.bench.update(dt);
    }

    fn build_frame(&self, frame: &mut FrameBuilder) {
        frame.show_grid = false;
        self.bench.build_frame(frame);
    }

    fn ui(&mut self, ui: &LabUi) {
        egui::TopBottomPanel::bottom("sieve_controls").show(ui.egui, |panel| {
            panel.horizontal(|row| {
                for level in SieveLevel::ALL {
                    if row.selectable_label(self.bench.level() == level, level.label()).clicked() {
                        self.bench.set_level(level);
                    }
                }
                row.separator();
                if row.button(RichText::new("Pour grains").strong()).clicked() {
                    self.bench.spawn(HANDFUL);
                }
                if row.button("Clear").clicked() {
                    self.bench.clear();
                }
                let (fine, coarse) = self.bench.passed();
                row.label(format!("Fell through: {} fine, {} coarse", fine, coarse));
            });
        });

        if ui.show_panel {
            let prompt = match self.bench.level() {
                SieveLevel::Blocked => "This sieve has no holes. Pour grains, then try another sieve.",
                SieveLevel::Large => "Large holes let both grain sizes through.",
                SieveLevel::Medium => "Medium holes let only the fine grains through.",
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
    let tuning: SieveLabTuning = args.tuning()?;

    let lab = SieveLab {
        bench: SieveBench::new(SieveLevel::default(), tuning.sieve, tuning.grains),
    };

    common::run(lab, &args)
}
