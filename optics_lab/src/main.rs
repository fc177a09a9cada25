//! Light and optics
//!
//! Controls:
//! - Mode buttons or keys 1-3: straight light, reflection, refraction
//! - Lens buttons or C / V: convex or concave lens (refraction only)
//! - R: show or hide the rays
//! - Left mouse drag: orbit camera
//! - Scroll: Zoom in/out

use anyhow::Result;
use clap::Parser;
use common::ui::{draw_lesson_panel, LessonView, Note};
use common::{Camera3D, CameraPose, FrameBuilder, Lab, LabArgs, LabUi};
use egui::RichText;
use glam::Vec3;
use optics_lab::{LensKind, Mode, OpticsBench, OpticsTuning};
use winit::keyboard::KeyCode;

const NOTES: &[Note] = &[
    Note {
        name: "Straight line",
        detail: "In one material, light travels in a straight line.",
    },
    Note {
        name: "Reflection",
        detail: "Light bounces off a mirror at the same angle it arrives.",
    },
    Note {
        name: "Refraction",
        detail: "Light bends when it passes into glass. A convex lens gathers rays and a concave lens spreads them.",
    },
];

struct OpticsLab {
    bench: OpticsBench,
}

impl Lab for OpticsLab {
    fn title(&self) -> &str {
        "Light and Optics"
    }

    fn setup_camera(&self, camera: &mut Camera3D) {
        camera.set_pose(CameraPose::new(Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO));
    }

    fn key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Digit1 => {
                self.bench.set_mode(Mode::Direct);
            }
            KeyCode::Digit2 => {
                self.bench.set_mode(Mode::Reflection);
            }
            KeyCode::Digit3 => {
                self.bench.set_mode(Mode::Refraction);
            }
            KeyCode::KeyC => {
                self.bench.set_lens(LensKind::Convex);
            }
            KeyCode::KeyV => {
                self.bench.set_lens(LensKind::Concave);
            }
            KeyCode::KeyR => {
                self.bench.toggle_rays();
            }
            _ => {}
        }
    }

    fn update(&mut self, _dt: f32, _camera: &mut Camera3D) {}

    fn build_frame(&self, frame: &mut FrameBuilder) {
        frame.clear_color = [0.02, 0.02, 0.03];
        frame.show_grid = false;
        self.bench.build_frame(frame);
    }

    fn ui(&mut self, ui: &LabUi) {
        egui::TopBottomPanel::bottom("optics_controls").show(ui.egui, |panel| {
            panel.horizontal(|row| {
                for mode in Mode::ALL {
                    if row.selectable_label(self.bench.mode() == mode, mode.label()).clicked() {
                        self.bench.set_mode(mode);
                    }
                }
                if self.bench.mode() == Mode::Refraction {
                    row.separator();
                    for lens in [LensKind::Convex, LensKind::Concave] {
                        if row.selectable_label(self.bench.lens() == lens, lens.label()).clicked() {
                            self.bench.set_lens(lens);
                        }
                    }
                }
                row.separator();
                let toggle = if self.bench.rays_visible() { "Hide rays" } else { "Show rays" };
                if row.button(RichText::new(toggle).strong()).clicked() {
                    self.bench.toggle_rays();
                }
            });
        });

        if ui.show_panel {
            let prompt = match (self.bench.mode(), self.bench.lens()) {
                (Mode::Direct, _) => "The light goes straight from the source.",
                (Mode::Reflection, _) => "The mirror turns the beam. Compare the angles in and out.",
                (Mode::Refraction, LensKind::Convex) => "The convex lens brings the rays together at its focus.",
                (Mode::Refraction, LensKind::Concave) => "The concave lens spreads the rays apart.",
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
    let tuning: OpticsTuning = args.tuning()?;

    common::run(OpticsLab { bench: OpticsBench::new(tuning) }, &args)
}
