//! Heat lab
//!
//! Controls:
//! - Heat button or H: raise the temperature by one step
//! - Mode button or T: switch between real and thermal view
//! - R: cool back down
//! - Left mouse drag: orbit camera
//! - Scroll: Zoom in/out

use anyhow::Result;
use clap::Parser;
use common::ui::{draw_lesson_panel, LessonView, Note};
use common::{Camera3D, CameraPose, FrameBuilder, Lab, LabArgs, LabUi};
use egui::RichText;
use glam::Vec3;
use materials_lab::{HeatLab, HeatMode, HeatTuning};
use winit::keyboard::KeyCode;

const NOTES: &[Note] = &[
    Note {
        name: "Thermal camera",
        detail: "A thermal camera shows infrared light. Hotter objects glow redder.",
    },
    Note {
        name: "Heat transfer",
        detail: "The burner heats the pan and the pan conducts heat into the fish.",
    },
];

struct HeatView {
    lab: HeatLab,
}

impl Lab for HeatView {
    fn title(&self) -> &str {
        "Heat and Temperature"
    }

    fn setup_camera(&self, camera: &mut Camera3D) {
        camera.set_pose(CameraPose::new(Vec3::new(0.0, 2.5, 3.5), Vec3::new(0.0, 0.2, 0.0)));
    }

    fn key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyH => {
                self.lab.heat_up();
            }
            KeyCode::KeyT => {
                self.lab.toggle_mode();
            }
            KeyCode::KeyR => self.lab.reset(),
            _ => {}
        }
    }

    fn update(&mut self, _dt: f32, _camera: &mut Camera3D) {}

    fn build_frame(&self, frame: &mut FrameBuilder) {
        frame.show_grid = false;
        self.lab.build_frame(frame);
    }

    fn ui(&mut self, ui: &LabUi) {
        egui::TopBottomPanel::bottom("heat_controls").show(ui.egui, |panel| {
            panel.horizontal(|row| {
                let heat = row.add_enabled(!self.lab.is_at_max(), egui::Button::new(RichText::new("Heat").strong()));
                if heat.clicked() {
                    self.lab.heat_up();
                }
                let switch = match self.lab.mode() {
                    HeatMode::Real => "Thermal view",
                    HeatMode::Thermal => "Real view",
                };
                if row.button(switch).clicked() {
                    self.lab.toggle_mode();
                }
                row.label(RichText::new(format!("{:.0} °C", self.lab.temperature())).monospace());
            });
        });

        if ui.show_panel {
            let prompt = match self.lab.mode() {
                HeatMode::Real => "Heat the pan. Can you see the fish getting hotter?",
                HeatMode::Thermal => "The thermal camera shows the fish warming from yellow to red.",
            };
            let completion = self.lab.is_at_max().then_some("The fish has reached the pan's top temperature.");
            draw_lesson_panel(
                ui.egui,
                &LessonView {
                    title: self.title(),
                    prompt,
                    progress: None,
                    notes: NOTES,
                    completion,
                },
            );
        }
    }
}

fn main() -> Result<()> {
    common::init_logging();
    let args = LabArgs::parse();
    let tuning: HeatTuning = args.tuning()?;

    common::run(HeatView { lab: HeatLab::new(tuning) }, &args)
}
