//! Room tour
//!
//! Controls:
//! - Click a label: fly the camera to it
//! - Back button: fly home
//! - Left mouse drag: orbit camera
//! - Scroll: Zoom in/out

use anatomy::tour::{build_room, default_stops};
use anatomy::{Destination, Tour, TourTuning};
use anyhow::Result;
use clap::Parser;
use common::assets::load_or_build;
use common::scene_graph::SceneGraph;
use common::ui::{draw_lesson_panel, to_color32, world_label, LessonView, Note};
use common::{Camera3D, FrameBuilder, Lab, LabArgs, LabUi};
use egui::RichText;

struct TourLab {
    room: SceneGraph,
    tour: Tour,
    notes: Vec<Note>,
}

impl Lab for TourLab {
    fn title(&self) -> &str {
        "Cleaning Chemistry Tour"
    }

    fn setup_camera(&self, camera: &mut Camera3D) {
        camera.set_pose(self.tour.home());
    }

    fn update(&mut self, dt: f32, camera: &mut Camera3D) {
        self.tour.update(camera, dt);
    }

    fn build_frame(&self, frame: &mut FrameBuilder) {
        frame.clear_color = [1.0, 1.0, 1.0];
        frame.push_scene(&self.room);
        for stop in self.tour.stops() {
            frame.push_sphere(stop.anchor, 0.08, stop.color);
        }
    }

    fn ui(&mut self, ui: &LabUi) {
        let mut requested = None;

        for (index, stop) in self.tour.stops().iter().enumerate() {
            let Some(screen) = ui.picker.project(stop.anchor + glam::Vec3::Y * 0.35) else {
                continue;
            };
            if world_label(ui.egui, stop.label, screen, stop.label, to_color32(stop.color)) {
                requested = Some(Destination::Stop(index));
            }
        }

        if self.tour.is_zoomed() {
            egui::Area::new(egui::Id::new("tour_back"))
                .fixed_pos(egui::pos2(16.0, 16.0))
                .show(ui.egui, |area| {
                    let back = egui::Button::new(RichText::new("🏠 Back").strong());
                    if area.add_enabled(!self.tour.is_animating(), back).clicked() {
                        requested = Some(Destination::Home);
                    }
                });
        }

        if let Some(destination) = requested {
            self.tour.request(destination);
        }

        if ui.show_panel {
            let prompt = match self.tour.focus() {
                Some(index) => self.tour.stops()[index].detail,
                None => "Click a label to take a closer look.",
            };
            draw_lesson_panel(
                ui.egui,
                &LessonView {
                    title: self.title(),
                    prompt,
                    progress: None,
                    notes: &self.notes,
                    completion: None,
                },
            );
        }
    }
}

fn main() -> Result<()> {
    common::init_logging();
    let args = LabArgs::parse();
    let tuning: TourTuning = args.tuning()?;

    let room = load_or_build(args.asset.as_deref(), build_room);
    let stops = default_stops();
    let notes = stops
        .iter()
        .map(|stop| Note {
            name: stop.label,
            detail: stop.detail,
        })
        .collect();

    let lab = TourLab {
        room,
        tour: Tour::new(stops, &tuning),
        notes,
    };

    common::run(lab, &args)
}
