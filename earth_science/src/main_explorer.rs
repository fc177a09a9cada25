//! Solar system explorer
//!
//! Controls:
//! - Click a marker: land on that season's earth
//! - Click the sun (or the button): back to orbit view
//! - Left mouse drag elsewhere: orbit camera
//! - Scroll: Zoom in/out

use anyhow::Result;
use clap::Parser;
use common::assets::{load_gltf_scene, AssetCache};
use common::scene_graph::SceneGraph;
use common::ui::{draw_lesson_panel, LessonView, Note};
use common::{Camera3D, FrameBuilder, Lab, LabArgs, LabUi, Picker};
use earth_science::{ExplorerTuning, SolarExplorer, View};
use glam::Vec2;

const NOTES: &[Note] = &[
    Note {
        name: "Tilted axis",
        detail: "The earth's axis is tilted, so sunlight strikes each hemisphere at a different angle through the year.",
    },
    Note {
        name: "Seasons",
        detail: "When the sun is high in the sky days are long and warm; when it is low they are short and cold.",
    },
];

struct ExplorerLab {
    explorer: SolarExplorer,
}

impl Lab for ExplorerLab {
    fn title(&self) -> &str {
        "Solar System Explorer"
    }

    fn setup_camera(&self, camera: &mut Camera3D) {
        camera.set_pose(self.explorer.home());
    }

    fn pointer_down(&mut self, pointer: Vec2, picker: &Picker) -> bool {
        match self.explorer.pick(&picker.ray(pointer)) {
            Some(target) => self.explorer.click(target),
            None => false,
        }
    }

    fn update(&mut self, dt: f32, camera: &mut Camera3D) {
        self.explorer.update(dt, camera);
    }

    fn build_frame(&self, frame: &mut FrameBuilder) {
        self.explorer.build_frame(frame);
    }

    fn ui(&mut self, ui: &LabUi) {
        let prompt = match self.explorer.view() {
            View::Orbit => "Click a marker to visit the earth in that season.".to_string(),
            View::Flying(season) => format!("Flying to {}...", season.name()),
            View::Surface(season) => format!("Standing on the earth in {}.", season.name()),
        };

        if !self.explorer.is_orbiting() {
            egui::Area::new(egui::Id::new("explorer_back"))
                .fixed_pos(egui::pos2(16.0, 16.0))
                .show(ui.egui, |area| {
                    if area.button("☀ Back to orbit").clicked() {
                        self.explorer.reset();
                    }
                });
        }

        if ui.show_panel {
            draw_lesson_panel(
                ui.egui,
                &LessonView {
                    title: self.title(),
                    prompt: &prompt,
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
    let tuning: ExplorerTuning = args.tuning()?;

    // One load, shared by all four earths
    let mut cache: AssetCache<SceneGraph> = AssetCache::new();
    let earth_model = match args.asset.as_deref() {
        Some(path) => match cache.get_or_load(&path.to_string_lossy(), |key| load_gltf_scene(key)) {
            Ok(model) => Some(model),
            Err(err) => {
                log::warn!("{:#}; drawing earths as spheres", err);
                None
            }
        },
        None => None,
    };

    let lab = ExplorerLab {
        explorer: SolarExplorer::new(tuning, earth_model),
    };

    common::run(lab, &args)
}
