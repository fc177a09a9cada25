//! Fossil formation viewer
//!
//! Controls:
//! - Stage buttons or keys 1-5: switch stage
//! - Left mouse drag: orbit camera
//! - Scroll: Zoom in/out
//!
//! With `--asset <dir>`, stage models are read from `<dir>/<stage>/Dino.gltf`
//! and fall back to procedural models when missing.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use common::assets::{load_gltf_scene, AssetCache};
use common::scene_graph::SceneGraph;
use common::ui::{draw_lesson_panel, LessonView};
use common::{Camera3D, FrameBuilder, Lab, LabArgs, LabUi};
use earth_science::fossil::build_stage_scene;
use earth_science::{FossilTuning, FossilViewer, STAGES};
use egui::RichText;
use winit::keyboard::KeyCode;

struct FossilLab {
    viewer: FossilViewer,
    models: AssetCache<SceneGraph>,
    asset_dir: Option<PathBuf>,
}

impl FossilLab {
    fn stage_model(&mut self, index: usize) -> SceneGraph {
        let Some(dir) = &self.asset_dir else {
            return build_stage_scene(index);
        };
        let path = dir.join(index.to_string()).join("Dino.gltf");
        match self.models.get_or_load(&path.to_string_lossy(), |key| load_gltf_scene(key)) {
            Ok(graph) => graph.clone(),
            Err(err) => {
                log::warn!("{:#}; using procedural stage {}", err, index);
                build_stage_scene(index)
            }
        }
    }

    fn select(&mut self, index: usize) {
        if index != self.viewer.stage() && index < STAGES.len() {
            let model = self.stage_model(index);
            self.viewer.show_stage(index, model);
        }
    }
}

impl Lab for FossilLab {
    fn title(&self) -> &str {
        "Fossil Formation"
    }

    fn key(&mut self, key: KeyCode) {
        let index = match key {
            KeyCode::Digit1 => 0,
            KeyCode::Digit2 => 1,
            KeyCode::Digit3 => 2,
            KeyCode::Digit4 => 3,
            KeyCode::Digit5 => 4,
            _ => return,
        };
        self.select(index);
    }

    fn update(&mut self, dt: f32, camera: &mut Camera3D) {
        if let Some(pose) = self.viewer.take_camera_request() {
            camera.set_pose(pose);
        }
        self.viewer.update(dt);
    }

    fn build_frame(&self, frame: &mut FrameBuilder) {
        frame.clear_color = [0.0, 0.07, 0.13];
        frame.show_grid = false;
        self.viewer.build_frame(frame);
    }

    fn ui(&mut self, ui: &LabUi) {
        let mut chosen = None;
        egui::TopBottomPanel::top("fossil_stages").show(ui.egui, |panel| {
            panel.horizontal(|row| {
                for (index, stage) in STAGES.iter().enumerate() {
                    let label = RichText::new(format!("STEP {}: {}", index, stage.title));
                    if row.selectable_label(self.viewer.stage() == index, label).clicked() {
                        chosen = Some(index);
                    }
                }
            });
            panel.label(RichText::new(self.viewer.stage_info().description).strong());
        });
        if let Some(index) = chosen {
            self.select(index);
        }

        if ui.show_panel {
            draw_lesson_panel(
                ui.egui,
                &LessonView {
                    title: self.title(),
                    prompt: self.viewer.stage_info().description,
                    progress: Some((self.viewer.stage() as u32 + 1, STAGES.len() as u32)),
                    notes: &[],
                    completion: None,
                },
            );
        }
    }
}

fn main() -> Result<()> {
    common::init_logging();
    let args = LabArgs::parse();
    let tuning: FossilTuning = args.tuning()?;

    let mut lab = FossilLab {
        viewer: FossilViewer::new(tuning, build_stage_scene(0)),
        models: AssetCache::new(),
        asset_dir: args.asset.clone(),
    };
    if lab.asset_dir.is_some() {
        let model = lab.stage_model(0);
        lab.viewer.show_stage(0, model);
    }

    common::run(lab, &args)
}
