//! Heating a fish in a pan, seen either as it is or through a thermal camera

use common::renderer::hsl_to_rgba;
use common::scene_graph::SceneGraph;
use common::FrameBuilder;
use glam::Vec3;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeatMode {
    #[default]
    Real,
    Thermal,
}

impl HeatMode {
    pub fn toggled(self) -> Self {
        match self {
            HeatMode::Real => HeatMode::Thermal,
            HeatMode::Thermal => HeatMode::Real,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HeatMode::Real => "Real view",
            HeatMode::Thermal => "Thermal view",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeatTuning {
    pub start_temperature: f32,
    pub max_temperature: f32,
    pub heat_step: f32,
}

impl Default for HeatTuning {
    fn default() -> Self {
        Self {
            start_temperature: 25.0,
            max_temperature: 100.0,
            heat_step: 5.0,
        }
    }
}

const FISH_GRAY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// Thermal palette: yellow when cool, sliding to red as it heats
pub fn thermal_color(temperature: f32) -> [f32; 4] {
    hsl_to_rgba((60.0 - temperature).max(0.0), 1.0, 0.5)
}

pub struct HeatLab {
    tuning: HeatTuning,
    mode: HeatMode,
    temperature: f32,
    scene: SceneGraph,
}

impl HeatLab {
    pub fn new(tuning: HeatTuning) -> Self {
        Self {
            temperature: tuning.start_temperature,
            tuning,
            mode: HeatMode::Real,
            scene: build_kitchen(),
        }
    }

    pub fn mode(&self) -> HeatMode {
        self.mode
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn is_at_max(&self) -> bool {
        self.temperature >= self.tuning.max_temperature
    }

    pub fn toggle_mode(&mut self) -> HeatMode {
        self.mode = self.mode.toggled();
        log::info!("switched to {}", self.mode.label());
        self.mode
    }

    /// Returns false once the pan is already at its hottest
    pub fn heat_up(&mut self) -> bool {
        if self.is_at_max() {
            return false;
        }
        self.temperature = (self.temperature + self.tuning.heat_step).min(self.tuning.max_temperature);
        log::info!("temperature {:.0} C", self.temperature);
        true
    }

    pub fn reset(&mut self) {
        self.temperature = self.tuning.start_temperature;
    }

    pub fn fish_color(&self) -> [f32; 4] {
        match self.mode {
            HeatMode::Real => FISH_GRAY,
            HeatMode::Thermal => thermal_color(self.temperature),
        }
    }

    pub fn build_frame(&self, frame: &mut FrameBuilder) {
        if self.mode == HeatMode::Thermal {
            frame.clear_color = [0.02, 0.02, 0.12];
        }
        frame.push_scene(&self.scene);

        let fish = self.fish_color();
        let body = Vec3::new(0.0, 0.35, 0.0);
        for i in 0..7 {
            let t = i as f32 / 6.0;
            let x = -0.6 + 1.2 * t;
            let radius = 0.09 + 0.12 * (t * std::f32::consts::PI).sin();
            frame.push_sphere(body + Vec3::new(x, 0.0, 0.0), radius, fish);
        }
        frame.push_sphere(body + Vec3::new(-0.78, 0.0, 0.12), 0.1, fish);
        frame.push_sphere(body + Vec3::new(-0.78, 0.0, -0.12), 0.1, fish);

        if self.mode == HeatMode::Thermal {
            let glow = thermal_color(self.temperature);
            let flame = [glow[0], glow[1], glow[2], 0.6];
            for i in 0..6 {
                let angle = i as f32 / 6.0 * std::f32::consts::TAU;
                frame.push_sphere(Vec3::new(angle.cos() * 0.5, -0.35, angle.sin() * 0.5), 0.08, flame);
            }
        }
    }
}

/// Stove top with a pan
pub fn build_kitchen() -> SceneGraph {
    let mut graph = SceneGraph::new("kitchen");
    let root = graph.root();
    graph.add_box(root, "stove", Vec3::new(0.0, -0.6, 0.0), Vec3::new(1.6, 0.2, 1.2), [0.2, 0.2, 0.22, 1.0]);
    graph.add_box(root, "burner", Vec3::new(0.0, -0.38, 0.0), Vec3::new(0.6, 0.02, 0.6), [0.1, 0.1, 0.1, 1.0]);
    let pan = graph.add_box(root, "pan", Vec3::new(0.0, 0.05, 0.0), Vec3::new(1.0, 0.05, 0.7), [0.25, 0.25, 0.28, 1.0]);
    graph.add_box(pan, "pan_handle", Vec3::new(1.6, 0.03, 0.0), Vec3::new(0.6, 0.03, 0.06), [0.1, 0.08, 0.06, 1.0]);
    graph
}
