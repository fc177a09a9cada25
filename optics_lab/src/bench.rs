//! Optical bench: straight light, a plane mirror and a swappable thin lens

use std::f32::consts::{FRAC_PI_2, PI};

use common::FrameBuilder;
use glam::{Quat, Vec2, Vec3};
use serde::Deserialize;

use crate::trace::{focal_length, trace, LensKind, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Direct,
    #[default]
    Reflection,
    Refraction,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Direct, Mode::Reflection, Mode::Refraction];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Direct => "Light travels straight",
            Mode::Reflection => "Reflection",
            Mode::Refraction => "Refraction",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpticsTuning {
    pub source_x: f32,
    pub ray_length: f32,
    /// Spacing between the parallel rays of a beam
    pub beam_spacing_mirror: f32,
    pub beam_spacing_lens: f32,
    pub mirror_center: [f32; 3],
    pub mirror_size: [f32; 2],
    pub lens_center: [f32; 3],
    pub lens_aperture: f32,
    pub refractive_index: f32,
    pub lens_radius: f32,
}

impl Default for OpticsTuning {
    fn default() -> Self {
        Self {
            source_x: -5.0,
            ray_length: 10.0,
            beam_spacing_mirror: 0.1,
            beam_spacing_lens: 0.5,
            mirror_center: [1.0, 0.0, 0.0],
            mirror_size: [1.8, 3.0],
            lens_center: [-3.0, 0.0, 0.0],
            lens_aperture: 1.0,
            refractive_index: 1.5,
            lens_radius: 1.0,
        }
    }
}

/// Mirror tilted 45 degrees so light arriving along +X leaves along +Y
pub fn mirror_rotation() -> Quat {
    Quat::from_rotation_x(FRAC_PI_2) * Quat::from_rotation_y(5.0 * PI / 4.0)
}

/// Lens plane facing back toward the light source
fn lens_rotation() -> Quat {
    Quat::from_rotation_y(-FRAC_PI_2)
}

const RAY_COLOR: [f32; 4] = [1.0, 0.1, 0.1, 1.0];
const GLASS: [f32; 4] = [0.65, 0.77, 0.92, 1.0];
const MIRROR: [f32; 4] = [0.85, 0.87, 0.9, 1.0];

pub struct OpticsBench {
    tuning: OpticsTuning,
    mode: Mode,
    lens: LensKind,
    rays_visible: bool,
}

impl OpticsBench {
    pub fn new(tuning: OpticsTuning) -> Self {
        Self {
            tuning,
            mode: Mode::default(),
            lens: LensKind::Convex,
            rays_visible: true,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn lens(&self) -> LensKind {
        self.lens
    }

    pub fn rays_visible(&self) -> bool {
        self.rays_visible
    }

    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        log::info!("optics mode: {}", mode.label());
        true
    }

    /// Lens choice only applies on the refraction bench
    pub fn set_lens(&mut self, lens: LensKind) -> bool {
        if self.mode != Mode::Refraction {
            log::debug!("lens change ignored outside refraction mode");
            return false;
        }
        if lens == self.lens {
            return false;
        }
        self.lens = lens;
        log::info!("lens: {}", lens.label());
        true
    }

    pub fn toggle_rays(&mut self) -> bool {
        self.rays_visible = !self.rays_visible;
        self.rays_visible
    }

    pub fn focal_length(&self) -> f32 {
        focal_length(self.lens, self.tuning.refractive_index, self.tuning.lens_radius)
    }

    pub fn surfaces(&self) -> Vec<Surface> {
        match self.mode {
            Mode::Direct => Vec::new(),
            Mode::Reflection => vec![Surface::Mirror {
                center: Vec3::from(self.tuning.mirror_center),
                rotation: mirror_rotation(),
                half_size: Vec2::from(self.tuning.mirror_size) / 2.0,
            }],
            Mode::Refraction => vec![Surface::ThinLens {
                center: Vec3::from(self.tuning.lens_center),
                rotation: lens_rotation(),
                aperture: self.tuning.lens_aperture,
                focal_length: self.focal_length(),
            }],
        }
    }

    /// Where each ray of the current beam starts
    pub fn sources(&self) -> Vec<Vec3> {
        let x = self.tuning.source_x;
        match self.mode {
            Mode::Direct => vec![Vec3::new(x, 0.0, 0.0)],
            Mode::Reflection => {
                let s = self.tuning.beam_spacing_mirror;
                vec![Vec3::new(x, 0.0, 0.0), Vec3::new(x, 0.0, s), Vec3::new(x, 0.0, -s)]
            }
            Mode::Refraction => {
                let s = self.tuning.beam_spacing_lens;
                vec![Vec3::new(x, 0.0, 0.0), Vec3::new(x, s, 0.0), Vec3::new(x, -s, 0.0)]
            }
        }
    }

    /// Traced ray paths, empty while rays are hidden
    pub fn rays(&self) -> Vec<Vec<Vec3>> {
        if !self.rays_visible {
            return Vec::new();
        }
        let surfaces = self.surfaces();
        self.sources()
            .into_iter()
            .map(|origin| trace(origin, Vec3::X, self.tuning.ray_length, &surfaces))
            .collect()
    }

    pub fn build_frame(&self, frame: &mut FrameBuilder) {
        for path in self.rays() {
            frame.push_polyline(&path, RAY_COLOR);
            if let Some(origin) = path.first() {
                frame.push_sphere(*origin, 0.05, RAY_COLOR);
            }
        }

        for surface in self.surfaces() {
            match surface {
                Surface::Mirror {
                    center,
                    rotation,
                    half_size,
                } => draw_mirror(frame, center, rotation, half_size),
                Surface::ThinLens {
                    center, aperture, ..
                } => {
                    draw_lens(frame, center, aperture, self.lens);
                    let f = self.focal_length().abs();
                    let axis = [0.5, 0.5, 0.55, 1.0];
                    frame.push_line(center - Vec3::X * 6.0, center + Vec3::X * 9.0, axis);
                    frame.push_sphere(center - Vec3::X * f, 0.06, axis);
                    frame.push_sphere(center + Vec3::X * f, 0.06, axis);
                }
            }
        }
    }
}

fn draw_mirror(frame: &mut FrameBuilder, center: Vec3, rotation: Quat, half_size: Vec2) {
    let corner = |x: f32, y: f32| center + rotation * Vec3::new(x * half_size.x, y * half_size.y, 0.0);
    let outline = [corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0), corner(-1.0, -1.0)];
    frame.push_polyline(&outline, MIRROR);
    for i in 1..6 {
        let y = -1.0 + i as f32 / 3.0;
        frame.push_line(corner(-1.0, y), corner(1.0, y), MIRROR);
    }
    // Backing, so the silvered side reads
    let back = rotation * Vec3::NEG_Z * 0.03;
    frame.push_polyline(&outline.map(|p| p + back), [0.3, 0.3, 0.32, 1.0]);
}

/// Lens profile as a surface of revolution about the optical axis
fn draw_lens(frame: &mut FrameBuilder, center: Vec3, aperture: f32, kind: LensKind) {
    let half_thickness = |r: f32| {
        let u = (r / aperture).clamp(0.0, 1.0);
        match kind {
            LensKind::Convex => 0.02 + 0.2 * (1.0 - u * u),
            LensKind::Concave => 0.1 + 0.19 * u * u,
        }
    };

    for k in 0..4 {
        let angle = k as f32 * PI / 4.0;
        let radial = Vec3::new(0.0, angle.cos(), angle.sin());
        let mut outline = Vec::with_capacity(42);
        for i in 0..=20 {
            let s = -1.0 + i as f32 / 10.0;
            outline.push(center + radial * s * aperture + Vec3::X * half_thickness(s.abs() * aperture));
        }
        for i in (0..=20).rev() {
            let s = -1.0 + i as f32 / 10.0;
            outline.push(center + radial * s * aperture - Vec3::X * half_thickness(s.abs() * aperture));
        }
        if let Some(first) = outline.first().copied() {
            outline.push(first);
        }
        frame.push_polyline(&outline, GLASS);
    }

    let rim: Vec<Vec3> = (0..=48)
        .map(|i| {
            let angle = i as f32 / 48.0 * std::f32::consts::TAU;
            center + Vec3::new(0.0, angle.cos(), angle.sin()) * aperture
        })
        .collect();
    frame.push_polyline(&rim, GLASS);
}
