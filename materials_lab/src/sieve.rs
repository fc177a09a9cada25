//! Sieve separation
//!
//! The sieve floor is a grid of static box cells with the cells inside each
//! hole left out, ringed by a curved wall of box segments. Colliders are
//! declared to a [`ColliderSink`]; nothing is read back. [`GrainBed`] is a
//! small sphere-versus-box sink that drops grains onto the sieve.

use std::f32::consts::TAU;

use common::FrameBuilder;
use glam::{Quat, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;

/// Circular opening in the sieve floor, on the XZ plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hole {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
}

const fn hole(x: f32, z: f32, radius: f32) -> Hole {
    Hole { x, z, radius }
}

const LARGE_HOLES: [Hole; 32] = [
    hole(0.0, 0.4, 0.43),
    hole(0.03, -0.6, 0.43),
    hole(0.67, -0.15, 0.43),
    hole(-0.67, -0.15, 0.43),
    hole(-0.7, 0.5, 0.2),
    hole(-0.7, -0.75, 0.3),
    hole(0.7, -0.8, 0.2),
    hole(0.7, 0.5, 0.3),
    hole(0.0, 1.4, 0.43),
    hole(-1.2, -1.2, 0.43),
    hole(-1.5, 0.0, 0.43),
    hole(-1.2, 0.9, 0.43),
    hole(0.0, -1.5, 0.43),
    hole(1.2, -1.2, 0.43),
    hole(1.6, -0.2, 0.43),
    hole(1.2, 1.1, 0.43),
    hole(0.0, 2.4, 0.45),
    hole(1.1, 2.2, 0.45),
    hole(1.9, 1.7, 0.45),
    hole(2.3, 0.8, 0.45),
    hole(2.5, -0.1, 0.45),
    hole(2.3, -1.1, 0.45),
    hole(1.7, -1.7, 0.45),
    hole(0.9, -2.2, 0.45),
    hole(0.0, -2.4, 0.45),
    hole(-0.9, -2.2, 0.45),
    hole(-1.7, -1.9, 0.45),
    hole(-2.3, -1.1, 0.45),
    hole(-2.4, 0.0, 0.45),
    hole(-2.2, 0.8, 0.45),
    hole(-1.9, 1.6, 0.45),
    hole(-0.9, 2.2, 0.45),
];

const MEDIUM_HOLES: [Hole; 25] = [
    hole(0.0, 0.0, 0.2),
    hole(0.0, 0.75, 0.2),
    hole(0.0, 1.5, 0.2),
    hole(0.0, -0.75, 0.2),
    hole(0.0, -1.5, 0.2),
    hole(0.75, 0.0, 0.2),
    hole(1.5, 0.0, 0.2),
    hole(-0.75, 0.0, 0.2),
    hole(-1.5, 0.0, 0.2),
    hole(0.75, 0.75, 0.2),
    hole(0.75, 1.5, 0.2),
    hole(1.5, 1.5, 0.2),
    hole(1.5, 0.75, 0.2),
    hole(-0.75, 0.75, 0.2),
    hole(-0.75, 1.5, 0.2),
    hole(-1.5, 1.5, 0.2),
    hole(-1.5, 0.75, 0.2),
    hole(-0.75, -0.75, 0.2),
    hole(-0.75, -1.5, 0.2),
    hole(-1.5, -1.5, 0.2),
    hole(-1.5, -0.75, 0.2),
    hole(0.75, -0.75, 0.2),
    hole(0.75, -1.5, 0.2),
    hole(1.5, -1.5, 0.2),
    hole(1.5, -0.75, 0.2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SieveLevel {
    Large,
    #[default]
    Blocked,
    Medium,
}

impl SieveLevel {
    pub const ALL: [SieveLevel; 3] = [SieveLevel::Large, SieveLevel::Blocked, SieveLevel::Medium];

    pub fn label(self) -> &'static str {
        match self {
            SieveLevel::Large => "Large holes",
            SieveLevel::Blocked => "No holes",
            SieveLevel::Medium => "Medium holes",
        }
    }

    pub fn holes(self) -> &'static [Hole] {
        match self {
            SieveLevel::Large => &LARGE_HOLES,
            SieveLevel::Blocked => &[],
            SieveLevel::Medium => &MEDIUM_HOLES,
        }
    }
}

/// Static box declared to the physics collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub position: Vec3,
    pub half_extents: Vec3,
    /// Rotation about +Y in radians
    pub yaw: f32,
    pub friction: Option<f32>,
}

/// Receives static colliders. Implemented by whatever simulates the grains.
pub trait ColliderSink {
    fn clear_static(&mut self);
    fn add_static_box(&mut self, collider: BoxCollider);
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SieveTuning {
    pub grid_extent: f32,
    pub cell_spacing: f32,
    pub floor_y: f32,
    /// Cell size relative to spacing, leaving a thin seam between cells
    pub cell_fill: f32,
    pub cell_thickness: f32,
    pub cell_friction: f32,
    pub wall_segments: usize,
    pub wall_radius: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
}

impl Default for SieveTuning {
    fn default() -> Self {
        Self {
            grid_extent: 3.0,
            cell_spacing: 0.3,
            floor_y: -0.2,
            cell_fill: 0.95,
            cell_thickness: 0.05,
            cell_friction: 0.1,
            wall_segments: 32,
            wall_radius: 2.85,
            wall_height: 5.0,
            wall_thickness: 0.15,
        }
    }
}

/// Spacing floor so a zero or negative tuning value cannot blow up the grid
const MIN_CELL_SPACING: f32 = 0.01;

pub fn in_any_hole(holes: &[Hole], x: f32, z: f32) -> bool {
    holes.iter().any(|h| (h.x - x).hypot(h.z - z) < h.radius)
}

/// Floor cells for a level, skipping those whose centers lie in a hole
pub fn floor_cells(level: SieveLevel, tuning: &SieveTuning) -> Vec<BoxCollider> {
    let spacing = tuning.cell_spacing.max(MIN_CELL_SPACING);
    let steps = ((2.0 * tuning.grid_extent / spacing).round() as i32).max(0);
    let half_size = spacing * tuning.cell_fill / 2.0;
    let holes = level.holes();

    let mut cells = Vec::new();
    for i in 0..=steps {
        for j in 0..=steps {
            let x = -tuning.grid_extent + i as f32 * spacing;
            let z = -tuning.grid_extent + j as f32 * spacing;
            if in_any_hole(holes, x, z) {
                continue;
            }
            cells.push(BoxCollider {
                position: Vec3::new(x, tuning.floor_y, z),
                half_extents: Vec3::new(half_size, tuning.cell_thickness / 2.0, half_size),
                yaw: 0.0,
                friction: Some(tuning.cell_friction),
            });
        }
    }
    cells
}

/// Curved wall approximated by box segments around the rim
pub fn wall_segments(tuning: &SieveTuning) -> Vec<BoxCollider> {
    let n = tuning.wall_segments.max(1);
    let arc = TAU * tuning.wall_radius / n as f32;
    (0..n)
        .map(|i| {
            let angle = i as f32 / n as f32 * TAU;
            BoxCollider {
                position: Vec3::new(
                    angle.cos() * tuning.wall_radius,
                    tuning.wall_height / 2.0,
                    angle.sin() * tuning.wall_radius,
                ),
                half_extents: Vec3::new(tuning.wall_thickness, tuning.wall_height, arc) / 2.0,
                yaw: -angle,
                friction: None,
            }
        })
        .collect()
}

/// Replace whatever the sink held with the sieve for `level`. Returns the
/// number of colliders declared.
pub fn declare_sieve(level: SieveLevel, tuning: &SieveTuning, sink: &mut impl ColliderSink) -> usize {
    sink.clear_static();
    let colliders: Vec<BoxCollider> = floor_cells(level, tuning).into_iter().chain(wall_segments(tuning)).collect();
    let count = colliders.len();
    for collider in colliders {
        sink.add_static_box(collider);
    }
    log::info!("sieve '{}': {} static colliders", level.label(), count);
    count
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grain {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GrainTuning {
    pub fine_radius: f32,
    pub coarse_radius: f32,
    /// Fraction of spawned grains that are fine
    pub fine_share: f32,
    pub spawn_height: f32,
    pub spawn_spread: f32,
    pub restitution: f32,
    pub default_friction: f32,
    pub tray_y: f32,
    pub max_grains: usize,
}

impl Default for GrainTuning {
    fn default() -> Self {
        Self {
            fine_radius: 0.06,
            coarse_radius: 0.2,
            fine_share: 0.6,
            spawn_height: 2.0,
            spawn_spread: 1.8,
            restitution: 0.3,
            default_friction: 0.2,
            tray_y: -2.5,
            max_grains: 400,
        }
    }
}

const GRAVITY: f32 = 9.81;
const SUBSTEP: f32 = 1.0 / 120.0;

/// Spheres falling onto static boxes
pub struct GrainBed {
    tuning: GrainTuning,
    colliders: Vec<BoxCollider>,
    grains: Vec<Grain>,
    gravity: Vec3,
    /// Simulated time not yet stepped
    backlog: f32,
}

impl ColliderSink for GrainBed {
    fn clear_static(&mut self) {
        self.colliders.clear();
    }

    fn add_static_box(&mut self, collider: BoxCollider) {
        self.colliders.push(collider);
    }
}

impl GrainBed {
    pub fn new(tuning: GrainTuning) -> Self {
        Self {
            tuning,
            colliders: Vec::new(),
            grains: Vec::new(),
            gravity: Vec3::new(0.0, -GRAVITY, 0.0),
            backlog: 0.0,
        }
    }

    pub fn grains(&self) -> &[Grain] {
        &self.grains
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn tuning(&self) -> &GrainTuning {
        &self.tuning
    }

    /// Tilt gravity by `pitch` about X and `roll` about Z (radians)
    pub fn set_tilt(&mut self, pitch: f32, roll: f32) {
        let tilt = Quat::from_rotation_x(pitch) * Quat::from_rotation_z(roll);
        self.gravity = tilt * Vec3::new(0.0, -GRAVITY, 0.0);
    }

    pub fn drop_grain(&mut self, position: Vec3, radius: f32) -> bool {
        if self.grains.len() >= self.tuning.max_grains {
            log::debug!("grain limit reached");
            return false;
        }
        self.grains.push(Grain {
            position,
            velocity: Vec3::ZERO,
            radius,
        });
        true
    }

    /// Scatter `count` grains of mixed sizes above the sieve
    pub fn spawn(&mut self, count: usize, rng: &mut impl Rng) -> usize {
        let spread = self.tuning.spawn_spread;
        let mut spawned = 0;
        for _ in 0..count {
            let radius = if rng.gen_bool(self.tuning.fine_share.clamp(0.0, 1.0) as f64) {
                self.tuning.fine_radius
            } else {
                self.tuning.coarse_radius
            };
            let at = Vec3::new(
                rng.gen_range(-spread..spread),
                self.tuning.spawn_height + rng.gen_range(0.0..1.5),
                rng.gen_range(-spread..spread),
            );
            if !self.drop_grain(at, radius) {
                break;
            }
            spawned += 1;
        }
        spawned
    }

    pub fn clear_grains(&mut self) {
        self.grains.clear();
    }

    /// Grains that made it below the sieve floor
    pub fn passed_through(&self, floor_y: f32) -> usize {
        self.grains.iter().filter(|g| g.position.y + g.radius < floor_y).count()
    }

    pub fn update(&mut self, dt: f32) {
        self.backlog += dt;
        while self.backlog >= SUBSTEP {
            self.backlog -= SUBSTEP;
            self.step(SUBSTEP);
        }
    }

    fn step(&mut self, dt: f32) {
        let tuning = &self.tuning;
        for grain in &mut self.grains {
            grain.velocity += self.gravity * dt;
            grain.position += grain.velocity * dt;

            for collider in &self.colliders {
                let friction = collider.friction.unwrap_or(tuning.default_friction);
                resolve_box_contact(grain, collider, friction, tuning.restitution);
            }

            let floor = tuning.tray_y + grain.radius;
            if grain.position.y < floor {
                grain.position.y = floor;
                grain.velocity.y = grain.velocity.y.abs() * tuning.restitution;
                grain.velocity.x *= 0.9;
                grain.velocity.z *= 0.9;
            }
        }
    }
}

/// Push a grain out of an oriented box and damp its velocity
fn resolve_box_contact(grain: &mut Grain, collider: &BoxCollider, friction: f32, restitution: f32) {
    let to_local = Quat::from_rotation_y(-collider.yaw);
    let local = to_local * (grain.position - collider.position);
    let closest = local.clamp(-collider.half_extents, collider.half_extents);
    let offset = local - closest;
    let distance = offset.length();

    if distance >= grain.radius {
        return;
    }

    let local_normal = if distance > 1e-6 {
        offset / distance
    } else {
        // Center inside the box: leave through the nearest face
        let depth = collider.half_extents - local.abs();
        if depth.y <= depth.x && depth.y <= depth.z {
            Vec3::Y * local.y.signum()
        } else if depth.x <= depth.z {
            Vec3::X * local.x.signum()
        } else {
            Vec3::Z * local.z.signum()
        }
    };
    let normal = to_local.inverse() * local_normal;
    let penetration = grain.radius - distance;
    grain.position += normal * penetration;

    let along = grain.velocity.dot(normal);
    if along < 0.0 {
        let normal_velocity = normal * along;
        let tangent = grain.velocity - normal_velocity;
        grain.velocity = tangent * (1.0 - friction) - normal_velocity * restitution;
    }
}

/// A sieve over a tray of grains, with the level switchable at runtime
pub struct SieveBench {
    level: SieveLevel,
    sieve: SieveTuning,
    bed: GrainBed,
    cells: Vec<BoxCollider>,
    pitch: f32,
    roll: f32,
    rng: StdRng,
}

const MAX_TILT: f32 = 0.35;
const PASS_LINE: f32 = -0.5;

impl SieveBench {
    pub fn new(level: SieveLevel, sieve: SieveTuning, grains: GrainTuning) -> Self {
        let mut bench = Self {
            level,
            cells: Vec::new(),
            sieve,
            bed: GrainBed::new(grains),
            pitch: 0.0,
            roll: 0.0,
            rng: StdRng::seed_from_u64(11),
        };
        bench.rebuild();
        bench
    }

    fn rebuild(&mut self) {
        declare_sieve(self.level, &self.sieve, &mut self.bed);
        self.cells = floor_cells(self.level, &self.sieve);
    }

    pub fn level(&self) -> SieveLevel {
        self.level
    }

    pub fn bed(&self) -> &GrainBed {
        &self.bed
    }

    /// Swap the sieve. Grains already dropped stay where they are.
    pub fn set_level(&mut self, level: SieveLevel) -> bool {
        if level == self.level {
            return false;
        }
        self.level = level;
        self.rebuild();
        true
    }

    pub fn spawn(&mut self, count: usize) -> usize {
        self.bed.spawn(count, &mut self.rng)
    }

    pub fn clear(&mut self) {
        self.bed.clear_grains();
        self.pitch = 0.0;
        self.roll = 0.0;
        self.bed.set_tilt(0.0, 0.0);
    }

    /// Nudge the tilt, clamped to a gentle shake
    pub fn tilt(&mut self, d_pitch: f32, d_roll: f32) {
        self.pitch = (self.pitch + d_pitch).clamp(-MAX_TILT, MAX_TILT);
        self.roll = (self.roll + d_roll).clamp(-MAX_TILT, MAX_TILT);
        self.bed.set_tilt(self.pitch, self.roll);
    }

    /// Counts of (fine, coarse) grains below the sieve
    pub fn passed(&self) -> (usize, usize) {
        let fine_radius = self.bed.tuning().fine_radius;
        self.bed
            .grains()
            .iter()
            .filter(|g| g.position.y + g.radius < PASS_LINE)
            .fold((0, 0), |(fine, coarse), g| {
                if g.radius <= fine_radius {
                    (fine + 1, coarse)
                } else {
                    (fine, coarse + 1)
                }
            })
    }

    pub fn update(&mut self, dt: f32) {
        self.bed.update(dt);
    }

    pub fn build_frame(&self, frame: &mut FrameBuilder) {
        let steel = [0.62, 0.64, 0.68, 1.0];
        for cell in &self.cells {
            frame.push_box(cell.position, cell.half_extents, steel);
        }

        let rim = |y: f32| -> Vec<Vec3> {
            (0..=64)
                .map(|i| {
                    let angle = i as f32 / 64.0 * TAU;
                    Vec3::new(angle.cos(), 0.0, angle.sin()) * self.sieve.wall_radius + Vec3::Y * y
                })
                .collect()
        };
        let wall = [0.35, 0.37, 0.42, 1.0];
        frame.push_polyline(&rim(self.sieve.floor_y), wall);
        frame.push_polyline(&rim(1.0), wall);
        for segment in wall_segments(&self.sieve).iter().step_by(4) {
            let foot = Vec3::new(segment.position.x, self.sieve.floor_y, segment.position.z);
            frame.push_line(foot, Vec3::new(foot.x, 1.0, foot.z), wall);
        }

        let tray = self.bed.tuning().tray_y;
        frame.push_box(Vec3::new(0.0, tray - 0.05, 0.0), Vec3::new(3.2, 0.05, 3.2), [0.3, 0.22, 0.16, 1.0]);

        for grain in self.bed.grains() {
            let color = if grain.radius <= self.bed.tuning().fine_radius {
                [0.95, 0.85, 0.55, 1.0]
            } else {
                [0.45, 0.3, 0.2, 1.0]
            };
            frame.push_sphere(grain.position, grain.radius, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bed_for(level: SieveLevel) -> GrainBed {
        let mut bed = GrainBed::new(GrainTuning::default());
        declare_sieve(level, &SieveTuning::default(), &mut bed);
        bed
    }

    fn settle(bed: &mut GrainBed, seconds: f32) {
        for _ in 0..(seconds * 60.0) as usize {
            bed.update(1.0 / 60.0);
        }
    }

    #[test]
    fn test_blocked_floor_is_full_grid() {
        let cells = floor_cells(SieveLevel::Blocked, &SieveTuning::default());
        assert_eq!(cells.len(), 21 * 21);
        assert!(cells.iter().all(|c| c.position.y == -0.2 && c.friction == Some(0.1)));
        assert!((cells[0].half_extents.x - 0.1425).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_spacing_is_clamped() {
        for spacing in [0.0, -0.3, f32::NAN] {
            let tuning = SieveTuning {
                grid_extent: 0.5,
                cell_spacing: spacing,
                ..SieveTuning::default()
            };
            let cells = floor_cells(SieveLevel::Blocked, &tuning);
            assert_eq!(cells.len(), 101 * 101);
            assert!(cells.iter().all(|c| c.position.is_finite() && c.half_extents.x > 0.0));
        }
    }

    #[test]
    fn test_hole_cells_are_skipped() {
        let tuning = SieveTuning::default();
        for level in [SieveLevel::Large, SieveLevel::Medium] {
            let cells = floor_cells(level, &tuning);
            assert!(cells.len() < 21 * 21);
            assert!(cells
                .iter()
                .all(|c| !in_any_hole(level.holes(), c.position.x, c.position.z)));
        }
        // The medium hole at the origin removes exactly the center cell
        let medium = floor_cells(SieveLevel::Medium, &tuning);
        assert!(!medium.iter().any(|c| c.position.x.abs() < 1e-4 && c.position.z.abs() < 1e-4));
        assert!(medium.iter().any(|c| (c.position.x - 0.3).abs() < 1e-4 && c.position.z.abs() < 1e-4));
    }

    #[test]
    fn test_wall_ring() {
        let tuning = SieveTuning::default();
        let walls = wall_segments(&tuning);
        assert_eq!(walls.len(), 32);
        for wall in &walls {
            let radial = Vec3::new(wall.position.x, 0.0, wall.position.z).length();
            assert!((radial - 2.85).abs() < 1e-4);
            assert_eq!(wall.position.y, 2.5);
            assert_eq!(wall.half_extents.x, 0.075);
        }
        assert_eq!(walls[8].yaw, -TAU / 4.0);
    }

    #[test]
    fn test_declare_replaces_previous_level() {
        let mut bed = bed_for(SieveLevel::Blocked);
        assert_eq!(bed.collider_count(), 21 * 21 + 32);
        let count = declare_sieve(SieveLevel::Large, &SieveTuning::default(), &mut bed);
        assert_eq!(bed.collider_count(), count);
        assert!(count < 21 * 21 + 32);
    }

    #[test]
    fn test_blocked_sieve_holds_everything() {
        let mut bed = bed_for(SieveLevel::Blocked);
        bed.drop_grain(Vec3::new(0.0, 1.0, 0.0), 0.06);
        bed.drop_grain(Vec3::new(1.0, 1.0, 1.0), 0.2);
        settle(&mut bed, 2.0);
        assert_eq!(bed.passed_through(-0.5), 0);
        for grain in bed.grains() {
            assert!((grain.position.y - (-0.175 + grain.radius)).abs() < 0.02);
        }
    }

    #[test]
    fn test_medium_holes_separate_by_size() {
        let mut bed = bed_for(SieveLevel::Medium);
        bed.drop_grain(Vec3::new(0.0, 1.0, 0.0), 0.06);
        settle(&mut bed, 2.0);
        assert_eq!(bed.passed_through(-0.5), 1);

        bed.clear_grains();
        bed.drop_grain(Vec3::new(0.0, 1.0, 0.0), 0.2);
        settle(&mut bed, 2.0);
        assert_eq!(bed.passed_through(-0.5), 0);
    }

    #[test]
    fn test_large_holes_pass_coarse_grains() {
        let mut bed = bed_for(SieveLevel::Large);
        bed.drop_grain(Vec3::new(0.0, 1.0, 0.45), 0.2);
        settle(&mut bed, 2.0);
        assert_eq!(bed.passed_through(-0.5), 1);
    }

    #[test]
    fn test_grains_rest_on_the_tray() {
        let mut bed = GrainBed::new(GrainTuning::default());
        bed.drop_grain(Vec3::ZERO, 0.1);
        settle(&mut bed, 3.0);
        assert!((bed.grains()[0].position.y - (-2.4)).abs() < 0.01);
    }

    #[test]
    fn test_spawn_respects_limit() {
        let mut bed = GrainBed::new(GrainTuning {
            max_grains: 10,
            ..GrainTuning::default()
        });
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(bed.spawn(25, &mut rng), 10);
        assert_eq!(bed.grains().len(), 10);
        assert!(bed
            .grains()
            .iter()
            .all(|g| g.radius == 0.06 || g.radius == 0.2));
    }

    #[test]
    fn test_bench_level_switch_redeclares() {
        let mut bench = SieveBench::new(SieveLevel::Blocked, SieveTuning::default(), GrainTuning::default());
        assert_eq!(bench.bed().collider_count(), 21 * 21 + 32);
        assert!(!bench.set_level(SieveLevel::Blocked));
        assert!(bench.set_level(SieveLevel::Medium));
        let expected = floor_cells(SieveLevel::Medium, &SieveTuning::default()).len() + 32;
        assert_eq!(bench.bed().collider_count(), expected);
    }

    #[test]
    fn test_bench_tilt_is_clamped() {
        let mut bench = SieveBench::new(SieveLevel::Blocked, SieveTuning::default(), GrainTuning::default());
        for _ in 0..20 {
            bench.tilt(0.1, -0.1);
        }
        assert_eq!(bench.pitch, MAX_TILT);
        assert_eq!(bench.roll, -MAX_TILT);
        bench.clear();
        assert_eq!(bench.pitch, 0.0);
    }

    #[test]
    fn test_bench_counts_passed_by_size() {
        let mut bench = SieveBench::new(SieveLevel::Medium, SieveTuning::default(), GrainTuning::default());
        bench.bed.drop_grain(Vec3::new(0.0, 1.0, 0.0), 0.06);
        bench.bed.drop_grain(Vec3::new(0.75, 1.0, 0.75), 0.2);
        for _ in 0..120 {
            bench.update(1.0 / 60.0);
        }
        assert_eq!(bench.passed(), (1, 0));

        let mut frame = FrameBuilder::new();
        bench.build_frame(&mut frame);
        assert_eq!(frame.sphere_count(), 2);
    }
}
