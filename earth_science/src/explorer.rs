//! Solar system explorer
//!
//! Four earths circle the sun, one per season, each with a landing marker at
//! its starting point. Clicking a marker stops the orbits, hides everything
//! but the chosen earth and flies the camera down to it; on arrival the
//! surface view replaces the planet. Clicking the sun returns to orbit view.

use common::camera::{Camera3D, CameraPose, CameraRig};
use common::picking::{pick_nearest, Ray, Shape};
use common::renderer::FrameBuilder;
use common::scene_graph::SceneGraph;
use glam::{Quat, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }

    /// Landing marker, also where this season's earth starts its orbit
    pub fn marker(self) -> Vec3 {
        match self {
            Season::Spring => Vec3::new(0.0, 0.0, 5.0),
            Season::Summer => Vec3::new(5.0, 0.0, 0.0),
            Season::Autumn => Vec3::new(0.0, 0.0, -5.0),
            Season::Winter => Vec3::new(-5.0, 0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExplorerTuning {
    /// Radians per second around the sun
    pub orbit_speed: f32,
    pub spin_speed: f32,
    pub flight_seconds: f32,
    pub sun_radius: f32,
    pub earth_radius: f32,
    pub marker_radius: f32,
    pub surface_radius: f32,
    pub home_eye: [f32; 3],
    pub star_count: usize,
}

impl Default for ExplorerTuning {
    fn default() -> Self {
        Self {
            orbit_speed: 0.2,
            spin_speed: 1.0,
            flight_seconds: 2.0,
            sun_radius: 1.5,
            earth_radius: 0.4,
            marker_radius: 0.5,
            surface_radius: 3.0,
            home_eye: [0.0, 5.0, 8.0],
            star_count: 400,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Orbit,
    /// Flying down to the earth of the given season
    Flying(Season),
    Surface(Season),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Sun,
    Marker(Season),
}

#[derive(Debug, Clone)]
struct Earth {
    season: Season,
    position: Vec3,
    visible: bool,
    model: Option<SceneGraph>,
}

pub struct SolarExplorer {
    tuning: ExplorerTuning,
    view: View,
    earths: Vec<Earth>,
    orbit_time: f32,
    spin: f32,
    rig: CameraRig,
    pending: Option<CameraPose>,
    stars: Vec<Vec3>,
}

impl SolarExplorer {
    /// `earth_model` is drawn for every earth when present; otherwise earths
    /// are plain spheres.
    pub fn new(tuning: ExplorerTuning, earth_model: Option<&SceneGraph>) -> Self {
        let earths = Season::ALL
            .iter()
            .map(|&season| Earth {
                season,
                position: season.marker(),
                visible: true,
                model: earth_model.cloned(),
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(7);
        let stars = (0..tuning.star_count)
            .map(|_| {
                let dir = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                dir.try_normalize().unwrap_or(Vec3::Y) * rng.gen_range(40.0..70.0)
            })
            .collect();

        Self {
            tuning,
            view: View::Orbit,
            earths,
            orbit_time: 0.0,
            spin: 0.0,
            rig: CameraRig::new(),
            pending: None,
            stars,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn home(&self) -> CameraPose {
        CameraPose::new(Vec3::from(self.tuning.home_eye), Vec3::ZERO)
    }

    pub fn is_orbiting(&self) -> bool {
        self.view == View::Orbit
    }

    pub fn sun_visible(&self) -> bool {
        !matches!(self.view, View::Surface(_))
    }

    pub fn markers_visible(&self) -> bool {
        self.view == View::Orbit
    }

    pub fn earth_position(&self, season: Season) -> Vec3 {
        self.earth(season).map(|e| e.position).unwrap_or(season.marker())
    }

    pub fn earth_visible(&self, season: Season) -> bool {
        self.earth(season).is_some_and(|e| e.visible)
    }

    fn earth(&self, season: Season) -> Option<&Earth> {
        self.earths.iter().find(|e| e.season == season)
    }

    /// Where the camera lands when visiting a season
    pub fn surface_pose(&self, season: Season) -> CameraPose {
        let marker = season.marker();
        let outward = marker.normalize_or_zero();
        CameraPose::new(marker + outward * 2.5 + Vec3::Y * 1.5, marker)
    }

    /// Nearest clickable thing under the ray
    pub fn pick(&self, ray: &Ray) -> Option<Target> {
        let mut candidates = Vec::new();
        if self.sun_visible() {
            candidates.push((
                Target::Sun,
                vec![Shape::Sphere {
                    center: Vec3::ZERO,
                    radius: self.tuning.sun_radius,
                }],
            ));
        }
        if self.markers_visible() {
            for season in Season::ALL {
                candidates.push((
                    Target::Marker(season),
                    vec![Shape::Sphere {
                        center: season.marker(),
                        radius: self.tuning.marker_radius,
                    }],
                ));
            }
        }
        pick_nearest(ray, candidates).map(|hit| hit.key)
    }

    /// React to a click. Returns false when the target is not clickable in
    /// the current view.
    pub fn click(&mut self, target: Target) -> bool {
        match target {
            Target::Marker(season) if self.markers_visible() => {
                for earth in &mut self.earths {
                    earth.visible = earth.season == season;
                    if earth.visible {
                        earth.position = season.marker();
                    }
                }
                self.view = View::Flying(season);
                self.rig.cancel();
                self.pending = Some(self.surface_pose(season));
                log::info!("flying to {}", season.name());
                true
            }
            Target::Sun if self.sun_visible() => {
                self.reset();
                true
            }
            _ => {
                log::debug!("{:?} is not clickable in {:?}", target, self.view);
                false
            }
        }
    }

    /// Back to the orbit view with every earth circling again
    pub fn reset(&mut self) {
        for earth in &mut self.earths {
            earth.visible = true;
            earth.position = earth.season.marker();
        }
        self.orbit_time = 0.0;
        self.view = View::Orbit;
        self.rig.cancel();
        self.pending = Some(self.home());
        log::info!("back to orbit view");
    }

    pub fn update(&mut self, dt: f32, camera: &mut Camera3D) {
        if self.is_orbiting() {
            self.orbit_time += dt;
            let turn = Quat::from_rotation_y(-self.tuning.orbit_speed * self.orbit_time);
            for earth in &mut self.earths {
                earth.position = turn * earth.season.marker();
            }
        }
        if !matches!(self.view, View::Surface(_)) {
            self.spin += self.tuning.spin_speed * dt;
        }

        if let Some(to) = self.pending.take() {
            self.rig.fly(camera.pose(), to, self.tuning.flight_seconds);
        }
        if self.rig.update(camera, dt) {
            if let View::Flying(season) = self.view {
                self.view = View::Surface(season);
                for earth in &mut self.earths {
                    earth.visible = false;
                }
                log::info!("landed on {} earth", season.name());
            }
        }
    }

    pub fn build_frame(&self, frame: &mut FrameBuilder) {
        frame.clear_color = [0.0, 0.0, 0.02];
        frame.show_grid = false;

        if let View::Surface(season) = self.view {
            let marker = season.marker();
            let outward = marker.normalize_or_zero();
            frame.push_sphere(marker - outward * self.tuning.surface_radius, self.tuning.surface_radius, [0.2, 0.45, 0.8, 1.0]);
            // Stick figure standing on the surface
            for i in 0..4 {
                frame.push_sphere(marker + outward * (0.12 + i as f32 * 0.14), 0.07, [0.95, 0.8, 0.65, 1.0]);
            }
            frame.push_sphere(marker + outward * 0.72, 0.1, [0.95, 0.8, 0.65, 1.0]);
            return;
        }

        for star in &self.stars {
            frame.push_sphere(*star, 0.12, [1.0, 1.0, 0.95, 1.0]);
        }
        frame.push_sphere(Vec3::ZERO, self.tuning.sun_radius, [1.0, 0.75, 0.2, 1.0]);

        for earth in self.earths.iter().filter(|e| e.visible) {
            match &earth.model {
                Some(model) => {
                    let mut placed = model.clone();
                    let root = placed.root();
                    if let Some(node) = placed.node_mut(root) {
                        node.transform.translation = earth.position;
                        node.transform.rotation = Quat::from_rotation_y(self.spin);
                    }
                    frame.push_scene(&placed);
                }
                None => frame.push_sphere(earth.position, self.tuning.earth_radius, [0.25, 0.5, 0.9, 1.0]),
            }
        }

        if self.markers_visible() {
            for season in Season::ALL {
                frame.push_sphere(season.marker(), self.tuning.marker_radius, [1.0, 1.0, 1.0, 0.2]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explorer_and_camera() -> (SolarExplorer, Camera3D) {
        let explorer = SolarExplorer::new(ExplorerTuning::default(), None);
        let mut camera = Camera3D::new(16.0 / 9.0);
        camera.set_pose(explorer.home());
        (explorer, camera)
    }

    fn run(explorer: &mut SolarExplorer, camera: &mut Camera3D, seconds: f32) {
        let frames = (seconds * 60.0) as usize;
        for _ in 0..frames {
            explorer.update(1.0 / 60.0, camera);
        }
    }

    #[test]
    fn test_earths_orbit_at_fixed_rate() {
        let (mut explorer, mut camera) = explorer_and_camera();
        explorer.update(1.0, &mut camera);
        let at = explorer.earth_position(Season::Summer);
        assert!((at.length() - 5.0).abs() < 1e-4);
        let angle = at.z.atan2(at.x);
        assert!((angle - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_marker_click_lands_on_surface() {
        let (mut explorer, mut camera) = explorer_and_camera();
        run(&mut explorer, &mut camera, 1.0);

        assert!(explorer.click(Target::Marker(Season::Winter)));
        assert_eq!(explorer.view(), View::Flying(Season::Winter));
        assert!(explorer.earth_visible(Season::Winter));
        assert!(!explorer.earth_visible(Season::Summer));
        assert_eq!(explorer.earth_position(Season::Winter), Season::Winter.marker());

        // Orbits are frozen during the flight
        run(&mut explorer, &mut camera, 1.0);
        assert_eq!(explorer.earth_position(Season::Winter), Season::Winter.marker());

        run(&mut explorer, &mut camera, 1.5);
        assert_eq!(explorer.view(), View::Surface(Season::Winter));
        assert_eq!(camera.pose(), explorer.surface_pose(Season::Winter));
        assert!(!explorer.sun_visible());
        assert!(!explorer.earth_visible(Season::Winter));
    }

    #[test]
    fn test_markers_ignored_away_from_orbit() {
        let (mut explorer, mut camera) = explorer_and_camera();
        explorer.click(Target::Marker(Season::Spring));
        explorer.update(0.1, &mut camera);
        assert!(!explorer.click(Target::Marker(Season::Autumn)));
        assert_eq!(explorer.view(), View::Flying(Season::Spring));
    }

    #[test]
    fn test_sun_click_returns_to_orbit() {
        let (mut explorer, mut camera) = explorer_and_camera();
        explorer.click(Target::Marker(Season::Summer));
        run(&mut explorer, &mut camera, 0.5);

        assert!(explorer.click(Target::Sun));
        assert!(explorer.is_orbiting());
        for season in Season::ALL {
            assert!(explorer.earth_visible(season));
        }
        run(&mut explorer, &mut camera, 2.5);
        assert_eq!(camera.pose(), explorer.home());
    }

    #[test]
    fn test_sun_hidden_on_surface() {
        let (mut explorer, mut camera) = explorer_and_camera();
        explorer.click(Target::Marker(Season::Autumn));
        run(&mut explorer, &mut camera, 3.0);
        assert!(!explorer.click(Target::Sun));

        explorer.reset();
        assert!(explorer.is_orbiting());
    }

    #[test]
    fn test_pick_prefers_nearest() {
        let (explorer, _) = explorer_and_camera();
        // Along +x from far away: the summer marker is in front of the sun
        let ray = Ray::new(Vec3::new(20.0, 0.0, 0.0), -Vec3::X);
        assert_eq!(explorer.pick(&ray), Some(Target::Marker(Season::Summer)));

        let ray = Ray::new(Vec3::new(0.0, 20.0, 0.0), -Vec3::Y);
        assert_eq!(explorer.pick(&ray), Some(Target::Sun));

        let ray = Ray::new(Vec3::new(0.0, 20.0, 0.0), Vec3::Y);
        assert_eq!(explorer.pick(&ray), None);
    }

    #[test]
    fn test_earth_model_drawn_for_each_earth() {
        let mut model = SceneGraph::new("earth");
        let root = model.root();
        model.add_box(root, "globe", Vec3::ZERO, Vec3::splat(0.4), [0.2, 0.4, 0.9, 1.0]);

        let explorer = SolarExplorer::new(ExplorerTuning::default(), Some(&model));
        let mut frame = FrameBuilder::new();
        explorer.build_frame(&mut frame);
        assert_eq!(frame.box_count(), 4);
    }
}
