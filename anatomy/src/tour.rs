//! Guided tour of labelled spots in a room
//!
//! Clicking a spot's label flies the camera to that spot's viewpoint; the
//! back button flies home. Only one flight runs at a time and requests made
//! during a flight are dropped.

use common::camera::{Camera3D, CameraPose, CameraRig};
use common::scene_graph::SceneGraph;
use glam::Vec3;
use serde::Deserialize;

/// A labelled point of interest and where the camera looks at it from
#[derive(Debug, Clone)]
pub struct TourStop {
    pub label: &'static str,
    pub detail: &'static str,
    pub color: [f32; 4],
    /// Where the label sits and what the camera looks at
    pub anchor: Vec3,
    /// Camera position while visiting
    pub eye: Vec3,
}

impl TourStop {
    pub fn view(&self) -> CameraPose {
        CameraPose::new(self.eye, self.anchor)
    }
}

fn hex_color(rgb: u32) -> [f32; 4] {
    let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

pub fn default_stops() -> Vec<TourStop> {
    vec![
        TourStop {
            label: "Clean smudges with glass cleaner",
            detail: "Glass cleaner is basic. It lifts greasy fingerprints off the window.",
            color: hex_color(0x2985ee),
            anchor: Vec3::new(-1.8, 1.0, -1.2),
            eye: Vec3::new(-1.0, 2.0, 1.0),
        },
        TourStop {
            label: "Scrub the toilet with toilet cleaner",
            detail: "Toilet cleaner is acidic. It dissolves mineral stains.",
            color: hex_color(0x25e5c2),
            anchor: Vec3::new(4.3, 1.0, 0.8),
            eye: Vec3::new(2.0, 2.0, 3.0),
        },
        TourStop {
            label: "Wash the bathroom with bleach",
            detail: "Bleach is strongly basic. Never mix it with acidic cleaners.",
            color: hex_color(0x129d3a),
            anchor: Vec3::new(4.3, 0.45, 1.8),
            eye: Vec3::new(1.0, 1.5, 2.5),
        },
        TourStop {
            label: "Remove fishy smells with vinegar",
            detail: "Vinegar is acidic. It neutralizes the basic compounds that smell fishy.",
            color: hex_color(0xff6b6b),
            anchor: Vec3::new(-2.7, 1.0, 3.1),
            eye: Vec3::new(-1.0, 3.0, -0.5),
        },
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TourTuning {
    pub flight_seconds: f32,
    pub home_eye: [f32; 3],
    pub home_target: [f32; 3],
}

impl Default for TourTuning {
    fn default() -> Self {
        Self {
            flight_seconds: 1.0,
            home_eye: [-10.0, 5.0, 0.0],
            home_target: [0.0, 0.0, 0.0],
        }
    }
}

impl TourTuning {
    pub fn home(&self) -> CameraPose {
        CameraPose::new(Vec3::from(self.home_eye), Vec3::from(self.home_target))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Home,
    Stop(usize),
}

pub struct Tour {
    stops: Vec<TourStop>,
    home: CameraPose,
    flight_seconds: f32,
    rig: CameraRig,
    pending: Option<Destination>,
    focus: Option<usize>,
}

impl Tour {
    pub fn new(stops: Vec<TourStop>, tuning: &TourTuning) -> Self {
        Self {
            stops,
            home: tuning.home(),
            flight_seconds: tuning.flight_seconds,
            rig: CameraRig::new(),
            pending: None,
            focus: None,
        }
    }

    pub fn stops(&self) -> &[TourStop] {
        &self.stops
    }

    pub fn home(&self) -> CameraPose {
        self.home
    }

    /// Stop currently visited (or being flown to)
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// True while away from home; the back button is shown
    pub fn is_zoomed(&self) -> bool {
        self.focus.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.pending.is_some() || self.rig.is_animating()
    }

    pub fn pose_of(&self, destination: Destination) -> Option<CameraPose> {
        match destination {
            Destination::Home => Some(self.home),
            Destination::Stop(index) => self.stops.get(index).map(TourStop::view),
        }
    }

    /// Ask for a flight. Returns false when one is already under way or the
    /// stop does not exist.
    pub fn request(&mut self, destination: Destination) -> bool {
        if self.is_animating() {
            log::debug!("tour flight in progress; {:?} dropped", destination);
            return false;
        }
        if self.pose_of(destination).is_none() {
            log::debug!("no such tour stop: {:?}", destination);
            return false;
        }

        self.focus = match destination {
            Destination::Home => None,
            Destination::Stop(index) => Some(index),
        };
        self.pending = Some(destination);
        true
    }

    /// Start any requested flight from the camera's current pose and advance
    /// it. Returns true on the frame the camera lands.
    pub fn update(&mut self, camera: &mut Camera3D, dt: f32) -> bool {
        if let Some(to) = self.pending.take().and_then(|d| self.pose_of(d)) {
            self.rig.fly(camera.pose(), to, self.flight_seconds);
        }
        let landed = self.rig.update(camera, dt);
        if landed {
            log::info!("camera arrived at {:?}", self.focus.map(|i| self.stops[i].label));
        }
        landed
    }
}

/// Procedural room with a window, bathroom fixtures and a kitchen counter
pub fn build_room() -> SceneGraph {
    let mut graph = SceneGraph::new("room");
    let root = graph.root();
    let wall = [0.93, 0.91, 0.87, 1.0];

    graph.add_box(root, "floor", Vec3::new(0.0, -0.05, 0.5), Vec3::new(5.5, 0.05, 4.0), [0.75, 0.68, 0.58, 1.0]);
    graph.add_box(root, "back_wall", Vec3::new(0.0, 1.5, -3.5), Vec3::new(5.5, 1.5, 0.05), wall);
    graph.add_box(root, "side_wall", Vec3::new(5.5, 1.5, 0.5), Vec3::new(0.05, 1.5, 4.0), wall);
    graph.add_box(root, "partition", Vec3::new(2.8, 1.2, 1.0), Vec3::new(0.05, 1.2, 2.0), wall);

    graph.add_box(root, "window_frame", Vec3::new(-1.8, 1.0, -1.25), Vec3::new(0.8, 0.6, 0.03), [0.95, 0.95, 0.95, 1.0]);
    graph.add_box(root, "window_glass", Vec3::new(-1.8, 1.0, -1.2), Vec3::new(0.7, 0.5, 0.02), [0.7, 0.85, 0.95, 0.35]);

    graph.add_box(root, "toilet_base", Vec3::new(4.3, 0.3, 0.8), Vec3::new(0.25, 0.3, 0.3), [1.0, 1.0, 1.0, 1.0]);
    graph.add_box(root, "toilet_tank", Vec3::new(4.9, 0.8, 0.8), Vec3::new(0.12, 0.3, 0.3), [1.0, 1.0, 1.0, 1.0]);
    graph.add_box(root, "bathtub", Vec3::new(4.3, 0.25, 2.2), Vec3::new(1.0, 0.25, 0.6), [0.95, 0.97, 1.0, 1.0]);

    graph.add_box(root, "counter", Vec3::new(-2.7, 0.45, 3.1), Vec3::new(1.2, 0.45, 0.4), [0.55, 0.4, 0.3, 1.0]);
    graph.add_box(root, "fish_plate", Vec3::new(-2.7, 0.93, 3.1), Vec3::new(0.25, 0.02, 0.15), [0.9, 0.9, 0.95, 1.0]);

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour_and_camera() -> (Tour, Camera3D) {
        let tuning = TourTuning::default();
        let tour = Tour::new(default_stops(), &tuning);
        let mut camera = Camera3D::new(16.0 / 9.0);
        camera.set_pose(tuning.home());
        (tour, camera)
    }

    fn fly_until_landed(tour: &mut Tour, camera: &mut Camera3D) -> u32 {
        let mut frames = 0;
        while !tour.update(camera, 1.0 / 60.0) {
            frames += 1;
            assert!(frames < 200, "flight never landed");
        }
        frames
    }

    #[test]
    fn test_label_click_flies_to_stop() {
        let (mut tour, mut camera) = tour_and_camera();
        assert!(tour.request(Destination::Stop(0)));
        assert!(tour.is_zoomed());

        fly_until_landed(&mut tour, &mut camera);
        let view = tour.stops()[0].view();
        assert_eq!(camera.pose(), view);
        assert!(!tour.is_animating());
    }

    #[test]
    fn test_clicks_during_flight_are_dropped() {
        let (mut tour, mut camera) = tour_and_camera();
        assert!(tour.request(Destination::Stop(1)));
        tour.update(&mut camera, 0.2);

        assert!(!tour.request(Destination::Stop(2)));
        assert!(!tour.request(Destination::Home));
        assert_eq!(tour.focus(), Some(1));

        fly_until_landed(&mut tour, &mut camera);
        assert_eq!(camera.pose(), tour.stops()[1].view());
    }

    #[test]
    fn test_back_returns_home() {
        let (mut tour, mut camera) = tour_and_camera();
        tour.request(Destination::Stop(3));
        fly_until_landed(&mut tour, &mut camera);

        assert!(tour.request(Destination::Home));
        assert!(!tour.is_zoomed());
        fly_until_landed(&mut tour, &mut camera);
        assert_eq!(camera.pose(), tour.home());
    }

    #[test]
    fn test_unknown_stop_is_rejected() {
        let (mut tour, _) = tour_and_camera();
        assert!(!tour.request(Destination::Stop(9)));
        assert!(!tour.is_animating());
        assert!(!tour.is_zoomed());
    }

    #[test]
    fn test_flight_takes_about_a_second() {
        let (mut tour, mut camera) = tour_and_camera();
        tour.request(Destination::Stop(2));
        let frames = fly_until_landed(&mut tour, &mut camera);
        assert!((58..=61).contains(&frames));
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color(0xff0000), [1.0, 0.0, 0.0, 1.0]);
    }
}
