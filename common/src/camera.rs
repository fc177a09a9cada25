//! Orbit camera and camera tweening

use glam::{Mat4, Vec3};

use crate::animation::ease_in_out_quad;

/// A camera position together with the point it looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Interpolate both position and target with the same factor
    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(other.position, t),
            target: self.target.lerp(other.target, t),
        }
    }
}

/// 3D perspective camera with orbital controls
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    // Orbital parameters
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Camera3D {
    pub fn new(aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 50.0f32.to_radians(),
            aspect_ratio,
            near: 0.01,
            far: 1000.0,
            distance: 10.0,
            yaw: 0.0,
            pitch: 0.3,
            min_distance: 0.05,
            max_distance: 500.0,
            min_pitch: -1.5,
            max_pitch: 1.5,
        };
        camera.update_orbital();
        camera
    }

    /// Update camera position based on orbital parameters
    pub fn update_orbital(&mut self) {
        self.position = self.target
            + Vec3::new(
                self.distance * self.pitch.cos() * self.yaw.sin(),
                self.distance * self.pitch.sin(),
                self.distance * self.pitch.cos() * self.yaw.cos(),
            );
    }

    /// Orbit the camera around the target
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(self.min_pitch, self.max_pitch);
        self.update_orbital();
    }

    /// Zoom in/out
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(self.min_distance, self.max_distance);
        self.update_orbital();
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.target)
    }

    /// Place the camera at an explicit pose and rederive the orbital
    /// parameters so that orbiting continues from there.
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.target = pose.target;

        let offset = pose.position - pose.target;
        let distance = offset.length();
        if distance > f32::EPSILON {
            self.distance = distance;
            self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
            self.yaw = offset.x.atan2(offset.z);
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera3D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        }
    }
}

/// A single eased flight between two poses
#[derive(Debug, Clone)]
pub struct CameraTween {
    start: CameraPose,
    end: CameraPose,
    duration: f32,
    elapsed: f32,
}

impl CameraTween {
    pub fn new(start: CameraPose, end: CameraPose, duration: f32) -> Self {
        Self {
            start,
            end,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Pose at the current elapsed time. Exactly `end` once finished.
    pub fn pose(&self) -> CameraPose {
        if self.is_finished() {
            return self.end;
        }
        self.start.lerp(&self.end, ease_in_out_quad(self.progress()))
    }

    pub fn advance(&mut self, dt: f32) -> CameraPose {
        self.elapsed += dt.max(0.0);
        self.pose()
    }
}

/// Drives at most one camera tween at a time.
///
/// Requests made while a flight is in progress are dropped, not queued.
#[derive(Debug, Default)]
pub struct CameraRig {
    active: Option<CameraTween>,
}

impl CameraRig {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Start flying from `from` to `to`. Returns false when a flight is
    /// already running.
    pub fn fly(&mut self, from: CameraPose, to: CameraPose, duration: f32) -> bool {
        if self.active.is_some() {
            log::debug!("camera flight already in progress; request dropped");
            return false;
        }
        self.active = Some(CameraTween::new(from, to, duration));
        true
    }

    /// Advance the flight and apply it to the camera. Returns true on the
    /// frame the flight lands.
    pub fn update(&mut self, camera: &mut Camera3D, dt: f32) -> bool {
        let Some(tween) = self.active.as_mut() else {
            return false;
        };

        let pose = tween.advance(dt);
        camera.set_pose(pose);

        if tween.is_finished() {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Drop the current flight, leaving the camera where it is
    pub fn cancel(&mut self) {
        self.active = None;
    }
}
