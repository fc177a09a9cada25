//! Pointer-to-world resolution: screen point → picking ray → nearest hit

use glam::{Vec2, Vec3, Vec4};

use crate::camera::Camera3D;

/// Screen-space rectangle the scene is rendered into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Normalize a screen point into [-1, 1] device coordinates, y up
    pub fn to_ndc(&self, screen: Vec2) -> Vec2 {
        let width = self.width.max(1.0);
        let height = self.height.max(1.0);
        Vec2::new(
            ((screen.x - self.left) / width) * 2.0 - 1.0,
            -((screen.y - self.top) / height) * 2.0 + 1.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Build the world-space ray through a point given in device coordinates
    pub fn from_ndc(camera: &Camera3D, ndc: Vec2) -> Self {
        let inv = camera.view_projection().inverse();
        let near = inv * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Self::new(near, far - near)
    }

    pub fn from_screen(camera: &Camera3D, viewport: &Viewport, screen: Vec2) -> Self {
        Self::from_ndc(camera, viewport.to_ndc(screen))
    }
}

/// Screen position of a world point, or None when it is behind the camera
pub fn project(camera: &Camera3D, viewport: &Viewport, world: Vec3) -> Option<Vec2> {
    let clip = camera.view_projection() * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        viewport.left + (ndc.x + 1.0) * 0.5 * viewport.width,
        viewport.top + (1.0 - ndc.y) * 0.5 * viewport.height,
    ))
}

/// Pickable volumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Aabb { min: Vec3, max: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

impl Shape {
    pub fn aabb(center: Vec3, half_extents: Vec3) -> Self {
        Shape::Aabb {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Distance along the ray to the first intersection in front of the origin
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match *self {
            Shape::Aabb { min, max } => intersect_aabb(ray, min, max),
            Shape::Sphere { center, radius } => intersect_sphere(ray, center, radius),
        }
    }
}

pub fn intersect_aabb(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-8;

    let inv = |d: f32| {
        if d.abs() < EPSILON {
            1.0 / EPSILON.copysign(d)
        } else {
            1.0 / d
        }
    };
    let inv_dir = Vec3::new(inv(ray.direction.x), inv(ray.direction.y), inv(ray.direction.z));

    let t_min = (min - ray.origin) * inv_dir;
    let t_max = (max - ray.origin) * inv_dir;
    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        None
    } else if t_near < 0.0 {
        // Origin inside the box
        Some(0.0)
    } else {
        Some(t_near)
    }
}

pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t0 = -b - sqrt_d;
    let t1 = -b + sqrt_d;
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(0.0)
    } else {
        None
    }
}

/// The nearest thing a ray struck
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<K> {
    pub key: K,
    pub distance: f32,
    pub point: Vec3,
}

/// Return the nearest candidate the ray intersects. A candidate may carry
/// several shapes (e.g. a beaker and its ring); the closest one counts.
pub fn pick_nearest<K, I, S>(ray: &Ray, candidates: I) -> Option<Hit<K>>
where
    K: Copy,
    I: IntoIterator<Item = (K, S)>,
    S: IntoIterator<Item = Shape>,
{
    let mut best: Option<Hit<K>> = None;
    for (key, shapes) in candidates {
        for shape in shapes {
            if let Some(distance) = shape.intersect(ray) {
                if best.map_or(true, |hit| distance < hit.distance) {
                    best = Some(Hit {
                        key,
                        distance,
                        point: ray.at(distance),
                    });
                }
            }
        }
    }
    best
}

/// Borrowed camera and viewport, handed to scenes for hit-testing
#[derive(Debug, Clone, Copy)]
pub struct Picker<'a> {
    pub camera: &'a Camera3D,
    pub viewport: Viewport,
}

impl<'a> Picker<'a> {
    pub fn new(camera: &'a Camera3D, viewport: Viewport) -> Self {
        Self { camera, viewport }
    }

    pub fn ray(&self, screen: Vec2) -> Ray {
        Ray::from_screen(self.camera, &self.viewport, screen)
    }

    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        project(self.camera, &self.viewport, world)
    }

    /// Does the ray under `screen` hit any of the shapes?
    pub fn hits(&self, screen: Vec2, shapes: &[Shape]) -> bool {
        let ray = self.ray(screen);
        shapes.iter().any(|shape| shape.intersect(&ray).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraPose;

    fn front_camera() -> Camera3D {
        let mut camera = Camera3D::new(1.0);
        camera.set_pose(CameraPose::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO));
        camera
    }

    #[test]
    fn test_ndc_corners_and_center() {
        let viewport = Viewport::new(100.0, 50.0, 800.0, 600.0);
        assert_eq!(viewport.to_ndc(Vec2::new(100.0, 50.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(viewport.to_ndc(Vec2::new(900.0, 650.0)), Vec2::new(1.0, -1.0));
        assert_eq!(viewport.to_ndc(Vec2::new(500.0, 350.0)), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = front_camera();
        let ray = Ray::from_ndc(&camera, Vec2::ZERO);
        assert!((ray.direction - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-3);
    }

    #[test]
    fn test_aabb_hit_and_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!((intersect_aabb(&ray, Vec3::new(5.0, -1.0, -1.0), Vec3::new(10.0, 1.0, 1.0)).unwrap() - 5.0).abs() < 1e-4);
        assert!(intersect_aabb(&ray, Vec3::new(5.0, 2.0, 2.0), Vec3::new(10.0, 3.0, 3.0)).is_none());
        assert!(intersect_aabb(&ray, Vec3::new(-10.0, -1.0, -1.0), Vec3::new(-5.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn test_sphere_hit_distance() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let t = intersect_sphere(&ray, Vec3::new(0.0, 0.0, 5.0), 2.0).unwrap();
        assert!((t - 3.0).abs() < 1e-4);
        assert!(intersect_sphere(&ray, Vec3::new(3.0, 0.0, 5.0), 2.0).is_none());
    }

    #[test]
    fn test_pick_nearest_prefers_closest() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z);
        let candidates = vec![
            ("far", vec![Shape::aabb(Vec3::new(0.0, 0.0, -2.0), Vec3::splat(0.5))]),
            ("near", vec![Shape::Sphere { center: Vec3::new(0.0, 0.0, 2.0), radius: 0.5 }]),
            ("off", vec![Shape::aabb(Vec3::new(4.0, 0.0, 0.0), Vec3::splat(0.5))]),
        ];
        let hit = pick_nearest(&ray, candidates).unwrap();
        assert_eq!(hit.key, "near");
        assert!((hit.distance - 7.5).abs() < 1e-4);
    }

    #[test]
    fn test_pick_nothing() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let candidates: Vec<(u8, Vec<Shape>)> = vec![(1, vec![Shape::aabb(Vec3::new(0.0, 0.0, 5.0), Vec3::ONE)])];
        assert!(pick_nearest(&ray, candidates).is_none());
    }

    #[test]
    fn test_project_inverts_ray() {
        let camera = front_camera();
        let viewport = Viewport::from_size(800, 600);
        let screen = project(&camera, &viewport, Vec3::new(1.0, 0.5, 0.0)).unwrap();
        let ray = Ray::from_screen(&camera, &viewport, screen);
        let t = (0.0 - ray.origin.z) / ray.direction.z;
        assert!((ray.at(t) - Vec3::new(1.0, 0.5, 0.0)).length() < 1e-3);
        assert!(project(&camera, &viewport, Vec3::new(0.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn test_picker_hits_box_under_cursor() {
        let camera = front_camera();
        let picker = Picker::new(&camera, Viewport::from_size(800, 800));
        let boxed = [Shape::aabb(Vec3::ZERO, Vec3::splat(0.5))];
        assert!(picker.hits(Vec2::new(400.0, 400.0), &boxed));
        assert!(!picker.hits(Vec2::new(10.0, 10.0), &boxed));
    }
}
