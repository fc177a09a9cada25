//! Light rays traced as polylines through mirrors and thin lenses

use glam::{Quat, Vec2, Vec3};

const EPSILON: f32 = 1e-4;
const MAX_BOUNCES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LensKind {
    Convex,
    Concave,
}

impl LensKind {
    pub fn label(self) -> &'static str {
        match self {
            LensKind::Convex => "Convex lens",
            LensKind::Concave => "Concave lens",
        }
    }
}

/// Flat optical element. `rotation` maps the element's local XY plane, with
/// its normal along local +Z, into the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    Mirror {
        center: Vec3,
        rotation: Quat,
        half_size: Vec2,
    },
    ThinLens {
        center: Vec3,
        rotation: Quat,
        aperture: f32,
        /// Signed: positive converges, negative diverges
        focal_length: f32,
    },
}

impl Surface {
    pub fn center(&self) -> Vec3 {
        match *self {
            Surface::Mirror { center, .. } | Surface::ThinLens { center, .. } => center,
        }
    }

    pub fn rotation(&self) -> Quat {
        match *self {
            Surface::Mirror { rotation, .. } | Surface::ThinLens { rotation, .. } => rotation,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    /// Point in the element's own plane coordinates
    fn local(&self, point: Vec3) -> Vec3 {
        self.rotation().inverse() * (point - self.center())
    }

    fn contains(&self, point: Vec3) -> bool {
        let local = self.local(point);
        match *self {
            Surface::Mirror { half_size, .. } => local.x.abs() <= half_size.x && local.y.abs() <= half_size.y,
            Surface::ThinLens { aperture, .. } => local.truncate().length() <= aperture,
        }
    }

    /// Distance along the ray to this element, if the ray crosses it
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let normal = self.normal();
        let denom = direction.dot(normal);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (self.center() - origin).dot(normal) / denom;
        if t <= EPSILON {
            return None;
        }
        self.contains(origin + direction * t).then_some(t)
    }

    /// New direction after meeting the element at `point`
    pub fn redirect(&self, direction: Vec3, point: Vec3) -> Vec3 {
        match *self {
            Surface::Mirror { .. } => reflect(direction, self.normal()),
            Surface::ThinLens { focal_length, .. } => {
                thin_lens(direction, self.normal(), point - self.center(), focal_length)
            }
        }
    }
}

/// Mirror reflection: r = d - 2(d.n)n
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Paraxial thin lens: the slope toward the axis changes by height / f
pub fn thin_lens(direction: Vec3, axis: Vec3, offset: Vec3, focal_length: f32) -> Vec3 {
    let along = direction.dot(axis);
    if along.abs() < 1e-6 || focal_length == 0.0 {
        return direction;
    }
    let forward = axis * along.signum();
    let along = along.abs();
    let height = offset - axis * offset.dot(axis);
    let slope = (direction - forward * along) / along;
    let bent = slope - height / focal_length;
    (forward + bent).normalize()
}

/// Lensmaker focal length of a symmetric thin lens with surface radius `radius`
pub fn focal_length(kind: LensKind, refractive_index: f32, radius: f32) -> f32 {
    let f = radius / (2.0 * (refractive_index - 1.0));
    match kind {
        LensKind::Convex => f,
        LensKind::Concave => -f,
    }
}

/// Follow a ray for `length` units. The first point is the origin and each
/// later point is a hit or the end of the ray.
pub fn trace(origin: Vec3, direction: Vec3, length: f32, surfaces: &[Surface]) -> Vec<Vec3> {
    let mut points = vec![origin];
    let mut position = origin;
    let mut direction = direction.normalize();
    let mut remaining = length;

    for _ in 0..MAX_BOUNCES {
        let nearest = surfaces
            .iter()
            .filter_map(|surface| surface.intersect(position, direction).map(|t| (t, surface)))
            .filter(|(t, _)| *t <= remaining)
            .min_by(|a, b| a.0.total_cmp(&b.0));

        let Some((t, surface)) = nearest else {
            break;
        };
        position += direction * t;
        remaining -= t;
        points.push(position);
        direction = surface.redirect(direction, position);
    }

    if remaining > EPSILON {
        points.push(position + direction * remaining);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_1_SQRT_2;

    fn lens(kind: LensKind) -> Surface {
        Surface::ThinLens {
            center: Vec3::new(-3.0, 0.0, 0.0),
            rotation: Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2),
            aperture: 1.0,
            focal_length: focal_length(kind, 1.5, 1.0),
        }
    }

    #[test]
    fn test_reflect_keeps_angle() {
        let normal = Vec3::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0);
        let out = reflect(Vec3::X, normal);
        assert!(out.abs_diff_eq(Vec3::Y, 1e-6));
        assert!((out.dot(normal) + Vec3::X.dot(normal)).abs() < 1e-6);
    }

    #[test]
    fn test_lens_normal_faces_back_along_axis() {
        assert!(lens(LensKind::Convex).normal().abs_diff_eq(-Vec3::X, 1e-6));
    }

    #[test]
    fn test_focal_length_sign() {
        assert!((focal_length(LensKind::Convex, 1.5, 1.0) - 1.0).abs() < 1e-6);
        assert!((focal_length(LensKind::Concave, 1.5, 1.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_straight_ray_without_surfaces() {
        let points = trace(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 10.0, &[]);
        assert_eq!(points, vec![Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_convex_lens_focuses_parallel_rays() {
        let surfaces = [lens(LensKind::Convex)];
        for height in [0.5, -0.5, 0.25] {
            let points = trace(Vec3::new(-5.0, height, 0.0), Vec3::X, 10.0, &surfaces);
            assert_eq!(points.len(), 3);
            let (hit, end) = (points[1], points[2]);
            assert!(hit.abs_diff_eq(Vec3::new(-3.0, height, 0.0), 1e-5));
            // Crosses the axis one focal length past the lens
            let dir = (end - hit).normalize();
            let t = (-2.0 - hit.x) / dir.x;
            assert!((hit.y + dir.y * t).abs() < 1e-4);
        }
    }

    #[test]
    fn test_concave_lens_spreads_rays() {
        let surfaces = [lens(LensKind::Concave)];
        let points = trace(Vec3::new(-5.0, 0.5, 0.0), Vec3::X, 10.0, &surfaces);
        let dir = (points[2] - points[1]).normalize();
        assert!(dir.y > 0.0);
        // Appears to come from the virtual focus one unit before the lens
        let back = (-4.0 - points[1].x) / dir.x;
        assert!((points[1].y + dir.y * back).abs() < 1e-4);
    }

    #[test]
    fn test_axis_ray_is_not_bent() {
        let points = trace(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 10.0, &[lens(LensKind::Convex)]);
        assert!(points[2].abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn test_ray_outside_aperture_misses() {
        let points = trace(Vec3::new(-5.0, 1.5, 0.0), Vec3::X, 10.0, &[lens(LensKind::Convex)]);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_ray_behind_origin_is_ignored() {
        let points = trace(Vec3::new(-2.0, 0.5, 0.0), Vec3::X, 5.0, &[lens(LensKind::Convex)]);
        assert_eq!(points.len(), 2);
        assert!(points[1].abs_diff_eq(Vec3::new(3.0, 0.5, 0.0), 1e-5));
    }
}
