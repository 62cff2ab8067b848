//! Sphere primitive for ray tracing.

use crate::hittable::{in_range, points_in_range, GeometryError, GeometryResult, Shape};
use crate::Ray;
use prism_math::{align_zero, DVec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: DVec3,
    radius: f64,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive.
    pub fn new(center: DVec3, radius: f64) -> GeometryResult<Self> {
        if !(radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Shape for Sphere {
    fn normal_at(&self, point: DVec3) -> DVec3 {
        (point - self.center).normalize()
    }

    fn find_bounded_points(&self, ray: &Ray, max_distance: f64) -> Option<Vec<DVec3>> {
        // Starting at the center: exactly one way out
        if ray.origin() == self.center {
            return if in_range(self.radius, max_distance) {
                Some(vec![ray.point_at(self.radius)])
            } else {
                None
            };
        }

        let u = self.center - ray.origin();
        let tm = u.dot(ray.direction());
        let d_squared = u.length_squared() - tm * tm;

        // Misses, or only touches the surface
        let th_squared = align_zero(self.radius * self.radius - d_squared);
        if th_squared <= 0.0 {
            return None;
        }

        let th = th_squared.sqrt();
        points_in_range(ray, &[tm - th, tm + th], max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere::new(DVec3::ZERO, 1.0).unwrap()
    }

    #[test]
    fn test_sphere_normal() {
        let sphere = Sphere::new(DVec3::new(0.0, 0.0, 1.0), 1.0).unwrap();
        assert_eq!(sphere.normal_at(DVec3::new(0.0, 0.0, 2.0)), DVec3::Z);
    }

    #[test]
    fn test_sphere_rejects_bad_radius() {
        assert_eq!(Sphere::new(DVec3::ZERO, 0.0), Err(GeometryError::NonPositiveRadius(0.0)));
        assert_eq!(Sphere::new(DVec3::ZERO, -1.0), Err(GeometryError::NonPositiveRadius(-1.0)));
        assert!(Sphere::new(DVec3::ZERO, f64::NAN).is_err());
    }

    #[test]
    fn test_sphere_two_hits_from_outside() {
        let sphere = unit_sphere();
        let ray = Ray::new(DVec3::new(-2.0, 0.0, 0.0), DVec3::X);
        let points = sphere.find_points(&ray).unwrap();

        assert_eq!(points, vec![DVec3::new(-1.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_sphere_one_hit_from_inside_or_surface() {
        let sphere = unit_sphere();

        let inside = Ray::new(DVec3::new(0.5, 0.0, 0.0), DVec3::X);
        assert_eq!(sphere.find_points(&inside), Some(vec![DVec3::new(1.0, 0.0, 0.0)]));

        let on_surface = Ray::new(DVec3::new(-1.0, 0.0, 0.0), DVec3::X);
        assert_eq!(sphere.find_points(&on_surface), Some(vec![DVec3::new(1.0, 0.0, 0.0)]));

        let from_center = Ray::new(DVec3::ZERO, DVec3::Y);
        assert_eq!(sphere.find_points(&from_center), Some(vec![DVec3::Y]));
    }

    #[test]
    fn test_sphere_no_hits() {
        let sphere = unit_sphere();

        // Pointing away
        let away = Ray::new(DVec3::new(2.0, 0.0, 0.0), DVec3::X);
        assert!(sphere.find_points(&away).is_none());

        // Tangent
        let tangent = Ray::new(DVec3::new(-2.0, 1.0, 0.0), DVec3::X);
        assert!(sphere.find_points(&tangent).is_none());

        // Leaving from the surface
        let leaving = Ray::new(DVec3::new(1.0, 0.0, 0.0), DVec3::X);
        assert!(sphere.find_points(&leaving).is_none());

        // Clear miss
        let miss = Ray::new(DVec3::new(-2.0, 3.0, 0.0), DVec3::X);
        assert!(sphere.find_points(&miss).is_none());
    }

    #[test]
    fn test_sphere_bounded_hits_are_monotonic() {
        let sphere = unit_sphere();
        let ray = Ray::new(DVec3::new(-2.0, 0.0, 0.0), DVec3::X);

        assert!(sphere.find_bounded_points(&ray, 0.5).is_none());
        assert_eq!(sphere.find_bounded_points(&ray, 2.0), Some(vec![DVec3::new(-1.0, 0.0, 0.0)]));
        assert_eq!(sphere.find_bounded_points(&ray, 10.0).map(|p| p.len()), Some(2));

        let mut previous: Vec<DVec3> = Vec::new();
        for max in [0.5, 1.0, 1.5, 3.0, 3.5, 100.0] {
            let current = sphere.find_bounded_points(&ray, max).unwrap_or_default();
            assert!(previous.iter().all(|p| current.contains(p)));
            previous = current;
        }
    }

    #[test]
    fn test_sphere_normals_at_hits_are_unit() {
        let sphere = Sphere::new(DVec3::new(1.0, -2.0, 3.0), 2.5).unwrap();
        let ray = Ray::new(DVec3::new(-5.0, 0.0, 0.0), DVec3::new(6.0, -2.0, 3.5));

        for p in sphere.find_points(&ray).unwrap() {
            assert!((sphere.normal_at(p).length() - 1.0).abs() < 1e-9);
        }
    }
}
