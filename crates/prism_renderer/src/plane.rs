//! Infinite plane primitive.

use crate::hittable::{in_range, GeometryError, GeometryResult, Shape};
use crate::Ray;
use prism_math::{align_zero, is_zero, DVec3};

/// An infinite plane given by a point on it and a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    base: DVec3,
    normal: DVec3,
}

impl Plane {
    /// Create a plane from a point on it and a normal (normalized here).
    pub fn new(base: DVec3, normal: DVec3) -> GeometryResult<Self> {
        let normal = normal.try_normalize().ok_or(GeometryError::ZeroNormal)?;
        Ok(Self { base, normal })
    }

    /// Create the plane through three points.
    ///
    /// The normal follows the right hand rule over `p1 → p2 → p3`.
    pub fn from_points(p1: DVec3, p2: DVec3, p3: DVec3) -> GeometryResult<Self> {
        let normal = (p2 - p1)
            .cross(p3 - p1)
            .try_normalize()
            .ok_or(GeometryError::DegenerateVertices)?;
        Ok(Self { base: p1, normal })
    }

    /// Get the reference point of the plane.
    pub fn base(&self) -> DVec3 {
        self.base
    }

    /// Get the unit normal of the plane.
    pub fn normal(&self) -> DVec3 {
        self.normal
    }
}

impl Shape for Plane {
    fn normal_at(&self, _point: DVec3) -> DVec3 {
        self.normal
    }

    fn find_bounded_points(&self, ray: &Ray, max_distance: f64) -> Option<Vec<DVec3>> {
        let nd = self.normal.dot(ray.direction());
        // Ray parallel to the plane
        if is_zero(nd) {
            return None;
        }
        if self.base == ray.origin() {
            return None;
        }

        let t = align_zero(self.normal.dot(self.base - ray.origin()) / nd);
        if !in_range(t, max_distance) {
            return None;
        }
        Some(vec![ray.point_at(t)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_plane() -> Plane {
        Plane::new(DVec3::new(0.0, 0.0, 1.0), DVec3::new(0.0, 0.0, 2.0)).unwrap()
    }

    #[test]
    fn test_plane_normal_from_points() {
        let p1 = DVec3::new(1.0, 0.0, 0.0);
        let p2 = DVec3::new(0.0, 1.0, 0.0);
        let p3 = DVec3::new(0.0, 0.0, 1.0);
        let plane = Plane::from_points(p1, p2, p3).unwrap();
        let n = plane.normal_at(p1);

        assert!((n.length() - 1.0).abs() < 1e-12);
        // Orthogonal to every edge
        assert!(n.dot(p2 - p1).abs() < 1e-12);
        assert!(n.dot(p3 - p2).abs() < 1e-12);
        assert!(n.dot(p1 - p3).abs() < 1e-12);
    }

    #[test]
    fn test_plane_degenerate_points() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(Plane::from_points(p, p, DVec3::ZERO), Err(GeometryError::DegenerateVertices));
        assert_eq!(
            Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::X * 2.0),
            Err(GeometryError::DegenerateVertices)
        );
        assert_eq!(Plane::new(p, DVec3::ZERO), Err(GeometryError::ZeroNormal));
    }

    #[test]
    fn test_plane_intersections() {
        let plane = xy_plane();

        // Ray crossing the plane
        let ray = Ray::new(DVec3::new(1.0, 1.0, 3.0), DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(plane.find_points(&ray), Some(vec![DVec3::new(1.0, 1.0, 1.0)]));

        // Ray pointing away from the plane
        let ray = Ray::new(DVec3::new(1.0, 1.0, 3.0), DVec3::Z);
        assert!(plane.find_points(&ray).is_none());

        // Parallel ray, off and on the plane
        let ray = Ray::new(DVec3::new(1.0, 1.0, 3.0), DVec3::X);
        assert!(plane.find_points(&ray).is_none());
        let ray = Ray::new(DVec3::new(1.0, 1.0, 1.0), DVec3::X);
        assert!(plane.find_points(&ray).is_none());

        // Ray starting on the plane
        let ray = Ray::new(DVec3::new(5.0, 1.0, 1.0), DVec3::ONE);
        assert!(plane.find_points(&ray).is_none());

        // Ray starting at the base point
        let ray = Ray::new(DVec3::new(0.0, 0.0, 1.0), DVec3::ONE);
        assert!(plane.find_points(&ray).is_none());
    }

    #[test]
    fn test_plane_bounded_distance() {
        let plane = xy_plane();
        let ray = Ray::new(DVec3::new(0.0, 0.0, 3.0), DVec3::new(0.0, 0.0, -1.0));

        assert!(plane.find_bounded_points(&ray, 1.0).is_none());
        assert!(plane.find_bounded_points(&ray, 2.0).is_none());
        assert_eq!(plane.find_bounded_points(&ray, 2.5).map(|p| p.len()), Some(1));
    }
}
