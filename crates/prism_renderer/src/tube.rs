//! Infinite tube primitive.

use crate::hittable::{points_in_range, GeometryError, GeometryResult, Shape};
use crate::Ray;
use prism_math::{align_zero, is_zero, DVec3};

/// An infinite tube around an axis ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tube {
    axis: Ray,
    radius: f64,
}

impl Tube {
    /// Create a tube. The radius must be positive.
    pub fn new(axis: Ray, radius: f64) -> GeometryResult<Self> {
        if !(radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self { axis, radius })
    }

    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Signed distance of the projection of `point` along the axis.
    #[inline]
    pub(crate) fn axial_distance(&self, point: DVec3) -> f64 {
        (point - self.axis.origin()).dot(self.axis.direction())
    }
}

impl Shape for Tube {
    fn normal_at(&self, point: DVec3) -> DVec3 {
        let s = self.axial_distance(point);
        let on_axis = if is_zero(s) {
            self.axis.origin()
        } else {
            self.axis.point_at(s)
        };
        (point - on_axis).normalize()
    }

    fn find_bounded_points(&self, ray: &Ray, max_distance: f64) -> Option<Vec<DVec3>> {
        let va = self.axis.direction();
        let d = ray.direction();
        let dp = ray.origin() - self.axis.origin();

        // Components perpendicular to the axis
        let d_perp = d - va * d.dot(va);
        let dp_perp = dp - va * dp.dot(va);

        let a = d_perp.length_squared();
        if is_zero(a) {
            return None;
        }
        let b = 2.0 * d_perp.dot(dp_perp);
        let c = dp_perp.length_squared() - self.radius * self.radius;

        let discriminant = align_zero(b * b - 4.0 * a * c);
        if discriminant <= 0.0 {
            return None;
        }

        let sq = discriminant.sqrt();
        let t1 = (-b - sq) / (2.0 * a);
        let t2 = (-b + sq) / (2.0 * a);
        points_in_range(ray, &[t1, t2], max_distance)
    }
}
