//! Finite capped cylinder primitive.
//!
//! A cylinder is a [`Tube`] cut to `0 < s < height` along its axis plus two
//! closed disk caps. A point on the rim belongs to the cap, so a ray through
//! the rim reports one hit there, not two.

use crate::hittable::{GeometryError, GeometryResult, Shape};
use crate::{Plane, Ray, Tube};
use prism_math::{align_zero, is_zero, DVec3};

/// A closed cylinder standing on the origin of its axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    tube: Tube,
    height: f64,
    bottom: Plane,
    top: Plane,
}

impl Cylinder {
    /// Create a cylinder. The bottom cap is centred on the axis origin and
    /// the top cap `height` further along the axis direction.
    pub fn new(axis: Ray, radius: f64, height: f64) -> GeometryResult<Self> {
        if !(height > 0.0) {
            return Err(GeometryError::NonPositiveHeight(height));
        }
        let tube = Tube::new(axis, radius)?;
        let va = axis.direction();
        let bottom = Plane::new(axis.origin(), va)?;
        let top = Plane::new(axis.point_at(height), va)?;

        Ok(Self {
            tube,
            height,
            bottom,
            top,
        })
    }

    pub fn axis(&self) -> &Ray {
        self.tube.axis()
    }

    pub fn radius(&self) -> f64 {
        self.tube.radius()
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    fn cap_points(&self, cap: &Plane, ray: &Ray, max_distance: f64, out: &mut Vec<DVec3>) {
        let r2 = self.radius() * self.radius();
        if let Some(points) = cap.find_bounded_points(ray, max_distance) {
            out.extend(
                points
                    .into_iter()
                    .filter(|p| align_zero(p.distance_squared(cap.base()) - r2) <= 0.0),
            );
        }
    }
}

impl Shape for Cylinder {
    fn normal_at(&self, point: DVec3) -> DVec3 {
        let s = self.tube.axial_distance(point);
        let va = self.axis().direction();
        if is_zero(s) {
            -va
        } else if is_zero(s - self.height) {
            va
        } else {
            self.tube.normal_at(point)
        }
    }

    fn find_bounded_points(&self, ray: &Ray, max_distance: f64) -> Option<Vec<DVec3>> {
        let mut points = Vec::new();

        if let Some(lateral) = self.tube.find_bounded_points(ray, max_distance) {
            points.extend(lateral.into_iter().filter(|&p| {
                let s = self.tube.axial_distance(p);
                align_zero(s) > 0.0 && align_zero(s - self.height) < 0.0
            }));
        }
        self.cap_points(&self.bottom, ray, max_distance, &mut points);
        self.cap_points(&self.top, ray, max_distance, &mut points);

        if points.is_empty() {
            return None;
        }

        let origin = ray.origin();
        points.sort_by(|a, b| {
            a.distance_squared(origin)
                .total_cmp(&b.distance_squared(origin))
        });
        Some(points)
    }
}
