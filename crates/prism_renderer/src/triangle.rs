//! Triangle primitive for ray tracing.

use crate::hittable::{GeometryResult, Shape};
use crate::{Polygon, Ray};
use prism_math::DVec3;

/// A triangle, the three vertex case of [`Polygon`].
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    polygon: Polygon,
}

impl Triangle {
    /// Create a new triangle. Fails if the vertices are collinear.
    pub fn new(v0: DVec3, v1: DVec3, v2: DVec3) -> GeometryResult<Self> {
        Ok(Self {
            polygon: Polygon::new(vec![v0, v1, v2])?,
        })
    }

    /// Get the three vertices.
    pub fn vertices(&self) -> [DVec3; 3] {
        let v = self.polygon.vertices();
        [v[0], v[1], v[2]]
    }
}

impl Shape for Triangle {
    fn normal_at(&self, point: DVec3) -> DVec3 {
        self.polygon.normal_at(point)
    }

    fn find_bounded_points(&self, ray: &Ray, max_distance: f64) -> Option<Vec<DVec3>> {
        self.polygon.find_bounded_points(ray, max_distance)
    }
}
