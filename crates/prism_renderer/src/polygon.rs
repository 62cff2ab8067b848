//! Convex planar polygon primitive.

use crate::hittable::{GeometryError, GeometryResult, Shape};
use crate::{Plane, Ray};
use prism_math::{align_zero, DVec3};

/// A convex polygon with at least three coplanar vertices in winding order.
///
/// The normal follows the right hand rule over the first three vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<DVec3>,
    plane: Plane,
}

impl Polygon {
    /// Create a polygon from its vertices.
    ///
    /// Rejects fewer than three vertices, collinear neighbours, vertices off
    /// the plane of the first three, and concave or self-crossing outlines.
    pub fn new(vertices: Vec<DVec3>) -> GeometryResult<Self> {
        let n = vertices.len();
        if n < 3 {
            return Err(GeometryError::TooFewVertices(n));
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        let normal = plane.normal();

        for v in &vertices[3..] {
            if align_zero(normal.dot(*v - vertices[0])) != 0.0 {
                return Err(GeometryError::NonCoplanar);
            }
        }

        // Every turn must go the same way as the first one
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let c = vertices[(i + 2) % n];
            let turn = align_zero(normal.dot((b - a).cross(c - b)));
            if turn == 0.0 {
                return Err(GeometryError::DegenerateVertices);
            }
            if turn < 0.0 {
                return Err(GeometryError::NonConvex);
            }
        }

        Ok(Self { vertices, plane })
    }

    /// Get the vertices in winding order.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Get the supporting plane.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }
}

impl Shape for Polygon {
    fn normal_at(&self, _point: DVec3) -> DVec3 {
        self.plane.normal()
    }

    fn find_bounded_points(&self, ray: &Ray, max_distance: f64) -> Option<Vec<DVec3>> {
        let points = self.plane.find_bounded_points(ray, max_distance)?;

        let origin = ray.origin();
        let direction = ray.direction();
        let n = self.vertices.len();

        // The hit is inside iff the ray passes on the same side of every
        // edge. A zero sign means an edge, a vertex, or a ray in the plane.
        let mut positive = None;
        for i in 0..n {
            let vi = self.vertices[i] - origin;
            let vj = self.vertices[(i + 1) % n] - origin;
            let sign = align_zero(direction.dot(vi.cross(vj)));
            if sign == 0.0 {
                return None;
            }
            match positive {
                None => positive = Some(sign > 0.0),
                Some(p) if p != (sign > 0.0) => return None,
                Some(_) => {}
            }
        }

        Some(points)
    }
}
