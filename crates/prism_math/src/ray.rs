use crate::{align_zero, DVec3};

/// Distance a secondary ray origin is pushed off a surface along its normal.
pub const DELTA: f64 = 0.1;

/// A ray in 3D space with an origin and a unit-length direction.
///
/// The direction is normalized on construction, so `t` in [`Ray::point_at`]
/// is always a true distance from the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: DVec3,
    direction: DVec3,
}

impl Ray {
    /// Create a new ray, normalizing `direction`.
    ///
    /// # Panics
    ///
    /// Panics if `direction` has zero (or non-finite) length.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        let length = direction.length();
        assert!(
            length > 0.0 && length.is_finite(),
            "ray direction must be a non-zero vector, got {direction}"
        );
        Self {
            origin,
            direction: direction / length,
        }
    }

    /// Create a ray leaving a surface point.
    ///
    /// The origin is moved by [`DELTA`] along `normal`, towards the side that
    /// `direction` points to, so the new ray does not hit the surface it
    /// starts on. When `direction` is tangent to the surface the point is used as is.
    pub fn offset(point: DVec3, direction: DVec3, normal: DVec3) -> Self {
        let nd = align_zero(normal.dot(direction));
        let origin = if nd == 0.0 {
            point
        } else if nd > 0.0 {
            point + normal * DELTA
        } else {
            point - normal * DELTA
        };
        Self::new(origin, direction)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the unit direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Get the point along the ray at distance t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Find the point closest to the ray origin.
    ///
    /// Returns `None` for an empty slice. Ties keep the first point.
    pub fn closest_point(&self, points: &[DVec3]) -> Option<DVec3> {
        let mut closest: Option<(DVec3, f64)> = None;
        for &p in points {
            let d = p.distance_squared(self.origin);
            match closest {
                Some((_, best)) if best <= d => {}
                _ => closest = Some((p, d)),
            }
        }
        closest.map(|(p, _)| p)
    }
}
