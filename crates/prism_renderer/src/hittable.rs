//! Intersection traits, hit records and the geometry aggregate.
//!
//! Primitives are split in two layers:
//!
//! - [`Shape`] is pure geometry: a normal and the points where a ray crosses it.
//! - [`Surface`] wraps a shape with an emission color and a [`Material`], which
//!   is everything the tracer needs at a hit point ([`Geometry`]).
//!
//! Everything that can be hit implements [`Intersectable`], including the
//! [`Geometries`] aggregate, so aggregates can be nested.

use crate::{Color, Material, Ray};
use prism_math::{align_zero, DVec3};
use std::fmt;
use thiserror::Error;

/// Errors raised when a shape is built from degenerate input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("normal vector must not be zero")]
    ZeroNormal,

    #[error("axis direction must not be zero")]
    ZeroAxis,

    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("height must be positive, got {0}")]
    NonPositiveHeight(f64),

    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("vertices are collinear or coincide")]
    DegenerateVertices,

    #[error("polygon vertices are not in the same plane")]
    NonCoplanar,

    #[error("polygon is not convex or its vertices are out of order")]
    NonConvex,
}

/// Result type for shape construction.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Pure geometric shape.
pub trait Shape: Send + Sync {
    /// Outward unit normal at a point on the surface.
    fn normal_at(&self, point: DVec3) -> DVec3;

    /// Points where the ray crosses the shape at a distance in `(0, max_distance)`.
    ///
    /// Returns `None` when there is no such point, never an empty vector.
    fn find_bounded_points(&self, ray: &Ray, max_distance: f64) -> Option<Vec<DVec3>>;

    /// Unbounded form of [`Shape::find_bounded_points`].
    fn find_points(&self, ray: &Ray) -> Option<Vec<DVec3>> {
        self.find_bounded_points(ray, f64::INFINITY)
    }
}

/// Data the shading engine reads from a hit primitive.
pub trait Geometry: Send + Sync {
    /// Outward unit normal at a point on the surface.
    fn normal_at(&self, point: DVec3) -> DVec3;

    /// Light emitted by the surface itself.
    fn emission(&self) -> Color;

    /// Surface material.
    fn material(&self) -> &Material;
}

/// Anything a ray can be intersected with.
pub trait Intersectable: Send + Sync {
    /// All hits at a distance in `(0, max_distance)` along the ray.
    ///
    /// The order of the hits is unspecified. Use [`closest_hit`] to get the nearest one.
    fn find_bounded_hits<'a>(&'a self, ray: &Ray, max_distance: f64) -> Option<Vec<Hit<'a>>>;

    /// Unbounded form of [`Intersectable::find_bounded_hits`].
    fn find_hits<'a>(&'a self, ray: &Ray) -> Option<Vec<Hit<'a>>> {
        self.find_bounded_hits(ray, f64::INFINITY)
    }
}

/// Record of a ray hitting a geometry.
///
/// Borrows the geometry from the scene, so it only lives as long as one
/// shading computation.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// The geometry that was hit
    pub geometry: &'a dyn Geometry,
    /// Point of intersection
    pub point: DVec3,
}

impl<'a> Hit<'a> {
    pub fn new(geometry: &'a dyn Geometry, point: DVec3) -> Self {
        Self { geometry, point }
    }
}

impl PartialEq for Hit<'_> {
    /// Same geometry instance and same point.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(std::ptr::from_ref(self.geometry), std::ptr::from_ref(other.geometry)) && self.point == other.point
    }
}

impl fmt::Debug for Hit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hit")
            .field("geometry", &std::ptr::from_ref(self.geometry).cast::<()>())
            .field("point", &self.point)
            .finish()
    }
}

/// Pick the hit closest to the ray origin.
///
/// Ties keep the first hit encountered.
pub fn closest_hit<'a>(ray: &Ray, hits: &[Hit<'a>]) -> Option<Hit<'a>> {
    let origin = ray.origin();
    let mut closest: Option<(Hit<'a>, f64)> = None;
    for hit in hits {
        let d = hit.point.distance_squared(origin);
        match closest {
            Some((_, best)) if best <= d => {}
            _ => closest = Some((*hit, d)),
        }
    }
    closest.map(|(hit, _)| hit)
}

/// True if `t` lies strictly inside `(0, max_distance)`.
#[inline]
pub(crate) fn in_range(t: f64, max_distance: f64) -> bool {
    align_zero(t) > 0.0 && align_zero(t - max_distance) < 0.0
}

/// Turn candidate distances into points, keeping those in range.
///
/// Keeps the order of `distances`.
pub(crate) fn points_in_range(ray: &Ray, distances: &[f64], max_distance: f64) -> Option<Vec<DVec3>> {
    let points: Vec<DVec3> = distances
        .iter()
        .filter(|&&t| in_range(t, max_distance))
        .map(|&t| ray.point_at(t))
        .collect();

    if points.is_empty() {
        None
    } else {
        Some(points)
    }
}

/// A shape with emission and material: one renderable primitive.
pub struct Surface<S: Shape> {
    shape: S,
    emission: Color,
    material: Material,
}

impl<S: Shape> Surface<S> {
    /// Wrap a shape with black emission and the default material.
    pub fn new(shape: S) -> Self {
        Self {
            shape,
            emission: Color::ZERO,
            material: Material::default(),
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Get the wrapped shape.
    pub fn shape(&self) -> &S {
        &self.shape
    }
}

impl<S: Shape> From<S> for Surface<S> {
    fn from(shape: S) -> Self {
        Self::new(shape)
    }
}

impl<S: Shape> Geometry for Surface<S> {
    fn normal_at(&self, point: DVec3) -> DVec3 {
        self.shape.normal_at(point)
    }

    fn emission(&self) -> Color {
        self.emission
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl<S: Shape> Intersectable for Surface<S> {
    fn find_bounded_hits<'a>(&'a self, ray: &Ray, max_distance: f64) -> Option<Vec<Hit<'a>>> {
        let points = self.shape.find_bounded_points(ray, max_distance)?;
        Some(points.into_iter().map(|p| Hit::new(self, p)).collect())
    }
}

/// A list of intersectable objects.
///
/// Uses a linear scan: every member is tested for every ray.
#[derive(Default)]
pub struct Geometries {
    members: Vec<Box<dyn Intersectable>>,
}

impl Geometries {
    /// Create a new empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the aggregate.
    pub fn add(&mut self, object: impl Intersectable + 'static) {
        self.members.push(Box::new(object));
    }

    /// Add an already boxed object.
    pub fn add_boxed(&mut self, object: Box<dyn Intersectable>) {
        self.members.push(object);
    }

    /// Builder form of [`Geometries::add`].
    pub fn with(mut self, object: impl Intersectable + 'static) -> Self {
        self.add(object);
        self
    }

    /// Get the number of direct members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the aggregate is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Intersectable for Geometries {
    fn find_bounded_hits<'a>(&'a self, ray: &Ray, max_distance: f64) -> Option<Vec<Hit<'a>>> {
        let mut result: Option<Vec<Hit<'a>>> = None;

        for member in &self.members {
            if let Some(mut hits) = member.find_bounded_hits(ray, max_distance) {
                if !hits.is_empty() {
                    result.get_or_insert_with(Vec::new).append(&mut hits);
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Plane, Sphere, Triangle};

    fn sample_geometries() -> Geometries {
        Geometries::new()
            .with(Surface::new(
                Plane::from_points(
                    DVec3::new(1.0, 0.0, 0.0),
                    DVec3::new(2.0, 0.0, 0.0),
                    DVec3::new(1.5, 0.0, 1.0),
                )
                .unwrap(),
            ))
            .with(Surface::new(
                Triangle::new(
                    DVec3::new(0.0, 2.0, 0.0),
                    DVec3::new(2.0, 2.0, 0.0),
                    DVec3::new(1.5, 2.0, 2.0),
                )
                .unwrap(),
            ))
            .with(Surface::new(Sphere::new(DVec3::new(1.0, 0.0, 1.0), 1.0).unwrap()))
    }

    #[test]
    fn test_geometries_some_members_hit() {
        let geometries = sample_geometries();
        let ray = Ray::new(DVec3::new(1.0, 1.5, 1.0), DVec3::new(0.0, -1.0, 0.0));
        // Plane once, sphere twice, triangle is behind the origin
        assert_eq!(geometries.find_hits(&ray).unwrap().len(), 3);
    }

    #[test]
    fn test_geometries_empty() {
        let ray = Ray::new(DVec3::ONE, DVec3::new(0.0, -1.0, 0.0));
        assert!(Geometries::new().find_hits(&ray).is_none());
    }

    #[test]
    fn test_geometries_no_member_hit() {
        let geometries = sample_geometries();
        let ray = Ray::new(DVec3::new(1.0, -1.0, 1.0), DVec3::new(0.0, -1.0, 0.0));
        assert!(geometries.find_hits(&ray).is_none());
    }

    #[test]
    fn test_geometries_one_member_hit() {
        let geometries = sample_geometries();
        let ray = Ray::new(DVec3::new(1.5, 1.5, 0.5), DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(geometries.find_hits(&ray).unwrap().len(), 1);
    }

    #[test]
    fn test_geometries_all_members_hit() {
        let geometries = sample_geometries();
        let ray = Ray::new(DVec3::new(1.0, 2.5, 1.0), DVec3::new(0.0, -1.0, 0.0));
        assert_eq!(geometries.find_hits(&ray).unwrap().len(), 4);
    }

    #[test]
    fn test_geometries_nest() {
        let inner = Geometries::new().with(Surface::new(Sphere::new(DVec3::ZERO, 1.0).unwrap()));
        let outer = Geometries::new()
            .with(inner)
            .with(Surface::new(Sphere::new(DVec3::new(5.0, 0.0, 0.0), 1.0).unwrap()));

        let ray = Ray::new(DVec3::new(-3.0, 0.0, 0.0), DVec3::X);
        assert_eq!(outer.find_hits(&ray).unwrap().len(), 4);
    }

    #[test]
    fn test_closest_hit_picks_nearest() {
        let sphere = Surface::new(Sphere::new(DVec3::ZERO, 1.0).unwrap());
        let ray = Ray::new(DVec3::new(-2.0, 0.0, 0.0), DVec3::X);

        let mut hits = sphere.find_hits(&ray).unwrap();
        hits.reverse();
        let closest = closest_hit(&ray, &hits).unwrap();
        assert_eq!(closest.point, DVec3::new(-1.0, 0.0, 0.0));
        assert!(closest_hit(&ray, &[]).is_none());
    }

    #[test]
    fn test_hit_equality_uses_identity() {
        let a = Surface::new(Sphere::new(DVec3::ZERO, 1.0).unwrap());
        let b = Surface::new(Sphere::new(DVec3::ZERO, 1.0).unwrap());
        let p = DVec3::new(1.0, 0.0, 0.0);

        assert_eq!(Hit::new(&a, p), Hit::new(&a, p));
        assert_ne!(Hit::new(&a, p), Hit::new(&b, p));
        assert_ne!(Hit::new(&a, p), Hit::new(&a, -p));
    }

    #[test]
    fn test_surface_carries_emission_and_material() {
        let material = Material::new().with_kd(0.5);
        let surface = Surface::new(Sphere::new(DVec3::ZERO, 1.0).unwrap())
            .with_emission(Color::new(10.0, 20.0, 30.0))
            .with_material(material);

        assert_eq!(surface.emission(), Color::new(10.0, 20.0, 30.0));
        assert_eq!(*surface.material(), material);
        assert_eq!(surface.normal_at(DVec3::new(0.0, 2.0, 0.0)), DVec3::Y);
    }
}
