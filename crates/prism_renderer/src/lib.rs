//! Prism Renderer - recursive CPU ray tracing
//!
//! A Whitted-style ray tracer: brute-force intersection against a flat list
//! of analytic primitives, Phong local lighting with soft (transparency
//! weighted) shadows, and recursive reflection/refraction bounded by a depth
//! limit and a minimum contribution threshold.
//!
//! Pixels are distributed to a fixed pool of worker threads through a shared
//! [`PixelQueue`].

mod camera;
mod cylinder;
mod hittable;
mod light;
mod material;
mod plane;
mod polygon;
mod renderer;
mod sampler;
mod scene;
mod scheduler;
mod sphere;
mod tracer;
mod triangle;
mod tube;

pub use camera::{Camera, CameraBuilder, CameraError, CameraResult, Sampling, Threads, SPARE_THREADS};
pub use cylinder::Cylinder;
pub use hittable::{
    closest_hit, Geometries, Geometry, GeometryError, GeometryResult, Hit, Intersectable, Shape,
    Surface,
};
pub use light::{AmbientLight, DirectionalLight, LightError, LightSource, PointLight, SpotLight};
pub use material::{Color, Material, MaterialError};
pub use plane::Plane;
pub use polygon::Polygon;
pub use renderer::{color_to_rgb, render, render_pixel, ImageBuffer, RenderError};
pub use sampler::{adaptive_level, sample_adaptive, sample_grid, sample_single};
pub use scene::Scene;
pub use scheduler::{Pixel, PixelQueue, Progress};
pub use sphere::Sphere;
pub use tracer::{reflect, RayTracer, SimpleRayTracer, MAX_CALC_COLOR_LEVEL, MIN_CALC_COLOR_K};
pub use triangle::Triangle;
pub use tube::Tube;

/// Re-export the math types from prism_math
pub use prism_math::{DVec3, Ray};
