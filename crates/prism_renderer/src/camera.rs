//! Camera for primary ray generation.
//!
//! A [`Camera`] is built once through [`CameraBuilder::build`], which checks
//! every setting, and is immutable afterwards.

use crate::renderer::{render, ImageBuffer, RenderError};
use crate::RayTracer;
use prism_math::{is_zero, DVec3, Ray};
use thiserror::Error;

/// Cores left free when the thread count is chosen automatically.
pub const SPARE_THREADS: usize = 2;

/// Errors reported by [`CameraBuilder::build`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("missing camera setting: {0}")]
    Missing(&'static str),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("camera direction vectors must not be zero")]
    ZeroDirection,

    #[error("camera 'to' and 'up' directions are not orthogonal")]
    NotOrthogonal,

    #[error("antialiasing and adaptive supersampling cannot both be enabled")]
    ConflictingSampling,

    #[error("sample count must be at least 1, got {0}")]
    InvalidSampleCount(u32),

    #[error("thread count must be at least 1")]
    ZeroThreads,

    #[error("progress interval must not be negative, got {0}")]
    NegativeProgressInterval(f64),
}

/// Result type for camera configuration.
pub type CameraResult<T> = Result<T, CameraError>;

/// Per-pixel sampling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// One ray through the pixel center
    #[default]
    Single,
    /// `n × n` regular sub-pixel grid, averaged
    Grid(u32),
    /// Recursive corner subdivision driven by the sample budget `n`
    Adaptive(u32),
}

/// Worker thread configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Threads {
    /// Render on the calling thread
    #[default]
    None,
    /// Exactly `n` worker threads
    Count(usize),
    /// All cores but [`SPARE_THREADS`], at least one
    Auto,
}

impl Threads {
    /// Number of worker threads, `None` for inline rendering.
    pub fn resolve(self) -> Option<usize> {
        match self {
            Threads::None => None,
            Threads::Count(n) => Some(n),
            Threads::Auto => Some(num_cpus::get().saturating_sub(SPARE_THREADS).max(1)),
        }
    }
}

/// Pinhole camera looking through a rectangular view plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    location: DVec3,
    to: DVec3,
    up: DVec3,
    right: DVec3,
    width: f64,
    height: f64,
    distance: f64,
    sampling: Sampling,
    worker_threads: Option<usize>,
    progress_interval: f64,
}

impl Camera {
    /// Start configuring a camera.
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    pub fn location(&self) -> DVec3 {
        self.location
    }

    /// Unit forward direction.
    pub fn to(&self) -> DVec3 {
        self.to
    }

    /// Unit up direction.
    pub fn up(&self) -> DVec3 {
        self.up
    }

    /// Unit right direction, `to × up`.
    pub fn right(&self) -> DVec3 {
        self.right
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    /// Resolved worker thread count, `None` for inline rendering.
    pub fn worker_threads(&self) -> Option<usize> {
        self.worker_threads
    }

    /// Progress logging step in percent, 0 when disabled.
    pub fn progress_interval(&self) -> f64 {
        self.progress_interval
    }

    /// Center of pixel `(j, i)` on the view plane for an `nx × ny` image.
    pub fn pixel_center(&self, nx: u32, ny: u32, j: u32, i: u32) -> DVec3 {
        let mut p = self.location + self.to * self.distance;

        let y_i = ((ny as f64 - 1.0) / 2.0 - i as f64) * (self.height / ny as f64);
        let x_j = -((nx as f64 - 1.0) / 2.0 - j as f64) * (self.width / nx as f64);

        if !is_zero(x_j) {
            p += self.right * x_j;
        }
        if !is_zero(y_i) {
            p += self.up * y_i;
        }
        p
    }

    /// Ray from the camera through the center of pixel `(j, i)`.
    ///
    /// Column `j` grows to the right and row `i` grows downward.
    pub fn construct_ray(&self, nx: u32, ny: u32, j: u32, i: u32) -> Ray {
        self.ray_through(self.pixel_center(nx, ny, j, i))
    }

    /// Ray from the camera through a point on the view plane.
    pub fn ray_through(&self, point: DVec3) -> Ray {
        Ray::new(self.location, point - self.location)
    }

    /// Render every pixel of `image` with `tracer`.
    pub fn render_image<T: RayTracer>(&self, tracer: &T, image: &mut ImageBuffer) -> Result<(), RenderError> {
        render(self, tracer, image)
    }
}

/// Mutable camera configuration. Nothing is checked until [`CameraBuilder::build`].
#[derive(Debug, Clone)]
pub struct CameraBuilder {
    location: Option<DVec3>,
    to: Option<DVec3>,
    up: Option<DVec3>,
    width: Option<f64>,
    height: Option<f64>,
    distance: Option<f64>,
    samples: u32,
    antialiasing: bool,
    adaptive_supersampling: bool,
    threads: Threads,
    progress_interval: f64,
}

impl Default for CameraBuilder {
    fn default() -> Self {
        Self {
            location: None,
            to: None,
            up: None,
            width: None,
            height: None,
            distance: None,
            samples: 1,
            antialiasing: false,
            adaptive_supersampling: false,
            threads: Threads::None,
            progress_interval: 0.0,
        }
    }
}

impl CameraBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the camera position.
    pub fn with_location(mut self, location: DVec3) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the forward and up directions. They must be orthogonal.
    pub fn with_direction(mut self, to: DVec3, up: DVec3) -> Self {
        self.to = Some(to);
        self.up = Some(up);
        self
    }

    /// Set the view plane size.
    pub fn with_vp_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the distance from the camera to the view plane.
    pub fn with_vp_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Set the sample budget used by antialiasing or adaptive supersampling.
    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_antialiasing(mut self, enabled: bool) -> Self {
        self.antialiasing = enabled;
        self
    }

    pub fn with_adaptive_supersampling(mut self, enabled: bool) -> Self {
        self.adaptive_supersampling = enabled;
        self
    }

    pub fn with_threads(mut self, threads: Threads) -> Self {
        self.threads = threads;
        self
    }

    /// Log progress every `interval` percent. 0 disables progress logging.
    pub fn with_progress_interval(mut self, interval: f64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Validate the configuration and build the camera.
    pub fn build(&self) -> CameraResult<Camera> {
        let width = positive("width", self.width)?;
        let height = positive("height", self.height)?;
        let distance = positive("distance", self.distance)?;

        let location = self.location.ok_or(CameraError::Missing("location"))?;
        let to = self.to.ok_or(CameraError::Missing("to direction"))?;
        let up = self.up.ok_or(CameraError::Missing("up direction"))?;
        let to = to.try_normalize().ok_or(CameraError::ZeroDirection)?;
        let up = up.try_normalize().ok_or(CameraError::ZeroDirection)?;
        if !is_zero(to.dot(up)) {
            return Err(CameraError::NotOrthogonal);
        }
        let right = to.cross(up).normalize();

        if self.samples < 1 {
            return Err(CameraError::InvalidSampleCount(self.samples));
        }
        let sampling = match (self.antialiasing, self.adaptive_supersampling) {
            (true, true) => return Err(CameraError::ConflictingSampling),
            (true, false) => Sampling::Grid(self.samples),
            (false, true) => Sampling::Adaptive(self.samples),
            (false, false) => Sampling::Single,
        };

        if self.threads == Threads::Count(0) {
            return Err(CameraError::ZeroThreads);
        }
        if self.progress_interval < 0.0 || self.progress_interval.is_nan() {
            return Err(CameraError::NegativeProgressInterval(self.progress_interval));
        }

        Ok(Camera {
            location,
            to,
            up,
            right,
            width,
            height,
            distance,
            sampling,
            worker_threads: self.threads.resolve(),
            progress_interval: self.progress_interval,
        })
    }
}

fn positive(field: &'static str, value: Option<f64>) -> CameraResult<f64> {
    let value = value.ok_or(CameraError::Missing(field))?;
    if value > 0.0 && !is_zero(value) {
        Ok(value)
    } else {
        Err(CameraError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_builder() -> CameraBuilder {
        Camera::builder()
            .with_location(DVec3::ZERO)
            .with_direction(DVec3::new(0.0, 0.0, -1.0), DVec3::new(0.0, -1.0, 0.0))
            .with_vp_distance(10.0)
    }

    fn approx(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_construct_ray_3x3() {
        let camera = base_builder().with_vp_size(6.0, 6.0).build().unwrap();

        // Center pixel
        let ray = camera.construct_ray(3, 3, 1, 1);
        assert!(approx(ray.direction(), DVec3::new(0.0, 0.0, -1.0)));

        // Corner pixel: right = to × up = (-1, 0, 0), up = (0, -1, 0)
        let ray = camera.construct_ray(3, 3, 0, 0);
        assert!(approx(ray.direction(), DVec3::new(2.0, -2.0, -10.0).normalize()));

        // Side pixel
        let ray = camera.construct_ray(3, 3, 1, 0);
        assert!(approx(ray.direction(), DVec3::new(0.0, -2.0, -10.0).normalize()));
    }

    #[test]
    fn test_construct_ray_4x4() {
        let camera = base_builder().with_vp_size(8.0, 8.0).build().unwrap();

        let ray = camera.construct_ray(4, 4, 1, 1);
        assert!(approx(ray.direction(), DVec3::new(1.0, -1.0, -10.0).normalize()));

        let ray = camera.construct_ray(4, 4, 0, 0);
        assert!(approx(ray.direction(), DVec3::new(3.0, -3.0, -10.0).normalize()));

        let ray = camera.construct_ray(4, 4, 3, 2);
        assert!(approx(ray.direction(), DVec3::new(-3.0, 1.0, -10.0).normalize()));
    }

    #[test]
    fn test_pixel_center() {
        let camera = base_builder().with_vp_size(6.0, 6.0).build().unwrap();
        assert!(approx(camera.pixel_center(3, 3, 1, 1), DVec3::new(0.0, 0.0, -10.0)));
        assert!(approx(camera.pixel_center(3, 3, 2, 2), DVec3::new(-2.0, 2.0, -10.0)));
        assert_eq!(camera.construct_ray(3, 3, 1, 1).origin(), DVec3::ZERO);
    }

    #[test]
    fn test_build_basis_is_normalized() {
        let camera = Camera::builder()
            .with_location(DVec3::ONE)
            .with_direction(DVec3::new(0.0, 0.0, -3.0), DVec3::new(0.0, 2.0, 0.0))
            .with_vp_size(1.0, 1.0)
            .with_vp_distance(1.0)
            .build()
            .unwrap();

        assert_eq!(camera.to(), DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(camera.up(), DVec3::Y);
        assert_eq!(camera.right(), DVec3::X);
        assert_eq!(camera.sampling(), Sampling::Single);
        assert_eq!(camera.worker_threads(), None);
    }

    #[test]
    fn test_build_missing_fields() {
        assert_eq!(Camera::builder().build(), Err(CameraError::Missing("width")));

        let no_location = Camera::builder()
            .with_vp_size(1.0, 1.0)
            .with_vp_distance(1.0)
            .with_direction(DVec3::X, DVec3::Y);
        assert_eq!(no_location.build(), Err(CameraError::Missing("location")));

        let no_direction = Camera::builder()
            .with_vp_size(1.0, 1.0)
            .with_vp_distance(1.0)
            .with_location(DVec3::ZERO);
        assert_eq!(no_direction.build(), Err(CameraError::Missing("to direction")));

        let no_distance = Camera::builder().with_vp_size(1.0, 1.0);
        assert_eq!(no_distance.build(), Err(CameraError::Missing("distance")));
    }

    #[test]
    fn test_build_rejects_bad_values() {
        assert_eq!(
            base_builder().with_vp_size(0.0, 1.0).build(),
            Err(CameraError::NonPositive { field: "width", value: 0.0 })
        );
        assert_eq!(
            base_builder().with_vp_size(1.0, -2.0).build(),
            Err(CameraError::NonPositive { field: "height", value: -2.0 })
        );
        assert_eq!(
            base_builder().with_vp_size(1.0, 1.0).with_vp_distance(-1.0).build(),
            Err(CameraError::NonPositive { field: "distance", value: -1.0 })
        );

        let sized = base_builder().with_vp_size(1.0, 1.0);
        assert_eq!(
            sized.clone().with_direction(DVec3::X, DVec3::ONE).build(),
            Err(CameraError::NotOrthogonal)
        );
        assert_eq!(
            sized.clone().with_direction(DVec3::ZERO, DVec3::Y).build(),
            Err(CameraError::ZeroDirection)
        );
        assert_eq!(
            sized.clone().with_samples(0).build(),
            Err(CameraError::InvalidSampleCount(0))
        );
        assert_eq!(
            sized
                .clone()
                .with_antialiasing(true)
                .with_adaptive_supersampling(true)
                .build(),
            Err(CameraError::ConflictingSampling)
        );
        assert_eq!(
            sized.clone().with_threads(Threads::Count(0)).build(),
            Err(CameraError::ZeroThreads)
        );
        assert_eq!(
            sized.with_progress_interval(-1.0).build(),
            Err(CameraError::NegativeProgressInterval(-1.0))
        );
    }

    #[test]
    fn test_build_sampling_and_threads() {
        let sized = base_builder().with_vp_size(1.0, 1.0).with_samples(9);

        let grid = sized.clone().with_antialiasing(true).build().unwrap();
        assert_eq!(grid.sampling(), Sampling::Grid(9));

        let adaptive = sized
            .clone()
            .with_adaptive_supersampling(true)
            .with_threads(Threads::Count(3))
            .build()
            .unwrap();
        assert_eq!(adaptive.sampling(), Sampling::Adaptive(9));
        assert_eq!(adaptive.worker_threads(), Some(3));

        let auto = sized.with_threads(Threads::Auto).build().unwrap();
        assert!(auto.worker_threads().unwrap() >= 1);
    }
}
