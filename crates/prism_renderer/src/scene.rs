//! Scene container.

use crate::{AmbientLight, Color, Geometries, Intersectable, LightSource};

/// Everything the tracer needs to shade a ray.
///
/// A scene is built once and then only read, so it can be shared between
/// render threads without locking.
pub struct Scene {
    /// Scene name, used in log output
    pub name: String,
    /// Color of rays that hit nothing
    pub background: Color,
    pub ambient_light: AmbientLight,
    pub geometries: Geometries,
    /// Lights, in the order they are summed
    pub lights: Vec<Box<dyn LightSource>>,
}

impl Scene {
    /// Create an empty scene with a black background and no ambient light.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: Color::ZERO,
            ambient_light: AmbientLight::NONE,
            geometries: Geometries::new(),
            lights: Vec::new(),
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_ambient_light(mut self, ambient_light: AmbientLight) -> Self {
        self.ambient_light = ambient_light;
        self
    }

    pub fn with_geometries(mut self, geometries: Geometries) -> Self {
        self.geometries = geometries;
        self
    }

    /// Add a geometry to the scene.
    pub fn add_geometry(&mut self, geometry: impl Intersectable + 'static) {
        self.geometries.add(geometry);
    }

    /// Add a light to the scene.
    pub fn add_light(&mut self, light: impl LightSource + 'static) {
        self.lights.push(Box::new(light));
    }
}
