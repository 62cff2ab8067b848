//! Light sources.
//!
//! Every light reports, for a point in the scene, the intensity reaching it,
//! the unit direction the light travels to reach it, and its distance to it.
//! The ambient term is separate and not a [`LightSource`].

use crate::Color;
use prism_math::{align_zero, DVec3};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LightError {
    #[error("light direction must not be zero")]
    ZeroDirection,
}

/// A light that illuminates points in the scene.
pub trait LightSource: Send + Sync {
    /// Intensity arriving at `point`.
    fn intensity_at(&self, point: DVec3) -> Color;

    /// Unit direction from the light toward `point`.
    fn direction_to(&self, point: DVec3) -> DVec3;

    /// Distance from the light to `point`, infinite for directional lights.
    fn distance_to(&self, point: DVec3) -> f64;
}

/// Uniform ambient light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    /// No ambient light.
    pub const NONE: Self = Self { intensity: Color::ZERO };

    /// Ambient light of color `ia` scaled by the attenuation factor `ka`.
    pub fn new(ia: Color, ka: f64) -> Self {
        Self { intensity: ia * ka }
    }

    /// Ambient light with a per-channel attenuation factor.
    pub fn new_rgb(ia: Color, ka: DVec3) -> Self {
        Self { intensity: ia * ka }
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::NONE
    }
}

/// Light from infinitely far away, e.g. the sun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    intensity: Color,
    direction: DVec3,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: DVec3) -> Result<Self, LightError> {
        let direction = direction.try_normalize().ok_or(LightError::ZeroDirection)?;
        Ok(Self { intensity, direction })
    }
}

impl LightSource for DirectionalLight {
    fn intensity_at(&self, _point: DVec3) -> Color {
        self.intensity
    }

    fn direction_to(&self, _point: DVec3) -> DVec3 {
        self.direction
    }

    fn distance_to(&self, _point: DVec3) -> f64 {
        f64::INFINITY
    }
}

/// Omni-directional light at a position, attenuated with distance.
///
/// The intensity at distance `d` is `I / (kc + kl·d + kq·d²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    intensity: Color,
    position: DVec3,
    kc: f64,
    kl: f64,
    kq: f64,
}

impl PointLight {
    /// Create an unattenuated point light (`kc = 1`, `kl = kq = 0`).
    pub fn new(intensity: Color, position: DVec3) -> Self {
        Self {
            intensity,
            position,
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
        }
    }

    /// Constant attenuation factor.
    pub fn with_kc(mut self, kc: f64) -> Self {
        self.kc = kc;
        self
    }

    /// Linear attenuation factor.
    pub fn with_kl(mut self, kl: f64) -> Self {
        self.kl = kl;
        self
    }

    /// Quadratic attenuation factor.
    pub fn with_kq(mut self, kq: f64) -> Self {
        self.kq = kq;
        self
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }
}

impl LightSource for PointLight {
    fn intensity_at(&self, point: DVec3) -> Color {
        let d = self.position.distance(point);
        self.intensity / (self.kc + self.kl * d + self.kq * d * d)
    }

    fn direction_to(&self, point: DVec3) -> DVec3 {
        (point - self.position).normalize_or_zero()
    }

    fn distance_to(&self, point: DVec3) -> f64 {
        self.position.distance(point)
    }
}

/// Point light that only shines into the half-space its direction faces.
///
/// The point light intensity is scaled by `max(0, dir·l)^narrow_beam`, so a
/// larger exponent gives a tighter beam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    point: PointLight,
    direction: DVec3,
    narrow_beam: i32,
}

impl SpotLight {
    pub fn new(intensity: Color, position: DVec3, direction: DVec3) -> Result<Self, LightError> {
        let direction = direction.try_normalize().ok_or(LightError::ZeroDirection)?;
        Ok(Self {
            point: PointLight::new(intensity, position),
            direction,
            narrow_beam: 1,
        })
    }

    /// Beam focus exponent, 1 by default.
    pub fn with_narrow_beam(mut self, narrow_beam: i32) -> Self {
        self.narrow_beam = narrow_beam;
        self
    }

    pub fn with_kc(mut self, kc: f64) -> Self {
        self.point = self.point.with_kc(kc);
        self
    }

    pub fn with_kl(mut self, kl: f64) -> Self {
        self.point = self.point.with_kl(kl);
        self
    }

    pub fn with_kq(mut self, kq: f64) -> Self {
        self.point = self.point.with_kq(kq);
        self
    }
}

impl LightSource for SpotLight {
    fn intensity_at(&self, point: DVec3) -> Color {
        let dl = align_zero(self.direction.dot(self.point.direction_to(point)));
        if dl <= 0.0 {
            return Color::ZERO;
        }
        self.point.intensity_at(point) * dl.powi(self.narrow_beam)
    }

    fn direction_to(&self, point: DVec3) -> DVec3 {
        self.point.direction_to(point)
    }

    fn distance_to(&self, point: DVec3) -> f64 {
        self.point.distance_to(point)
    }
}
