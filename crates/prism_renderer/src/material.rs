//! Surface material coefficients.

use prism_math::DVec3;
use thiserror::Error;

/// Color type alias (RGB, 0-255 intensity scale, unbounded until written out)
pub type Color = DVec3;

/// Errors reported by [`Material::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    #[error("material coefficient {name} has a negative channel: {value}")]
    NegativeCoefficient { name: &'static str, value: DVec3 },

    #[error("shininess must not be negative, got {0}")]
    NegativeShininess(i32),
}

/// Phong material with per-channel coefficients.
///
/// Every coefficient is an RGB triple so each color channel can be
/// attenuated independently. All fields default to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse coefficient
    pub kd: DVec3,
    /// Specular coefficient
    pub ks: DVec3,
    /// Transparency coefficient, weights refraction and shadow rays
    pub kt: DVec3,
    /// Reflectivity coefficient, weights mirror reflection rays
    pub kr: DVec3,
    /// Specular highlight exponent
    pub shininess: i32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kd: DVec3::ZERO,
            ks: DVec3::ZERO,
            kt: DVec3::ZERO,
            kr: DVec3::ZERO,
            shininess: 0,
        }
    }
}

impl Material {
    /// Create a black, opaque, non-reflective material.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kd(self, kd: f64) -> Self {
        self.with_kd_rgb(DVec3::splat(kd))
    }

    pub fn with_kd_rgb(mut self, kd: DVec3) -> Self {
        self.kd = kd;
        self
    }

    pub fn with_ks(self, ks: f64) -> Self {
        self.with_ks_rgb(DVec3::splat(ks))
    }

    pub fn with_ks_rgb(mut self, ks: DVec3) -> Self {
        self.ks = ks;
        self
    }

    pub fn with_kt(self, kt: f64) -> Self {
        self.with_kt_rgb(DVec3::splat(kt))
    }

    pub fn with_kt_rgb(mut self, kt: DVec3) -> Self {
        self.kt = kt;
        self
    }

    pub fn with_kr(self, kr: f64) -> Self {
        self.with_kr_rgb(DVec3::splat(kr))
    }

    pub fn with_kr_rgb(mut self, kr: DVec3) -> Self {
        self.kr = kr;
        self
    }

    pub fn with_shininess(mut self, shininess: i32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Check that no coefficient channel and no exponent is negative.
    ///
    /// The tracer does not re-check materials, so scenes should be
    /// validated when they are built.
    pub fn validate(&self) -> Result<(), MaterialError> {
        let coefficients = [("kd", self.kd), ("ks", self.ks), ("kt", self.kt), ("kr", self.kr)];
        for (name, value) in coefficients {
            if value.min_element() < 0.0 {
                return Err(MaterialError::NegativeCoefficient { name, value });
            }
        }
        if self.shininess < 0 {
            return Err(MaterialError::NegativeShininess(self.shininess));
        }
        Ok(())
    }
}
