//! Recursive Whitted-style shading.
//!
//! The color of a hit is its emission, plus Phong lighting from every light
//! that reaches it (attenuated by the transparency of whatever lies in
//! between), plus recursively traced reflection and refraction rays.
//!
//! Recursion stops at [`MAX_CALC_COLOR_LEVEL`] levels or as soon as the
//! accumulated attenuation of a branch drops below [`MIN_CALC_COLOR_K`] on
//! every channel.

use crate::hittable::closest_hit;
use crate::{Color, Hit, Intersectable, LightSource, Ray, Scene};
use prism_math::{align_zero, DVec3};

/// Maximum recursion depth of [`SimpleRayTracer`].
pub const MAX_CALC_COLOR_LEVEL: u32 = 10;

/// Attenuation under which a contribution is dropped.
pub const MIN_CALC_COLOR_K: f64 = 0.001;

const INITIAL_K: DVec3 = DVec3::ONE;

/// Turns a ray into a color.
pub trait RayTracer: Send + Sync {
    /// Color seen along `ray`.
    fn trace_ray(&self, ray: &Ray) -> Color;
}

/// Mirror `d` around the normal `n`.
#[inline]
pub fn reflect(d: DVec3, n: DVec3) -> DVec3 {
    d - n * (2.0 * d.dot(n))
}

/// True if every channel of `k` is below the contribution threshold.
#[inline]
fn below_threshold(k: DVec3) -> bool {
    k.cmplt(DVec3::splat(MIN_CALC_COLOR_K)).all()
}

/// Ray tracer over a borrowed [`Scene`].
pub struct SimpleRayTracer<'a> {
    scene: &'a Scene,
    max_level: u32,
}

impl<'a> SimpleRayTracer<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            max_level: MAX_CALC_COLOR_LEVEL,
        }
    }

    /// Override the recursion depth. A depth below 1 is raised to 1.
    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level.max(1);
        self
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    fn find_closest_hit(&self, ray: &Ray) -> Option<Hit<'a>> {
        let hits = self.scene.geometries.find_hits(ray)?;
        closest_hit(ray, &hits)
    }

    fn calc_color(&self, hit: &Hit<'_>, ray: &Ray, level: u32, k: DVec3) -> Color {
        let color = self.calc_local_effects(hit, ray, k);
        if level > 1 {
            color + self.calc_global_effects(hit, ray, level, k)
        } else {
            color
        }
    }

    fn calc_local_effects(&self, hit: &Hit<'_>, ray: &Ray, k: DVec3) -> Color {
        let geometry = hit.geometry;
        let n = geometry.normal_at(hit.point);
        let v = ray.direction();
        let nv = align_zero(n.dot(v));

        let mut color = geometry.emission();
        if nv == 0.0 {
            return color;
        }

        let material = geometry.material();
        for light in &self.scene.lights {
            let l = light.direction_to(hit.point);
            let nl = align_zero(n.dot(l));
            // Light and viewer on the same side of the surface
            if nl * nv <= 0.0 {
                continue;
            }

            let ktr = self.transparency(hit.point, light.as_ref(), l, n);
            if below_threshold(ktr * k) {
                continue;
            }

            let diffuse = material.kd * nl.abs();
            let r = reflect(l, n);
            let minus_vr = align_zero(-v.dot(r));
            let specular = if minus_vr > 0.0 {
                material.ks * minus_vr.powi(material.shininess)
            } else {
                DVec3::ZERO
            };

            color += light.intensity_at(hit.point) * ktr * (diffuse + specular);
        }
        color
    }

    fn calc_global_effects(&self, hit: &Hit<'_>, ray: &Ray, level: u32, k: DVec3) -> Color {
        let material = hit.geometry.material();
        let n = hit.geometry.normal_at(hit.point);
        let v = ray.direction();

        let refracted = Ray::offset(hit.point, v, n);
        let reflected = Ray::offset(hit.point, reflect(v, n), n);

        self.calc_global_effect(&refracted, level, k, material.kt)
            + self.calc_global_effect(&reflected, level, k, material.kr)
    }

    fn calc_global_effect(&self, ray: &Ray, level: u32, k: DVec3, kx: DVec3) -> Color {
        let kkx = kx * k;
        if below_threshold(kkx) {
            return Color::ZERO;
        }

        let color = match self.find_closest_hit(ray) {
            Some(hit) => self.calc_color(&hit, ray, level - 1, kkx),
            None => self.scene.background,
        };
        color * kx
    }

    /// Product of the transparency of everything between `point` and the light.
    fn transparency(&self, point: DVec3, light: &dyn LightSource, l: DVec3, n: DVec3) -> DVec3 {
        let shadow_ray = Ray::offset(point, -l, n);
        let distance = light.distance_to(point);

        let mut ktr = DVec3::ONE;
        if let Some(hits) = self.scene.geometries.find_bounded_hits(&shadow_ray, distance) {
            for hit in hits {
                ktr *= hit.geometry.material().kt;
                if below_threshold(ktr) {
                    return DVec3::ZERO;
                }
            }
        }
        ktr
    }
}

impl RayTracer for SimpleRayTracer<'_> {
    fn trace_ray(&self, ray: &Ray) -> Color {
        match self.find_closest_hit(ray) {
            Some(hit) => {
                self.calc_color(&hit, ray, self.max_level, INITIAL_K)
                    + self.scene.ambient_light.intensity()
            }
            None => self.scene.background,
        }
    }
}
