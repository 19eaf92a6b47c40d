//! Next-event-estimation radiance integrator.
//!
//! Radiance at a shading point is split into
//! - direct light, estimated by sampling a point on every area light and
//!   casting a shadow ray,
//! - indirect light, estimated with one hemisphere-sampled bounce,
//! - mirror and refraction continuations, which follow the single ideal
//!   direction.
//!
//! Two depth limits apply. `max_depth` gates every continuation spawned while
//! shading a point (indirect bounces, mirror, refraction) but never the
//! direct term. `depth_ceiling` is checked only on entry to
//! [`NeeIntegrator::compute_color`], which recurses on its own through
//! mirror and glass surfaces hit straight from the camera.

use crate::hittable::{closest_intersection, HitRecord, Hittable};
use crate::sampling::HemisphereDensity;
use crate::{Color, LightSource, Material, Ray};
use lumen_math::Vec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bounces after which shading stops spawning continuation rays.
pub const MAX_DEPTH: u32 = 6;

/// Depth at which `compute_color` gives up and returns the background.
pub const DEPTH_CEILING: u32 = 20;

/// Estimates averaged per camera hit on a diffuse or glossy surface.
pub const DIFFUSE_SAMPLES: u32 = 256;

/// Errors raised when building an integrator from bad settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("diffuse sample count must be positive")]
    ZeroDiffuseSamples,

    #[error("depth ceiling {ceiling} is below the continuation depth limit {max_depth}")]
    CeilingBelowMaxDepth { ceiling: u32, max_depth: u32 },
}

/// Integrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeeConfig {
    /// Radiance of rays that leave the scene
    pub background: Color,
    /// Continuation depth limit (indirect, mirror, refraction)
    pub max_depth: u32,
    /// Hard limit checked by `compute_color`
    pub depth_ceiling: u32,
    /// Samples averaged per diffuse camera hit
    pub diffuse_samples: u32,
    /// Density used for indirect bounces
    pub hemisphere: HemisphereDensity,
}

impl Default for NeeConfig {
    fn default() -> Self {
        Self {
            background: Color::ZERO,
            max_depth: MAX_DEPTH,
            depth_ceiling: DEPTH_CEILING,
            diffuse_samples: DIFFUSE_SAMPLES,
            hemisphere: HemisphereDensity::Cosine,
        }
    }
}

impl NeeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.diffuse_samples == 0 {
            return Err(ConfigError::ZeroDiffuseSamples);
        }
        if self.depth_ceiling < self.max_depth {
            return Err(ConfigError::CeilingBelowMaxDepth {
                ceiling: self.depth_ceiling,
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }
}

/// Recursive path tracer with explicit light sampling.
///
/// Holds only settings. Scene data and the random stream are passed to every
/// call, so one integrator can be shared by any number of render threads.
#[derive(Debug, Clone)]
pub struct NeeIntegrator {
    config: NeeConfig,
}

impl NeeIntegrator {
    pub fn new(config: NeeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!("NEE integrator: {:?}", config);
        Ok(Self { config })
    }

    /// Radiance arriving along a camera (or mirror/glass continuation) ray,
    /// composited over the background.
    pub fn compute_color(
        &self,
        ray: &Ray,
        objects: &dyn Hittable,
        lights: &[LightSource],
        rng: &mut dyn RngCore,
    ) -> Color {
        let background = self.config.background;
        if ray.depth() >= self.config.depth_ceiling {
            return background;
        }

        let Some(hit) = closest_intersection(ray, objects) else {
            return background;
        };
        let material = hit.material;
        let wo = -ray.direction();

        if material.is_emissive() {
            background + material.emissive_radiance()
        } else if material.has_diffuse_or_glossy() {
            let samples = self.config.diffuse_samples;
            let sum = (0..samples).fold(Color::ZERO, |acc, _| {
                acc + self.reflected_radiance(&hit, wo, objects, lights, ray.depth(), rng)
            });
            background + sum / samples as f32
        } else if material.has_specular() {
            let wr = material.reflection_direction(hit.normal, wo);
            self.compute_color(&ray.spawn(hit.p, wr), objects, lights, rng)
        } else if material.has_transmission() {
            let direction = transmitted_or_reflected(&hit, wo);
            self.compute_color(&ray.spawn(hit.p, direction), objects, lights, rng)
        } else {
            background
        }
    }

    /// Emitted plus reflected radiance at the first hit of `ray`. Zero when
    /// the ray leaves the scene.
    pub fn compute_radiance(
        &self,
        ray: &Ray,
        objects: &dyn Hittable,
        lights: &[LightSource],
        rng: &mut dyn RngCore,
    ) -> Color {
        match closest_intersection(ray, objects) {
            Some(hit) => {
                let wo = -ray.direction();
                hit.material.emissive_radiance()
                    + self.reflected_radiance(&hit, wo, objects, lights, ray.depth(), rng)
            }
            None => Color::ZERO,
        }
    }

    /// Radiance leaving `hit` towards `wo`, for a path `depth` bounces long.
    pub fn reflected_radiance(
        &self,
        hit: &HitRecord,
        wo: Vec3,
        objects: &dyn Hittable,
        lights: &[LightSource],
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let material = hit.material;
        let mut radiance = Color::ZERO;

        if material.has_diffuse_or_glossy() {
            radiance += self.direct_radiance(hit, wo, objects, lights, rng);
            radiance += self.indirect_radiance(hit, wo, objects, lights, depth, rng);
        }

        if depth < self.config.max_depth {
            let direction = if material.has_specular() {
                Some(material.reflection_direction(hit.normal, wo))
            } else if material.has_transmission() {
                Some(transmitted_or_reflected(hit, wo))
            } else {
                None
            };

            if let Some(direction) = direction {
                let continuation = Ray::new(hit.p, direction, depth + 1);
                radiance += material.specular_weight()
                    * self.compute_radiance(&continuation, objects, lights, rng);
            }
        }

        radiance
    }

    /// Direct light at `hit` from one position sample per area light.
    pub fn direct_radiance(
        &self,
        hit: &HitRecord,
        wo: Vec3,
        objects: &dyn Hittable,
        lights: &[LightSource],
        rng: &mut dyn RngCore,
    ) -> Color {
        let n = shading_normal(hit, wo);
        let mut radiance = Color::ZERO;

        for light in lights {
            let area_light = match light {
                LightSource::Area(area_light) => area_light,
                // Point lights are not sampled by this estimator
                LightSource::Point(_) => continue,
            };

            let position = area_light.sample_position(rng);
            let (shadow_ray, distance) = Ray::shadow(hit.p, position, 0);
            let wi = shadow_ray.direction();

            let g = geometric_term(n, wi, area_light.normal_at(position), distance);
            if g == 0.0 {
                continue;
            }
            if closest_intersection(&shadow_ray, objects).is_some() {
                continue;
            }

            let f = hit.material.reflectance(n, wo, wi);
            radiance += light.intensity() * f * g * area_light.area();
        }

        radiance
    }

    /// One-sample estimate of light reaching `hit` after at least one more
    /// bounce. Zero once `depth` reaches `max_depth`.
    pub fn indirect_radiance(
        &self,
        hit: &HitRecord,
        wo: Vec3,
        objects: &dyn Hittable,
        lights: &[LightSource],
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        if depth >= self.config.max_depth {
            return Color::ZERO;
        }

        let n = shading_normal(hit, wo);
        let sample = self.config.hemisphere.sample(n, rng);
        let cos_theta = n.dot(sample.direction).max(0.0);
        if sample.pdf <= 0.0 || cos_theta == 0.0 {
            return Color::ZERO;
        }

        let bounce = Ray::new(hit.p, sample.direction, depth + 1);
        let Some(next) = closest_intersection(&bounce, objects) else {
            return Color::ZERO;
        };

        let wi = bounce.direction();
        let incoming = self.reflected_radiance(&next, -wi, objects, lights, bounce.depth(), rng);
        incoming * hit.material.reflectance(n, wo, wi) * (cos_theta / sample.pdf)
    }
}

/// `cos(theta) cos(theta_light) / d^2` with both cosines clamped at zero.
#[inline]
pub fn geometric_term(n: Vec3, wi: Vec3, light_normal: Vec3, distance: f32) -> f32 {
    if distance <= 0.0 {
        return 0.0;
    }
    let cos_surface = wi.dot(n).max(0.0);
    let cos_light = (-wi).dot(light_normal).max(0.0);
    cos_surface * cos_light / (distance * distance)
}

/// Geometric normal turned towards `wo`. Diffuse and glossy lobes only
/// exist on the side the path arrives from.
#[inline]
fn shading_normal(hit: &HitRecord, wo: Vec3) -> Vec3 {
    if hit.normal.dot(wo) >= 0.0 {
        hit.normal
    } else {
        -hit.normal
    }
}

/// Refracted direction at a transmissive hit, or the mirror direction under
/// total internal reflection.
fn transmitted_or_reflected(hit: &HitRecord, wo: Vec3) -> Vec3 {
    let material: &Material = hit.material;
    let entering = hit.normal.dot(wo) > 0.0;
    let n = if entering { hit.normal } else { -hit.normal };

    let wt = material.transmission_direction(n, wo, entering);
    if wt.length_squared() == 0.0 {
        material.reflection_direction(hit.normal, wo)
    } else {
        wt
    }
}
