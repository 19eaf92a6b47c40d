//! Hemisphere sampling.
//!
//! Nothing here owns a generator. Every draw goes through the
//! `&mut dyn RngCore` handed in by the caller, so a render thread owns its
//! own stream and tests can substitute a seeded or constant generator.

use lumen_math::Vec3;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_1_PI, PI};

/// Probability density used for indirect bounces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HemisphereDensity {
    /// pdf = cos(theta) / pi. Cancels the cosine of a Lambertian lobe.
    #[default]
    Cosine,
    /// pdf = 1 / (2 pi)
    Uniform,
}

/// A sampled direction and the density it was drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereSample {
    pub direction: Vec3,
    pub pdf: f32,
}

impl HemisphereDensity {
    /// Draw one direction on the hemisphere around the unit normal `n`.
    pub fn sample(self, n: Vec3, rng: &mut dyn RngCore) -> HemisphereSample {
        let u1: f32 = rng.gen();
        let u2: f32 = rng.gen();
        let phi = 2.0 * PI * u1;

        let (local, pdf) = match self {
            HemisphereDensity::Cosine => {
                // Malley's method: uniform disk projected up onto the hemisphere
                let r = u2.sqrt();
                let cos_theta = (1.0 - u2).max(0.0).sqrt();
                (Vec3::new(r * phi.cos(), r * phi.sin(), cos_theta), cos_theta * FRAC_1_PI)
            }
            HemisphereDensity::Uniform => {
                let cos_theta = u2;
                let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
                let local = Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
                (local, 0.5 * FRAC_1_PI)
            }
        };

        HemisphereSample {
            direction: to_world(local, n),
            pdf,
        }
    }
}

/// Rotate a direction given in the frame where +Z is `n` into world space.
#[inline]
fn to_world(local: Vec3, n: Vec3) -> Vec3 {
    let (t, b) = n.any_orthonormal_pair();
    (local.x * t + local.y * b + local.z * n).normalize()
}
