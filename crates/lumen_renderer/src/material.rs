//! Surface materials.
//!
//! Materials form a closed set. The integrator never asks "what type is
//! this", it asks the four capability questions and matches on the answers.
//! A material may answer yes to more than one of them (see [`Material::Coated`]).

use lumen_math::Vec3;
use std::f32::consts::FRAC_1_PI;

/// Color type alias (linear RGB)
pub type Color = Vec3;

/// How a surface responds to light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Diffuse + glossy lobe.
    Phong(Phong),
    /// Perfect mirror.
    Mirror,
    /// Smooth dielectric interface (glass, water).
    Transmissive { ior: f32 },
    /// Light-emitting surface. Does not reflect.
    Emissive { radiance: Color },
    /// Phong base under a mirror coat. Both capabilities are active and the
    /// integrator sums their contributions.
    Coated { base: Phong, coat: Color },
}

impl Material {
    /// Lambertian surface with the given albedo.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Phong(Phong::new(albedo, Color::ZERO, 1.0))
    }

    /// Phong surface. See [`Phong::new`].
    pub fn phong(diffuse: Color, specular: Color, shininess: f32) -> Self {
        Material::Phong(Phong::new(diffuse, specular, shininess))
    }

    pub fn mirror() -> Self {
        Material::Mirror
    }

    /// Dielectric with index of refraction `ior` (1.5 = glass, 1.33 = water).
    pub fn transmissive(ior: f32) -> Self {
        Material::Transmissive { ior: ior.max(1.0) }
    }

    pub fn emissive(radiance: Color) -> Self {
        Material::Emissive {
            radiance: radiance.max(Color::ZERO),
        }
    }

    /// Lambertian base with a mirror coat tinted by `coat`.
    ///
    /// The base only receives what the coat does not reflect, so its albedo
    /// is scaled by `1 - coat`.
    pub fn coated(albedo: Color, coat: Color) -> Self {
        let coat = coat.clamp(Color::ZERO, Color::ONE);
        let albedo = albedo.clamp(Color::ZERO, Color::ONE) * (Color::ONE - coat);
        Material::Coated {
            base: Phong::new(albedo, Color::ZERO, 1.0),
            coat,
        }
    }

    #[inline]
    pub fn has_specular(&self) -> bool {
        matches!(self, Material::Mirror | Material::Coated { .. })
    }

    #[inline]
    pub fn has_transmission(&self) -> bool {
        matches!(self, Material::Transmissive { .. })
    }

    #[inline]
    pub fn has_diffuse_or_glossy(&self) -> bool {
        matches!(self, Material::Phong(_) | Material::Coated { .. })
    }

    #[inline]
    pub fn is_emissive(&self) -> bool {
        matches!(self, Material::Emissive { .. })
    }

    /// BRDF value for light arriving along `wi` and leaving along `wo`.
    ///
    /// Only the diffuse/glossy part is evaluated here; delta lobes (mirror,
    /// refraction) are followed by the integrator instead.
    pub fn reflectance(&self, n: Vec3, wo: Vec3, wi: Vec3) -> Color {
        match self {
            Material::Phong(phong) => phong.reflectance(n, wo, wi),
            Material::Coated { base, .. } => base.reflectance(n, wo, wi),
            Material::Mirror | Material::Transmissive { .. } | Material::Emissive { .. } => {
                Color::ZERO
            }
        }
    }

    /// Weight applied to the radiance carried back by a mirror or refraction
    /// continuation.
    pub fn specular_weight(&self) -> Color {
        match self {
            Material::Mirror | Material::Transmissive { .. } => Color::ONE,
            Material::Coated { coat, .. } => *coat,
            Material::Phong(_) | Material::Emissive { .. } => Color::ZERO,
        }
    }

    pub fn emissive_radiance(&self) -> Color {
        match self {
            Material::Emissive { radiance } => *radiance,
            _ => Color::ZERO,
        }
    }

    pub fn index_of_refraction(&self) -> f32 {
        match self {
            Material::Transmissive { ior } => *ior,
            _ => 1.0,
        }
    }

    /// Mirror direction of `wo` about `n`.
    pub fn reflection_direction(&self, n: Vec3, wo: Vec3) -> Vec3 {
        reflect(wo, n)
    }

    /// Refracted direction of `wo` through the interface.
    ///
    /// `n` must lie on the same side as `wo`; callers negate the geometric
    /// normal when the path leaves the object. `entering` selects the index
    /// ratio. Returns `Vec3::ZERO` on total internal reflection.
    pub fn transmission_direction(&self, n: Vec3, wo: Vec3, entering: bool) -> Vec3 {
        let ior = self.index_of_refraction();
        let eta = if entering { 1.0 / ior } else { ior };
        refract(wo, n, eta)
    }
}

/// Normalized Phong BRDF: `kd / pi + ks * (n + 2) / (2 pi) * cos^n(alpha)`.
///
/// `kd + ks` never exceeds 1 in any channel, which keeps it energy conserving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phong {
    diffuse: Color,
    specular: Color,
    shininess: f32,
}

impl Phong {
    /// - `diffuse`: diffuse albedo, clamped to [0, 1]
    /// - `specular`: glossy lobe scale, clamped to [0, 1]
    /// - `shininess`: lobe exponent, higher is tighter
    ///
    /// Channels where `diffuse + specular > 1` are scaled down so the sum is 1.
    pub fn new(diffuse: Color, specular: Color, shininess: f32) -> Self {
        let diffuse = diffuse.clamp(Color::ZERO, Color::ONE);
        let specular = specular.clamp(Color::ZERO, Color::ONE);
        let scale = Color::ONE / (diffuse + specular).max(Color::ONE);
        Self {
            diffuse: diffuse * scale,
            specular: specular * scale,
            shininess: shininess.max(0.0),
        }
    }

    pub fn reflectance(&self, n: Vec3, wo: Vec3, wi: Vec3) -> Color {
        let diffuse = self.diffuse * FRAC_1_PI;
        if self.specular == Color::ZERO {
            return diffuse;
        }

        let cos_alpha = reflect(wo, n).dot(wi).max(0.0);
        let lobe = (self.shininess + 2.0) * 0.5 * FRAC_1_PI * cos_alpha.powf(self.shininess);
        diffuse + self.specular * lobe
    }
}

/// Reflect `v` about the normal `n`. Both point away from the surface.
#[inline]
pub(crate) fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    2.0 * v.dot(n) * n - v
}

/// Snell refraction of `wo` (pointing away from the surface, same side as
/// `n`) with relative index `eta = eta_i / eta_t`.
#[inline]
fn refract(wo: Vec3, n: Vec3, eta: f32) -> Vec3 {
    let cos_i = n.dot(wo);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i).max(0.0);
    if sin2_t > 1.0 {
        return Vec3::ZERO;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    -eta * wo + (eta * cos_i - cos_t) * n
}
