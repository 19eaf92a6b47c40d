//! Light sources.

use crate::Color;
use lumen_math::Vec3;
use rand::{Rng, RngCore};

/// Lights known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightSource {
    Point(PointLight),
    Area(AreaLight),
}

impl LightSource {
    pub fn intensity(&self) -> Color {
        match self {
            LightSource::Point(light) => light.intensity,
            LightSource::Area(light) => light.intensity,
        }
    }
}

impl From<PointLight> for LightSource {
    fn from(light: PointLight) -> Self {
        LightSource::Point(light)
    }
}

impl From<AreaLight> for LightSource {
    fn from(light: AreaLight) -> Self {
        LightSource::Area(light)
    }
}

/// Infinitesimal light at a fixed position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: Color,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: Color) -> Self {
        Self { position, intensity }
    }
}

/// One-sided parallelogram emitter spanned by two edges from a corner.
///
/// Emits towards `edge_u x edge_v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaLight {
    corner: Vec3,
    edge_u: Vec3,
    edge_v: Vec3,
    normal: Vec3,
    area: f32,
    intensity: Color,
}

impl AreaLight {
    pub fn new(corner: Vec3, edge_u: Vec3, edge_v: Vec3, intensity: Color) -> Self {
        let cross = edge_u.cross(edge_v);
        let area = cross.length();
        if area == 0.0 {
            log::warn!("Area light at {:?} has zero area and will not contribute", corner);
        }

        Self {
            corner,
            edge_u,
            edge_v,
            normal: cross.normalize_or_zero(),
            area,
            intensity,
        }
    }

    /// Uniformly sample a point on the light's surface.
    pub fn sample_position(&self, rng: &mut dyn RngCore) -> Vec3 {
        let u: f32 = rng.gen();
        let v: f32 = rng.gen();
        self.corner + u * self.edge_u + v * self.edge_v
    }

    /// Emitting side normal. Constant over the surface.
    pub fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    pub fn area(&self) -> f32 {
        self.area
    }
}
