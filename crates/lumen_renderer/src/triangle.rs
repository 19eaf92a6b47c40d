//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Interval, Vec3};

/// A triangle primitive.
///
/// The face normal follows the winding `(v1 - v0) x (v2 - v0)`. Both faces
/// are hittable.
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    material: Material,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            v0,
            v1,
            v2,
            normal,
            material,
        }
    }

    /// The two triangles of the parallelogram `corner + s * u + t * v`,
    /// facing `u x v`.
    pub fn quad(corner: Vec3, u: Vec3, v: Vec3, material: Material) -> [Triangle; 2] {
        [
            Triangle::new(corner, corner + u, corner + u + v, material),
            Triangle::new(corner, corner + u + v, corner + v, material),
        ]
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return false;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return false;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = f * edge2.dot(q);
        if !ray_t.contains(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.set_normal(ray, self.normal);
        rec.material = &self.material;

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn facing_camera() -> Triangle {
        // Triangle in XY plane at z=-1, wound to face +Z
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            Material::lambertian(Color::splat(0.5)),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = facing_camera();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0);
        let mut rec = HitRecord::default();

        assert!(tri.hit(&ray, ray.interval(), &mut rec));
        assert!((rec.t - 1.0).abs() < 0.001);
        assert!(rec.normal.abs_diff_eq(Vec3::Z, 1e-6));
        assert!(rec.front_face);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = facing_camera();

        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 0);
        let mut rec = HitRecord::default();

        assert!(!tri.hit(&ray, ray.interval(), &mut rec));
    }

    #[test]
    fn test_quad_covers_parallelogram() {
        let [a, b] = Triangle::quad(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Material::lambertian(Color::ONE),
        );
        for (x, z) in [(-0.9, -0.5), (0.5, 0.9), (-0.9, 0.9), (0.9, -0.9), (0.2, -0.1)] {
            let ray = Ray::new(Vec3::new(x, 1.0, z), -Vec3::Y, 0);
            let mut rec = HitRecord::default();
            let hit = a.hit(&ray, ray.interval(), &mut rec)
                || b.hit(&ray, ray.interval(), &mut rec);
            assert!(hit, "missed quad at ({x}, {z})");
            // Both halves face u x v
            assert!(rec.normal.abs_diff_eq(Vec3::Y, 1e-6));
        }
    }
}
