//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Material, Ray};
use lumen_math::{Interval, Vec3};

/// Placeholder material for `HitRecord::default()`. Black, never scatters.
static NO_MATERIAL: Material = Material::Emissive {
    radiance: Vec3::ZERO,
};

/// Record of a ray-object intersection.
#[derive(Debug, Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Outward geometric normal (unit length). Not flipped towards the ray;
    /// the integrator decides which side it is on.
    pub normal: Vec3,
    /// Material of the intersected shape
    pub material: &'a Material,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray arrived from the side the normal points to
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &NO_MATERIAL,
            t: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Store the outward normal and note which face the ray hit.
    pub fn set_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = outward_normal;
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;
}

/// Nearest intersection of `ray` with `world` inside the ray's own bounds.
pub fn closest_intersection<'a>(ray: &Ray, world: &'a dyn Hittable) -> Option<HitRecord<'a>> {
    let mut rec = HitRecord::default();
    if world.hit(ray, ray.interval(), &mut rec) {
        Some(rec)
    } else {
        None
    }
}

/// A list of hittable objects.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Hittable + 'static) {
        self.objects.push(Box::new(object));
    }

    /// Add several objects at once.
    pub fn extend<H: Hittable + 'static>(&mut self, objects: impl IntoIterator<Item = H>) {
        for object in objects {
            self.add(object);
        }
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Sphere, Triangle};

    fn two_spheres() -> HittableList {
        let mut world = HittableList::new();
        world.add(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::lambertian(Color::ONE)));
        world.add(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, Material::mirror()));
        world
    }

    #[test]
    fn test_closest_of_several() {
        let world = two_spheres();
        assert_eq!(world.len(), 2);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0);
        let hit = closest_intersection(&ray, &world).expect("should hit");

        assert!((hit.t - 1.5).abs() < 1e-4);
        assert_eq!(*hit.material, Material::mirror());
        assert!(hit.front_face);
    }

    #[test]
    fn test_respects_ray_bounds() {
        let world = two_spheres();

        // Stops before the near sphere
        let short = Ray::with_bounds(Vec3::ZERO, -Vec3::Z, 0, 1e-3, 1.0);
        assert!(closest_intersection(&short, &world).is_none());

        // Starts past the near sphere
        let far = Ray::with_bounds(Vec3::ZERO, -Vec3::Z, 0, 3.0, f32::INFINITY);
        let hit = closest_intersection(&far, &world).expect("should hit far sphere");
        assert!((hit.t - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_shapes_share_closed_bounds() {
        // Sphere surface and a triangle both exactly at t = 2
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, Material::mirror());
        let triangle = Triangle::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(1.0, -1.0, -2.0),
            Vec3::new(0.0, 1.0, -2.0),
            Material::mirror(),
        );
        let ending_on = Ray::with_bounds(Vec3::ZERO, -Vec3::Z, 0, 1e-3, 2.0);
        let starting_on = Ray::with_bounds(Vec3::ZERO, -Vec3::Z, 0, 2.0, f32::INFINITY);
        let short = Ray::with_bounds(Vec3::ZERO, -Vec3::Z, 0, 1e-3, 1.99);

        for shape in [&sphere as &dyn Hittable, &triangle] {
            for ray in [&ending_on, &starting_on] {
                let mut rec = HitRecord::default();
                assert!(shape.hit(ray, ray.interval(), &mut rec));
                assert_eq!(rec.t, 2.0);
            }
            let mut rec = HitRecord::default();
            assert!(!shape.hit(&short, short.interval(), &mut rec));
        }
    }

    #[test]
    fn test_empty_list_misses() {
        let world = HittableList::default();
        assert!(world.is_empty());
        assert!(closest_intersection(&Ray::new(Vec3::ZERO, Vec3::X, 0), &world).is_none());
    }
}
