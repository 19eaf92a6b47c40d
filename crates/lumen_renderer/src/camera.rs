//! Camera for ray generation.

use crate::Ray;
use lumen_math::Vec3;
use rand::{Rng, RngCore};

/// Pinhole camera generating depth-0 rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        // Viewport one unit in front of the camera
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        // Viewport edges, v pointing down the image
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left = self.center - w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
    }

    /// Generate a ray through a random point of pixel (i, j).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset_x = rng.gen::<f32>() - 0.5;
        let offset_y = rng.gen::<f32>() - 0.5;

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset_x) * self.pixel_delta_u
            + ((j as f32) + offset_y) * self.pixel_delta_v;

        Ray::new(self.center, pixel_sample - self.center, 0)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
