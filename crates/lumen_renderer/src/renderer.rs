//! Image-level rendering.
//!
//! Averages independent `compute_color` estimates per pixel and renders
//! buckets in parallel with rayon. Every bucket draws from its own seeded
//! generator, so a given seed produces the same image on any thread count.

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::integrator::{ConfigError, NeeConfig, NeeIntegrator};
use crate::{Camera, Color, Scene};
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use thiserror::Error;

/// Errors that can occur while rendering or saving an image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid integrator settings: {0}")]
    Config(#[from] ConfigError),

    #[error("samples per pixel must be positive")]
    ZeroSamplesPerPixel,

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Camera rays averaged per pixel
    pub samples_per_pixel: u32,
    /// Base seed for the per-bucket generators
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    pub integrator: NeeConfig,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            samples_per_pixel: 4,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            integrator: NeeConfig::default(),
        }
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    integrator: &NeeIntegrator,
    scene: &Scene,
    x: u32,
    y: u32,
    samples_per_pixel: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += integrator.compute_color(&ray, &scene.objects, &scene.lights, rng);
    }

    pixel_color / samples_per_pixel.max(1) as f32
}

/// Linear-color image.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn blit(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Write a gamma-corrected 8-bit PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Render the entire scene, buckets in parallel.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    settings: &RenderSettings,
) -> RenderResult<ImageBuffer> {
    if settings.samples_per_pixel == 0 {
        return Err(RenderError::ZeroSamplesPerPixel);
    }
    let integrator = NeeIntegrator::new(settings.integrator)?;

    let buckets = generate_buckets(camera.image_width, camera.image_height, settings.bucket_size);
    log::info!(
        "Rendering {}x{} @ {} spp in {} buckets ({} objects, {} lights)",
        camera.image_width,
        camera.image_height,
        settings.samples_per_pixel,
        buckets.len(),
        scene.objects.len(),
        scene.lights.len()
    );

    let start = Instant::now();
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, &integrator, scene, settings))
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        image.blit(result);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AreaLight, Material, Sphere, Triangle};
    use lumen_math::Vec3;

    fn tiny_scene() -> (Camera, Scene) {
        let mut scene = Scene::new();
        for triangle in Triangle::quad(
            Vec3::new(-5.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(10.0, 0.0, 0.0),
            Material::lambertian(Color::splat(0.7)),
        ) {
            scene.add_object(triangle);
        }
        scene.add_object(Sphere::new(Vec3::new(0.0, 0.5, -1.0), 0.5, Material::mirror()));
        scene.add_light(AreaLight::new(
            Vec3::new(-0.5, 3.0, -1.5),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Color::splat(10.0),
        ));

        let mut camera = Camera::new()
            .with_resolution(12, 8)
            .with_position(Vec3::new(0.0, 1.0, 3.0), Vec3::new(0.0, 0.5, -1.0), Vec3::Y)
            .with_fov(50.0);
        camera.initialize();
        (camera, scene)
    }

    fn quick_settings(seed: u64) -> RenderSettings {
        RenderSettings {
            samples_per_pixel: 2,
            seed,
            bucket_size: 5,
            integrator: NeeConfig {
                diffuse_samples: 2,
                max_depth: 2,
                background: Color::new(0.1, 0.1, 0.2),
                ..NeeConfig::default()
            },
        }
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Color::new(4.0, -1.0, 0.25)), [255, 0, 127, 255]);
    }

    #[test]
    fn test_render_fills_every_pixel() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (camera, scene) = tiny_scene();
        let image = render(&camera, &scene, &quick_settings(7)).expect("render");

        assert_eq!(image.pixels.len(), 12 * 8);
        assert_eq!(image.to_rgba().len(), 12 * 8 * 4);
        // Every pixel sees at least the background
        assert!(image.pixels.iter().all(|c| c.min_element() >= 0.1 - 1e-6));
        // The floor is lit somewhere
        assert!(image.pixels.iter().any(|c| c.x > 0.1 + 1e-3));
    }

    #[test]
    fn test_render_is_deterministic_per_seed() {
        let (camera, scene) = tiny_scene();

        let a = render(&camera, &scene, &quick_settings(3)).unwrap();
        let b = render(&camera, &scene, &quick_settings(3)).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_render_rejects_bad_settings() {
        let (camera, scene) = tiny_scene();

        let mut settings = quick_settings(0);
        settings.samples_per_pixel = 0;
        assert!(matches!(
            render(&camera, &scene, &settings),
            Err(RenderError::ZeroSamplesPerPixel)
        ));

        let mut settings = quick_settings(0);
        settings.integrator.diffuse_samples = 0;
        assert!(matches!(
            render(&camera, &scene, &settings),
            Err(RenderError::Config(ConfigError::ZeroDiffuseSamples))
        ));
    }

    #[test]
    fn test_save_png() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::new(1.0, 0.25, 0.0));

        let path = std::env::temp_dir().join(format!("lumen_save_{}.png", std::process::id()));
        image.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(2, 1).0, [255, 127, 0, 255]);
        assert_eq!(loaded.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_settings_from_json() {
        let settings: RenderSettings = serde_json::from_str(
            r#"{ "samples_per_pixel": 16, "integrator": { "background": [0.5, 0.5, 1.0] } }"#,
        )
        .unwrap();

        assert_eq!(settings.samples_per_pixel, 16);
        assert_eq!(settings.bucket_size, DEFAULT_BUCKET_SIZE);
        assert_eq!(settings.integrator.background, Color::new(0.5, 0.5, 1.0));
        assert_eq!(settings.integrator.max_depth, crate::MAX_DEPTH);
    }
}
