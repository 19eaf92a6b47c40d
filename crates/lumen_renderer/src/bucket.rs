//! Bucket-based tile rendering.
//!
//! The image is split into buckets rendered independently in parallel.
//! Each bucket owns a generator seeded from the render seed and its
//! position, so output does not depend on scheduling.

use crate::integrator::NeeIntegrator;
use crate::renderer::{render_pixel, RenderSettings};
use crate::{Camera, Color, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's generator. Depends only on the base seed and
    /// the bucket's corner, never on render order.
    pub fn seed(&self, base: u64) -> u64 {
        base ^ ((u64::from(self.y) << 32) | u64::from(self.x))
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Split an image into buckets, ordered center-out.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);
    let mut buckets = Vec::new();

    for y in (0..height).step_by(size as usize) {
        for x in (0..width).step_by(size as usize) {
            let bw = size.min(width - x);
            let bh = size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, 0));
        }
    }

    sort_spiral(&mut buckets, width, height);
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance of their centers from the image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let dist = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

/// Render one bucket with its own seeded generator.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    integrator: &NeeIntegrator,
    scene: &Scene,
    settings: &RenderSettings,
) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket.seed(settings.seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            pixels.push(render_pixel(
                camera,
                integrator,
                scene,
                bucket.x + local_x,
                bucket.y + local_y,
                settings.samples_per_pixel,
                &mut rng,
            ));
        }
    }

    log::debug!("Bucket {} at ({}, {}) done", bucket.index, bucket.x, bucket.y);
    BucketResult {
        bucket: *bucket,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 70, 64);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 70);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9);

        assert_eq!((buckets[0].x, buckets[0].y), (64, 64));
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_bucket_seeds_are_distinct() {
        let buckets = generate_buckets(256, 256, 32);
        let mut seeds: Vec<u64> = buckets.iter().map(|b| b.seed(99)).collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), buckets.len());
    }

    #[test]
    fn test_zero_bucket_size_does_not_hang() {
        let buckets = generate_buckets(3, 2, 0);
        assert_eq!(buckets.len(), 6);
    }
}
