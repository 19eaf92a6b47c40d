//! Lumen renderer - CPU next-event-estimation path tracing.
//!
//! Direct light comes from explicit area-light samples with shadow rays.
//! Indirect light comes from hemisphere-sampled bounces, and mirror or
//! glass surfaces are followed along their ideal directions.

mod bucket;
mod camera;
mod hittable;
mod integrator;
mod light;
mod material;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use hittable::{closest_intersection, HitRecord, Hittable, HittableList};
pub use integrator::{
    geometric_term, ConfigError, NeeConfig, NeeIntegrator, DEPTH_CEILING, DIFFUSE_SAMPLES,
    MAX_DEPTH,
};
pub use light::{AreaLight, LightSource, PointLight};
pub use material::{Color, Material, Phong};
pub use renderer::{
    color_to_rgba, linear_to_gamma, render, render_pixel, ImageBuffer, RenderError, RenderResult,
    RenderSettings,
};
pub use sampling::{HemisphereDensity, HemisphereSample};
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export common math types from lumen_math
pub use lumen_math::{Interval, Ray, Vec3, EPSILON};
