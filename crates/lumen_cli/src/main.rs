//! Renders a Cornell box with the next-event-estimation integrator.
//!
//! Usage: `lumen [settings.json] [output.png]`

use anyhow::{Context, Result};
use lumen_renderer::{
    render, AreaLight, Camera, Color, Material, RenderSettings, Scene, Sphere, Triangle, Vec3,
};
use std::path::Path;
use std::time::Instant;

const ROOM: f32 = 5.0;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => load_settings(Path::new(&path))?,
        None => RenderSettings::default(),
    };
    let output = args.next().unwrap_or_else(|| "render.png".to_string());

    let start = Instant::now();
    let scene = build_scene();
    log::info!("Scene built in {:?}", start.elapsed());

    let mut camera = Camera::new()
        .with_resolution(400, 400)
        .with_position(
            Vec3::new(ROOM / 2.0, ROOM / 2.0, 14.0),
            Vec3::new(ROOM / 2.0, ROOM / 2.0, 0.0),
            Vec3::Y,
        )
        .with_fov(26.0);
    camera.initialize();

    let image = render(&camera, &scene, &settings).context("render failed")?;
    image
        .save_png(&output)
        .with_context(|| format!("could not write {output}"))?;

    Ok(())
}

fn load_settings(path: &Path) -> Result<RenderSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read settings from {}", path.display()))?;
    let settings = serde_json::from_str(&text)
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let white = Material::lambertian(Color::splat(0.73));
    let red = Material::lambertian(Color::new(0.65, 0.05, 0.05));
    let green = Material::lambertian(Color::new(0.12, 0.45, 0.15));

    // Walls, all facing into the room
    let walls = [
        // floor
        (Vec3::ZERO, Vec3::new(0.0, 0.0, ROOM), Vec3::new(ROOM, 0.0, 0.0), white),
        // ceiling
        (Vec3::new(0.0, ROOM, 0.0), Vec3::new(ROOM, 0.0, 0.0), Vec3::new(0.0, 0.0, ROOM), white),
        // back
        (Vec3::ZERO, Vec3::new(ROOM, 0.0, 0.0), Vec3::new(0.0, ROOM, 0.0), white),
        // left
        (Vec3::ZERO, Vec3::new(0.0, ROOM, 0.0), Vec3::new(0.0, 0.0, ROOM), red),
        // right
        (Vec3::new(ROOM, 0.0, 0.0), Vec3::new(0.0, 0.0, ROOM), Vec3::new(0.0, ROOM, 0.0), green),
    ];
    for (corner, u, v, material) in walls {
        for triangle in Triangle::quad(corner, u, v, material) {
            scene.add_object(triangle);
        }
    }

    // Ceiling light, just below the ceiling so it is not coplanar with it
    let radiance = Color::new(15.0, 14.0, 12.0);
    let corner = Vec3::new(2.0, ROOM - 0.01, 2.0);
    let (u, v) = (Vec3::X, Vec3::Z);
    scene.add_light(AreaLight::new(corner, u, v, radiance));
    for triangle in Triangle::quad(corner, u, v, Material::emissive(radiance)) {
        scene.add_object(triangle);
    }

    scene.add_object(Sphere::new(
        Vec3::new(1.3, 0.9, 1.5),
        0.9,
        Material::mirror(),
    ));
    scene.add_object(Sphere::new(
        Vec3::new(3.6, 0.8, 3.0),
        0.8,
        Material::transmissive(1.5),
    ));
    scene.add_object(Sphere::new(
        Vec3::new(3.8, 0.5, 1.0),
        0.5,
        Material::coated(Color::new(0.2, 0.3, 0.7), Color::splat(0.04)),
    ));
    scene.add_object(Sphere::new(
        Vec3::new(1.5, 0.4, 3.8),
        0.4,
        Material::phong(Color::new(0.6, 0.5, 0.2), Color::splat(0.3), 40.0),
    ));

    log::info!(
        "Created {} objects and {} lights",
        scene.objects.len(),
        scene.lights.len()
    );
    scene
}
