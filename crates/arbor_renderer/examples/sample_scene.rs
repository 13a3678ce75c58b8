//! Sample scene render.
//!
//! Builds a small scene graph (spheres, a cube, a tetrahedron mesh on a
//! matte ground plane, two lights) and saves the render as a PNG.
//!
//! Usage: `cargo run --release --example sample_scene [output.png] [config.json]`

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use arbor_core::{Axis, JointRange, Light, Mesh, PhongMaterial, Primitive, SceneNode};
use arbor_renderer::{render_with_progress, Camera, Image, RenderConfig, Vec3};

const WIDTH: u32 = 512;
const HEIGHT: u32 = 384;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "sample_scene.png".to_string());
    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("failed to parse config {path}"))?
        }
        None => RenderConfig {
            supersample_factor: 3,
            max_reflection_bounces: 5,
            ..Default::default()
        },
    };

    let start = Instant::now();
    let root = build_scene()?;
    log::info!("Scene built in {:?} ({} nodes)", start.elapsed(), root.node_count());

    let camera = Camera::look_at(
        Vec3::new(0.0, 2.0, 12.0),
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::Y,
        45.0,
    );
    let ambient = Vec3::splat(0.2);
    let lights = [
        Light::new(Vec3::new(-10.0, 12.0, 10.0), Vec3::new(0.8, 0.8, 0.8), [1.0, 0.0, 0.0]),
        Light::new(Vec3::new(8.0, 6.0, 4.0), Vec3::new(0.4, 0.3, 0.2), [1.0, 0.0, 0.0]),
    ];

    let mut image = Image::new(WIDTH, HEIGHT);
    let stats = render_with_progress(
        &root,
        &mut image,
        &camera,
        ambient,
        &lights,
        &config,
        |progress| {
            if progress.completed % 64 == 0 || progress.completed == progress.total {
                log::info!("{:5.1}%", progress.fraction() * 100.0);
            }
        },
    )?;
    log::info!(
        "{} workers traced {} samples in {:?}",
        stats.workers,
        stats.samples,
        stats.elapsed
    );

    let buffer = image::RgbImage::from_raw(WIDTH, HEIGHT, image.to_rgb8())
        .context("image buffer has the wrong size")?;
    buffer
        .save(&output)
        .with_context(|| format!("failed to write {output}"))?;
    log::info!("Saved {}", output);

    Ok(())
}

fn build_scene() -> Result<SceneNode> {
    let matte = Arc::new(
        PhongMaterial::new(Vec3::new(0.5, 0.55, 0.5), Vec3::ZERO, 1.0).with_reflective(false),
    );
    let red = Arc::new(PhongMaterial::new(
        Vec3::new(0.8, 0.15, 0.1),
        Vec3::splat(0.5),
        40.0,
    ));
    let blue = Arc::new(PhongMaterial::new(
        Vec3::new(0.1, 0.2, 0.7),
        Vec3::splat(0.6),
        80.0,
    ));
    let gold = Arc::new(PhongMaterial::new(
        Vec3::new(0.7, 0.55, 0.2),
        Vec3::new(0.8, 0.7, 0.4),
        25.0,
    ));

    let mut root = SceneNode::new("root");

    let mut ground = SceneNode::geometry("ground", Primitive::unit_cube(), matte);
    ground.translate(Vec3::new(-0.5, -1.0, -0.5))?;
    ground.scale(Vec3::new(30.0, 1.0, 30.0))?;
    root.add_child(ground);

    let mut left = SceneNode::geometry("left_ball", Primitive::unit_sphere(), red);
    left.translate(Vec3::new(-2.5, 1.0, 0.0))?;
    root.add_child(left);

    let mut right = SceneNode::geometry("right_ball", Primitive::unit_sphere(), blue);
    right.scale(Vec3::new(1.2, 0.8, 1.2))?;
    right.translate(Vec3::new(2.5, 0.8, -1.0))?;
    root.add_child(right);

    // A cube hanging off a joint so its tilt stays within range
    let mut hinge = SceneNode::joint(
        "hinge",
        JointRange::new(-20.0, 10.0, 20.0),
        JointRange::new(-45.0, 30.0, 45.0),
    )?;
    hinge.rotate(Axis::Y, 60.0)?;
    hinge.translate(Vec3::new(0.0, 0.0, 2.5))?;
    let mut cube = SceneNode::geometry("cube", Primitive::unit_cube(), gold.clone());
    cube.translate(Vec3::splat(-0.5))?;
    cube.scale(Vec3::splat(0.8))?;
    cube.translate(Vec3::new(0.0, 0.4, 0.0))?;
    hinge.add_child(cube);
    root.add_child(hinge);

    let tetrahedron = Mesh::new(
        vec![
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ],
        vec![[0, 1, 3], [0, 2, 1], [0, 3, 2], [1, 2, 3]],
    )?;
    let mut mesh = SceneNode::geometry("tetrahedron", Primitive::from(tetrahedron), gold);
    mesh.scale(Vec3::splat(0.7))?;
    mesh.translate(Vec3::new(0.0, 1.2, -3.0))?;
    root.add_child(mesh);

    Ok(root)
}
