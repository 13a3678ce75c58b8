//! Parallel column-chunk renderer.
//!
//! The image is split into contiguous column ranges, one per worker, and each
//! worker traces every pixel of its own columns. The scene is only read, and
//! no two workers share a pixel, so the only shared mutable state is the
//! progress counter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use arbor_core::{Color, Light, SceneNode};
use arbor_math::{Mat4, Ray, Vec3};
use rayon::prelude::*;

use crate::chunk::{chunk_width, column_chunks};
use crate::{Camera, Image, RenderConfig, RenderError, Shader};

/// Progress report sent after each finished column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Column that was just written
    pub column: u32,
    /// Columns finished so far, across all workers
    pub completed: usize,
    /// Columns in the image
    pub total: usize,
}

impl Progress {
    /// Finished fraction in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

/// Summary of a finished render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStats {
    /// Worker threads in the pool
    pub workers: usize,
    /// Column ranges handed out
    pub chunks: usize,
    /// Columns written
    pub columns: usize,
    /// Pixels written
    pub pixels: usize,
    /// Primary rays traced
    pub samples: usize,
    /// Wall clock time of the render
    pub elapsed: Duration,
}

/// Render `root` into `image`, blocking until every worker is done.
///
/// The camera maps `image`'s resolution to world space; `ambient` and
/// `lights` feed the shading model.
pub fn render(
    root: &SceneNode,
    image: &mut Image,
    camera: &Camera,
    ambient: Color,
    lights: &[Light],
    config: &RenderConfig,
) -> Result<RenderStats, RenderError> {
    render_with_progress(root, image, camera, ambient, lights, config, |_| {})
}

/// [`render`] that also calls `progress` once per finished column.
///
/// The callback runs on worker threads, possibly concurrently.
pub fn render_with_progress<F>(
    root: &SceneNode,
    image: &mut Image,
    camera: &Camera,
    ambient: Color,
    lights: &[Light],
    config: &RenderConfig,
    progress: F,
) -> Result<RenderStats, RenderError>
where
    F: Fn(Progress) + Sync,
{
    config.validate()?;
    camera.validate()?;

    let width = image.width();
    let height = image.height();
    let workers = config.workers();

    if image.is_empty() {
        log::warn!("Nothing to render for a {}x{} image", width, height);
        return Ok(RenderStats {
            workers,
            chunks: 0,
            columns: 0,
            pixels: 0,
            samples: 0,
            elapsed: Duration::ZERO,
        });
    }

    let start = Instant::now();
    let chunks = column_chunks(width, workers);
    let columns_per_chunk = chunk_width(width, workers);

    log::info!(
        "Rendering {}x{}: {} nodes, {} lights, {} workers, {} columns/worker",
        width,
        height,
        root.node_count(),
        lights.len(),
        workers,
        columns_per_chunk
    );
    log::info!(
        "Camera: eye {:?}, view {:?}, up {:?}, fovy {}",
        camera.eye,
        camera.view,
        camera.up,
        camera.fovy
    );

    let device_to_world = camera.device_to_world(width, height);
    let shader = Shader::new(root, ambient, lights, config);
    let offsets = config.subpixel_offsets();
    let completed = AtomicUsize::new(0);
    let total = width as usize;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("arbor-worker-{i}"))
        .build()?;

    let column_len = image.column_len();
    let chunk_len = columns_per_chunk as usize * column_len;
    let chunk_count = chunks.len();

    pool.install(|| {
        image
            .as_mut_slice()
            .par_chunks_mut(chunk_len)
            .zip(chunks)
            .for_each(|(samples, columns)| {
                let chunk_start = Instant::now();
                for (column, x) in samples.chunks_mut(column_len).zip(columns.clone()) {
                    for (y, pixel) in (0..height).zip(column.chunks_exact_mut(3)) {
                        let colour = render_pixel(
                            &shader,
                            &device_to_world,
                            camera.eye,
                            x,
                            y,
                            &offsets,
                        );
                        pixel.copy_from_slice(&colour.to_array());
                    }

                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    progress(Progress {
                        column: x,
                        completed: done,
                        total,
                    });
                }
                log::debug!(
                    "Columns {}..{} done in {:.2?}",
                    columns.start,
                    columns.end,
                    chunk_start.elapsed()
                );
            });
    });

    let pixels = width as usize * height as usize;
    let stats = RenderStats {
        workers,
        chunks: chunk_count,
        columns: completed.into_inner(),
        pixels,
        samples: pixels * offsets.len() * offsets.len(),
        elapsed: start.elapsed(),
    };

    log::info!(
        "Rendered {} pixels ({} samples) in {:.2?}",
        stats.pixels,
        stats.samples,
        stats.elapsed
    );

    Ok(stats)
}

/// Average colour of the sub-pixel samples of pixel `(x, y)`.
pub fn render_pixel(
    shader: &Shader<'_>,
    device_to_world: &Mat4,
    eye: Vec3,
    x: u32,
    y: u32,
    offsets: &[f32],
) -> Color {
    let mut pixel_color = Color::ZERO;

    for &dy in offsets {
        for &dx in offsets {
            let device = Vec3::new(x as f32 + dx, y as f32 + dy, 0.0);
            let ray = Ray::between(eye, device_to_world.transform_point3(device));
            pixel_color += shader.ray_color(&ray, shader.config.max_reflection_bounces);
        }
    }

    let count = offsets.len() * offsets.len();
    if count == 0 {
        return pixel_color;
    }
    pixel_color / count as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Background;
    use arbor_core::{PhongMaterial, Primitive};
    use std::sync::{Arc, Mutex};

    const BACKGROUND: Color = Color::new(0.2, 0.3, 0.4);
    const AMBIENT: Color = Color::new(0.1, 0.1, 0.1);

    fn unit_sphere_scene() -> SceneNode {
        let material = Arc::new(PhongMaterial::new(
            Color::new(0.7, 1.0, 0.7),
            Color::new(0.5, 0.7, 0.5),
            25.0,
        ));
        SceneNode::new("root").with_child(SceneNode::geometry(
            "s1",
            Primitive::unit_sphere(),
            material,
        ))
    }

    fn lights() -> Vec<Light> {
        vec![Light::new(
            Vec3::new(10.0, 10.0, 10.0),
            Color::ONE,
            [1.0, 0.0, 0.0],
        )]
    }

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, Vec3::Y, 60.0)
    }

    fn config(workers: usize) -> RenderConfig {
        RenderConfig {
            worker_count: Some(workers),
            background: Background::Solid(BACKGROUND),
            ..Default::default()
        }
    }

    fn render_scene(config: &RenderConfig, width: u32, height: u32) -> Image {
        let mut image = Image::new(width, height);
        render(
            &unit_sphere_scene(),
            &mut image,
            &camera(),
            AMBIENT,
            &lights(),
            config,
        )
        .unwrap();
        image
    }

    #[test]
    fn test_end_to_end_unit_sphere() {
        let image = render_scene(&config(4), 100, 100);

        let center = image.pixel(50, 50);
        let ambient_only = Color::new(0.7, 1.0, 0.7) * AMBIENT;
        assert_ne!(center, BACKGROUND);
        assert!((center - ambient_only).length() > 0.05, "{center:?}");

        for (x, y) in [(0, 0), (99, 0), (0, 99), (99, 99)] {
            assert_eq!(image.pixel(x, y), BACKGROUND, "corner ({x}, {y})");
        }
    }

    #[test]
    fn test_every_column_written_exactly_once() {
        for (width, workers) in [(37, 4), (10, 3), (5, 8), (64, 1)] {
            let mut image = Image::filled(width, 7, f32::NAN);
            let seen = Mutex::new(Vec::new());

            let stats = render_with_progress(
                &unit_sphere_scene(),
                &mut image,
                &camera(),
                AMBIENT,
                &lights(),
                &config(workers),
                |p| seen.lock().unwrap().push(p.column),
            )
            .unwrap();

            let mut columns = seen.into_inner().unwrap();
            columns.sort_unstable();
            assert_eq!(columns, (0..width).collect::<Vec<_>>());
            assert!(image.as_slice().iter().all(|v| v.is_finite()));
            assert_eq!(stats.columns, width as usize);
            assert_eq!(stats.pixels, width as usize * 7);
            assert!(stats.chunks <= workers);
        }
    }

    #[test]
    fn test_progress_counts_up_to_total() {
        let mut image = Image::new(20, 10);
        let last = AtomicUsize::new(0);

        render_with_progress(
            &unit_sphere_scene(),
            &mut image,
            &camera(),
            AMBIENT,
            &lights(),
            &config(3),
            |p| {
                assert_eq!(p.total, 20);
                assert!(p.completed >= 1 && p.completed <= 20);
                last.fetch_max(p.completed, Ordering::Relaxed);
            },
        )
        .unwrap();

        assert_eq!(last.into_inner(), 20);
    }

    #[test]
    fn test_output_independent_of_worker_count() {
        let single = render_scene(&config(1), 48, 32);
        let many = render_scene(&config(5), 48, 32);
        assert_eq!(single, many);
    }

    #[test]
    fn test_supersampling_smooths_silhouette() {
        let plain = render_scene(&config(2), 40, 40);
        let smooth = render_scene(
            &RenderConfig {
                supersample_factor: 3,
                ..config(2)
            },
            40,
            40,
        );

        // Far from the silhouette both agree; averaging nine equal samples
        // in f32 is only close to the single sample, not bit-identical
        assert!((smooth.pixel(0, 0) - BACKGROUND).length() < 1e-5);
        assert!((smooth.pixel(20, 20) - plain.pixel(20, 20)).length() < 0.05);

        // Some edge pixel mixes sphere and background
        let blended = (0..40).any(|x| {
            let c = smooth.pixel(x, 20);
            (c - plain.pixel(x, 20)).length() > 1e-3 && (c - BACKGROUND).length() > 1e-3
        });
        assert!(blended);
    }

    #[test]
    fn test_stats_count_samples() {
        let mut image = Image::new(8, 4);
        let stats = render(
            &unit_sphere_scene(),
            &mut image,
            &camera(),
            AMBIENT,
            &lights(),
            &RenderConfig {
                supersample_factor: 2,
                ..config(2)
            },
        )
        .unwrap();

        assert_eq!(stats.workers, 2);
        assert_eq!(stats.chunks, 2);
        assert_eq!(stats.pixels, 32);
        assert_eq!(stats.samples, 128);
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let mut image = Image::new(4, 4);
        let scene = unit_sphere_scene();

        let bad_config = RenderConfig {
            supersample_factor: 0,
            ..config(1)
        };
        let err = render(&scene, &mut image, &camera(), AMBIENT, &[], &bad_config);
        assert!(matches!(err, Err(RenderError::InvalidConfig(_))));

        let bad_camera = Camera::new(Vec3::ZERO, Vec3::Y, Vec3::Y, 60.0);
        let err = render(&scene, &mut image, &bad_camera, AMBIENT, &[], &config(1));
        assert!(matches!(err, Err(RenderError::InvalidCamera(_))));
    }

    #[test]
    fn test_empty_image() {
        let mut image = Image::new(0, 10);
        let stats = render(
            &unit_sphere_scene(),
            &mut image,
            &camera(),
            AMBIENT,
            &lights(),
            &config(2),
        )
        .unwrap();
        assert_eq!(stats.pixels, 0);
    }

    #[test]
    fn test_gradient_background_on_miss() {
        let mut image = Image::new(10, 10);
        let config = RenderConfig {
            worker_count: Some(2),
            ..Default::default()
        };
        render(
            &SceneNode::new("empty"),
            &mut image,
            &camera(),
            AMBIENT,
            &[],
            &config,
        )
        .unwrap();

        // Top rows look further up than bottom rows
        let top = image.pixel(5, 0);
        let bottom = image.pixel(5, 9);
        assert!(top.z > bottom.z);
        assert!(top.x < bottom.x);
    }
}
