//! Row-band tile scheduling.
//!
//! The image is cut into horizontal bands of whole rows, one per worker.
//! Every band gets its own thread, its own slice of the pixel buffer and its
//! own seeded random stream, so workers never share mutable state.

use std::ops::Range;
use std::time::Instant;

use lumen_core::Scene;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{Camera, ImageBuffer, RenderConfig, RenderError, TraceStats, Tracer};

/// Split `height` rows into `count` contiguous bands.
///
/// Band `i` covers rows `[i * height / n, (i + 1) * height / n)` where
/// `n = count` clamped to `[1, height]`, so no band is empty and every row
/// belongs to exactly one band.
pub fn row_bands(height: u32, count: usize) -> Vec<Range<u32>> {
    if height == 0 {
        return Vec::new();
    }
    let n = count.clamp(1, height as usize) as u64;
    let h = height as u64;
    (0..n)
        .map(|i| (i * h / n) as u32..((i + 1) * h / n) as u32)
        .collect()
}

/// Seed of the random stream of one band.
#[inline]
fn band_seed(seed: u64, band: usize) -> u64 {
    seed ^ (band as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Trace one pass over the whole image and add it into `buffer`.
///
/// Each pixel receives the average of `pixel_samples` primary rays. The
/// pool has exactly one thread per band and is joined before returning.
pub fn render_pass(
    scene: &Scene,
    config: &RenderConfig,
    buffer: &mut ImageBuffer,
    seed: u64,
) -> Result<TraceStats, RenderError> {
    config.validate()?;
    if buffer.width != config.width || buffer.height != config.height {
        return Err(RenderError::BufferSize {
            expected: config.width as usize * config.height as usize,
            actual: buffer.pixels.len(),
        });
    }

    let start = Instant::now();
    let bands = row_bands(config.height, config.threads);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(bands.len())
        .build()?;

    let camera = Camera::new(config);
    let width = config.width as usize;
    let slices = buffer.split_bands(&bands)?;
    let mut band_stats = vec![TraceStats::default(); bands.len()];

    pool.scope(|s| {
        for (index, ((first_row, pixels), stats)) in
            slices.into_iter().zip(band_stats.iter_mut()).enumerate()
        {
            let camera = &camera;
            s.spawn(move |_| {
                let band_start = Instant::now();
                let rng = StdRng::seed_from_u64(band_seed(seed, index));
                let mut tracer = Tracer::new(scene, config, rng);

                for (i, pixel) in pixels.iter_mut().enumerate() {
                    let x = (i % width) as u32;
                    let y = first_row + (i / width) as u32;
                    *pixel += tracer.render_pixel(camera, x, y);
                }

                *stats = tracer.stats();
                log::debug!(
                    "Band {} (rows {}..{}) done in {:?}",
                    index,
                    first_row,
                    first_row as usize + pixels.len() / width.max(1),
                    band_start.elapsed()
                );
            });
        }
    });

    let mut total = TraceStats::default();
    for stats in band_stats {
        total.merge(stats);
    }
    log::info!(
        "Pass over {} bands: {} rays, max level {} in {:?}",
        bands.len(),
        total.rays,
        total.max_level,
        start.elapsed()
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Material, TriangleMesh};
    use lumen_math::{Color, Vec3};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// An emitting wall at y = 2 that fills the view of the default camera.
    fn light_wall() -> Scene {
        let mesh = TriangleMesh::with_face_normals(
            vec![
                Vec3::new(-100.0, 2.0, -100.0),
                Vec3::new(100.0, 2.0, -100.0),
                Vec3::new(0.0, 2.0, 100.0),
            ],
            vec![[0, 1, 2]],
        );
        let material = Material::new("light", Color::splat(0.5))
            .with_emission(Color::ONE)
            .with_specular(Color::ZERO, 0.0);
        Scene::single_object(mesh, material).unwrap()
    }

    #[test]
    fn test_row_bands_cover_every_row() {
        for height in [1u32, 2, 7, 16, 31] {
            for n in 1..=height as usize {
                let bands = row_bands(height, n);
                assert_eq!(bands.len(), n);
                assert_eq!(bands[0].start, 0);
                assert_eq!(bands[n - 1].end, height);
                for pair in bands.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start, "gap or overlap");
                }
                assert!(bands.iter().all(|band| !band.is_empty()));
            }
        }
    }

    #[test]
    fn test_row_bands_clamp_count() {
        assert_eq!(row_bands(3, 10), vec![0..1, 1..2, 2..3]);
        assert_eq!(row_bands(5, 0), vec![0..5]);
        assert_eq!(row_bands(10, 3), vec![0..3, 3..6, 6..10]);
        assert!(row_bands(0, 4).is_empty());
    }

    #[test]
    fn test_band_seeds_differ() {
        assert_ne!(band_seed(0, 0), band_seed(0, 1));
        assert_ne!(band_seed(1, 0), band_seed(0, 0));
    }

    #[test]
    fn test_render_pass_energy() {
        init_logger();
        let scene = light_wall();
        let config = RenderConfig {
            threads: 3,
            pixel_samples: 2,
            ..RenderConfig::new(8, 7, 0.5, 0.5)
        };
        let mut buffer = ImageBuffer::new(8, 7);

        let stats = render_pass(&scene, &config, &mut buffer, 42).unwrap();

        for pixel in &buffer.pixels {
            assert!((*pixel - Color::ONE).abs().max_element() < 1e-6, "{pixel:?}");
        }
        // Every primary ray hits and spawns one diffuse ray
        assert_eq!(stats.rays, 8 * 7 * 2 * 2);
        assert_eq!(stats.max_level, 1);
    }

    #[test]
    fn test_render_pass_accumulates() {
        let scene = light_wall();
        let config = RenderConfig {
            threads: 2,
            ..RenderConfig::new(4, 4, 0.5, 0.5)
        };
        let mut buffer = ImageBuffer::new(4, 4);

        render_pass(&scene, &config, &mut buffer, 0).unwrap();
        render_pass(&scene, &config, &mut buffer, 1).unwrap();

        assert!((buffer.average() - Color::splat(2.0)).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_render_pass_is_deterministic() {
        let mesh = TriangleMesh::with_face_normals(
            vec![
                Vec3::new(-3.0, 2.0, -3.0),
                Vec3::new(3.0, 2.0, -3.0),
                Vec3::new(0.0, 4.0, 3.0),
                Vec3::new(-50.0, 6.0, -50.0),
                Vec3::new(50.0, 6.0, -50.0),
                Vec3::new(0.0, 6.0, 50.0),
            ],
            vec![[0, 1, 2], [3, 4, 5]],
        );
        let scene = Scene::single_object(
            mesh,
            Material::new("grey", Color::splat(0.6))
                .with_emission(Color::splat(0.2))
                .with_specular(Color::splat(0.3), 10.0),
        )
        .unwrap();
        let config = RenderConfig {
            threads: 4,
            pixel_samples: 3,
            ..RenderConfig::new(9, 6, 0.6, 0.4)
        };

        let render = |seed| {
            let mut buffer = ImageBuffer::new(9, 6);
            render_pass(&scene, &config, &mut buffer, seed).unwrap();
            buffer
        };
        assert_eq!(render(5), render(5));
    }

    #[test]
    fn test_render_pass_rejects_wrong_buffer() {
        let scene = light_wall();
        let config = RenderConfig::new(4, 4, 0.5, 0.5);
        let mut buffer = ImageBuffer::new(4, 5);

        let err = render_pass(&scene, &config, &mut buffer, 0).unwrap_err();
        assert!(matches!(
            err,
            RenderError::BufferSize {
                expected: 16,
                actual: 20
            }
        ));
        assert_eq!(
            err.to_string(),
            "Image buffer holds 20 pixels but 16 were requested"
        );
    }

    #[test]
    fn test_render_pass_rejects_invalid_config() {
        let scene = light_wall();
        let config = RenderConfig {
            pixel_samples: 0,
            ..RenderConfig::new(4, 4, 0.5, 0.5)
        };
        let mut buffer = ImageBuffer::new(4, 4);

        let err = render_pass(&scene, &config, &mut buffer, 0).unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
        assert_eq!(buffer.average(), Color::ZERO);
    }
}
