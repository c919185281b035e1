//! Render dispatch: sequential scanlines or parallel buckets.
//!
//! Both paths run the same [`PixelJob`]s against a read-only world, camera
//! and base random stream, so they produce the same framebuffer bit for bit
//! regardless of bucket size, thread count or scheduling.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use ember_core::RenderSettings;
use ember_math::{Color, RngStream};
use log::{debug, info};
use rayon::prelude::*;
use thiserror::Error;

use crate::{generate_buckets, render_bucket, Camera, Framebuffer, Hittable, PixelJob, PixelSampling};

/// Errors that can occur while dispatching a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Shared pixel counter that logs every tenth of the image.
struct Progress {
    done: AtomicUsize,
    total: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total: total.max(1),
        }
    }

    fn advance(&self, pixels: usize) {
        let before = self.done.fetch_add(pixels, Ordering::Relaxed);
        let after = before + pixels;
        let decile = after * 10 / self.total;
        if decile > before * 10 / self.total {
            info!("Rendered {}% ({}/{} pixels)", decile * 10, after, self.total);
        }
    }
}

/// Render a single pixel and return its summed color.
///
/// `j` counts scanlines from the bottom of the image.
pub fn render_pixel(
    i: u32,
    j: u32,
    camera: &Camera,
    world: &dyn Hittable,
    base: &RngStream,
    sampling: PixelSampling,
) -> Color {
    PixelJob::new(i, j, base, sampling).run(world, camera)
}

/// Render the entire image on the calling thread, top scanline first.
pub fn render(
    settings: &RenderSettings,
    camera: &Camera,
    world: &dyn Hittable,
    base: &RngStream,
) -> Framebuffer {
    let sampling = PixelSampling::from(settings);
    let (width, height) = (sampling.width, sampling.height);
    let mut framebuffer = Framebuffer::new(width, height, sampling.samples_per_pixel());

    info!(
        "Rendering {}x{} at {} spp, depth {} (sequential)",
        width,
        height,
        sampling.samples_per_pixel(),
        sampling.max_depth
    );
    let start = Instant::now();
    let progress = Progress::new(width as usize * height as usize);

    for j in (0..height).rev() {
        for i in 0..width {
            let color = render_pixel(i, j, camera, world, base, sampling);
            framebuffer.set_scanline_pixel(i, j, color);
        }
        progress.advance(width as usize);
    }

    info!("Render finished in {:.2?}", start.elapsed());
    framebuffer
}

/// Render the image with rayon, one task per bucket.
///
/// With `settings.threads` set, the work runs on a dedicated pool of that
/// size; otherwise on rayon's global pool.
pub fn render_parallel(
    settings: &RenderSettings,
    camera: &Camera,
    world: &dyn Hittable,
    base: &RngStream,
) -> Result<Framebuffer, RenderError> {
    let sampling = PixelSampling::from(settings);
    let (width, height) = (sampling.width, sampling.height);
    let buckets = generate_buckets(width, height, settings.bucket_size);

    info!(
        "Rendering {}x{} at {} spp, depth {} ({} buckets of {}px)",
        width,
        height,
        sampling.samples_per_pixel(),
        sampling.max_depth,
        buckets.len(),
        settings.bucket_size
    );
    let start = Instant::now();
    let progress = Progress::new(width as usize * height as usize);

    let render_all = || {
        buckets
            .par_iter()
            .map(|bucket| {
                let result = render_bucket(bucket, camera, world, base, sampling);
                debug!(
                    "Bucket {} done ({}x{} at {},{})",
                    bucket.index, bucket.width, bucket.height, bucket.x, bucket.y
                );
                progress.advance(bucket.pixel_count() as usize);
                result
            })
            .collect::<Vec<_>>()
    };

    let results = match settings.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            info!("Using {} render threads", threads);
            pool.install(render_all)
        }
        None => {
            info!("Using {} render threads", rayon::current_num_threads());
            render_all()
        }
    };

    let mut framebuffer = Framebuffer::new(width, height, sampling.samples_per_pixel());
    for result in results {
        let bucket = result.bucket;
        let rows = result.pixels.chunks(bucket.width.max(1) as usize);
        for (local_y, row) in (0..bucket.height).zip(rows) {
            for (local_x, &color) in (0..bucket.width).zip(row) {
                framebuffer.set(bucket.x + local_x, bucket.y + local_y, color);
            }
        }
    }

    info!("Render finished in {:.2?}", start.elapsed());
    Ok(framebuffer)
}
