//! Per-pixel sampling jobs.

use ember_core::{RenderSettings, TerminationPolicy};
use ember_math::{Color, RngStream};

use crate::{integrator::ray_color, Camera, Hittable};

/// Sampling parameters shared by every pixel of a render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSampling {
    /// Stratified grid columns
    pub samples_x: u32,
    /// Stratified grid rows
    pub samples_y: u32,
    pub max_depth: u32,
    pub width: u32,
    pub height: u32,
    pub termination: TerminationPolicy,
}

impl PixelSampling {
    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_x * self.samples_y
    }
}

impl From<&RenderSettings> for PixelSampling {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            samples_x: settings.samples_x,
            samples_y: settings.samples_y,
            max_depth: settings.max_depth,
            width: settings.image_width,
            height: settings.image_height(),
            termination: settings.termination,
        }
    }
}

/// The work for one pixel: its coordinates and a private random stream.
///
/// `j` counts scanlines from the bottom of the image. The job consumes
/// itself when run, so each pixel is evaluated exactly once.
#[derive(Debug, Clone)]
pub struct PixelJob {
    pub i: u32,
    pub j: u32,
    rng: RngStream,
    sampling: PixelSampling,
}

impl PixelJob {
    /// Create a job with its own clone of `base`. `base` is not advanced.
    pub fn new(i: u32, j: u32, base: &RngStream, sampling: PixelSampling) -> Self {
        Self {
            i,
            j,
            rng: base.clone(),
            sampling,
        }
    }

    /// Trace every sample of the pixel and return the summed color.
    ///
    /// Samples sit on a `samples_x` by `samples_y` grid of sub-pixel
    /// offsets in [-0.5, 0.5), rows outer. The caller divides by the sample
    /// count.
    pub fn run(mut self, world: &dyn Hittable, camera: &Camera) -> Color {
        let PixelSampling {
            samples_x,
            samples_y,
            max_depth,
            width,
            height,
            termination,
        } = self.sampling;

        let s_scale = f64::from(width.saturating_sub(1).max(1));
        let t_scale = f64::from(height.saturating_sub(1).max(1));

        let mut pixel_color = Color::ZERO;
        for ry in 0..samples_y {
            let y = f64::from(ry) / f64::from(samples_y) - 0.5;
            for rx in 0..samples_x {
                let x = f64::from(rx) / f64::from(samples_x) - 0.5;

                let s = (f64::from(self.i) + x) / s_scale;
                let t = (f64::from(self.j) + y) / t_scale;
                let ray = camera.get_ray(&mut self.rng, s, t);
                pixel_color += ray_color(&ray, world, max_depth, &mut self.rng, termination);
            }
        }

        pixel_color
    }
}
