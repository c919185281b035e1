//! Ember Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for small closed scenes of spheres.
//!
//! Every pixel is rendered by an independent [`PixelJob`] owning its own
//! clone of the random stream, so the image is bit-identical whether the
//! pixels run sequentially or spread over any number of rayon workers.

mod bucket;
mod camera;
mod framebuffer;
mod hittable;
mod integrator;
mod job;
mod material;
mod output;
mod ray;
mod renderer;
mod scene;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use camera::Camera;
pub use framebuffer::{color_to_rgb8, Framebuffer};
pub use hittable::{HitRecord, Hittable, World};
pub use integrator::{ray_color, sky_gradient, T_MIN};
pub use job::{PixelJob, PixelSampling};
pub use material::{Material, Scatter};
pub use output::{save_image, write_ppm, write_ppm_binary, ImageFormat, OutputError};
pub use ray::Ray;
pub use renderer::{render, render_parallel, render_pixel, RenderError};
pub use scene::build_world;
pub use sphere::Sphere;

/// Re-export the math and scene types callers need alongside the renderer
pub use ember_core::{RenderSettings, TerminationPolicy};
pub use ember_math::{Color, Interval, Point3, RngSeed, RngStream, Vec3, VecExt};
