//! Recursive path integrator.

use ember_core::TerminationPolicy;
use ember_math::{Color, Interval, RngStream, VecExt};

use crate::{Hittable, Ray};

/// Minimum hit distance; keeps scattered rays from re-hitting their origin.
pub const T_MIN: f64 = 0.001;

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, bouncing off surfaces and multiplying
/// in each surface's attenuation until the ray escapes to the sky or the
/// bounce budget runs out. What an exhausted or absorbed path contributes
/// is decided by `policy`.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    rng: &mut RngStream,
    policy: TerminationPolicy,
) -> Color {
    if depth == 0 {
        return match policy {
            TerminationPolicy::Legacy => Color::ONE,
            TerminationPolicy::Absorb => Color::ZERO,
        };
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f64::INFINITY)) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(scatter) => {
            scatter.attenuation * ray_color(&scatter.scattered, world, depth - 1, rng, policy)
        }
        None => match policy {
            TerminationPolicy::Legacy => rec.material.diffuse(),
            TerminationPolicy::Absorb => Color::ZERO,
        },
    }
}

/// Sky background: white at the horizon blending to light blue overhead.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().unit_vector();
    let t = 0.5 * (unit_direction.y + 1.0);
    (1.0 - t) * Color::ONE + t * Color::new(0.5, 0.7, 1.0)
}
