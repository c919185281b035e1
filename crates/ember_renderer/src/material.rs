//! Surface materials.
//!
//! The set of materials is closed: diffuse, metal and glass. Every variant
//! answers two questions: how an incoming ray scatters (`scatter`) and what
//! its base color is (`diffuse`), which the integrator falls back on when a
//! ray is absorbed.

use ember_core::MaterialDesc;
use ember_math::{Color, RngStream, Vec3, VecExt};

use crate::{hittable::HitRecord, Ray};

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Per-channel fraction of the scattered ray's radiance that survives
    pub attenuation: Color,
    /// The continuation ray
    pub scattered: Ray,
}

/// A surface material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Diffuse surface.
    Lambertian { albedo: Color },
    /// Fuzzy mirror. `fuzz` is in [0, 1].
    Metal { albedo: Color, fuzz: f64 },
    /// Glass-like refractive surface with index of refraction `ior`.
    Dielectric { ior: f64 },
}

impl Material {
    /// Create a Lambertian material with the given albedo color.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian { albedo }
    }

    /// Create a Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough (clamped)
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Create a Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn dielectric(ior: f64) -> Self {
        Material::Dielectric { ior }
    }

    /// Base color of the surface.
    pub fn diffuse(&self) -> Color {
        match *self {
            Material::Lambertian { albedo } | Material::Metal { albedo, .. } => albedo,
            Material::Dielectric { .. } => Color::ONE,
        }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed. Each variant consumes the same
    /// number of draws from `rng` whatever the outcome.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord<'_>, rng: &mut RngStream) -> Option<Scatter> {
        match *self {
            Material::Lambertian { albedo } => {
                let mut scatter_direction = rec.normal + rng.random_unit_vector();

                // Catch degenerate scatter direction
                if scatter_direction.near_zero() {
                    scatter_direction = rec.normal;
                }

                Some(Scatter {
                    attenuation: albedo,
                    scattered: Ray::new(rec.p, scatter_direction),
                })
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = ray_in.direction().unit_vector().reflect(rec.normal);
                let direction = reflected + fuzz * rng.random_in_unit_sphere();

                // Perturbed below the surface: absorbed
                if direction.dot(rec.normal) > 0.0 {
                    Some(Scatter {
                        attenuation: albedo,
                        scattered: Ray::new(rec.p, direction),
                    })
                } else {
                    None
                }
            }
            Material::Dielectric { ior } => {
                let refraction_ratio = if rec.front_face { 1.0 / ior } else { ior };

                let unit_direction = ray_in.direction().unit_vector();
                let (cos_theta, sin_theta) = incidence_angle(unit_direction, rec.normal);

                // Total internal reflection
                let cannot_refract = refraction_ratio * sin_theta > 1.0;
                let should_reflect = reflectance(cos_theta, refraction_ratio) > rng.random_double();

                let direction = if cannot_refract || should_reflect {
                    unit_direction.reflect(rec.normal)
                } else {
                    unit_direction.refract(rec.normal, refraction_ratio)
                };

                Some(Scatter {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction),
                })
            }
        }
    }
}

impl From<MaterialDesc> for Material {
    fn from(desc: MaterialDesc) -> Self {
        match desc {
            MaterialDesc::Lambertian { albedo } => Material::lambertian(albedo),
            MaterialDesc::Metal { albedo, fuzz } => Material::metal(albedo, fuzz),
            MaterialDesc::Dielectric { ior } => Material::dielectric(ior),
        }
    }
}

/// Cosine and sine of the angle between a unit ray direction and the
/// surface normal it meets.
fn incidence_angle(unit_direction: Vec3, normal: Vec3) -> (f64, f64) {
    let cos_theta = (-unit_direction).dot(normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    (cos_theta, sin_theta)
}

/// Schlick's approximation for reflectance.
fn reflectance(cosine: f64, ref_idx: f64) -> f64 {
    let r0 = (1.0 - ref_idx) / (1.0 + ref_idx);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
