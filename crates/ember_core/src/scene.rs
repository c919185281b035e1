//! Scene description types for Ember.
//!
//! These types describe a scene the way a file or a scene builder hands it
//! over: spheres referencing named materials, camera extrinsics and render
//! parameters. They carry no rendering behavior; `ember_renderer` turns a
//! validated description into a world and a camera.

use std::collections::BTreeMap;

use ember_math::{Color, Point3, RngSeed, Vec3, MAX_RNG_MODULUS};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Edge length of the square tiles handed to render workers.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Errors for scene descriptions that cannot be rendered.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Image dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },

    #[error("Aspect ratio must be positive and finite (got {0})")]
    InvalidAspectRatio(f64),

    #[error("Sample counts must be non-zero (got {x}x{y})")]
    ZeroSamples { x: u32, y: u32 },

    #[error("Bucket size must be non-zero")]
    ZeroBucketSize,

    #[error("Thread count must be non-zero")]
    ZeroThreads,

    #[error("RNG divisor must be non-zero")]
    ZeroRngDivisor,

    #[error("RNG modulus must be in 1..={max} (got {modulus})")]
    InvalidRngModulus { modulus: u64, max: u64 },

    #[error("RNG state must be non-zero")]
    ZeroRngState,

    #[error("RNG state {0} settles into a cycle that rejection sampling never leaves")]
    StallingRngSeed(u64),

    #[error("Vertical field of view must be in (0, 180) degrees (got {0})")]
    InvalidFov(f64),

    #[error("Aperture must be non-negative (got {0})")]
    NegativeAperture(f64),

    #[error("Focus distance must be positive (got {0})")]
    InvalidFocusDistance(f64),

    #[error("Camera basis is degenerate: look_from, look_at and vup must span a frame")]
    DegenerateCamera,

    #[error("Sphere {index} has non-positive radius {radius}")]
    NonPositiveRadius { index: usize, radius: f64 },

    #[error("Sphere {index} references unknown material '{name}'")]
    UnknownMaterial { index: usize, name: String },

    #[error("Material '{name}' has albedo outside [0, 1]")]
    InvalidAlbedo { name: String },

    #[error("Material '{name}' has non-positive index of refraction {ior}")]
    InvalidIor { name: String, ior: f64 },
}

/// How a path that cannot continue is terminated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationPolicy {
    /// Exhausted depth returns white and an absorbed ray returns the
    /// material's base color. Non-physical, kept for output parity.
    #[default]
    Legacy,
    /// Both cases contribute black.
    Absorb,
}

/// A material definition, referenced by name from spheres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    /// Diffuse surface.
    Lambertian { albedo: Color },
    /// Reflective surface; `fuzz` 0 is a perfect mirror, 1 very rough.
    Metal { albedo: Color, fuzz: f64 },
    /// Clear refractive surface (glass is about 1.5).
    Dielectric { ior: f64 },
}

/// A sphere primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Point3,
    pub radius: f64,
    /// Key into [`SceneDescription::materials`].
    pub material: String,
}

impl SphereDesc {
    pub fn new(center: Point3, radius: f64, material: impl Into<String>) -> Self {
        Self {
            center,
            radius,
            material: material.into(),
        }
    }
}

/// Camera extrinsics and lens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f64,
    pub aperture: f64,
    pub focus_distance: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Point3::new(13.0, 2.0, 3.0),
            look_at: Point3::ZERO,
            vup: Vec3::Y,
            vfov: 20.0,
            aperture: 0.1,
            focus_distance: 10.0,
        }
    }
}

/// Image and sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub image_width: u32,
    /// Width over height; the height is derived from it
    pub aspect_ratio: f64,
    /// Stratified sub-pixel grid columns
    pub samples_x: u32,
    /// Stratified sub-pixel grid rows
    pub samples_y: u32,
    pub max_depth: u32,
    pub seed: RngSeed,
    pub termination: TerminationPolicy,
    /// Worker threads for parallel rendering; `None` uses rayon's global pool
    pub threads: Option<usize>,
    /// Edge length of the square tiles handed to workers
    pub bucket_size: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_width: 1920,
            aspect_ratio: 16.0 / 10.0,
            samples_x: 16,
            samples_y: 16,
            max_depth: 50,
            seed: RngSeed::default(),
            termination: TerminationPolicy::Legacy,
            threads: None,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderSettings {
    /// Image height, truncated from `width / aspect_ratio`.
    pub fn image_height(&self) -> u32 {
        (self.image_width as f64 / self.aspect_ratio) as u32
    }

    /// Total samples per pixel.
    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_x * self.samples_y
    }

    /// Check the parameters a render cannot proceed without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::InvalidAspectRatio(self.aspect_ratio));
        }
        let height = self.image_height();
        if self.image_width == 0 || height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.image_width,
                height,
            });
        }
        if self.samples_x == 0 || self.samples_y == 0 {
            return Err(ConfigError::ZeroSamples {
                x: self.samples_x,
                y: self.samples_y,
            });
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::ZeroBucketSize);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }

        let seed = self.seed;
        if seed.divisor == 0 {
            return Err(ConfigError::ZeroRngDivisor);
        }
        if seed.modulus == 0 || seed.modulus > MAX_RNG_MODULUS {
            return Err(ConfigError::InvalidRngModulus {
                modulus: seed.modulus,
                max: MAX_RNG_MODULUS,
            });
        }
        // Zero is absorbing and would stall rejection sampling forever
        if seed.state % seed.modulus == 0 {
            return Err(ConfigError::ZeroRngState);
        }
        if seed.stalls_sampling() {
            return Err(ConfigError::StallingRngSeed(seed.state));
        }

        Ok(())
    }
}

impl CameraSettings {
    /// Check the lens and that the look vectors span an orthonormal frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigError::InvalidFov(self.vfov));
        }
        if !(self.aperture >= 0.0) {
            return Err(ConfigError::NegativeAperture(self.aperture));
        }
        if !(self.focus_distance > 0.0 && self.focus_distance.is_finite()) {
            return Err(ConfigError::InvalidFocusDistance(self.focus_distance));
        }

        let w = self.look_from - self.look_at;
        if w.length_squared() == 0.0 || self.vup.cross(w).length_squared() == 0.0 {
            return Err(ConfigError::DegenerateCamera);
        }

        Ok(())
    }
}

/// A complete scene: named materials, ordered spheres, camera and render settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    pub materials: BTreeMap<String, MaterialDesc>,
    pub spheres: Vec<SphereDesc>,
}

impl SceneDescription {
    /// Create an empty scene with default camera and render settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material under `name`, replacing any previous definition.
    pub fn add_material(&mut self, name: impl Into<String>, material: MaterialDesc) {
        self.materials.insert(name.into(), material);
    }

    /// Append a sphere; spheres keep insertion order.
    pub fn add_sphere(&mut self, sphere: SphereDesc) {
        self.spheres.push(sphere);
    }

    /// Validate everything needed to build and render this scene.
    ///
    /// Metal fuzz outside [0, 1] is accepted here and clamped when the
    /// material is built; a warning is logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.render.validate()?;
        self.camera.validate()?;

        for (name, material) in &self.materials {
            match *material {
                MaterialDesc::Lambertian { albedo } => check_albedo(name, albedo)?,
                MaterialDesc::Metal { albedo, fuzz } => {
                    check_albedo(name, albedo)?;
                    if !(0.0..=1.0).contains(&fuzz) {
                        warn!("Material '{}' fuzz {} will be clamped to [0, 1]", name, fuzz);
                    }
                }
                MaterialDesc::Dielectric { ior } => {
                    if !(ior > 0.0 && ior.is_finite()) {
                        return Err(ConfigError::InvalidIor {
                            name: name.clone(),
                            ior,
                        });
                    }
                }
            }
        }

        for (index, sphere) in self.spheres.iter().enumerate() {
            if !(sphere.radius > 0.0) {
                return Err(ConfigError::NonPositiveRadius {
                    index,
                    radius: sphere.radius,
                });
            }
            if !self.materials.contains_key(&sphere.material) {
                return Err(ConfigError::UnknownMaterial {
                    index,
                    name: sphere.material.clone(),
                });
            }
        }

        Ok(())
    }
}

fn check_albedo(name: &str, albedo: Color) -> Result<(), ConfigError> {
    let in_range = |c: f64| (0.0..=1.0).contains(&c);
    if in_range(albedo.x) && in_range(albedo.y) && in_range(albedo.z) {
        Ok(())
    } else {
        Err(ConfigError::InvalidAlbedo {
            name: name.to_string(),
        })
    }
}
