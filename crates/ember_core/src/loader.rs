//! Scene file loading.
//!
//! Scene files are JSON. `render` and `camera` may be omitted or partial;
//! missing fields take their defaults. Vectors are `[x, y, z]` arrays.
//!
//! ```json
//! {
//!   "render": { "image_width": 400, "samples_x": 4, "samples_y": 4 },
//!   "camera": { "look_from": [13, 2, 3], "aperture": 0.0 },
//!   "materials": {
//!     "ground": { "type": "lambertian", "albedo": [0.5, 0.5, 0.5] },
//!     "glass":  { "type": "dielectric", "ior": 1.5 }
//!   },
//!   "spheres": [
//!     { "center": [0, -1000, 0], "radius": 1000, "material": "ground" },
//!     { "center": [0, 1, 0], "radius": 1, "material": "glass" }
//!   ]
//! }
//! ```

use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use crate::scene::{ConfigError, SceneDescription};

/// Errors that can occur while loading a scene file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Invalid(#[from] ConfigError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load and validate a scene file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    debug!("Reading scene file {}", path.display());

    let source = std::fs::read_to_string(path)?;
    let scene = load_scene_from_str(&source)?;

    info!(
        "Loaded {}: {} spheres, {} materials",
        path.display(),
        scene.spheres.len(),
        scene.materials.len()
    );
    Ok(scene)
}

/// Parse and validate a scene from a JSON string.
pub fn load_scene_from_str(source: &str) -> LoadResult<SceneDescription> {
    let scene: SceneDescription = serde_json::from_str(source)?;
    scene.validate()?;
    Ok(scene)
}
