//! Ember Core - renderer-agnostic scene description.
//!
//! This crate provides:
//!
//! - **Scene description types**: `SceneDescription`, `SphereDesc`, `MaterialDesc`,
//!   `CameraSettings`, `RenderSettings`
//! - **Validation**: malformed input is rejected here, before anything is rendered
//! - **Built-in scenes**: the four-sphere `simple` scene and the `random` sphere field
//! - **Scene files**: JSON loading
//!
//! # Example
//!
//! ```ignore
//! use ember_core::load_scene;
//!
//! let scene = load_scene("scenes/simple.json")?;
//! println!("Loaded {} spheres, {} materials",
//!     scene.spheres.len(),
//!     scene.materials.len());
//! ```

pub mod builtin;
pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use builtin::{random_scene, simple_scene, BuiltinScene};
pub use loader::{load_scene, load_scene_from_str, LoadError, LoadResult};
pub use scene::{
    CameraSettings, ConfigError, MaterialDesc, RenderSettings, SceneDescription, SphereDesc,
    TerminationPolicy, DEFAULT_BUCKET_SIZE,
};
