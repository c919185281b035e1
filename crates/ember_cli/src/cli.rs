use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ember_core::{BuiltinScene, RenderSettings, TerminationPolicy};
use log::LevelFilter;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in scenes selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneArg {
    Simple,
    Random,
}

impl From<SceneArg> for BuiltinScene {
    fn from(scene: SceneArg) -> Self {
        match scene {
            SceneArg::Simple => BuiltinScene::Simple,
            SceneArg::Random => BuiltinScene::Random,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TerminationArg {
    /// Exhausted paths are white, absorbed paths take the surface color
    Legacy,
    /// Exhausted and absorbed paths are black
    Absorb,
}

impl From<TerminationArg> for TerminationPolicy {
    fn from(arg: TerminationArg) -> Self {
        match arg {
            TerminationArg::Legacy => TerminationPolicy::Legacy,
            TerminationArg::Absorb => TerminationPolicy::Absorb,
        }
    }
}

/// Command line arguments
///
/// Render options left unset keep the value from the scene file, or the
/// defaults for built-in scenes.
#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(about = "Offline Monte Carlo path tracer for sphere scenes")]
pub struct Args {
    /// Built-in scene to render
    #[arg(long, value_enum, default_value = "simple", conflicts_with = "scene_file")]
    pub scene: SceneArg,

    /// JSON scene file to render instead of a built-in scene
    #[arg(long)]
    pub scene_file: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Width over height; the height is derived from it
    #[arg(long)]
    pub aspect_ratio: Option<f64>,

    /// Stratified sample columns per pixel
    #[arg(long)]
    pub samples_x: Option<u32>,

    /// Stratified sample rows per pixel
    #[arg(long)]
    pub samples_y: Option<u32>,

    /// Maximum bounces per path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Initial state of the random stream
    #[arg(long)]
    pub seed: Option<u64>,

    /// What exhausted or absorbed paths contribute
    #[arg(long, value_enum)]
    pub termination: Option<TerminationArg>,

    /// Worker threads (defaults to one per core)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Render on the calling thread in scanline order
    #[arg(long)]
    pub sequential: bool,

    /// Edge length of the tiles handed to workers
    #[arg(long)]
    pub bucket_size: Option<u32>,

    /// Output file (.ppm text, .pnm binary, .png); PPM to stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write binary PPM (P6) for .ppm files and stdout
    #[arg(long)]
    pub binary: bool,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply the render options given on the command line.
    pub fn apply_overrides(&self, render: &mut RenderSettings) {
        if let Some(width) = self.width {
            render.image_width = width;
        }
        if let Some(aspect_ratio) = self.aspect_ratio {
            render.aspect_ratio = aspect_ratio;
        }
        if let Some(samples_x) = self.samples_x {
            render.samples_x = samples_x;
        }
        if let Some(samples_y) = self.samples_y {
            render.samples_y = samples_y;
        }
        if let Some(max_depth) = self.max_depth {
            render.max_depth = max_depth;
        }
        if let Some(state) = self.seed {
            render.seed.state = state;
        }
        if let Some(termination) = self.termination {
            render.termination = termination.into();
        }
        if self.threads.is_some() {
            render.threads = self.threads;
        }
        if let Some(bucket_size) = self.bucket_size {
            render.bucket_size = bucket_size;
        }
    }
}
