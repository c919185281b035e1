use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use ember_core::{load_scene, BuiltinScene, SceneDescription};
use ember_math::RngStream;
use ember_renderer::{
    build_world, render, render_parallel, save_image, write_ppm, write_ppm_binary, Camera,
    Framebuffer, ImageFormat,
};
use log::info;

mod cli;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let (scene, rng) = prepare_scene(&args)?;
    let framebuffer = render_scene(&args, &scene, &rng)?;

    write_output(&args, &framebuffer)?;
    info!("Done.");
    Ok(())
}

/// Load or build the scene, apply command line overrides and validate.
///
/// Returns the scene together with the base random stream for the render,
/// which has already supplied any draws the scene construction needed.
fn prepare_scene(args: &Args) -> Result<(SceneDescription, RngStream)> {
    let file_scene = match &args.scene_file {
        Some(path) => Some(
            load_scene(path)
                .with_context(|| format!("Failed to load scene file {}", path.display()))?,
        ),
        None => None,
    };

    let mut render_settings = file_scene
        .as_ref()
        .map(|scene| scene.render)
        .unwrap_or_default();
    args.apply_overrides(&mut render_settings);
    render_settings
        .validate()
        .context("Invalid render settings")?;

    // The first draw is discarded before anything else uses the stream
    let mut rng = RngStream::new(render_settings.seed);
    rng.random_double();

    let mut scene = match file_scene {
        Some(scene) => scene,
        None => {
            let builtin = BuiltinScene::from(args.scene);
            info!("Loading {} scene", builtin);
            builtin.build(&mut rng)
        }
    };
    scene.render = render_settings;
    scene.validate().context("Invalid scene")?;

    info!(
        "Rendering {}x{} image with {}x{} samples per pixel",
        scene.render.image_width,
        scene.render.image_height(),
        scene.render.samples_x,
        scene.render.samples_y
    );
    Ok((scene, rng))
}

fn render_scene(args: &Args, scene: &SceneDescription, rng: &RngStream) -> Result<Framebuffer> {
    let world = build_world(scene);
    let camera = Camera::from_settings(&scene.camera, scene.render.aspect_ratio);

    if args.sequential {
        Ok(render(&scene.render, &camera, &world, rng))
    } else {
        render_parallel(&scene.render, &camera, &world, rng).context("Parallel render failed")
    }
}

fn write_output(args: &Args, framebuffer: &Framebuffer) -> Result<()> {
    let Some(path) = &args.output else {
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        if args.binary {
            write_ppm_binary(&mut writer, framebuffer)?;
        } else {
            write_ppm(&mut writer, framebuffer)?;
        }
        writer.flush().context("Failed to write image to stdout")?;
        return Ok(());
    };

    let mut format = ImageFormat::from_path(path)?;
    if args.binary && format == ImageFormat::Ppm {
        format = ImageFormat::PpmBinary;
    }
    save_image(framebuffer, path, format)
        .with_context(|| format!("Failed to write {}", path.display()))
}
