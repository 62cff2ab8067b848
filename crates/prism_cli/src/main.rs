use anyhow::{Context, Result};
use clap::Parser;
use prism_renderer::{ImageBuffer, SimpleRayTracer};
use std::path::PathBuf;

mod cli;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.debug_level.into())
        .init();

    log::info!("Starting Prism");

    let loaded = prism_scene::load_scene_file(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;

    let mut camera = loaded.camera;
    if let Some(threads) = args.threads {
        camera = camera.with_threads(threads);
    }
    if let Some(interval) = args.progress {
        camera = camera.with_progress_interval(interval);
    }
    let camera = camera.build().context("invalid camera settings")?;

    let tracer = SimpleRayTracer::new(&loaded.scene).with_max_level(loaded.max_level);
    let mut image = ImageBuffer::new(loaded.image.width, loaded.image.height);
    camera
        .render_image(&tracer, &mut image)
        .context("render failed")?;

    if let Some((interval, color)) = loaded.image.grid {
        image.draw_grid(interval, color);
    }

    let output = args
        .output
        .or(loaded.image.output)
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", loaded.scene.name)));
    image
        .save(&output)
        .with_context(|| format!("failed to write image {}", output.display()))?;

    Ok(())
}
