//! Headless driver for the rotating sphere.
//!
//! Plays the role of the host view: creates a surface, feeds touch input, and
//! pulls frames from the [`RenderContext`], logging what a GPU backend would
//! draw. Configuration is loaded from `config.ron` and can be overridden via
//! CLI flags.
//!
//! Run with `cargo run -p spinsphere-demo -- --quality 4 --frames 240`.

mod error;
mod input;
mod render_context;

use std::process::ExitCode;

use clap::Parser;
use spinsphere_config::{CliArgs, Config, default_config_dir};
use tracing::{debug, error, info};

use crate::error::RenderError;
use crate::input::TouchPhase;
use crate::render_context::RenderContext;

/// Frame at which the scripted touch goes down, and how long it is held.
const TOUCH_DOWN_FRAME: u32 = 10;
const TOUCH_HOLD_FRAMES: u32 = 20;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    spinsphere_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&config, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, args: &CliArgs) -> Result<(), RenderError> {
    let mut ctx = RenderContext::new(config)?;
    info!(
        triangles = ctx.mesh().triangle_count(),
        vertex_bytes = ctx.vertex_bytes().len(),
        index_bytes = ctx.index_bytes().len(),
        "buffers prepared"
    );

    ctx.surface_created();
    ctx.surface_changed(args.width, args.height)?;
    if let Some(viewport) = ctx.viewport() {
        debug!(
            aspect = viewport.aspect_ratio(),
            "projection:\n{}",
            ctx.projection()
        );
    }

    let (center_x, center_y) = (args.width as f32 / 2.0, args.height as f32 / 2.0);
    let mut last_frame = None;

    for n in 0..args.frames {
        let touch_code = match n {
            TOUCH_DOWN_FRAME => Some(0),
            _ if n > TOUCH_DOWN_FRAME && n < TOUCH_DOWN_FRAME + TOUCH_HOLD_FRAMES => Some(1),
            _ if n == TOUCH_DOWN_FRAME + TOUCH_HOLD_FRAMES => Some(2),
            _ => None,
        };
        if let Some(code) = touch_code {
            let phase = TouchPhase::try_from(code)?;
            ctx.touch_event(center_x, center_y + n as f32, phase);
        }

        let frame = ctx.draw_frame()?;
        debug!(
            frame = frame.index,
            gray = ctx.gray(),
            clear = ?frame.clear_color,
            held = ctx.is_held(),
            angle = ctx.angle(),
            "frame"
        );
        last_frame = Some(frame);
    }

    if let Some(frame) = last_frame {
        info!(
            frames = frame.index + 1,
            angle = ctx.angle(),
            "finished; final camera matrix:\n{}",
            frame.camera
        );
    } else {
        info!("no frames requested");
    }

    Ok(())
}
