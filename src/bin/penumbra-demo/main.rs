mod app;
mod input;
mod mesh;
mod scene;
mod texture;
mod window;

use std::path::PathBuf;
use std::process::ExitCode;

use app::LightDemo;
use clap::Parser;
use penumbra::config::DEFAULT_MAX_SHADER_LIGHTS;
use penumbra::{EngineConfig, LightError};
use window::DemoWindow;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("failed to create window: {0}")]
    Window(#[from] sdl2::video::WindowBuildError),

    #[error(transparent)]
    Light(#[from] LightError),
}

#[derive(Parser)]
#[command(name = "penumbra-demo", about = "Normal-mapped 2D lighting demo")]
struct Args {
    /// TOML file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of lights the shader shades
    #[arg(long)]
    max_lights: Option<usize>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

fn run(args: Args) -> Result<(), DemoError> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    if let Some(max) = args.max_lights {
        if max > DEFAULT_MAX_SHADER_LIGHTS {
            log::warn!(
                "--max-lights {} exceeds the shader's {} slots, clamping",
                max,
                DEFAULT_MAX_SHADER_LIGHTS
            );
        }
        config.max_shader_lights = max.min(DEFAULT_MAX_SHADER_LIGHTS);
    }

    let sdl = sdl2::init().map_err(DemoError::Sdl)?;
    let window = DemoWindow::new(&sdl, "Penumbra", args.width, args.height)?;

    let demo = LightDemo::new(&window, config)?;
    demo.run(&sdl, &window)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
