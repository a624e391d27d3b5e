use anyhow::{Context, Result};
use renderer::{RenderMode, Renderer};
use sceneconfig::SceneConfig;
use tracing_subscriber::EnvFilter;

use crate::bindings::renderer_config;
use crate::cli::RunArgs;
use crate::paths::{AppPaths, ConfigSource, ENV_CONFIG_DIR};

pub fn run(args: RunArgs) -> Result<()> {
    let (config, source) = resolve_config(&args)?;
    let mode = if args.check {
        RenderMode::Check
    } else {
        RenderMode::Interactive
    };

    tracing::info!(
        config = ?source.path(),
        shader_dir = %config.shaders.dir.display(),
        width = config.window.width,
        height = config.window.height,
        ?mode,
        "starting silhouette"
    );

    let mut renderer = Renderer::new(renderer_config(&config, mode));
    renderer.run()
}

pub fn print_config(args: &RunArgs) -> Result<()> {
    let (config, _) = resolve_config(args)?;
    let rendered = config
        .to_toml_string()
        .context("failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}

pub fn print_config_paths(args: &RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let origin = if paths.config_dir_from_env() {
        ENV_CONFIG_DIR
    } else {
        "platform default"
    };
    println!("Configuration:");
    println!("  config dir: {} ({origin})", paths.config_dir().display());
    println!("  scene file: {}", paths.config_file().display());
    match paths.config_source(args.config.as_deref()) {
        ConfigSource::Explicit(path) => println!("  active:     {} (--config)", path.display()),
        ConfigSource::Discovered(path) => println!("  active:     {}", path.display()),
        ConfigSource::Defaults => println!("  active:     built-in defaults"),
    }
    Ok(())
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the scene file (or defaults) and applies command-line overrides.
fn resolve_config(args: &RunArgs) -> Result<(SceneConfig, ConfigSource)> {
    let paths = AppPaths::discover()?;
    let source = paths.config_source(args.config.as_deref());

    let mut config = match source.path() {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load scene config {}", path.display()))?,
        None => {
            tracing::debug!("no scene file found; using built-in defaults");
            SceneConfig::default()
        }
    };

    apply_overrides(&mut config, args);
    config
        .validate()
        .context("command-line overrides produced an invalid configuration")?;
    Ok((config, source))
}

fn apply_overrides(config: &mut SceneConfig, args: &RunArgs) {
    if let Some(dir) = &args.shader_dir {
        config.shaders.dir = dir.clone();
    }
    if let Some((width, height)) = args.size {
        config.window.width = width;
        config.window.height = height;
    }
    if args.no_vsync {
        config.window.vsync = false;
    }
}
