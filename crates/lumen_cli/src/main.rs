use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use lumen_renderer::{ProgressiveRenderer, RenderConfig};

/// Command line arguments: `lumen OBJ-FILE OUT-FILE [CONFIG.json]`
struct Args {
    scene: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
}

impl Args {
    fn parse(args: &[String]) -> Option<Self> {
        match args {
            [_, scene, output] => Some(Self {
                scene: scene.into(),
                output: output.into(),
                config: None,
            }),
            [_, scene, output, config] => Some(Self {
                scene: scene.into(),
                output: output.into(),
                config: Some(config.into()),
            }),
            _ => None,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let config = match path {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => {
            let config = RenderConfig::default();
            config.validate().context("invalid default config")?;
            config
        }
    };
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let scene = lumen_core::load_obj(&args.scene)
        .with_context(|| format!("failed to load '{}'", args.scene.display()))?;

    log::info!(
        "Rendering {}x{}, {} samples, depth {}, {} threads, {} passes",
        config.width,
        config.height,
        config.pixel_samples,
        config.depth,
        config.threads,
        config.passes
    );

    let start = Instant::now();
    let passes = config.passes;
    let mut renderer = ProgressiveRenderer::new(config)?;
    for _ in 0..passes {
        renderer.step(&scene)?;
        renderer
            .image()
            .save(&args.output)
            .with_context(|| format!("failed to write '{}'", args.output.display()))?;
    }

    let stats = renderer.stats();
    log::info!(
        "Done: {} passes, {} rays, max level {} in {:?}",
        renderer.passes(),
        stats.rays,
        stats.max_level,
        start.elapsed()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let argv: Vec<String> = env::args().collect();
    let Some(args) = Args::parse(&argv) else {
        let program = argv.first().map(String::as_str).unwrap_or("lumen");
        eprintln!("Usage: {program} OBJ-FILE OUT-FILE [CONFIG.json]");
        return ExitCode::FAILURE;
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
