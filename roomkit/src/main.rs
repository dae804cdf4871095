mod replay;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roomkit_core::{compute_draw_rect, logging, Config, Dimensions, FitMode, Size, VideoSurface};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use replay::{parse_script, Replay};

/// Config file picked up from the working directory when none is given
const DEFAULT_CONFIG_FILE: &str = "roomkit.yaml";

#[derive(Parser, Debug)]
#[command(name = "roomkit")]
#[command(about = "Conference client room state and video layout tools", long_about = None)]
struct Args {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(long, env = "ROOMKIT_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON-lines session script and print the resulting state
    Replay {
        /// Script file
        script: PathBuf,
    },

    /// Print the draw rectangle for a frame size in the configured viewport
    Fit {
        width: i32,
        height: i32,

        /// Override the configured fit mode
        #[arg(long, value_parser = parse_fit_mode)]
        mode: Option<FitMode>,
    },
}

fn parse_fit_mode(s: &str) -> Result<FitMode, String> {
    match s.to_lowercase().as_str() {
        "fit" => Ok(FitMode::Fit),
        "fill" => Ok(FitMode::Fill),
        other => Err(format!("unknown fit mode '{other}', expected 'fit' or 'fill'")),
    }
}

/// Resolve the config file: explicit path > ./roomkit.yaml > environment only
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()));

    let config = match path {
        Some(path) => {
            let path = path
                .to_str()
                .with_context(|| format!("config path is not valid UTF-8: {}", path.display()))?
                .to_string();
            Config::from_file(&path).with_context(|| format!("failed to load config from {path}"))?
        }
        None => Config::from_env().context("failed to load config from environment")?,
    };

    if let Err(errors) = config.validate() {
        for e in &errors {
            eprintln!("Config validation error: {e}");
        }
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s)",
            errors.len()
        ));
    }

    Ok(config)
}

async fn run_replay(config: &Config, script: &Path) -> Result<()> {
    let input = tokio::fs::read_to_string(script)
        .await
        .with_context(|| format!("failed to read script {}", script.display()))?;
    let steps = parse_script(&input)?;
    info!(steps = steps.len(), script = %script.display(), "Replaying session script");

    let surface = VideoSurface::from_config(&config.surface)?;
    let mut observer = surface.subscribe();
    let observer_task = tokio::spawn(async move {
        let mut notified = 0usize;
        while let Some(dimensions) = observer.recv().await {
            notified += 1;
            info!(
                width = dimensions.width(),
                height = dimensions.height(),
                "Video dimensions changed"
            );
        }
        notified
    });

    let mut replay = Replay::new(surface);
    replay.run(steps);
    let summary = replay.summary();

    // Dropping the surface closes the observer channel
    drop(replay);
    let notified = observer_task.await.context("observer task failed")?;
    debug!(notified, "Observer drained");

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_fit(config: &Config, width: i32, height: i32, mode: Option<FitMode>) -> Result<()> {
    let source = Dimensions::from_report(width, height)
        .with_context(|| format!("invalid frame size {width}x{height}"))?;
    let (viewport_width, viewport_height) = (config.surface.viewport_width, config.surface.viewport_height);
    let viewport = Size::new(viewport_width, viewport_height)
        .with_context(|| format!("invalid viewport {viewport_width}x{viewport_height}"))?;
    let rect = compute_draw_rect(source, viewport, mode.unwrap_or(config.surface.fit_mode));

    println!("{}", serde_json::to_string_pretty(&rect)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.logging)?;
    debug!(?config, "Configuration loaded");

    match args.command {
        Command::Replay { script } => run_replay(&config, &script).await,
        Command::Fit {
            width,
            height,
            mode,
        } => run_fit(&config, width, height, mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_fit_mode() {
        assert_eq!(parse_fit_mode("FILL").unwrap(), FitMode::Fill);
        assert_eq!(parse_fit_mode("fit").unwrap(), FitMode::Fit);
        assert!(parse_fit_mode("stretch").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["roomkit", "fit", "640", "480", "--mode", "fit"]).unwrap();
        match args.command {
            Command::Fit { width, height, mode } => {
                assert_eq!((width, height), (640, 480));
                assert_eq!(mode, Some(FitMode::Fit));
            }
            Command::Replay { .. } => panic!("expected fit command"),
        }
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "logging:\n  format: xml\n").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn test_load_config_requires_explicit_file() {
        let err = load_config(Some(Path::new("/nonexistent/typo.yaml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/typo.yaml"));
    }

    #[test]
    fn test_run_fit_rejects_degenerate_viewport() {
        let mut config = Config::default();
        config.surface.viewport_width = 0.0;
        assert!(run_fit(&config, 640, 480, None).is_err());
        assert!(run_fit(&Config::default(), 640, 480, Some(FitMode::Fit)).is_ok());
    }

    #[tokio::test]
    async fn test_run_replay_reads_script() {
        let mut script = tempfile::NamedTempFile::new().unwrap();
        writeln!(script, r#"{{"kind": "frameSize", "width": 640, "height": 480}}"#).unwrap();

        run_replay(&Config::default(), script.path()).await.unwrap();
        assert!(run_replay(&Config::default(), Path::new("/nonexistent/script.jsonl"))
            .await
            .is_err());
    }
}
