use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use lifemesh_core::{init_logging, init_logging_with_writer, AppConfig, FrameSink};
use lifemesh_lib::{run, HeadlessSink, Mesh, Node, RunOptions, ShutdownManager, Simulation};
use lifemesh_tui::TerminalSink;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path; defaults apply when it does not exist
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Where frames go
    #[arg(short, long, value_enum, default_value = "terminal")]
    mode: Mode,

    /// Overrides [node] name
    #[arg(long)]
    name: Option<String>,

    /// Overrides [node] bind
    #[arg(long)]
    bind: Option<String>,

    /// Overrides the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many generations
    #[arg(short, long)]
    generations: Option<u64>,

    /// Headless only: run as fast as possible
    #[arg(long)]
    unpaced: bool,

    /// Write logs here instead of stderr (terminal mode discards them otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run a ring of three tiles in this process instead of one networked tile
    #[arg(long)]
    demo: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Terminal,
    Headless,
}

fn setup_logging(args: &Args, filter: &str) -> Result<()> {
    match (&args.log_file, args.mode) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            init_logging_with_writer(filter, Mutex::new(file));
        }
        (None, Mode::Terminal) => init_logging_with_writer(filter, std::io::sink),
        (None, Mode::Headless) => init_logging(filter),
    }
    Ok(())
}

/// The effective configuration and whether it came from a file. Nothing is
/// logged here because logging is configured from the result.
fn load_config(args: &Args) -> Result<(AppConfig, bool)> {
    let loaded = AppConfig::read(&args.config)?;
    let from_file = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    if let Some(name) = &args.name {
        config.node.name = name.clone();
    }
    if let Some(bind) = &args.bind {
        config.node.bind = bind.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate().context("Invalid configuration")?;
    Ok((config, from_file))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, from_file) = load_config(&args)?;
    setup_logging(&args, &config.metrics.log_filter)?;
    if from_file {
        tracing::info!(path = %args.config.display(), "Config loaded");
    } else {
        tracing::info!(path = %args.config.display(), "No config file, using defaults");
    }

    let mut sink: Box<dyn FrameSink> = match args.mode {
        Mode::Terminal => Box::new(TerminalSink::new(config.render.target_fps)?),
        Mode::Headless => Box::new(HeadlessSink::new(
            config.render.target_fps,
            !args.unpaced,
        )),
    };

    let shutdown = ShutdownManager::new();
    let _ctrl_c = shutdown.listen_for_ctrl_c();
    let options = RunOptions {
        generations: args.generations,
    };

    let summary = if args.demo {
        let mut mesh = Mesh::ring(&config, Mesh::MIN_SIZE)?;
        run(&mut mesh, sink.as_mut(), config.knob(), &options, &shutdown).await?;
        mesh.summary()
    } else {
        let mut node = Node::new(&config)?;
        let receiver = node.attach_udp(&config.node.bind).await;
        let result = run(&mut node, sink.as_mut(), config.knob(), &options, &shutdown).await;
        if let Some(receiver) = receiver {
            receiver.abort();
        }
        result?;
        node.summary()
    };

    if args.mode == Mode::Headless {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_reports_defaults() {
        let args = Args::parse_from([
            "lifemesh",
            "--config",
            "/nonexistent/lifemesh.toml",
            "--seed",
            "9",
        ]);
        let (config, from_file) = load_config(&args).unwrap();
        assert!(!from_file);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.grid.width, AppConfig::default().grid.width);
    }

    #[test]
    fn test_shipped_config_is_read_from_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml");
        let args = Args::parse_from(["lifemesh", "--config", path, "--mode", "headless"]);
        let (_, from_file) = load_config(&args).unwrap();
        assert!(from_file);
    }
}
