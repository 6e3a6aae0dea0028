//! Posture coach application: worker thread plus overlay window.

use anyhow::Result;
use clap::Parser;
use log::info;
use sit_smart_coach::app::OverlayApp;
use sit_smart_coach::config::Config;
use sit_smart_coach::worker::{spawn_posture_worker, StatusChannel, WorkerControls};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long)]
    cam: Option<i32>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Rest-reminder interval in minutes (30, 45, 60 or 120)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Append log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn init_logger(args: &Args) {
    let env = if args.debug {
        env_logger::Env::new().default_filter_or("debug")
    } else {
        env_logger::Env::new().default_filter_or("info")
    };

    let mut builder = env_logger::Builder::from_env(env);

    // File logging is best-effort; a bad path must not block startup
    if let Some(path) = &args.log_file {
        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Cannot open log file {}: {e}; logging to stderr", path.display());
            }
        }
    }

    builder.init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args);

    info!("Sit Smart Coach starting");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(cam) = args.cam {
        config.camera.index = cam;
    }
    if let Some(interval) = args.interval {
        config.timing.rest_interval_min = interval;
    }
    config.validate().map_err(|e| anyhow::anyhow!("{e}"))?;

    let channel = Arc::new(StatusChannel::new());
    let controls = WorkerControls::new();

    let worker = spawn_posture_worker(config.clone(), Arc::clone(&channel), controls.clone());

    let run_result = OverlayApp::new(&config, channel, controls.clone()).and_then(|mut app| app.run());

    controls.stop();
    if worker.join().is_err() {
        log::error!("Posture worker panicked");
    }
    info!("Goodbye");

    run_result.map_err(Into::into)
}
