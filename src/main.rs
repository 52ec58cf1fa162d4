mod app;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use app::{App, RunOptions};

/// Headless driver for the ore highlight pipeline.
#[derive(Parser, Debug)]
#[command(name = "seam", version, about)]
struct Args {
    /// TOML config; the built-in config is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Ticks to run before exiting.
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    #[arg(long, default_value_t = 1337)]
    seed: i32,
    /// Reload the highlight, scan and render tables when the config file changes.
    #[arg(long)]
    watch: bool,
    #[arg(long, default_value_t = 16)]
    frame_interval_ms: u64,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let opts = RunOptions {
        config_path: args.config,
        ticks: args.ticks,
        seed: args.seed,
        watch: args.watch,
        frame_interval: Duration::from_millis(args.frame_interval_ms),
    };
    let result = App::new(&opts).and_then(|app| app.run(opts.ticks, opts.frame_interval));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("seam: {e}");
            ExitCode::FAILURE
        }
    }
}
