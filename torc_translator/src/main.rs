//! # TORC Translator
//!
//! Per-cycle translation and safety clamping between a joint-command
//! stream and a robot's actuators.
//!
//! Loads a single TOML config, builds the bundled simulation bank from
//! its `sim_joints` section, wires the in-process channel bus, performs
//! RT setup, and runs the fixed-rate loop until SIGINT.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use torc_translator::bus::channel_bus;
use torc_translator::config::load_config;
use torc_translator::cycle::{Translator, rt_setup};
use torc_translator::hardware::SimJointBank;

/// TORC Translator — joint-command translation and safety clamping
#[derive(Parser, Debug)]
#[command(name = "torc_translator")]
#[command(version)]
#[command(about = "Fixed-rate joint-command translation and safety clamping")]
struct Args {
    /// Path to the translator configuration TOML.
    #[arg(default_value = "config/translator.toml")]
    config: PathBuf,

    /// CPU core to pin the RT thread to (default: 1).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (default: 80).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("TORC Translator v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("TORC Translator shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    info!(
        "Config OK: cycle_time={}µs, apply_commands={}, sim joints={}",
        config.cycle_time_us,
        config.apply_commands,
        config.sim_joints.len(),
    );

    rt_setup(args.cpu_core, args.rt_priority)?;
    info!(
        "RT setup complete (cpu_core={}, priority={})",
        args.cpu_core, args.rt_priority
    );

    let bank = SimJointBank::from_config(&config.sim_joints);
    let (source, sink, endpoints) = channel_bus();

    let mut translator = Translator::new(config, bank, Box::new(source), Box::new(sink));
    translator.initialize()?;
    translator.start()?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    translator.run(&running)?;
    translator.stop()?;

    // Keep the far side of the bus alive for the whole run.
    drop(endpoints);
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
