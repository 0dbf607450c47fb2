use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info, warn};
use std::fs;
use std::sync::Arc;

mod cli;

use chaosvisor::config::{self, Config, LoggingConfig};
use chaosvisor::signals::{self, NixSignaller, SignalRelay};
use chaosvisor::sink;
use chaosvisor::state::SupervisorState;
use chaosvisor::supervisor::Supervisor;
use cli::Cli;

fn setup_logging(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or(logging.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }

    if let Some(log_file) = &logging.file {
        if let Some(parent) = log_file.parent() {
            fs::create_dir_all(parent).context("Failed to create log directory")?;
        }
        let target = Box::new(
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .context("Failed to open log file")?,
        );
        builder.target(env_logger::Target::Pipe(target));
    }

    builder.init();

    match &logging.file {
        Some(path) => info!("Logging initialized, writing to: {}", path.display()),
        None => info!("Logging initialized, writing to stderr"),
    }
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    if cli.is_verbose() {
        eprintln!("{}", "Verbose mode enabled".yellow());
    }

    let launch = config.child.launch_spec().context("Nothing to supervise")?;
    info!("Supervising: {}", launch);

    let state = Arc::new(SupervisorState::new());
    let relay = Arc::new(SignalRelay::new(state, Arc::new(NixSignaller)));
    let mut listener = signals::install(relay.clone()).context("Failed to install signal handlers")?;

    let sink = sink::from_config(&config.shutdown);
    info!("Shutdown requests go to {}", sink.describe());

    let supervisor = Supervisor::new(launch, relay, sink)
        .with_exit_codes(config.exit_codes)
        .with_restart_policy(config.restart);

    let report = tokio::select! {
        report = supervisor.run() => report.context("Supervisor stopped")?,
        Ok(Some(signal)) = &mut listener => {
            // Unarmed means no child is running, so exiting orphans nothing
            warn!("Received {} with no child running, exiting", signal);
            std::process::exit(signal.default_exit_code());
        }
    };
    info!("Supervisor finished: {}", report);
    if cli.is_verbose() {
        eprintln!("{} {}", "Done:".green(), report);
    }
    Ok(())
}

// One child and one signal listener need no worker pool; blocking waits go
// through spawn_blocking either way.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration, command line wins over the config file
    let loaded = config::load_config(cli.config.as_ref(), &cli.overrides()).context("Failed to load configuration")?;

    // Logging goes wherever the config says, so it starts after loading
    setup_logging(&loaded.config.logging, cli.is_verbose()).context("Failed to setup logging")?;
    loaded.log_diagnostics();
    let config = loaded.config;

    if let Err(e) = run_application(&cli, &config).await {
        eprintln!("{} {:#}", "Error:".red(), e);
        return Err(e);
    }

    Ok(())
}
