use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use ikiflow::cli::args::{Cli, Commands, RunArgs};
use ikiflow::cli::commands;
use ikiflow::config::{ColorSetting, Config, Paths};
use ikiflow::error::IkiflowError;

/// Log file written while the control panel owns the terminal.
const LOG_FILE: &str = "ikiflow.log";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {e:#}", "error".red().bold());
        let code = e
            .downcast_ref::<IkiflowError>()
            .map_or(1, IkiflowError::exit_code);
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::new()?;
    let config = Config::load_from_path(&paths.config_file)?;

    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }

    let format = cli.output.unwrap_or(config.general.default_output);
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(RunArgs::default()));

    // The control panel owns the terminal, so its logs go to a file
    let log_dir = matches!(command, Commands::Run(_)).then_some(paths.logs.as_path());
    if log_dir.is_some() {
        paths.ensure_dirs()?;
    }
    init_tracing(cli.quiet, cli.verbose, log_dir)?;

    let output = match command {
        Commands::Run(args) => commands::run(&config, &args)?,
        Commands::Simulate(args) => commands::simulate(&args, format)?,
        Commands::Config(args) => commands::config(&paths, &args.command, format)?,
        Commands::Update => commands::update(&config, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool, log_dir: Option<&Path>) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_env("IKIFLOW_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    let initialized = match log_dir {
        Some(dir) => {
            let path = dir.join(LOG_FILE);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    initialized.map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}
