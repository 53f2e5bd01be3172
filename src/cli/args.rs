use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "ikiflow")]
#[command(about = "A screen-time reminder that forces regular breaks")]
#[command(long_about = "ikiflow - a screen-time reminder

Runs a focus interval, then covers the screen with a break overlay for a
fixed number of seconds, and repeats for as long as you keep it open.
While a session runs, a small widget at the top of the screen shows the
remaining time as twelve bars that go dark one by one.

QUICK START:
  ikiflow                          Open the control panel
  ikiflow run -f 25 -b 120         25-minute sessions, 2-minute breaks
  ikiflow simulate -f 5 -b 3       Trace a compressed cycle without a terminal UI

For more information on a specific command, run:
  ikiflow <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Log debug details (also settable with IKIFLOW_LOG)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the control panel (default)
    ///
    /// Starts the interactive terminal control panel. Set the focus length
    /// and break length, press 's' to start. When the focus interval runs
    /// out, a break overlay covers the screen until the break is over.
    ///
    /// # Keys
    ///
    ///   s        Start a fresh session (also restarts a paused one)
    ///   p        Pause / resume
    ///   x        Stop and return to idle
    ///   Tab      Switch between focus and break inputs
    ///   ←/→      Adjust the selected input
    ///   0-9      Type a value, Enter to apply, Esc to discard
    ///   q        Quit
    ///
    /// # Examples
    ///
    ///   ikiflow run                      Use the configured durations
    ///   ikiflow run -f 50 -b 300         50-minute focus, 5-minute break
    ///   ikiflow run --no-update-check    Skip the startup update check
    #[command(alias = "r")]
    Run(RunArgs),

    /// Trace a compressed cycle without a terminal UI
    ///
    /// Runs one focus/break cycle on a synthetic clock, one second per
    /// step, and prints every transition: focus ticks with the widget's
    /// bars, the break overlay's countdown, the fade, and the return to idle.
    /// Durations are taken as given (no clamping), so tiny cycles are possible.
    ///
    /// # Examples
    ///
    ///   ikiflow simulate -f 2 -b 3
    ///   ikiflow simulate -f 60 -b 10 -o json
    Simulate(SimulateArgs),

    /// Show or create the configuration file
    ///
    /// # Examples
    ///
    ///   ikiflow config show      Print the effective configuration
    ///   ikiflow config path      Print the config file location
    ///   ikiflow config init      Write a config file with the defaults
    Config(ConfigArgs),

    /// Check whether a newer release is available
    Update,

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   ikiflow completions zsh > ~/.zsh/completions/_ikiflow
    ///   source <(ikiflow completions bash)
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Focus interval in minutes (overrides the config file)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub focus_minutes: Option<u32>,

    /// Break length in seconds, clamped to 10..=600 (overrides the config file)
    #[arg(short, long, allow_negative_numbers = true)]
    pub break_seconds: Option<i64>,

    /// Do not check for updates at startup
    #[arg(long)]
    pub no_update_check: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Focus interval length in ticks (seconds), at most one day
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(i64).range(1..=86_400))]
    pub focus_ticks: i64,

    /// Break length in ticks (seconds), at most one day
    #[arg(short, long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=86_400))]
    pub break_seconds: u32,

    /// Stop after this many steps even if the cycle has not finished
    #[arg(short, long)]
    pub ticks: Option<u32>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a config file containing the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
