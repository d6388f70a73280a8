//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - list: List command arguments
//! - cleanup: Cleanup command arguments
//! - completions: Completions command arguments
//!
//! Running without a subcommand starts the interactive mode.

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod cleanup;
pub mod completions;
pub mod list;

pub use cleanup::CleanupArgs;
pub use completions::CompletionsArgs;
pub use list::ListArgs;

/// ime-repair - Intune app repair tool
///
/// Discover Win32 apps from Intune Management Extension logs and purge their
/// stale registry state.
#[derive(Parser, Debug)]
#[command(
    name = "ime-repair",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Repair stuck Intune Win32 app installs",
    long_about = "ime-repair discovers Win32 apps from the Intune Management Extension logs, \
                  removes the registry state the extension keeps for them, restarts the \
                  extension service and relaunches Company Portal so the apps are re-evaluated. \
                  Runs are dry runs unless --live is given.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  ime-repair                              \x1b[90m# Pick apps interactively\x1b[0m\n   \
                  ime-repair list                         \x1b[90m# List apps found in the IME logs\x1b[0m\n   \
                  ime-repair cleanup <APP_ID>             \x1b[90m# Show what would be removed\x1b[0m\n   \
                  ime-repair cleanup <APP_ID> --live      \x1b[90m# Remove it (run as Administrator)\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(long, short = 'c', global = true, env = "IME_REPAIR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the IME log files
    #[arg(long, global = true, env = "IME_REPAIR_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List apps discovered in the IME logs
    List(ListArgs),

    /// Clean up registry state for one or more apps
    Cleanup(CleanupArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
