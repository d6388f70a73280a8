//! Interactive mode: scan, pick apps, choose dry or live, run

use std::fmt;

use chrono::{DateTime, Local};
use console::Style;
use inquire::{Confirm, MultiSelect};

use crate::config::RepairConfig;
use crate::discovery::{self, DiscoveredApp};
use crate::error::Result;
use crate::progress::Spinner;
use crate::repair::{RepairOrchestrator, RepairTarget};
use crate::sink::{ConsoleSink, ReportSink};
use crate::store;
use crate::system::{self, HostSystem};

/// One row in the app picker
struct AppChoice<'a>(&'a DiscoveredApp);

impl fmt::Display for AppChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0.name, self.0.identifier)
    }
}

/// Console sink that hides the spinner while a line is written
struct SpinnerSink<'a> {
    spinner: &'a Spinner,
    inner: ConsoleSink,
}

impl ReportSink for SpinnerSink<'_> {
    fn emit_at(&self, at: DateTime<Local>, message: &str) {
        self.spinner.suspend(|| self.inner.emit_at(at, message));
    }
}

pub fn run(config: &RepairConfig) -> Result<()> {
    let spinner = Spinner::start(format!("Scanning IME logs in {}", config.log_dir.display()));
    let apps = {
        let sink = SpinnerSink {
            spinner: &spinner,
            inner: ConsoleSink::new(),
        };
        discovery::scan(&config.log_dir, &config.log_glob, &sink)
    };
    spinner.finish("Scan finished");

    if apps.is_empty() {
        println!("No apps found.");
        return Ok(());
    }

    println!();
    let choices: Vec<AppChoice<'_>> = apps.iter().map(AppChoice).collect();
    let selection = match MultiSelect::new("Select apps to repair", choices)
        .with_page_size(15)
        .with_help_message("  ↑↓ navigate  space select  enter confirm  type to filter  esc cancel")
        .prompt_skippable()?
    {
        Some(selection) if !selection.is_empty() => selection,
        _ => {
            println!("Please select at least one app to process.");
            return Ok(());
        }
    };
    let targets = targets_from_selection(selection.iter().map(|c| c.0));

    let live = Confirm::new("Commit changes?")
        .with_default(false)
        .with_help_message("No runs a dry run that only reports what would be removed")
        .prompt()?;

    if live {
        super::ensure_live_allowed(true, system::is_elevated())?;
        let proceed = Confirm::new(&format!(
            "Process the selected {} app(s)? This closes Company Portal, deletes registry keys, restarts IME and reopens Company Portal.",
            targets.len()
        ))
        .with_default(false)
        .prompt()?;
        if !proceed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let sink = ConsoleSink::new();
    let host = HostSystem::new();
    let store = store::open_system_store();
    RepairOrchestrator::new(config, &host, &sink).run(&store, &targets, !live);

    println!(
        "{}",
        Style::new().green().bold().apply_to(format!(
            "Processed {} app(s) at {}.",
            targets.len(),
            Local::now().format("%H:%M:%S")
        ))
    );
    Ok(())
}

fn targets_from_selection<'a>(
    selection: impl Iterator<Item = &'a DiscoveredApp>,
) -> Vec<RepairTarget> {
    selection
        .map(|app| RepairTarget::new(app.identifier.clone(), Some(app.name.clone())))
        .collect()
}
