//! List command implementation
//!
//! Scans the IME logs and prints every discovered app.

use std::io::Write;

use console::Style;

use crate::cli::ListArgs;
use crate::config::RepairConfig;
use crate::discovery::{self, DiscoverySet};
use crate::error::Result;
use crate::sink::{ConsoleSink, ReportSink};

/// Run list command
pub fn run(config: &RepairConfig, args: ListArgs) -> Result<()> {
    // Keep stdout parseable when printing JSON
    let sink = if args.json {
        ConsoleSink::stderr()
    } else {
        ConsoleSink::new()
    };
    sink.emit(&format!(
        "Scanning IME logs in {}...",
        config.log_dir.display()
    ));

    let apps = discovery::scan(&config.log_dir, &config.log_glob, &sink);

    let mut out = std::io::stdout().lock();
    if args.json {
        write_json(&mut out, &apps)
    } else {
        write_text(&mut out, &apps)
    }
}

fn write_json(out: &mut impl Write, apps: &DiscoverySet) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, apps.as_slice())?;
    writeln!(out)?;
    Ok(())
}

fn write_text(out: &mut impl Write, apps: &DiscoverySet) -> Result<()> {
    if apps.is_empty() {
        writeln!(out, "No apps found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{}",
        Style::new()
            .bold()
            .apply_to(format!("Discovered Intune apps ({}):", apps.len()))
    )?;
    for app in apps {
        writeln!(
            out,
            "- {} ({}) [{}]",
            Style::new().bold().yellow().apply_to(&app.name),
            app.identifier,
            app.source_file.display()
        )?;
    }
    Ok(())
}
