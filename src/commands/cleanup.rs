//! Cleanup command implementation
//!
//! Runs the repair sequence for app identifiers given on the command line.

use console::Style;

use crate::cli::CleanupArgs;
use crate::config::RepairConfig;
use crate::error::Result;
use crate::repair::{RepairOrchestrator, RepairTarget};
use crate::sink::ConsoleSink;
use crate::store;
use crate::system::{self, HostSystem};

/// Run cleanup command
pub fn run(config: &RepairConfig, args: CleanupArgs) -> Result<()> {
    super::ensure_live_allowed(args.live, system::is_elevated())?;

    let targets = targets_from_ids(&args.app_ids);
    let sink = ConsoleSink::new();
    let host = HostSystem::new();
    let store = store::open_system_store();

    let summary =
        RepairOrchestrator::new(config, &host, &sink).run(&store, &targets, !args.live);

    for target in &targets {
        println!(
            "{} Finished cleanup for AppId {}",
            Style::new().green().bold().apply_to("✔"),
            target.identifier
        );
    }
    if !summary.is_clean() {
        println!(
            "{}",
            Style::new()
                .yellow()
                .apply_to("Some steps failed; see the messages above.")
        );
    }
    Ok(())
}

/// One target per distinct identifier, in argument order
fn targets_from_ids(ids: &[String]) -> Vec<RepairTarget> {
    let mut targets: Vec<RepairTarget> = Vec::new();
    for id in ids {
        let id = id.trim();
        if targets
            .iter()
            .any(|t| t.identifier.eq_ignore_ascii_case(id))
        {
            continue;
        }
        targets.push(RepairTarget::new(id, None));
    }
    targets
}
