//! Repair sequence around the cleanup engine
//!
//! terminate client → clean up each app → restart service → relaunch client
//!
//! Every step is fault tolerant: a failure is reported through the sink and
//! the sequence moves on. In dry-run mode the host is never touched; each
//! step only reports what it would do.

use std::time::Duration;

use crate::cleanup::{CleanupEngine, CleanupReport};
use crate::config::RepairConfig;
use crate::error::Result;
use crate::sink::ReportSink;
use crate::store::StoreAccessor;
use crate::system::{ServiceState, SystemControl};

/// One app selected for repair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairTarget {
    pub identifier: String,
    /// Display name, when the app came from discovery
    pub name: Option<String>,
}

impl RepairTarget {
    pub fn new(identifier: impl Into<String>, name: Option<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name,
        }
    }
}

/// What a repair run did
#[derive(Debug, Default)]
pub struct RepairSummary {
    /// Cleanup report per identifier, in processing order
    pub reports: Vec<(String, CleanupReport)>,
    /// Steps that failed and were skipped
    pub step_errors: Vec<String>,
}

impl RepairSummary {
    pub fn is_clean(&self) -> bool {
        self.step_errors.is_empty()
            && self
                .reports
                .iter()
                .all(|(_, r)| r.errors.is_empty() && r.failed() == 0)
    }
}

/// Runs the repair sequence against a host and a store
pub struct RepairOrchestrator<'a, H: SystemControl> {
    config: &'a RepairConfig,
    host: &'a H,
    sink: &'a dyn ReportSink,
}

impl<'a, H: SystemControl> RepairOrchestrator<'a, H> {
    pub fn new(config: &'a RepairConfig, host: &'a H, sink: &'a dyn ReportSink) -> Self {
        Self { config, host, sink }
    }

    /// Run the whole sequence. `store` is the result of opening the store;
    /// when it could not be opened the cleanup step is reported and skipped
    /// for every target, and the remaining steps still run.
    pub fn run<S: StoreAccessor>(
        &self,
        store: &Result<S>,
        targets: &[RepairTarget],
        dry_run: bool,
    ) -> RepairSummary {
        let mut summary = RepairSummary::default();

        self.sink.emit(if dry_run {
            "Dry-run mode enabled. No changes will be made."
        } else {
            "Live mode: changes will be committed."
        });

        self.terminate_client(dry_run, &mut summary);

        for target in targets {
            self.sink.emit(&match &target.name {
                Some(name) => format!("Processing [{name}] with AppId [{}]", target.identifier),
                None => format!("Processing AppId [{}]", target.identifier),
            });
            match store {
                Ok(store) => {
                    let report = CleanupEngine::new(store, self.sink).run(&target.identifier, dry_run);
                    summary.reports.push((target.identifier.clone(), report));
                }
                Err(e) => self.step_failed(
                    &mut summary,
                    format!("Skipping registry cleanup for [{}]: {e}", target.identifier),
                ),
            }
        }

        self.restart_service(dry_run, &mut summary);
        self.launch_client(dry_run, &mut summary);

        self.sink.emit("Processing complete.");
        summary
    }

    fn terminate_client(&self, dry_run: bool, summary: &mut RepairSummary) {
        if dry_run {
            self.sink
                .emit("[Dry-run] Would terminate Company Portal process.");
            return;
        }

        match self.host.kill_by_name(&self.config.client_process) {
            Ok(0) => self.sink.emit("Company Portal is not running."),
            Ok(n) => {
                for _ in 0..n {
                    self.sink.emit("Company Portal process terminated.");
                }
            }
            Err(e) => self.step_failed(summary, format!("Error killing Company Portal: {e}")),
        }
    }

    /// Stop the service unless it is already stopped, then start it. A stop
    /// that fails or times out skips the start.
    fn restart_service(&self, dry_run: bool, summary: &mut RepairSummary) {
        if dry_run {
            self.sink
                .emit("[Dry-run] Would stop and restart IME service.");
            return;
        }

        let name = &self.config.service_name;
        let timeout = self.config.service_timeout();

        if let Err(e) = self.stop_if_running(name, timeout) {
            self.step_failed(summary, format!("Error restarting IME service: {e}"));
            return;
        }

        match self.host.service_start(name, timeout) {
            Ok(()) => self.sink.emit("IME service restarted."),
            Err(e) => self.step_failed(summary, format!("Error restarting IME service: {e}")),
        }
    }

    fn stop_if_running(&self, name: &str, timeout: Duration) -> Result<()> {
        let state = self.host.service_state(name)?;
        if state == ServiceState::Stopped {
            tracing::debug!(service = name, "service already stopped");
            return Ok(());
        }
        self.host.service_stop(name, timeout)?;
        self.sink.emit("IME service stopped.");
        Ok(())
    }

    fn launch_client(&self, dry_run: bool, summary: &mut RepairSummary) {
        if dry_run {
            self.sink.emit("[Dry-run] Would launch Company Portal.");
            return;
        }

        match self.host.launch(&self.config.client_launch) {
            Ok(()) => self.sink.emit("Company Portal launched."),
            Err(e) => self.step_failed(summary, format!("Error launching Company Portal: {e}")),
        }
    }

    fn step_failed(&self, summary: &mut RepairSummary, message: String) {
        tracing::debug!("{message}");
        self.sink.emit(&message);
        summary.step_errors.push(message);
    }
}
