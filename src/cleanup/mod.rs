//! Registry cleanup engine
//!
//! Given an app identifier, [`CleanupEngine::run`] applies three independent
//! heuristics, in order, to the management extension's registry state:
//!
//! 1. [`recursive`]: walk the `Win32Apps` and `StatusServiceReports` trees
//!    and delete every key whose name, path or own values point at the
//!    identifier.
//! 2. [`app_authority`]: delete values named after the identifier from
//!    `Win32Apps\Reporting\AppAuthority`.
//! 3. [`grs`]: delete `Win32Apps\<user>\GRS\<hash>` keys holding a value whose
//!    name or data is the identifier.
//!
//! Heuristics do not coordinate. A key removed by an earlier heuristic is
//! simply absent for a later one.
//!
//! The engine never returns an error. Every failure is reported through the
//! sink with its path and the affected branch is skipped. In dry-run mode
//! every decision is made and reported exactly as in a live run; only the
//! delete call is skipped, and keys are opened read-only so a dry run needs
//! no elevation. Since nothing disappears during a dry run, each
//! pass remembers the subtrees it decided to remove and later heuristics
//! treat them as absent, the same as after a live delete. A failed delete is
//! remembered too, so it is reported once and never attempted again.

mod app_authority;
mod decision;
mod grs;
mod matching;
mod recursive;

pub use decision::{CleanupAction, CleanupDecision, MatchReason, Outcome};

use std::collections::HashSet;

use crate::error::Result;
use crate::sink::ReportSink;
use crate::store::{PATH_SEPARATOR, StoreAccessor};

/// Per-app state written by the management extension
pub const WIN32_APPS_ROOT: &str = r"SOFTWARE\Microsoft\IntuneManagementExtension\Win32Apps";

/// Status reports queued for the service
pub const STATUS_REPORTS_ROOT: &str =
    r"SOFTWARE\Microsoft\IntuneManagementExtension\SideCarPolicies\StatusServiceReports";

/// Values named after app identifiers
pub const APP_AUTHORITY_PATH: &str =
    r"SOFTWARE\Microsoft\IntuneManagementExtension\Win32Apps\Reporting\AppAuthority";

/// Roots swept by the recursive heuristic, in order
pub const SWEEP_ROOTS: [&str; 2] = [WIN32_APPS_ROOT, STATUS_REPORTS_ROOT];

/// Everything one cleanup pass decided, in decision order
#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    pub entries: Vec<(CleanupDecision, Outcome)>,
    /// Traversal or read failures that caused a branch to be skipped
    pub errors: Vec<String>,
}

impl CleanupReport {
    /// Decision identities, for comparing passes
    pub fn decision_keys(&self) -> HashSet<(String, CleanupAction, Option<String>)> {
        self.entries.iter().map(|(d, _)| d.key()).collect()
    }

    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Deleted))
    }

    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Planned))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// State of one `run` call
struct Pass<'p> {
    identifier: &'p str,
    dry_run: bool,
    report: CleanupReport,
    /// Lowercased paths of subtrees decided for removal
    removed: Vec<String>,
}

impl<'p> Pass<'p> {
    fn new(identifier: &'p str, dry_run: bool) -> Self {
        Self {
            identifier,
            dry_run,
            report: CleanupReport::default(),
            removed: Vec::new(),
        }
    }

    /// `path` is a removed subtree or lies beneath one
    fn is_removed(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.removed.iter().any(|r| {
            path.strip_prefix(r.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(PATH_SEPARATOR))
        })
    }
}

/// Applies the cleanup heuristics to a store
pub struct CleanupEngine<'a, S: StoreAccessor> {
    store: &'a S,
    sink: &'a dyn ReportSink,
}

impl<'a, S: StoreAccessor> CleanupEngine<'a, S> {
    pub fn new(store: &'a S, sink: &'a dyn ReportSink) -> Self {
        Self { store, sink }
    }

    /// Remove (or, in dry-run mode, report) all state for `identifier`
    pub fn run(&self, identifier: &str, dry_run: bool) -> CleanupReport {
        let mut pass = Pass::new(identifier, dry_run);

        if identifier.trim().is_empty() {
            self.fault(&mut pass, "Refusing to clean up an empty app identifier".to_string());
            return pass.report;
        }

        let root = match self.store.root() {
            Ok(root) => root,
            Err(e) => {
                self.fault(&mut pass, format!("Error opening registry: {e}"));
                return pass.report;
            }
        };

        tracing::debug!(identifier, dry_run, "starting registry cleanup");

        for root_path in SWEEP_ROOTS {
            self.sweep_root(&root, root_path, &mut pass);
        }
        self.clean_app_authority(&root, &mut pass);
        self.clean_grs(&root, &mut pass);

        tracing::debug!(
            identifier,
            decisions = pass.report.entries.len(),
            errors = pass.report.errors.len(),
            "registry cleanup finished"
        );
        pass.report
    }

    /// Report a decision and, in a live pass, perform it
    fn apply(
        &self,
        pass: &mut Pass<'_>,
        decision: CleanupDecision,
        mutate: impl FnOnce() -> Result<()>,
    ) {
        let outcome = if pass.dry_run {
            Outcome::Planned
        } else {
            match mutate() {
                Ok(()) => Outcome::Deleted,
                Err(e) => Outcome::Failed(e.to_string()),
            }
        };
        self.sink.emit(&decision.message(&outcome));
        if decision.action == CleanupAction::DeleteSubtree {
            pass.removed.push(decision.path.to_lowercase());
        }
        pass.report.entries.push((decision, outcome));
    }

    /// Report a failure that skips a branch
    fn fault(&self, pass: &mut Pass<'_>, message: String) {
        self.sink.emit(&message);
        pass.report.errors.push(message);
    }
}
