//! Decisions emitted by the cleanup heuristics

use std::fmt;

/// What a decision removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupAction {
    /// The node at `path` and everything beneath it
    DeleteSubtree,
    /// One value of the node at `path`
    DeleteValue,
}

/// Why a node or value was attributed to the identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchReason {
    /// Node name is the identifier, or `identifier_` followed by a suffix
    Name,
    /// Full node path ends with the identifier
    PathSuffix,
    /// A value's data mentions the identifier
    ValueData { name: String, value: String },
    /// A value is named after the identifier
    ValueName { name: String },
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchReason::Name => f.write_str("match in key name"),
            MatchReason::PathSuffix => f.write_str("match in key path"),
            MatchReason::ValueData { name, value } => {
                write!(f, "match in value data: [{name}] = [{value}]")
            }
            MatchReason::ValueName { name } => write!(f, "match in value name: [{name}]"),
        }
    }
}

/// One store entry a heuristic decided belongs to the identifier.
///
/// Dry-run and live passes over the same store produce the same decisions;
/// only the [`Outcome`] differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupDecision {
    /// Key path, relative to the store root
    pub path: String,
    pub action: CleanupAction,
    /// Value name for [`CleanupAction::DeleteValue`]
    pub value_name: Option<String>,
    pub reason: MatchReason,
    pub dry_run: bool,
}

impl CleanupDecision {
    pub fn subtree(path: String, reason: MatchReason, dry_run: bool) -> Self {
        Self {
            path,
            action: CleanupAction::DeleteSubtree,
            value_name: None,
            reason,
            dry_run,
        }
    }

    pub fn value(path: String, value_name: String, reason: MatchReason, dry_run: bool) -> Self {
        Self {
            path,
            action: CleanupAction::DeleteValue,
            value_name: Some(value_name),
            reason,
            dry_run,
        }
    }

    /// Identity used to compare dry-run and live passes
    pub fn key(&self) -> (String, CleanupAction, Option<String>) {
        (self.path.clone(), self.action, self.value_name.clone())
    }

    fn target(&self) -> String {
        match (&self.action, &self.value_name) {
            (CleanupAction::DeleteValue, Some(name)) => format!("value [{name}] from {}", self.path),
            _ => format!("key: {}", self.path),
        }
    }

    /// The single sink line describing this decision and its outcome
    pub fn message(&self, outcome: &Outcome) -> String {
        let target = self.target();
        match outcome {
            Outcome::Planned => format!("[Dry-run] Would delete {target} ({})", self.reason),
            Outcome::Deleted => format!("Deleted {target} ({})", self.reason),
            Outcome::Failed(cause) => {
                format!("Failed to delete {target} ({}): {cause}", self.reason)
            }
        }
    }
}

/// What happened to a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Dry run: logged only
    Planned,
    Deleted,
    /// The delete call failed; never retried
    Failed(String),
}
