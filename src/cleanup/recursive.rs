//! Recursive name/path/value sweep over the well-known roots

use super::decision::{CleanupDecision, MatchReason};
use super::matching;
use super::{CleanupEngine, Pass};
use crate::error::store as store_error;
use crate::store::{StoreAccessor, join_path};

impl<S: StoreAccessor> CleanupEngine<'_, S> {
    pub(super) fn sweep_root(&self, root: &S::Node, root_path: &str, pass: &mut Pass<'_>) {
        match self.store.open_subpath(root, root_path, !pass.dry_run) {
            Ok(Some(node)) => {
                tracing::debug!(root = root_path, "opened registry root");
                self.sweep(&node, root_path, pass);
            }
            Ok(None) => {
                tracing::debug!("{}", store_error::path_not_found(root_path));
                self.sink
                    .emit(&format!("Registry root key not found: {root_path}"));
            }
            Err(e) => self.fault(pass, format!("Error scanning {root_path}: {e}")),
        }
    }

    /// Visit every child of `parent`: recurse into it first, then decide on
    /// it. Child names are snapshotted before the loop, so deleting one does
    /// not disturb the iteration.
    fn sweep(&self, parent: &S::Node, parent_path: &str, pass: &mut Pass<'_>) {
        let children = match self.store.child_names(parent) {
            Ok(children) => children,
            Err(e) => {
                self.fault(
                    pass,
                    format!("Error traversing registry at [{parent_path}]: {e}"),
                );
                return;
            }
        };

        for child in children {
            let child_path = join_path(parent_path, &child);

            let mut reason = if matching::is_identifier_key(&child, pass.identifier) {
                Some(MatchReason::Name)
            } else if matching::ends_with(&child_path, pass.identifier) {
                Some(MatchReason::PathSuffix)
            } else {
                None
            };

            match self.store.open_subpath(parent, &child, !pass.dry_run) {
                Ok(Some(node)) => {
                    self.sweep(&node, &child_path, pass);
                    if reason.is_none() {
                        reason = self.match_in_values(&node, &child_path, pass);
                    }
                }
                // Removed underneath us; nothing left to inspect
                Ok(None) => {}
                Err(e) => self.fault(pass, format!("Error opening [{child_path}]: {e}")),
            }

            if let Some(reason) = reason {
                let decision = CleanupDecision::subtree(child_path, reason, pass.dry_run);
                self.apply(pass, decision, || self.store.delete_subtree(parent, &child));
            }
        }
    }

    /// First of the node's own values whose data contains the identifier
    fn match_in_values(
        &self,
        node: &S::Node,
        node_path: &str,
        pass: &mut Pass<'_>,
    ) -> Option<MatchReason> {
        let names = match self.store.value_names(node) {
            Ok(names) => names,
            Err(e) => {
                self.fault(pass, format!("Error reading values of [{node_path}]: {e}"));
                return None;
            }
        };

        for name in names {
            match self.store.value(node, &name) {
                Ok(Some(value)) => {
                    let value = value.to_string();
                    if matching::contains(&value, pass.identifier) {
                        return Some(MatchReason::ValueData { name, value });
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::debug!("skipping value [{name}] under {node_path}: {e}"),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::cleanup::{
        CleanupAction, CleanupEngine, MatchReason, STATUS_REPORTS_ROOT, WIN32_APPS_ROOT,
    };
    use crate::sink::MemorySink;
    use crate::store::{MemoryStore, StoreValue};

    fn key(path: &str) -> String {
        format!(r"{WIN32_APPS_ROOT}\{path}")
    }

    fn store_with(keys: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        store.create_key(STATUS_REPORTS_ROOT);
        for k in keys {
            store.create_key(&key(k));
        }
        store
    }

    #[test]
    fn test_prefix_match_requires_separator() {
        let store = store_with(&[r"User\abc-123_1", r"User\abc-1234"]);
        let sink = MemorySink::new();

        let report = CleanupEngine::new(&store, &sink).run("abc-123", false);

        assert!(!store.exists(&key(r"User\abc-123_1")));
        assert!(store.exists(&key(r"User\abc-1234")));
        assert_eq!(report.deleted(), 1);
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let store = store_with(&["ABC-123"]);
        let sink = MemorySink::new();
        CleanupEngine::new(&store, &sink).run("abc-123", false);
        assert!(!store.exists(&key("abc-123")));
    }

    #[test]
    fn test_value_substring_removes_whole_subtree() {
        let store = store_with(&[r"Policies\p1\deep\deeper"]);
        store.set_value(
            &key(r"Policies\p1"),
            "Detection",
            StoreValue::String("ref=ABC-123".into()),
        );
        let sink = MemorySink::new();

        let report = CleanupEngine::new(&store, &sink).run("abc-123", false);

        assert!(!store.exists(&key(r"Policies\p1")));
        assert!(store.exists(&key("Policies")));
        assert_eq!(report.entries.len(), 1);
        let (decision, _) = &report.entries[0];
        assert_eq!(decision.action, CleanupAction::DeleteSubtree);
        assert_eq!(
            decision.reason,
            MatchReason::ValueData {
                name: "Detection".into(),
                value: "ref=ABC-123".into()
            }
        );
        assert_eq!(sink.count_containing("[Detection] = [ref=ABC-123]"), 1);
    }

    #[test]
    fn test_values_of_descendants_do_not_match_ancestors() {
        let store = store_with(&[]);
        store.set_value(
            &key(r"Outer\Inner"),
            "Ref",
            StoreValue::String("abc-123".into()),
        );
        let sink = MemorySink::new();

        CleanupEngine::new(&store, &sink).run("abc-123", false);

        assert!(store.exists(&key("Outer")));
        assert!(!store.exists(&key(r"Outer\Inner")));
    }

    #[test]
    fn test_matched_descendants_are_reported_before_their_ancestor() {
        let store = store_with(&[r"abc-123\abc-123_1"]);
        let sink = MemorySink::new();

        let report = CleanupEngine::new(&store, &sink).run("abc-123", true);

        let paths: Vec<_> = report.entries.iter().map(|(d, _)| d.path.clone()).collect();
        assert_eq!(paths, vec![key(r"abc-123\abc-123_1"), key("abc-123")]);
        assert!(store.exists(&key(r"abc-123\abc-123_1")));
    }

    #[test]
    fn test_status_reports_root_is_swept() {
        let store = store_with(&[]);
        store.create_key(&format!(r"{STATUS_REPORTS_ROOT}\abc-123_7"));
        let sink = MemorySink::new();

        CleanupEngine::new(&store, &sink).run("abc-123", false);

        assert!(!store.exists(&format!(r"{STATUS_REPORTS_ROOT}\abc-123_7")));
    }

    #[test]
    fn test_failed_delete_is_reported_and_siblings_continue() {
        let store = store_with(&[r"A\abc-123", r"B\abc-123"]);
        store.fail_deletes_at(&key(r"A\abc-123"));
        let sink = MemorySink::new();

        let report = CleanupEngine::new(&store, &sink).run("abc-123", false);

        assert_eq!(report.failed(), 1);
        assert_eq!(report.deleted(), 1);
        assert!(store.exists(&key(r"A\abc-123")));
        assert!(!store.exists(&key(r"B\abc-123")));
        assert_eq!(sink.count_containing("Failed to delete key"), 1);
    }

    #[test]
    fn test_failed_delete_is_not_retried() {
        let store = store_with(&["abc-123"]);
        store.fail_deletes_at(&key("abc-123"));
        let sink = MemorySink::new();

        CleanupEngine::new(&store, &sink).run("abc-123", false);

        assert_eq!(sink.count_containing("Failed to delete"), 1);
    }
}
