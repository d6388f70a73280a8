//! GRS cleanup: `Win32Apps\<user>\GRS\<hash>` keys tied to the identifier
//!
//! The management extension records retry/grace state per user under a
//! `GRS` key whose children are named by hash, so the identifier only shows
//! up in their values: either as a value name or as value data.

use super::decision::{CleanupDecision, MatchReason};
use super::matching;
use super::{CleanupEngine, Pass, WIN32_APPS_ROOT};
use crate::store::{StoreAccessor, join_path};

const GRS_KEY: &str = "GRS";

impl<S: StoreAccessor> CleanupEngine<'_, S> {
    pub(super) fn clean_grs(&self, root: &S::Node, pass: &mut Pass<'_>) {
        let base = match self.store.open_subpath(root, WIN32_APPS_ROOT, !pass.dry_run) {
            Ok(Some(base)) => base,
            Ok(None) => return,
            Err(e) => {
                self.fault(pass, format!("Error scanning GRS: {e}"));
                return;
            }
        };

        let users = match self.store.child_names(&base) {
            Ok(users) => users,
            Err(e) => {
                self.fault(pass, format!("Error scanning GRS: {e}"));
                return;
            }
        };

        for user in users {
            let grs_path = join_path(&join_path(WIN32_APPS_ROOT, &user), GRS_KEY);
            if pass.is_removed(&grs_path) {
                continue;
            }
            let relative = join_path(&user, GRS_KEY);
            match self.store.open_subpath(&base, &relative, !pass.dry_run) {
                Ok(Some(grs)) => self.clean_grs_parent(&grs, &grs_path, pass),
                Ok(None) => {}
                Err(e) => self.fault(pass, format!("Error scanning GRS at [{grs_path}]: {e}")),
            }
        }
    }

    fn clean_grs_parent(&self, grs: &S::Node, grs_path: &str, pass: &mut Pass<'_>) {
        let entries = match self.store.child_names(grs) {
            Ok(entries) => entries,
            Err(e) => {
                self.fault(pass, format!("Error scanning GRS at [{grs_path}]: {e}"));
                return;
            }
        };

        for entry in entries {
            let entry_path = join_path(grs_path, &entry);
            if pass.is_removed(&entry_path) {
                continue;
            }
            let node = match self.store.open_subpath(grs, &entry, !pass.dry_run) {
                Ok(Some(node)) => node,
                Ok(None) => continue,
                Err(e) => {
                    self.fault(pass, format!("Error scanning GRS at [{entry_path}]: {e}"));
                    continue;
                }
            };

            if let Some(reason) = self.grs_match(&node, &entry_path, pass) {
                let decision = CleanupDecision::subtree(entry_path, reason, pass.dry_run);
                self.apply(pass, decision, || self.store.delete_subtree(grs, &entry));
            }
        }
    }

    /// First value, in store order, whose name or data is the identifier
    fn grs_match(&self, node: &S::Node, node_path: &str, pass: &mut Pass<'_>) -> Option<MatchReason> {
        let names = match self.store.value_names(node) {
            Ok(names) => names,
            Err(e) => {
                self.fault(pass, format!("Error reading values of [{node_path}]: {e}"));
                return None;
            }
        };

        for name in names {
            if matching::equals(&name, pass.identifier) {
                return Some(MatchReason::ValueName { name });
            }
            match self.store.value(node, &name) {
                Ok(Some(value)) => {
                    let value = value.to_string();
                    if matching::equals(&value, pass.identifier) {
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
