//! AppAuthority cleanup: values named after the identifier

use super::decision::{CleanupDecision, MatchReason};
use super::matching;
use super::{APP_AUTHORITY_PATH, CleanupEngine, Pass};
use crate::store::StoreAccessor;

impl<S: StoreAccessor> CleanupEngine<'_, S> {
    /// Delete values directly under AppAuthority whose name is the
    /// identifier. Child keys are not inspected.
    pub(super) fn clean_app_authority(&self, root: &S::Node, pass: &mut Pass<'_>) {
        if pass.is_removed(APP_AUTHORITY_PATH) {
            return;
        }
        let node = match self.store.open_subpath(root, APP_AUTHORITY_PATH, !pass.dry_run) {
            Ok(Some(node)) => node,
            Ok(None) => {
                tracing::debug!(path = APP_AUTHORITY_PATH, "AppAuthority key not present");
                return;
            }
            Err(e) => {
                self.fault(pass, format!("Error cleaning AppAuthority: {e}"));
                return;
            }
        };

        let names = match self.store.value_names(&node) {
            Ok(names) => names,
            Err(e) => {
                self.fault(pass, format!("Error cleaning AppAuthority: {e}"));
                return;
            }
        };

        for name in names {
            if !matching::equals(&name, pass.identifier) {
                continue;
            }
            let decision = CleanupDecision::value(
                APP_AUTHORITY_PATH.to_string(),
                name.clone(),
                MatchReason::ValueName { name: name.clone() },
                pass.dry_run,
            );
            self.apply(pass, decision, || self.store.delete_value(&node, &name));
        }
    }
}
