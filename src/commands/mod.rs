//! Command implementations for the ime-repair CLI

pub mod cleanup;
pub mod completions;
pub mod interactive;
pub mod list;

use crate::error::{RepairError, Result};

/// A live run changes the registry and controls the service, so it needs an
/// elevated token. Dry runs never do.
pub(crate) fn ensure_live_allowed(live: bool, elevated: bool) -> Result<()> {
    if live && !elevated {
        return Err(RepairError::NotElevated);
    }
    Ok(())
}
