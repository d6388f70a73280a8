//! Registry store errors

use super::RepairError;

/// Creates a store path not found error
pub fn path_not_found(path: impl Into<String>) -> RepairError {
    RepairError::StorePathNotFound { path: path.into() }
}

/// Creates a failed delete error
pub fn mutation_failed(path: impl Into<String>, reason: impl Into<String>) -> RepairError {
    RepairError::StoreMutationFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a failed enumeration or read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> RepairError {
    RepairError::StoreReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a store unavailable error
pub fn unavailable(reason: impl Into<String>) -> RepairError {
    RepairError::StoreUnavailable {
        reason: reason.into(),
    }
}
