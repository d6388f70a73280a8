//! Log directory and file errors

use super::RepairError;

/// Creates a directory not found error
pub fn directory_not_found(path: impl Into<String>) -> RepairError {
    RepairError::DirectoryNotFound { path: path.into() }
}

/// Creates a per-file access error
pub fn access_denied(path: impl Into<String>, reason: impl Into<String>) -> RepairError {
    RepairError::FileAccessDenied {
        path: path.into(),
        reason: reason.into(),
    }
}
