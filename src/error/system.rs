//! Service, process and privilege errors

use super::RepairError;

/// Creates a service wait timeout error
pub fn service_timeout(
    service: impl Into<String>,
    state: impl Into<String>,
    timeout_secs: u64,
) -> RepairError {
    RepairError::ServiceTimeout {
        service: service.into(),
        state: state.into(),
        timeout_secs,
    }
}

/// Creates a service control error
pub fn service_failed(service: impl Into<String>, reason: impl Into<String>) -> RepairError {
    RepairError::ServiceControlFailed {
        service: service.into(),
        reason: reason.into(),
    }
}

/// Creates a process kill/launch error
pub fn process_failed(target: impl Into<String>, reason: impl Into<String>) -> RepairError {
    RepairError::ProcessControlFailed {
        target: target.into(),
        reason: reason.into(),
    }
}
