//! Process, service and privilege control
//!
//! The orchestrator only talks to the host through [`SystemControl`], so the
//! repair sequence can be exercised against a fake. [`HostSystem`] is the
//! real implementation: `sysinfo` for processes, `explorer.exe` for the
//! client relaunch and `sc.exe` for the service.

pub mod process;
pub mod service;

use std::fmt;
use std::time::Duration;

use crate::error::Result;

/// State reported by the service control manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
}

impl ServiceState {
    /// Map the numeric state printed by `sc query`
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Stopped),
            2 => Some(Self::StartPending),
            3 => Some(Self::StopPending),
            4 => Some(Self::Running),
            5 => Some(Self::ContinuePending),
            6 => Some(Self::PausePending),
            7 => Some(Self::Paused),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "STOPPED",
            Self::StartPending => "START_PENDING",
            Self::StopPending => "STOP_PENDING",
            Self::Running => "RUNNING",
            Self::ContinuePending => "CONTINUE_PENDING",
            Self::PausePending => "PAUSE_PENDING",
            Self::Paused => "PAUSED",
        };
        f.write_str(name)
    }
}

/// Host operations the repair sequence depends on
pub trait SystemControl {
    /// Terminate every process called `name` and wait for it to exit.
    /// Returns how many were terminated.
    fn kill_by_name(&self, name: &str) -> Result<usize>;

    /// Hand `target` (a path or shell URI) to the shell
    fn launch(&self, target: &str) -> Result<()>;

    fn service_state(&self, name: &str) -> Result<ServiceState>;

    /// Stop the service and wait until it reports STOPPED
    fn service_stop(&self, name: &str, timeout: Duration) -> Result<()>;

    /// Start the service and wait until it reports RUNNING
    fn service_start(&self, name: &str, timeout: Duration) -> Result<()>;
}

/// [`SystemControl`] backed by the running machine
#[derive(Debug, Default)]
pub struct HostSystem;

impl HostSystem {
    pub fn new() -> Self {
        Self
    }
}

impl SystemControl for HostSystem {
    fn kill_by_name(&self, name: &str) -> Result<usize> {
        process::kill_by_name(name)
    }

    fn launch(&self, target: &str) -> Result<()> {
        process::launch(target)
    }

    fn service_state(&self, name: &str) -> Result<ServiceState> {
        service::query(name)
    }

    fn service_stop(&self, name: &str, timeout: Duration) -> Result<()> {
        service::stop(name, timeout)
    }

    fn service_start(&self, name: &str, timeout: Duration) -> Result<()> {
        service::start(name, timeout)
    }
}

/// Whether the current process runs with an elevated token
#[cfg(windows)]
pub fn is_elevated() -> bool {
    use std::mem::MaybeUninit;
    use std::ptr;

    use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
    use windows_sys::Win32::Security::{
        GetTokenInformation, TOKEN_ELEVATION, TOKEN_QUERY, TokenElevation,
    };
    use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

    // SAFETY: the token handle is checked before use and closed before
    // returning; `elevation` is only read after GetTokenInformation succeeds.
    unsafe {
        let mut token: HANDLE = ptr::null_mut();
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
            return false;
        }

        let mut elevation = MaybeUninit::<TOKEN_ELEVATION>::uninit();
        let mut returned: u32 = 0;
        let ok = GetTokenInformation(
            token,
            TokenElevation,
            elevation.as_mut_ptr().cast(),
            std::mem::size_of::<TOKEN_ELEVATION>() as u32,
            &mut returned,
        );
        CloseHandle(token);

        ok != 0 && elevation.assume_init().TokenIsElevated != 0
    }
}

/// Whether the current process runs with an elevated token
#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    false
}
