//! Service control through `sc.exe`

#[cfg(windows)]
use std::process::Command;
use std::process::Output;
use std::thread;
use std::time::{Duration, Instant};

use super::ServiceState;
use crate::error::{Result, system as system_error};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// `sc` exit code when stopping a service that is not running
const ERROR_SERVICE_NOT_ACTIVE: i32 = 1062;

/// `sc` exit code when starting a service that is already running
const ERROR_SERVICE_ALREADY_RUNNING: i32 = 1056;

/// Extract the state from `sc query` output
///
/// ```text
/// SERVICE_NAME: IntuneManagementExtension
///         TYPE               : 10  WIN32_OWN_PROCESS
///         STATE              : 4  RUNNING
/// ```
pub fn parse_state(output: &str) -> Option<ServiceState> {
    output.lines().find_map(|line| {
        let (label, rest) = line.split_once(':')?;
        if label.trim() != "STATE" {
            return None;
        }
        let code = rest.split_whitespace().next()?.parse().ok()?;
        ServiceState::from_code(code)
    })
}

pub fn query(name: &str) -> Result<ServiceState> {
    let output = sc(&["query", name], name)?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        return Err(system_error::service_failed(name, failure_text(&output)));
    }
    parse_state(&stdout)
        .ok_or_else(|| system_error::service_failed(name, "unrecognised `sc query` output"))
}

pub fn stop(name: &str, timeout: Duration) -> Result<()> {
    let output = sc(&["stop", name], name)?;
    if !output.status.success() && output.status.code() != Some(ERROR_SERVICE_NOT_ACTIVE) {
        return Err(system_error::service_failed(name, failure_text(&output)));
    }
    wait_for(name, ServiceState::Stopped, timeout)
}

pub fn start(name: &str, timeout: Duration) -> Result<()> {
    let output = sc(&["start", name], name)?;
    if !output.status.success() && output.status.code() != Some(ERROR_SERVICE_ALREADY_RUNNING) {
        return Err(system_error::service_failed(name, failure_text(&output)));
    }
    wait_for(name, ServiceState::Running, timeout)
}

/// Poll until the service reports `wanted` or `timeout` elapses
fn wait_for(name: &str, wanted: ServiceState, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let state = query(name)?;
        if state == wanted {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(system_error::service_timeout(
                name,
                wanted.to_string(),
                timeout.as_secs(),
            ));
        }
        tracing::debug!(service = name, %state, %wanted, "waiting for service");
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(windows)]
fn sc(args: &[&str], service: &str) -> Result<Output> {
    Command::new("sc.exe")
        .args(args)
        .output()
        .map_err(|e| system_error::service_failed(service, format!("failed to run sc.exe: {e}")))
}

#[cfg(not(windows))]
fn sc(_args: &[&str], service: &str) -> Result<Output> {
    Err(system_error::service_failed(
        service,
        "service control is only available on Windows",
    ))
}

/// `sc` prints its failures on stdout, e.g. `[SC] OpenService FAILED 1060:`
fn failure_text(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let text = stdout
        .lines()
        .chain(stderr.lines())
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no output");
    match output.status.code() {
        Some(code) => format!("{text} (exit code {code})"),
        None => text.to_string(),
    }
}
