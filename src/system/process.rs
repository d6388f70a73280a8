//! Client process termination and relaunch

use std::thread;
use std::time::{Duration, Instant};

use sysinfo::{Pid, System};

use crate::error::{Result, system as system_error};

/// How long to wait for a killed process to disappear
const EXIT_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// `actual` is the process called `wanted`, with or without `.exe`
pub fn matches_process_name(actual: &str, wanted: &str) -> bool {
    let actual = actual.to_lowercase();
    let wanted = wanted.to_lowercase();
    actual == wanted || actual.strip_suffix(".exe") == Some(wanted.as_str())
}

pub fn kill_by_name(name: &str) -> Result<usize> {
    let mut sys = System::new();
    sys.refresh_processes();

    let targets: Vec<Pid> = sys
        .processes()
        .values()
        .filter(|p| matches_process_name(p.name(), name))
        .map(sysinfo::Process::pid)
        .collect();

    let mut killed = 0;
    for pid in targets {
        let Some(process) = sys.process(pid) else {
            continue;
        };
        if !process.kill() {
            return Err(system_error::process_failed(
                name,
                format!("could not terminate PID {pid}"),
            ));
        }
        wait_for_exit(&mut sys, pid, name)?;
        tracing::debug!(process = name, %pid, "process terminated");
        killed += 1;
    }
    Ok(killed)
}

fn wait_for_exit(sys: &mut System, pid: Pid, name: &str) -> Result<()> {
    let deadline = Instant::now() + EXIT_TIMEOUT;
    while sys.refresh_process(pid) {
        if Instant::now() >= deadline {
            return Err(system_error::process_failed(
                name,
                format!("PID {pid} still running after {}s", EXIT_TIMEOUT.as_secs()),
            ));
        }
        thread::sleep(POLL_INTERVAL);
    }
    Ok(())
}

/// Open `target` through the Windows shell, which resolves `shell:` URIs
#[cfg(windows)]
pub fn launch(target: &str) -> Result<()> {
    std::process::Command::new("explorer.exe")
        .arg(target)
        .spawn()
        .map(|_| ())
        .map_err(|e| system_error::process_failed(target, e.to_string()))
}

#[cfg(not(windows))]
pub fn launch(target: &str) -> Result<()> {
    Err(system_error::process_failed(
        target,
        "launching through the shell is only available on Windows",
    ))
}
