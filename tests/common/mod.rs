//! Common test utilities for ime-repair integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A temporary IME log directory
pub struct TestLogDir {
    /// Keeps the directory alive for the test
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to the log directory
    pub path: PathBuf,
}

impl TestLogDir {
    /// Create an empty log directory
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a log file into the directory
    pub fn write_log(&self, name: &str, content: &str) {
        std::fs::write(self.path.join(name), content).expect("Failed to write log file");
    }

    /// Write a UTF-16LE log file with a byte order mark
    #[allow(dead_code)]
    pub fn write_utf16_log(&self, name: &str, content: &str) {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(content.encode_utf16().flat_map(u16::to_le_bytes));
        std::fs::write(self.path.join(name), bytes).expect("Failed to write log file");
    }

    /// Write a file next to the logs (e.g. a config file)
    #[allow(dead_code)]
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }
}

/// A line the way the management extension writes it
#[allow(dead_code)]
pub fn ime_line(fragment: &str) -> String {
    format!(
        "<![LOG[[Win32App] Processing app policy {fragment}]LOG]!><time=\"10:15:02.1234567\" date=\"5-1-2024\" component=\"AppWorkload\" context=\"\" type=\"1\" thread=\"14\" file=\"\">\n"
    )
}

/// The binary under test with environment overrides removed
#[allow(deprecated)]
pub fn ime_repair_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ime-repair").expect("binary is built");
    cmd.env_remove("IME_REPAIR_CONFIG");
    cmd.env_remove("IME_REPAIR_LOG_DIR");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// The binary under test reading logs from `dir`
#[allow(dead_code)]
pub fn ime_repair_with_logs(dir: &Path) -> Command {
    let mut cmd = ime_repair_cmd();
    cmd.arg("--log-dir").arg(dir);
    cmd
}
