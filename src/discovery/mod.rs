//! Discovery of previously managed apps from the management extension logs
//!
//! [`scan`] reads every log file directly inside the log directory and
//! collects the `(identifier, name)` pairs it finds into a [`DiscoverySet`].
//! A scan never fails: a missing directory is reported through the sink and
//! yields an empty set, and unreadable files are skipped.

mod pattern;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use wax::{CandidatePath, Glob, Pattern};

use crate::error::fs as fs_error;
use crate::sink::ReportSink;

pub use pattern::{AppFragment, find_fragments};

/// An app recovered from the logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredApp {
    pub name: String,
    pub identifier: String,
    /// First log file the pair was seen in
    pub source_file: PathBuf,
}

/// Insertion-ordered set of discoveries, unique by `(identifier, name)`
#[derive(Debug, Clone, Default)]
pub struct DiscoverySet {
    apps: Vec<DiscoveredApp>,
    seen: HashSet<(String, String)>,
}

impl DiscoverySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a discovery unless its pair is already present. Returns whether it
    /// was added.
    pub fn insert(&mut self, app: DiscoveredApp) -> bool {
        let key = (app.identifier.clone(), app.name.clone());
        if !self.seen.insert(key) {
            return false;
        }
        self.apps.push(app);
        true
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiscoveredApp> {
        self.apps.iter()
    }

    pub fn as_slice(&self) -> &[DiscoveredApp] {
        &self.apps
    }
}

impl<'a> IntoIterator for &'a DiscoverySet {
    type Item = &'a DiscoveredApp;
    type IntoIter = std::slice::Iter<'a, DiscoveredApp>;

    fn into_iter(self) -> Self::IntoIter {
        self.apps.iter()
    }
}

/// Scan `log_dir` for files matching `log_glob` and extract discoveries.
pub fn scan(log_dir: &Path, log_glob: &str, sink: &dyn ReportSink) -> DiscoverySet {
    let mut set = DiscoverySet::new();

    if !log_dir.is_dir() {
        let err = fs_error::directory_not_found(log_dir.display().to_string());
        sink.emit(&err.to_string());
        return set;
    }

    let files = match list_log_files(log_dir, log_glob) {
        Ok(files) => files,
        Err(message) => {
            sink.emit(&format!("Error listing {}: {message}", log_dir.display()));
            return set;
        }
    };

    for file in files {
        let content = match read_shared(&file) {
            Ok(content) => content,
            Err(e) => {
                let err = fs_error::access_denied(file.display().to_string(), e.to_string());
                tracing::debug!("Skipping log file: {err}");
                continue;
            }
        };

        for fragment in find_fragments(&content) {
            set.insert(DiscoveredApp {
                name: fragment.name.to_string(),
                identifier: fragment.identifier.to_string(),
                source_file: file.clone(),
            });
        }
    }

    sink.emit(&format!("Scan complete. Found {} apps.", set.len()));
    set
}

/// Files directly inside `dir` whose name matches `log_glob`, sorted by name
fn list_log_files(dir: &Path, log_glob: &str) -> Result<Vec<PathBuf>, String> {
    let glob = Glob::new(log_glob).map_err(|e| e.to_string())?;

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| e.to_string())?
        .filter_map(std::result::Result::ok)
        // Follows symlinks; entries whose target cannot be resolved are kept
        // so the read reports them
        .filter(|entry| fs::metadata(entry.path()).map_or(true, |meta| meta.is_file()))
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            glob.is_match(CandidatePath::from(name.as_ref()))
        })
        .map(|entry| entry.path())
        .collect();

    files.sort();
    Ok(files)
}

/// Read a log file the agent may still be writing to.
///
/// The standard library opens files with read/write/delete sharing on
/// Windows, so an active writer does not block us. Content is decoded
/// leniently: UTF-16LE when it carries a BOM, otherwise lossy UTF-8.
fn read_shared(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_log(&bytes))
}

fn decode_log(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
