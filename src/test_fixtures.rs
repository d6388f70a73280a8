//! Test fixtures shared by unit tests.
//!
//! ```ignore
//! use crate::test_fixtures::{create_log_dir, sample_store};
//!
//! #[test]
//! fn my_test() {
//!     let logs = create_log_dir(&[("a.log", r#"{"Id":"abc-123","Name":"Foo"}"#)]);
//!     let store = sample_store();
//! }
//! ```

use tempfile::TempDir;

use crate::cleanup::{APP_AUTHORITY_PATH, STATUS_REPORTS_ROOT, WIN32_APPS_ROOT};
use crate::store::{MemoryStore, StoreValue};

/// Create a temp directory outside the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(std::env::temp_dir()).expect("Failed to create temp directory")
}

/// Create a temp log directory holding the given `(file name, content)` pairs.
///
/// # Panics
///
/// Panics if a file cannot be written.
#[must_use]
pub fn create_log_dir(files: &[(&str, &str)]) -> TempDir {
    let temp = create_temp_dir();
    for (name, content) in files {
        std::fs::write(temp.path().join(name), content).expect("Failed to write log file");
    }
    temp
}

/// A store laid out like a management extension that installed `abc-123`:
///
/// ```text
/// Win32Apps\abc-123                     status=done
/// Win32Apps\GUID1\GRS\xyz               abc-123=1
/// Win32Apps\Reporting\AppAuthority      (empty)
/// SideCarPolicies\StatusServiceReports  (empty)
/// ```
#[must_use]
pub fn sample_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.set_value(
        &format!(r"{WIN32_APPS_ROOT}\abc-123"),
        "status",
        StoreValue::String("done".to_string()),
    );
    store.set_value(
        &format!(r"{WIN32_APPS_ROOT}\GUID1\GRS\xyz"),
        "abc-123",
        StoreValue::Dword(1),
    );
    store.create_key(APP_AUTHORITY_PATH);
    store.create_key(STATUS_REPORTS_ROOT);
    store
}
