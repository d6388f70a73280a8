//! Hierarchical key/value store access
//!
//! The cleanup engine never talks to the Windows registry directly. It goes
//! through [`StoreAccessor`], which exposes the handful of operations the
//! heuristics need: open a path, enumerate children and values, read a value,
//! and delete a value or a whole subtree. Absent paths and values are normal
//! outcomes (`Ok(None)`), not errors.
//!
//! Backends:
//! - [`RegistryStore`]: `HKEY_LOCAL_MACHINE`, 64-bit view (Windows only)
//! - `MemoryStore`: in-memory tree used by the tests

#[cfg(test)]
mod memory;
#[cfg(windows)]
mod registry;

use std::fmt;

#[cfg(test)]
pub use memory::MemoryStore;
#[cfg(windows)]
pub use registry::RegistryStore;

use crate::error::Result;

/// Separator between path components
pub const PATH_SEPARATOR: char = '\\';

/// Capability the cleanup engine needs from a store backend
pub trait StoreAccessor {
    /// Open handle to a node. Handles stay valid until the node is deleted.
    type Node;

    /// Open the fixed root the well-known paths are relative to
    fn root(&self) -> Result<Self::Node>;

    /// Open `path` below `base`; `Ok(None)` if any component is missing
    fn open_subpath(
        &self,
        base: &Self::Node,
        path: &str,
        writable: bool,
    ) -> Result<Option<Self::Node>>;

    /// Names of the node's direct children, in backend order
    fn child_names(&self, node: &Self::Node) -> Result<Vec<String>>;

    /// Names of the node's own values, in backend order
    fn value_names(&self, node: &Self::Node) -> Result<Vec<String>>;

    /// Read one value; `Ok(None)` if it does not exist
    fn value(&self, node: &Self::Node, name: &str) -> Result<Option<StoreValue>>;

    /// Delete a single value from the node
    fn delete_value(&self, node: &Self::Node, name: &str) -> Result<()>;

    /// Delete the child `child` of `node` and everything beneath it
    fn delete_subtree(&self, node: &Self::Node, child: &str) -> Result<()>;
}

/// A typed scalar stored under a value name.
///
/// Heuristics only ever compare the `Display` form. Integers display signed,
/// so `0xFFFFFFFF` reads as `-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreValue {
    String(String),
    ExpandString(String),
    MultiString(Vec<String>),
    Dword(u32),
    Qword(u64),
    Binary(Vec<u8>),
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::String(s) | StoreValue::ExpandString(s) => f.write_str(s),
            StoreValue::MultiString(items) => f.write_str(&items.join(" ")),
            StoreValue::Dword(n) => write!(f, "{}", i32::from_ne_bytes(n.to_ne_bytes())),
            StoreValue::Qword(n) => write!(f, "{}", i64::from_ne_bytes(n.to_ne_bytes())),
            StoreValue::Binary(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// Join a parent path and a child name with the store separator
pub fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}{PATH_SEPARATOR}{child}")
    }
}

/// Open the system store for this platform
#[cfg(windows)]
#[allow(clippy::unnecessary_wraps)]
pub fn open_system_store() -> Result<RegistryStore> {
    Ok(RegistryStore::local_machine())
}

/// Open the system store for this platform
#[cfg(not(windows))]
pub fn open_system_store() -> Result<UnsupportedStore> {
    Err(crate::error::store::unavailable(format!(
        "the Windows registry is not present on {}",
        std::env::consts::OS
    )))
}

/// Placeholder backend on platforms without a registry; never constructed
#[cfg(not(windows))]
pub enum UnsupportedStore {}

#[cfg(not(windows))]
impl StoreAccessor for UnsupportedStore {
    type Node = ();

    fn root(&self) -> Result<()> {
        match *self {}
    }

    fn open_subpath(&self, _base: &(), _path: &str, _writable: bool) -> Result<Option<()>> {
        match *self {}
    }

    fn child_names(&self, _node: &()) -> Result<Vec<String>> {
        match *self {}
    }

    fn value_names(&self, _node: &()) -> Result<Vec<String>> {
        match *self {}
    }

    fn value(&self, _node: &(), _name: &str) -> Result<Option<StoreValue>> {
        match *self {}
    }

    fn delete_value(&self, _node: &(), _name: &str) -> Result<()> {
        match *self {}
    }

    fn delete_subtree(&self, _node: &(), _child: &str) -> Result<()> {
        match *self {}
    }
}
