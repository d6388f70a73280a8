//! In-memory store backend
//!
//! Mirrors the registry's behaviour that matters to the heuristics: names are
//! case-insensitive, enumeration follows insertion order, handles to deleted
//! nodes stop working, and deleting something that is not there fails.

use std::cell::{Cell, RefCell};

use super::{PATH_SEPARATOR, StoreAccessor, StoreValue, join_path};
use crate::error::{Result, store as store_error};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryKey {
    children: Vec<(String, MemoryKey)>,
    values: Vec<(String, StoreValue)>,
}

impl MemoryKey {
    fn child(&self, name: &str) -> Option<&MemoryKey> {
        self.children
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, k)| k)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut MemoryKey> {
        self.children
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, k)| k)
    }

    fn child_or_insert(&mut self, name: &str) -> &mut MemoryKey {
        let pos = self
            .children
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name));
        let idx = pos.unwrap_or_else(|| {
            self.children.push((name.to_string(), MemoryKey::default()));
            self.children.len() - 1
        });
        &mut self.children[idx].1
    }
}

/// Handle to a node: the components of its path from the root
#[derive(Debug, Clone)]
pub struct MemoryNode {
    components: Vec<String>,
}

impl MemoryNode {
    fn display(&self) -> String {
        self.components.join(&PATH_SEPARATOR.to_string())
    }
}

/// Case-insensitive in-memory tree
#[derive(Debug, Default)]
pub struct MemoryStore {
    root: RefCell<MemoryKey>,
    failing: RefCell<Vec<String>>,
    read_only: Cell<bool>,
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(|c| !c.is_empty())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create every key along `path`
    pub fn create_key(&self, path: &str) {
        let mut root = self.root.borrow_mut();
        let mut key = &mut *root;
        for component in split(path) {
            key = key.child_or_insert(component);
        }
    }

    /// Create `path` if needed and set one value on it
    pub fn set_value(&self, path: &str, name: &str, value: StoreValue) {
        let mut root = self.root.borrow_mut();
        let mut key = &mut *root;
        for component in split(path) {
            key = key.child_or_insert(component);
        }
        match key.values.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value,
            None => key.values.push((name.to_string(), value)),
        }
    }

    /// Make any delete targeting `path` (a key, or `key\value`) fail
    pub fn fail_deletes_at(&self, path: &str) {
        self.failing.borrow_mut().push(path.to_ascii_lowercase());
    }

    /// Refuse writable opens, like a hive opened by a non-elevated user
    pub fn deny_writable_opens(&self) {
        self.read_only.set(true);
    }

    pub fn exists(&self, path: &str) -> bool {
        let root = self.root.borrow();
        let mut key = &*root;
        for component in split(path) {
            match key.child(component) {
                Some(next) => key = next,
                None => return false,
            }
        }
        true
    }

    pub fn has_value(&self, path: &str, name: &str) -> bool {
        let root = self.root.borrow();
        let mut key = &*root;
        for component in split(path) {
            match key.child(component) {
                Some(next) => key = next,
                None => return false,
            }
        }
        key.values.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Deep copy of the whole tree, for before/after comparisons
    pub fn snapshot(&self) -> MemoryKey {
        self.root.borrow().clone()
    }

    fn is_failing(&self, path: &str) -> bool {
        let path = path.to_ascii_lowercase();
        self.failing.borrow().iter().any(|p| *p == path)
    }

    fn with_key<T>(&self, node: &MemoryNode, f: impl FnOnce(&MemoryKey) -> T) -> Result<T> {
        let root = self.root.borrow();
        let mut key = &*root;
        for component in &node.components {
            key = key
                .child(component)
                .ok_or_else(|| store_error::read_failed(node.display(), "key has been deleted"))?;
        }
        Ok(f(key))
    }

    fn with_key_mut<T>(
        &self,
        node: &MemoryNode,
        f: impl FnOnce(&mut MemoryKey) -> Result<T>,
    ) -> Result<T> {
        let mut root = self.root.borrow_mut();
        let mut key = &mut *root;
        for component in &node.components {
            key = key.child_mut(component).ok_or_else(|| {
                store_error::mutation_failed(node.display(), "key has been deleted")
            })?;
        }
        f(key)
    }
}

impl StoreAccessor for MemoryStore {
    type Node = MemoryNode;

    fn root(&self) -> Result<MemoryNode> {
        Ok(MemoryNode {
            components: Vec::new(),
        })
    }

    fn open_subpath(
        &self,
        base: &MemoryNode,
        path: &str,
        writable: bool,
    ) -> Result<Option<MemoryNode>> {
        let mut components = base.components.clone();
        components.extend(split(path).map(str::to_string));

        if writable && self.read_only.get() {
            let node = MemoryNode { components };
            return Err(store_error::read_failed(node.display(), "access is denied"));
        }

        let root = self.root.borrow();
        let mut key = &*root;
        for component in &components {
            match key.child(component) {
                Some(next) => key = next,
                None => return Ok(None),
            }
        }
        Ok(Some(MemoryNode { components }))
    }

    fn child_names(&self, node: &MemoryNode) -> Result<Vec<String>> {
        self.with_key(node, |key| {
            key.children.iter().map(|(n, _)| n.clone()).collect()
        })
    }

    fn value_names(&self, node: &MemoryNode) -> Result<Vec<String>> {
        self.with_key(node, |key| key.values.iter().map(|(n, _)| n.clone()).collect())
    }

    fn value(&self, node: &MemoryNode, name: &str) -> Result<Option<StoreValue>> {
        self.with_key(node, |key| {
            key.values
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())
        })
    }

    fn delete_value(&self, node: &MemoryNode, name: &str) -> Result<()> {
        let target = join_path(&node.display(), name);
        if self.is_failing(&target) {
            return Err(store_error::mutation_failed(target, "access is denied"));
        }
        self.with_key_mut(node, |key| {
            let before = key.values.len();
            key.values.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
            if key.values.len() == before {
                return Err(store_error::mutation_failed(target, "value does not exist"));
            }
            Ok(())
        })
    }

    fn delete_subtree(&self, node: &MemoryNode, child: &str) -> Result<()> {
        let target = join_path(&node.display(), child);
        if self.is_failing(&target) {
            return Err(store_error::mutation_failed(target, "access is denied"));
        }
        self.with_key_mut(node, |key| {
            let before = key.children.len();
            key.children.retain(|(n, _)| !n.eq_ignore_ascii_case(child));
            if key.children.len() == before {
                return Err(store_error::mutation_failed(target, "key does not exist"));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let store = MemoryStore::new();
        store.set_value(r"SOFTWARE\Vendor\App", "Name", StoreValue::Dword(1));

        assert!(store.exists(r"software\VENDOR\app"));
        assert!(store.has_value(r"SOFTWARE\Vendor\App", "name"));

        let root = store.root().unwrap();
        let node = store
            .open_subpath(&root, r"Software\Vendor", false)
            .unwrap()
            .unwrap();
        assert_eq!(store.child_names(&node).unwrap(), vec!["App"]);
    }

    #[test]
    fn test_missing_path_is_none() {
        let store = MemoryStore::new();
        store.create_key("A");
        let root = store.root().unwrap();
        assert!(store.open_subpath(&root, r"A\B", false).unwrap().is_none());
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let store = MemoryStore::new();
        store.create_key(r"Root\zeta");
        store.create_key(r"Root\alpha");
        store.create_key(r"Root\mid");
        let root = store.root().unwrap();
        let node = store.open_subpath(&root, "Root", false).unwrap().unwrap();
        assert_eq!(
            store.child_names(&node).unwrap(),
            vec!["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn test_delete_subtree_invalidates_handles() {
        let store = MemoryStore::new();
        store.set_value(r"Root\Child\Leaf", "v", StoreValue::Dword(1));
        let root = store.root().unwrap();
        let parent = store.open_subpath(&root, "Root", true).unwrap().unwrap();
        let leaf = store
            .open_subpath(&root, r"Root\Child\Leaf", true)
            .unwrap()
            .unwrap();

        store.delete_subtree(&parent, "child").unwrap();

        assert!(!store.exists(r"Root\Child"));
        assert!(store.value_names(&leaf).is_err());
        assert!(store.delete_subtree(&parent, "Child").is_err());
    }

    #[test]
    fn test_injected_failure() {
        let store = MemoryStore::new();
        store.create_key(r"Root\Locked");
        store.fail_deletes_at(r"Root\Locked");
        let root = store.root().unwrap();
        let parent = store.open_subpath(&root, "Root", true).unwrap().unwrap();

        assert!(store.delete_subtree(&parent, "Locked").is_err());
        assert!(store.exists(r"Root\Locked"));
    }

    #[test]
    fn test_denied_writable_open_still_allows_reads() {
        let store = MemoryStore::new();
        store.create_key(r"Root\Child");
        store.deny_writable_opens();
        let root = store.root().unwrap();

        assert!(store.open_subpath(&root, "Root", true).is_err());
        let node = store.open_subpath(&root, "Root", false).unwrap().unwrap();
        assert_eq!(store.child_names(&node).unwrap(), vec!["Child"]);
    }
}
