//! Windows registry backend (`HKEY_LOCAL_MACHINE`, 64-bit view)

use std::io;

use winreg::{RegKey, RegValue};
use winreg::enums::{
    HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_64KEY, KEY_WRITE, REG_DWORD, REG_EXPAND_SZ,
    REG_MULTI_SZ, REG_QWORD, REG_SZ,
};
use winreg::types::FromRegValue;

use super::{StoreAccessor, StoreValue, join_path};
use crate::error::{Result, store as store_error};

/// Open registry key plus the path it was opened at, for error messages
pub struct RegistryNode {
    key: RegKey,
    path: String,
}

/// The local machine hive, always read through the 64-bit view so a 32-bit
/// build sees the same keys the 64-bit management extension writes.
pub struct RegistryStore;

impl RegistryStore {
    pub fn local_machine() -> Self {
        Self
    }
}

fn convert(raw: &RegValue) -> StoreValue {
    let converted = match raw.vtype {
        REG_SZ => String::from_reg_value(raw).map(StoreValue::String),
        REG_EXPAND_SZ => String::from_reg_value(raw).map(StoreValue::ExpandString),
        REG_MULTI_SZ => Vec::<String>::from_reg_value(raw).map(StoreValue::MultiString),
        REG_DWORD => u32::from_reg_value(raw).map(StoreValue::Dword),
        REG_QWORD => u64::from_reg_value(raw).map(StoreValue::Qword),
        _ => Ok(StoreValue::Binary(raw.bytes.clone())),
    };
    converted.unwrap_or_else(|_| StoreValue::Binary(raw.bytes.clone()))
}

impl StoreAccessor for RegistryStore {
    type Node = RegistryNode;

    fn root(&self) -> Result<RegistryNode> {
        Ok(RegistryNode {
            key: RegKey::predef(HKEY_LOCAL_MACHINE),
            path: String::new(),
        })
    }

    fn open_subpath(
        &self,
        base: &RegistryNode,
        path: &str,
        writable: bool,
    ) -> Result<Option<RegistryNode>> {
        let mut flags = KEY_READ | KEY_WOW64_64KEY;
        if writable {
            flags |= KEY_WRITE;
        }
        let full = join_path(&base.path, path);
        match base.key.open_subkey_with_flags(path, flags) {
            Ok(key) => Ok(Some(RegistryNode { key, path: full })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(store_error::read_failed(full, e.to_string())),
        }
    }

    fn child_names(&self, node: &RegistryNode) -> Result<Vec<String>> {
        node.key
            .enum_keys()
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| store_error::read_failed(&node.path, e.to_string()))
    }

    fn value_names(&self, node: &RegistryNode) -> Result<Vec<String>> {
        node.key
            .enum_values()
            .map(|entry| entry.map(|(name, _)| name))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| store_error::read_failed(&node.path, e.to_string()))
    }

    fn value(&self, node: &RegistryNode, name: &str) -> Result<Option<StoreValue>> {
        match node.key.get_raw_value(name) {
            Ok(raw) => Ok(Some(convert(&raw))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(store_error::read_failed(
                format!("{} [{name}]", node.path),
                e.to_string(),
            )),
        }
    }

    fn delete_value(&self, node: &RegistryNode, name: &str) -> Result<()> {
        node.key
            .delete_value(name)
            .map_err(|e| store_error::mutation_failed(join_path(&node.path, name), e.to_string()))
    }

    fn delete_subtree(&self, node: &RegistryNode, child: &str) -> Result<()> {
        node.key
            .delete_subkey_all(child)
            .map_err(|e| store_error::mutation_failed(join_path(&node.path, child), e.to_string()))
    }
}
