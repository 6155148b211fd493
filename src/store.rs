//! Store interface
//!
//! The storage engine behind the server is a collaborator of the protocol
//! layer. The server consumes decoded requests, calls into a [`Store`], and
//! maps the outcome to an envelope result code (`Ok(None)` -> `NoValue`,
//! `Err` -> `InternalError`).

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;

/// Key/value lookup and storage behind the server
pub trait Store: Send + Sync {
    /// Look up `key`; `Ok(None)` means the key is absent
    fn get(&self, key: i32) -> Result<Option<i32>>;

    /// Store `value` under `key`, overwriting any previous value
    fn put(&self, key: i32, value: i32) -> Result<()>;
}

/// In-memory store
///
/// Multi-reader/single-writer via `parking_lot::RwLock`. Suitable for the
/// mock-server role and for tests; a persistent engine plugs in behind the
/// same trait.
#[derive(Default)]
pub struct MemoryStore {
    map: RwLock<HashMap<i32, i32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: i32) -> Result<Option<i32>> {
        Ok(self.map.read().get(&key).copied())
    }

    fn put(&self, key: i32, value: i32) -> Result<()> {
        self.map.write().insert(key, value);
        Ok(())
    }
}
