//! Raw key/value persistence boundary.
//!
//! # Responsibility
//! - Move serialized strings in and out of durable storage.
//! - Stay shape-agnostic; schema validation happens in `Store`.

use crate::store::StoreResult;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Backend contract behind the typed store.
///
/// One backend instance models one browser storage area; multiple
/// execution contexts may share it.
pub trait StoreBackend {
    fn load(&self, key: &str) -> StoreResult<Option<String>>;
    fn save(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-memory backend for tests and multi-context simulation.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreBackend for MemoryBackend {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryBackend, StoreBackend};

    #[test]
    fn save_load_remove_roundtrip() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.load("userSettings").expect("load"), None);

        backend.save("userSettings", "{}").expect("save");
        assert_eq!(
            backend.load("userSettings").expect("load"),
            Some("{}".to_string())
        );

        backend.remove("userSettings").expect("remove");
        assert_eq!(backend.load("userSettings").expect("load"), None);
    }
}
