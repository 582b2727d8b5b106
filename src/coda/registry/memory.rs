use super::{RegistryMap, RegistryStore};
use crate::error::{RegistryError, Result};
use std::cell::RefCell;

/// In-memory registry store for testing.
///
/// Uses `RefCell` for interior mutability since the trait takes `&self`.
#[derive(Default)]
pub struct MemRegistry {
    map: RefCell<RegistryMap>,
    simulate_write_error: RefCell<bool>,
}

impl MemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut map = store.map.borrow_mut();
            for (name, doc_id) in entries {
                map.insert(name.to_string(), doc_id.to_string());
            }
        }
        store
    }

    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }
}

impl RegistryStore for MemRegistry {
    fn load(&self) -> Result<RegistryMap> {
        Ok(self.map.borrow().clone())
    }

    fn save(&self, map: &RegistryMap) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(RegistryError::Store("Simulated write error".to_string()).into());
        }
        *self.map.borrow_mut() = map.clone();
        Ok(())
    }
}
