//! Process-wide startup properties.

use indexmap::IndexMap;
use nestjar_api::Environment;
use once_cell::sync::OnceCell;
use std::sync::{Arc, PoisonError, RwLock};

static GLOBAL: OnceCell<Arc<SystemProperties>> = OnceCell::new();

/// String property table readable by any code loaded after startup.
#[derive(Debug, Default)]
pub struct SystemProperties {
    table: RwLock<IndexMap<String, String>>,
}

impl SystemProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> Arc<SystemProperties> {
        GLOBAL
            .get_or_init(|| Arc::new(SystemProperties::new()))
            .clone()
    }

    /// Properties in the order their keys were first set.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn len(&self) -> usize {
        self.table.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Environment for SystemProperties {
    fn set(&self, key: &str, value: &str) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.insert(key.to_string(), value.to_string());
    }

    fn get(&self, key: &str) -> Option<String> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.get(key).cloned()
    }
}

/// Look up a property in the process-wide table.
pub fn property(key: &str) -> Option<String> {
    SystemProperties::global().get(key)
}
