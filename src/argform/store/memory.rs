use std::collections::HashMap;

use super::Storage;
use crate::error::Result;
use crate::value::Value;

/// In-memory storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    values: HashMap<String, Value>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a value, builder style. Handy for test fixtures.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl Storage for InMemoryStorage {
    fn value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: &Value) -> Result<()> {
        self.values.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.values.clear();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
