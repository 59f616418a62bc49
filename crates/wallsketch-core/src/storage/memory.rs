//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::plan::Plan;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Plans are kept as serialized JSON so that loads go through the same
/// parsing as persisted documents.
#[derive(Default)]
pub struct MemoryStorage {
    plans: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw JSON under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: &str, json: &str) -> StorageResult<()> {
        let mut plans = self
            .plans
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        plans.insert(key.to_string(), json.to_string());
        Ok(())
    }

    /// Raw JSON stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.plans.read().ok()?.get(key).cloned()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, plan: &Plan) -> StorageResult<()> {
        let json = plan
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.insert_raw(key, &json)
    }

    fn load(&self, key: &str) -> StorageResult<Plan> {
        let plans = self
            .plans
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        let json = plans
            .get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Plan::from_json(json).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut plans = self
            .plans
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        plans.remove(key);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let plans = self
            .plans
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(plans.keys().cloned().collect())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let plans = self
            .plans
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(plans.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Wall;
    use kurbo::Point;

    fn sample_plan() -> Plan {
        let mut plan = Plan::new();
        plan.add_wall(Wall::new("1", Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
        plan
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        storage.save("test", &sample_plan()).unwrap();
        let loaded = storage.load("test").unwrap();
        assert_eq!(loaded.walls, sample_plan().walls);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = storage.load("nonexistent");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_entry() {
        let storage = MemoryStorage::new();
        storage.insert_raw("bad", "{\"walls\": 3").unwrap();
        assert!(matches!(storage.load("bad"), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        assert!(!storage.exists("test").unwrap());
        storage.save("test", &sample_plan()).unwrap();
        assert!(storage.exists("test").unwrap());
        storage.delete("test").unwrap();
        assert!(!storage.exists("test").unwrap());
    }

    #[test]
    fn test_list() {
        let storage = MemoryStorage::new();
        storage.save("plan1", &Plan::new()).unwrap();
        storage.save("plan2", &Plan::new()).unwrap();

        let list = storage.list().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&"plan1".to_string()));
        assert!(list.contains(&"plan2".to_string()));
    }
}
