//! Storage abstraction for plan persistence.

mod memory;
mod file;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::plan::Plan;
use thiserror::Error;

/// Key the editor stores its plan under.
pub const PLAN_KEY: &str = "plan";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Plan not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for plan storage backends.
///
/// Implementations can keep plans in memory or on the filesystem. Calls are
/// synchronous; the editor persists within the event turn that committed the
/// edit.
pub trait Storage {
    /// Save a plan.
    fn save(&self, key: &str, plan: &Plan) -> StorageResult<()>;

    /// Load a plan.
    fn load(&self, key: &str) -> StorageResult<Plan>;

    /// Delete a plan.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// List all plan keys.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a plan exists.
    fn exists(&self, key: &str) -> StorageResult<bool>;
}
