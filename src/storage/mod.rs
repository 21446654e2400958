//! Project persistence.
//!
//! Handlers only see [`ProjectStore`]. `redis_store` is the production backend,
//! `memory` serves tests and local runs.

pub mod memory;
pub mod redis_store;

use crate::models::Project;
use async_trait::async_trait;

pub use self::memory::MemoryProjectStore;
pub use self::redis_store::RedisProjectStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert a new project. Returns false if the slug is taken.
    async fn create_project(&self, project: &Project) -> Result<bool, StoreError>;

    async fn get_project(&self, slug: &str) -> Result<Option<Project>, StoreError>;

    /// All projects, sorted by slug.
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;

    /// Overwrite an existing project.
    async fn save_project(&self, project: &Project) -> Result<(), StoreError>;

    /// Returns true if the project existed.
    async fn delete_project(&self, slug: &str) -> Result<bool, StoreError>;

    /// Count a hit against `key` in a fixed window.
    ///
    /// Returns true while the count is within `max`.
    async fn hit_rate_limit(
        &self,
        key: &str,
        max: u32,
        window_secs: u64,
    ) -> Result<bool, StoreError>;
}
