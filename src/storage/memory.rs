//! In-process project store.

use super::{ProjectStore, StoreError};
use crate::models::Project;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

#[derive(Default)]
pub struct MemoryProjectStore {
    projects: RwLock<BTreeMap<String, Project>>,
    rate_limits: Mutex<HashMap<String, (u32, Instant)>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn create_project(&self, project: &Project) -> Result<bool, StoreError> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.slug) {
            return Ok(false);
        }
        projects.insert(project.slug.clone(), project.clone());
        Ok(true)
    }

    async fn get_project(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.read().await.get(slug).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.projects.read().await.values().cloned().collect())
    }

    async fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        self.projects
            .write()
            .await
            .insert(project.slug.clone(), project.clone());
        Ok(())
    }

    async fn delete_project(&self, slug: &str) -> Result<bool, StoreError> {
        Ok(self.projects.write().await.remove(slug).is_some())
    }

    async fn hit_rate_limit(
        &self,
        key: &str,
        max: u32,
        window_secs: u64,
    ) -> Result<bool, StoreError> {
        let mut limits = self.rate_limits.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(window_secs);

        let entry = limits.entry(key.to_string()).or_insert((0, now));
        if now.duration_since(entry.1) >= window {
            *entry = (0, now);
        }
        entry.0 = entry.0.saturating_add(1);

        Ok(entry.0 <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_delete() {
        let store = MemoryProjectStore::new();
        let project = Project::new("acme-q1", "Acme Q1", Some("Acme".to_string()), 10);

        assert!(store.create_project(&project).await.unwrap());
        assert!(!store.create_project(&project).await.unwrap());

        let loaded = store.get_project("acme-q1").await.unwrap().unwrap();
        assert_eq!(loaded, project);

        assert!(store.delete_project("acme-q1").await.unwrap());
        assert!(!store.delete_project("acme-q1").await.unwrap());
        assert!(store.get_project("acme-q1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_slug() {
        let store = MemoryProjectStore::new();
        for slug in ["zeta", "alpha", "mid"] {
            store
                .create_project(&Project::new(slug, slug, None, 0))
                .await
                .unwrap();
        }

        let slugs: Vec<String> = store
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = MemoryProjectStore::new();
        let mut project = Project::new("acme-q1", "Acme Q1", None, 0);
        store.create_project(&project).await.unwrap();

        project.name = "Renamed".to_string();
        store.save_project(&project).await.unwrap();

        let loaded = store.get_project("acme-q1").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Renamed");
    }

    #[tokio::test]
    async fn test_rate_limit_window() {
        let store = MemoryProjectStore::new();

        assert!(store.hit_rate_limit("k", 2, 60).await.unwrap());
        assert!(store.hit_rate_limit("k", 2, 60).await.unwrap());
        assert!(!store.hit_rate_limit("k", 2, 60).await.unwrap());

        // Separate keys are independent
        assert!(store.hit_rate_limit("other", 2, 60).await.unwrap());

        // Zero-length window resets on every hit
        assert!(store.hit_rate_limit("reset", 1, 0).await.unwrap());
        assert!(store.hit_rate_limit("reset", 1, 0).await.unwrap());
    }
}
