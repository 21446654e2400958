//! Redis-backed project store.
//!
//! Redis key patterns:
//! - `project:{slug}` — project data (JSON)
//! - `projects` — set of all project slugs
//! - `ratelimit:{key}` — fixed-window counters (INCR + EXPIRE)

use super::{ProjectStore, StoreError};
use crate::models::Project;
use async_trait::async_trait;
use redis::AsyncCommands;

const PROJECT_INDEX_KEY: &str = "projects";

fn project_key(slug: &str) -> String {
    format!("project:{}", slug)
}

#[derive(Clone)]
pub struct RedisProjectStore {
    client: redis::Client,
}

impl RedisProjectStore {
    pub fn new(client: redis::Client) -> Self {
        RedisProjectStore { client }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl ProjectStore for RedisProjectStore {
    async fn create_project(&self, project: &Project) -> Result<bool, StoreError> {
        let mut con = self.connection().await?;
        let json = serde_json::to_string(project)?;

        // SET NX so two concurrent creates cannot both win
        let created: bool = con.set_nx(project_key(&project.slug), json).await?;
        if created {
            con.sadd::<_, _, ()>(PROJECT_INDEX_KEY, &project.slug)
                .await?;
        }
        Ok(created)
    }

    async fn get_project(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        let mut con = self.connection().await?;
        let json: Option<String> = con.get(project_key(slug)).await?;

        match json {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let mut con = self.connection().await?;
        let mut slugs: Vec<String> = con.smembers(PROJECT_INDEX_KEY).await?;
        slugs.sort();

        let mut projects = Vec::with_capacity(slugs.len());
        for slug in &slugs {
            let json: Option<String> = con.get(project_key(slug)).await?;
            match json {
                Some(data) => projects.push(serde_json::from_str(&data)?),
                None => {
                    // Index entry without data; drop it
                    con.srem::<_, _, ()>(PROJECT_INDEX_KEY, slug).await?;
                }
            }
        }
        Ok(projects)
    }

    async fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        let mut con = self.connection().await?;
        let json = serde_json::to_string(project)?;
        con.set::<_, _, ()>(project_key(&project.slug), json)
            .await?;
        con.sadd::<_, _, ()>(PROJECT_INDEX_KEY, &project.slug)
            .await?;
        Ok(())
    }

    async fn delete_project(&self, slug: &str) -> Result<bool, StoreError> {
        let mut con = self.connection().await?;
        let deleted: i32 = con.del(project_key(slug)).await?;
        con.srem::<_, _, ()>(PROJECT_INDEX_KEY, slug).await?;
        Ok(deleted > 0)
    }

    async fn hit_rate_limit(
        &self,
        key: &str,
        max: u32,
        window_secs: u64,
    ) -> Result<bool, StoreError> {
        let mut con = self.connection().await?;
        let key = format!("ratelimit:{}", key);

        let count: u32 = con.incr(&key, 1).await?;

        // Set TTL on first hit
        if count == 1 {
            con.expire::<_, ()>(&key, window_secs as i64).await?;
        }

        Ok(count <= max)
    }
}
