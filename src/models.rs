//! Request, response and storage models.

use serde::{Deserialize, Serialize};

// ============================================================================
// Storage Models
// ============================================================================

/// Checklist item outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub updated_at: u64,
}

/// A UAT project and its checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub created_at: u64,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

impl Project {
    pub fn new(slug: &str, name: &str, client: Option<String>, created_at: u64) -> Self {
        Project {
            slug: slug.to_string(),
            name: name.to_string(),
            client,
            created_at,
            items: Vec::new(),
        }
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut ChecklistItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn analytics(&self) -> ProjectAnalytics {
        let count = |status: ItemStatus| self.items.iter().filter(|i| i.status == status).count();

        let total = self.items.len();
        let passed = count(ItemStatus::Passed);
        let failed = count(ItemStatus::Failed);
        let pending = count(ItemStatus::Pending);

        let completion_percent = if total == 0 {
            0
        } else {
            ((passed + failed) * 100 / total) as u8
        };

        ProjectAnalytics {
            slug: self.slug.clone(),
            name: self.name.clone(),
            client: self.client.clone(),
            total,
            passed,
            failed,
            pending,
            completion_percent,
        }
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            slug: self.slug.clone(),
            name: self.name.clone(),
            client: self.client.clone(),
            created_at: self.created_at,
            item_count: self.items.len(),
        }
    }
}

// ============================================================================
// Auth Models
// ============================================================================

/// Login form body.
#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
}

/// Response for share-token retrieval.
#[derive(Debug, Serialize)]
pub struct ShareTokenResponse {
    pub token: String,
}

// ============================================================================
// Project Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub slug: String,
    pub name: String,
    pub client: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub status: ItemStatus,
    pub note: Option<String>,
}

/// Project row for listings.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub created_at: u64,
    pub item_count: usize,
}

/// Read-only view served on share links.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ProjectAnalytics {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
    pub completion_percent: u8,
}
