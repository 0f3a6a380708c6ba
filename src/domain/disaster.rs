// src/domain/disaster.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::geo::GeoPoint;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disaster {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `None` when neither supplied nor extractable.
    pub location_name: Option<String>,
    pub location: Option<GeoPoint>,
    pub tags: Vec<String>,
    pub owner_id: String,
    pub audit_trail: Vec<AuditEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// One mutation of a disaster. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<BTreeMap<String, FieldChange>>,
}

impl AuditEntry {
    pub fn new(action: AuditAction, user_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            action,
            user_id: user_id.to_string(),
            timestamp,
            changes: None,
        }
    }

    pub fn with_changes(mut self, changes: BTreeMap<String, FieldChange>) -> Self {
        self.changes = Some(changes);
        self
    }
}

/// The disaster types official updates can be filtered by.
pub const DISASTER_TYPES: [&str; 8] = [
    "hurricane",
    "earthquake",
    "flood",
    "wildfire",
    "tornado",
    "tsunami",
    "volcano",
    "drought",
];

impl Disaster {
    /// First known disaster type mentioned in title, description or tags.
    pub fn inferred_type(&self) -> Option<&'static str> {
        let text = format!("{} {} {}", self.title, self.description, self.tags.join(" "))
            .to_lowercase();
        DISASTER_TYPES.iter().copied().find(|t| text.contains(t))
    }
}
