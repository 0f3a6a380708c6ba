// src/pipeline/disasters.rs
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;

use crate::auth::Principal;
use crate::db::disasters as store;
use crate::domain::{AuditAction, AuditEntry, Disaster, FieldChange};
use crate::errors::ServerError;
use crate::notify::DisasterEvent;
use crate::pipeline::{derive_location, non_blank};
use crate::state::AppState;

#[derive(Debug, Clone, Default)]
pub struct NewDisaster {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location_name: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Fields left `None` (or blank) keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct DisasterPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location_name: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

pub fn create_disaster(
    state: &AppState,
    who: &Principal,
    input: NewDisaster,
) -> Result<Disaster, ServerError> {
    let (title, description) = match (
        non_blank(input.title.as_deref()),
        non_blank(input.description.as_deref()),
    ) {
        (Some(t), Some(d)) => (t.to_string(), d.to_string()),
        _ => {
            return Err(ServerError::BadRequest(
                "Title and description are required".into(),
            ))
        }
    };

    let derived = derive_location(
        state,
        input.location_name.as_deref(),
        None,
        Some(&description),
    );

    let now = Utc::now();
    let disaster = Disaster {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        description,
        location_name: derived.location_name,
        location: derived.location,
        tags: clean_tags(input.tags.unwrap_or_default()),
        owner_id: who.id.clone(),
        audit_trail: vec![AuditEntry::new(AuditAction::Create, &who.id, now)],
        created_at: now,
        updated_at: now,
    };

    state.db.with_conn(|conn| store::insert_disaster(conn, &disaster))?;
    tracing::info!(
        id = %disaster.id,
        user = %who.id,
        location = ?disaster.location_name,
        geocoded = disaster.location.is_some(),
        "disaster created"
    );

    state.notifier.notify(&DisasterEvent::Create {
        disaster: disaster.clone(),
    });
    Ok(disaster)
}

fn record_change<T: serde::Serialize + PartialEq>(
    changes: &mut BTreeMap<String, FieldChange>,
    field: &str,
    old: &T,
    new: &T,
) {
    if old != new {
        changes.insert(
            field.to_string(),
            FieldChange {
                old: json!(old),
                new: json!(new),
            },
        );
    }
}

pub fn update_disaster(
    state: &AppState,
    who: &Principal,
    id: &str,
    patch: DisasterPatch,
) -> Result<Disaster, ServerError> {
    let existing = state
        .db
        .with_conn(|conn| store::get_disaster(conn, id))?
        .ok_or_else(|| ServerError::NotFound("Disaster not found".into()))?;

    // Checked before any adapter call.
    who.require_owner_or_admin(&existing.owner_id)?;

    let mut updated = existing.clone();
    if let Some(title) = non_blank(patch.title.as_deref()) {
        updated.title = title.to_string();
    }
    if let Some(description) = non_blank(patch.description.as_deref()) {
        updated.description = description.to_string();
    }
    if let Some(tags) = patch.tags {
        updated.tags = clean_tags(tags);
    }

    let new_name = non_blank(patch.location_name.as_deref());
    if let Some(name) = new_name {
        if existing.location_name.as_deref() != Some(name) {
            let derived = derive_location(state, Some(name), None, None);
            updated.location_name = derived.location_name;
            updated.location = derived.location;
        }
    }

    let mut changes = BTreeMap::new();
    record_change(&mut changes, "title", &existing.title, &updated.title);
    record_change(&mut changes, "description", &existing.description, &updated.description);
    record_change(&mut changes, "location_name", &existing.location_name, &updated.location_name);
    record_change(&mut changes, "tags", &existing.tags, &updated.tags);

    let now = Utc::now();
    updated.updated_at = now;
    let entry = AuditEntry::new(AuditAction::Update, &who.id, now).with_changes(changes);

    // The stored trail may have grown since `existing` was read; return it as persisted.
    let updated = state.db.with_conn(|conn| {
        store::update_disaster(conn, &updated, &entry)?;
        store::get_disaster(conn, id)?
            .ok_or_else(|| ServerError::NotFound("Disaster not found".into()))
    })?;
    tracing::info!(id, user = %who.id, trail = updated.audit_trail.len(), "disaster updated");

    state.notifier.notify(&DisasterEvent::Update {
        disaster: updated.clone(),
    });
    Ok(updated)
}

/// Removes the disaster and, by cascade, its resources and reports. The
/// delete entry can't outlive its record, so it goes to the log only.
pub fn delete_disaster(state: &AppState, who: &Principal, id: &str) -> Result<(), ServerError> {
    let existing = state
        .db
        .with_conn(|conn| store::get_disaster(conn, id))?
        .ok_or_else(|| ServerError::NotFound("Disaster not found".into()))?;
    who.require_owner_or_admin(&existing.owner_id)?;

    if !state.db.with_conn(|conn| store::delete_disaster(conn, id))? {
        return Err(ServerError::NotFound("Disaster not found".into()));
    }

    let entry = AuditEntry::new(AuditAction::Delete, &who.id, Utc::now());
    tracing::info!(
        id,
        title = %existing.title,
        audit = %serde_json::to_string(&entry).unwrap_or_default(),
        "disaster deleted"
    );

    state.notifier.notify(&DisasterEvent::Delete {
        disaster_id: id.to_string(),
    });
    Ok(())
}
