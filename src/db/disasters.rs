// src/db/disasters.rs
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;

use crate::domain::{AuditEntry, Disaster, GeoPoint};
use crate::errors::ServerError;

const DISASTER_COLUMNS: &str = "id, title, description, location_name, lat, lng, tags, owner_id, audit_trail, created_at, updated_at";

/// Optional filters for listing disasters.
#[derive(Debug, Default, Clone)]
pub struct DisasterFilter {
    pub tag: Option<String>,
    /// Center and radius in meters.
    pub near: Option<(GeoPoint, f64)>,
}

/// Decode a JSON text column inside a row mapper.
pub(crate) fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn to_json_text<T: serde::Serialize>(value: &T) -> Result<String, ServerError> {
    serde_json::to_string(value).map_err(|e| ServerError::DbError(format!("encode json: {e}")))
}

fn row_to_disaster(row: &Row<'_>) -> rusqlite::Result<Disaster> {
    Ok(Disaster {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        location_name: row.get(3)?,
        location: GeoPoint::from_columns(row.get(4)?, row.get(5)?),
        tags: json_column(row, 6)?,
        owner_id: row.get(7)?,
        audit_trail: json_column(row, 8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

pub fn insert_disaster(conn: &Connection, d: &Disaster) -> Result<(), ServerError> {
    conn.execute(
        r#"
        insert into disasters (id, title, description, location_name, lat, lng, tags, owner_id, audit_trail, created_at, updated_at)
        values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            d.id,
            d.title,
            d.description,
            d.location_name,
            d.location.map(|p| p.lat),
            d.location.map(|p| p.lng),
            to_json_text(&d.tags)?,
            d.owner_id,
            to_json_text(&d.audit_trail)?,
            d.created_at,
            d.updated_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert disaster failed: {e}")))?;
    Ok(())
}

pub fn get_disaster(conn: &Connection, id: &str) -> Result<Option<Disaster>, ServerError> {
    conn.query_row(
        &format!("select {DISASTER_COLUMNS} from disasters where id = ?"),
        params![id],
        row_to_disaster,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select disaster failed: {e}")))
}

pub fn disaster_exists(conn: &Connection, id: &str) -> Result<bool, ServerError> {
    let found: Option<i64> = conn
        .query_row("select 1 from disasters where id = ?", params![id], |r| r.get(0))
        .optional()
        .map_err(|e| ServerError::DbError(format!("disaster lookup failed: {e}")))?;
    Ok(found.is_some())
}

/// Newest first. With `near`, this is the store's disasters-within-radius
/// query: rows without coordinates never match.
pub fn list_disasters(conn: &Connection, filter: &DisasterFilter) -> Result<Vec<Disaster>, ServerError> {
    let mut sql = format!("select {DISASTER_COLUMNS} from disasters where 1 = 1");
    let mut args: Vec<SqlValue> = Vec::new();

    if let Some(tag) = &filter.tag {
        sql.push_str(" and exists (select 1 from json_each(disasters.tags) where json_each.value = ?)");
        args.push(SqlValue::Text(tag.clone()));
    }
    if let Some((center, radius)) = filter.near {
        sql.push_str(" and distance_meters(lat, lng, ?, ?) <= ?");
        args.push(SqlValue::Real(center.lat));
        args.push(SqlValue::Real(center.lng));
        args.push(SqlValue::Real(radius));
    }
    sql.push_str(" order by created_at desc");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(args), row_to_disaster)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

/// Overwrites the mutable columns and appends `entry` to the audit trail.
/// The append happens inside the statement, so concurrent updates each
/// keep their entry.
pub fn update_disaster(conn: &Connection, d: &Disaster, entry: &AuditEntry) -> Result<(), ServerError> {
    let updated = conn
        .execute(
            r#"
            update disasters
               set title = ?2, description = ?3, location_name = ?4, lat = ?5, lng = ?6,
                   tags = ?7, updated_at = ?8,
                   audit_trail = json_insert(audit_trail, '$[#]', json(?9))
             where id = ?1
            "#,
            params![
                d.id,
                d.title,
                d.description,
                d.location_name,
                d.location.map(|p| p.lat),
                d.location.map(|p| p.lng),
                to_json_text(&d.tags)?,
                d.updated_at,
                to_json_text(entry)?,
            ],
        )
        .map_err(|e| ServerError::DbError(format!("update disaster failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound("Disaster not found".into()));
    }
    Ok(())
}

/// Returns false when nothing was deleted.
pub fn delete_disaster(conn: &Connection, id: &str) -> Result<bool, ServerError> {
    let n = conn
        .execute("delete from disasters where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete disaster failed: {e}")))?;
    Ok(n > 0)
}
