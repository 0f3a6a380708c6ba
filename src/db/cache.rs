// src/db/cache.rs
//! Rows of the `cache` table. Every function takes `now` (unix seconds) so
//! expiry can be driven by a simulated clock.
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::errors::ServerError;

/// Value for `key` if present and `expires_at > now`. Expired rows are
/// treated as absent but left in place for `cleanup`.
pub fn get(conn: &Connection, key: &str, now: i64) -> Result<Option<Value>, ServerError> {
    let raw: Option<String> = conn
        .query_row(
            "select value from cache where key = ? and expires_at > ?",
            params![key, now],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("cache get failed: {e}")))?;

    raw.map(|s| {
        serde_json::from_str(&s)
            .map_err(|e| ServerError::DbError(format!("cache value for {key} is not JSON: {e}")))
    })
    .transpose()
}

/// Upsert, last write wins.
pub fn set(
    conn: &Connection,
    key: &str,
    value: &Value,
    ttl_minutes: i64,
    now: i64,
) -> Result<(), ServerError> {
    let expires_at = now + ttl_minutes * 60;
    conn.execute(
        r#"
        insert into cache (key, value, expires_at) values (?1, ?2, ?3)
        on conflict(key) do update set value = excluded.value, expires_at = excluded.expires_at
        "#,
        params![key, value.to_string(), expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("cache set failed: {e}")))?;
    Ok(())
}

pub fn delete(conn: &Connection, key: &str) -> Result<(), ServerError> {
    conn.execute("delete from cache where key = ?", params![key])
        .map_err(|e| ServerError::DbError(format!("cache delete failed: {e}")))?;
    Ok(())
}

/// Removes every row with `expires_at <= now`, returning how many went.
pub fn cleanup(conn: &Connection, now: i64) -> Result<usize, ServerError> {
    conn.execute("delete from cache where expires_at <= ?", params![now])
        .map_err(|e| ServerError::DbError(format!("cache cleanup failed: {e}")))
}
