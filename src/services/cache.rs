// src/services/cache.rs
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::db::{cache, Database};

/// Key/value cache over the `cache` table.
///
/// Nothing here returns an error: a failed read is a miss and a failed write
/// is logged and reported as `false`. Concurrent writers to one key race,
/// last write wins.
#[derive(Clone)]
pub struct CacheStore {
    db: Database,
}

pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

impl CacheStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, now_unix())
    }

    pub fn get_at(&self, key: &str, now: i64) -> Option<Value> {
        match self.db.with_conn(|conn| cache::get(conn, key, now)) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache get failed");
                None
            }
        }
    }

    /// Typed read; a value that no longer deserializes is a miss.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "cached value has unexpected shape");
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &Value, ttl_minutes: i64) -> bool {
        self.set_at(key, value, ttl_minutes, now_unix())
    }

    pub fn set_at(&self, key: &str, value: &Value, ttl_minutes: i64, now: i64) -> bool {
        match self
            .db
            .with_conn(|conn| cache::set(conn, key, value, ttl_minutes, now))
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache set failed");
                false
            }
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl_minutes: i64) -> bool {
        match serde_json::to_value(value) {
            Ok(v) => self.set(key, &v, ttl_minutes),
            Err(e) => {
                tracing::warn!(key, error = %e, "cache value not serializable");
                false
            }
        }
    }

    pub fn delete(&self, key: &str) -> bool {
        match self.db.with_conn(|conn| cache::delete(conn, key)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache delete failed");
                false
            }
        }
    }

    /// Drops expired rows. `None` if the sweep itself failed.
    pub fn cleanup(&self) -> Option<usize> {
        self.cleanup_at(now_unix())
    }

    pub fn cleanup_at(&self, now: i64) -> Option<usize> {
        match self.db.with_conn(|conn| cache::cleanup(conn, now)) {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!(error = %e, "cache cleanup failed");
                None
            }
        }
    }
}
