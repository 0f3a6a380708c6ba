pub mod cache;
pub mod connection;
pub mod disasters;
pub mod reports;
pub mod resources;

pub use connection::{init_db, Database};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{AuditAction, AuditEntry, Disaster};
    use chrono::Utc;
    use rusqlite::Connection;

    /// In-memory connection with the production schema and SQL functions.
    pub fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        super::connection::register_spatial_functions(&conn).unwrap();
        conn.execute_batch(include_str!("../../sql/schema.sql")).unwrap();
        conn
    }

    pub fn sample_disaster(id: &str) -> Disaster {
        let now = Utc::now();
        Disaster {
            id: id.into(),
            title: "Flood".into(),
            description: "Flooding downtown".into(),
            location_name: None,
            location: None,
            tags: vec![],
            owner_id: "citizen1".into(),
            audit_trail: vec![AuditEntry::new(AuditAction::Create, "citizen1", now)],
            created_at: now,
            updated_at: now,
        }
    }
}
