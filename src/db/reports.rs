// src/db/reports.rs
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{Report, VerificationStatus};
use crate::errors::ServerError;

const REPORT_COLUMNS: &str =
    "id, disaster_id, user_id, content, image_url, verification_status, created_at";

fn row_to_report(row: &Row<'_>) -> rusqlite::Result<Report> {
    let raw_status: String = row.get(5)?;
    let verification_status = raw_status.parse::<VerificationStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.into())
    })?;

    Ok(Report {
        id: row.get(0)?,
        disaster_id: row.get(1)?,
        user_id: row.get(2)?,
        content: row.get(3)?,
        image_url: row.get(4)?,
        verification_status,
        created_at: row.get(6)?,
    })
}

pub fn insert_report(conn: &Connection, r: &Report) -> Result<(), ServerError> {
    conn.execute(
        r#"
        insert into reports (id, disaster_id, user_id, content, image_url, verification_status, created_at)
        values (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            r.id,
            r.disaster_id,
            r.user_id,
            r.content,
            r.image_url,
            r.verification_status.as_str(),
            r.created_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert report failed: {e}")))?;
    Ok(())
}

pub fn list_reports(conn: &Connection, disaster_id: &str) -> Result<Vec<Report>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "select {REPORT_COLUMNS} from reports where disaster_id = ? order by created_at desc"
        ))
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    let rows = stmt
        .query_map(params![disaster_id], row_to_report)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

pub fn get_report(conn: &Connection, id: &str) -> Result<Option<Report>, ServerError> {
    conn.query_row(
        &format!("select {REPORT_COLUMNS} from reports where id = ?"),
        params![id],
        row_to_report,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select report failed: {e}")))
}

/// Sets the status and returns the updated report, `None` if it doesn't
/// exist. When `disaster_id` is given the update is scoped to it.
pub fn set_verification_status(
    conn: &Connection,
    id: &str,
    disaster_id: Option<&str>,
    status: VerificationStatus,
) -> Result<Option<Report>, ServerError> {
    let updated = match disaster_id {
        Some(d) => conn.execute(
            "update reports set verification_status = ? where id = ? and disaster_id = ?",
            params![status.as_str(), id, d],
        ),
        None => conn.execute(
            "update reports set verification_status = ? where id = ?",
            params![status.as_str(), id],
        ),
    }
    .map_err(|e| ServerError::DbError(format!("update report failed: {e}")))?;

    if updated == 0 {
        return Ok(None);
    }
    get_report(conn, id)
}
