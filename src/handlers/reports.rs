// src/handlers/reports.rs
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::db::{disasters, reports as store};
use crate::domain::{Report, VerificationStatus};
use crate::errors::ServerError;
use crate::handlers::Ctx;
use crate::pipeline::non_blank;
use crate::responses::{created, ok, ok_with, ResultResp};

#[derive(Debug, Default, Deserialize)]
pub struct ReportBody {
    pub user_id: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusBody {
    pub verification_status: Option<String>,
}

pub fn create(ctx: &Ctx, disaster_id: &str, body: ReportBody) -> ResultResp {
    let content = non_blank(body.content.as_deref())
        .ok_or_else(|| ServerError::BadRequest("content is required".into()))?
        .to_string();

    if !ctx
        .state
        .db
        .with_conn(|conn| disasters::disaster_exists(conn, disaster_id))?
    {
        return Err(ServerError::NotFound("Disaster not found".into()));
    }

    let report = Report {
        id: uuid::Uuid::new_v4().to_string(),
        disaster_id: disaster_id.to_string(),
        user_id: non_blank(body.user_id.as_deref())
            .unwrap_or(&ctx.who.id)
            .to_string(),
        content,
        image_url: non_blank(body.image_url.as_deref()).map(str::to_string),
        verification_status: VerificationStatus::Pending,
        created_at: Utc::now(),
    };
    ctx.state
        .db
        .with_conn(|conn| store::insert_report(conn, &report))?;

    tracing::info!(id = %report.id, disaster_id, user = %report.user_id, "report filed");
    created(&report)
}

pub fn list(ctx: &Ctx, disaster_id: &str) -> ResultResp {
    let data = ctx
        .state
        .db
        .with_conn(|conn| store::list_reports(conn, disaster_id))?;
    ok_with(200, &data, json!({ "count": data.len() }))
}

/// Admin-only manual status change.
pub fn set_status(ctx: &Ctx, report_id: &str, body: StatusBody) -> ResultResp {
    ctx.who.require_admin()?;

    let raw = non_blank(body.verification_status.as_deref())
        .ok_or_else(|| ServerError::BadRequest("Verification status is required".into()))?;
    let status: VerificationStatus = raw.parse().map_err(ServerError::BadRequest)?;

    let report = ctx
        .state
        .db
        .with_conn(|conn| store::set_verification_status(conn, report_id, None, status))?
        .ok_or_else(|| ServerError::NotFound("Report not found".into()))?;

    tracing::info!(report_id, status = status.as_str(), by = %ctx.who.id, "report status set");
    ok(&report)
}
