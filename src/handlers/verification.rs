// src/handlers/verification.rs
use serde::Deserialize;

use crate::db::{disasters, reports};
use crate::errors::ServerError;
use crate::handlers::Ctx;
use crate::pipeline::non_blank;
use crate::responses::{ok_with, ResultResp};

#[derive(Debug, Default, Deserialize)]
pub struct VerifyBody {
    pub image_url: Option<String>,
    pub report_id: Option<String>,
}

/// Runs image verification and, when a report is named and the check
/// produced a verdict, writes that verdict to the report.
pub fn verify_image(ctx: &Ctx, disaster_id: &str, body: VerifyBody) -> ResultResp {
    let image_url = non_blank(body.image_url.as_deref())
        .ok_or_else(|| ServerError::BadRequest("Image URL is required".into()))?;

    if !ctx
        .state
        .db
        .with_conn(|conn| disasters::disaster_exists(conn, disaster_id))?
    {
        return Err(ServerError::NotFound("Disaster not found".into()));
    }

    let outcome = ctx.state.verifier.verify(image_url);
    let degraded = outcome.is_degraded();
    let verification = outcome.into_value();

    let mut report_updated = false;
    if let (Some(report_id), Some(status)) = (
        non_blank(body.report_id.as_deref()),
        verification.status.report_status(),
    ) {
        // The verification already happened; a failed write is only logged.
        match ctx.state.db.with_conn(|conn| {
            reports::set_verification_status(conn, report_id, Some(disaster_id), status)
        }) {
            Ok(Some(_)) => report_updated = true,
            Ok(None) => tracing::warn!(report_id, disaster_id, "report not found for verification"),
            Err(e) => tracing::error!(report_id, error = %e, "could not store verification"),
        }
    }

    tracing::info!(
        image_url,
        status = ?verification.status,
        confidence = verification.confidence,
        "image verified"
    );
    ok_with(
        200,
        &verification,
        serde_json::json!({ "degraded": degraded, "report_updated": report_updated }),
    )
}
