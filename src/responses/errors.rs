use astra::{Body, Response};
use serde_json::json;

use crate::errors::ServerError;
use crate::responses::json::json_response;

/// Convert a ServerError into the JSON error envelope. Server-side detail
/// is logged here and never sent.
pub fn error_to_response(err: ServerError) -> Response {
    match &err {
        ServerError::DbError(detail) => tracing::error!(detail = %detail, "database error"),
        ServerError::InternalError => tracing::error!("internal error"),
        other => tracing::debug!(error = %other, "request rejected"),
    }

    let status = err.status();
    let body = json!({ "success": false, "error": err.public_message() });
    json_response(status, &body).unwrap_or_else(|_| {
        let mut resp = Response::new(Body::from(body.to_string()));
        if let Ok(code) = http::StatusCode::from_u16(status) {
            *resp.status_mut() = code;
        }
        resp
    })
}
