use astra::{Body, ResponseBuilder};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::errors::{ResultResp, ServerError};

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, X-User-ID";

pub(crate) fn with_cors(builder: http::response::Builder) -> http::response::Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", ALLOW_METHODS)
        .header("Access-Control-Allow-Headers", ALLOW_HEADERS)
}

pub fn json_response(status: u16, body: &Value) -> ResultResp {
    with_cors(ResponseBuilder::new())
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .map_err(|e| {
            tracing::error!(error = %e, "failed to build response");
            ServerError::InternalError
        })
}

fn to_value<T: Serialize>(data: &T) -> Result<Value, ServerError> {
    serde_json::to_value(data).map_err(|e| {
        tracing::error!(error = %e, "response not serializable");
        ServerError::InternalError
    })
}

/// `{success: true, data, ...extra}`. `extra` must be a JSON object.
pub fn ok_with<T: Serialize>(status: u16, data: &T, extra: Value) -> ResultResp {
    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(true));
    body.insert("data".into(), to_value(data)?);
    if let Value::Object(fields) = extra {
        body.extend(fields);
    }
    json_response(status, &Value::Object(body))
}

pub fn ok<T: Serialize>(data: &T) -> ResultResp {
    ok_with(200, data, json!({}))
}

pub fn created<T: Serialize>(data: &T) -> ResultResp {
    ok_with(201, data, json!({}))
}

/// CORS preflight answer.
pub fn preflight() -> ResultResp {
    with_cors(ResponseBuilder::new())
        .status(204)
        .header("Access-Control-Max-Age", "86400")
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}
