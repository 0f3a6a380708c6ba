// src/handlers/mod.rs
pub mod disasters;
pub mod events;
pub mod geocode;
pub mod reports;
pub mod resources;
pub mod social;
pub mod verification;

use astra::Request;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::io::Read;

use crate::auth::Principal;
use crate::errors::ServerError;
use crate::state::AppState;

/// Request bodies above this are refused.
pub const MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Upper bound for any `?limit=`; larger values are clamped.
pub const MAX_LIMIT: usize = 100;

/// What every handler gets: shared state, the resolved caller and the
/// decoded query string.
pub struct Ctx<'a> {
    pub state: &'a AppState,
    pub who: Principal,
    pub query: HashMap<String, String>,
}

impl Ctx<'_> {
    /// Query value, `None` when absent or blank.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn param_parsed<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, ServerError> {
        self.param(name)
            .map(|v| {
                v.parse()
                    .map_err(|_| ServerError::BadRequest(format!("Invalid value for {name}: {v}")))
            })
            .transpose()
    }

    pub fn limit(&self, default: usize) -> Result<usize, ServerError> {
        Ok(self
            .param_parsed::<usize>("limit")?
            .unwrap_or(default)
            .min(MAX_LIMIT))
    }
}

pub fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Decode a JSON body. An empty body reads as `{}` so field validation
/// produces the error.
pub fn read_json<T: DeserializeOwned>(req: Request) -> Result<T, ServerError> {
    let mut body = req.into_body();
    let mut raw = Vec::new();
    body.reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("Could not read request body: {e}")))?;

    if raw.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("Request body too large".into()));
    }
    if raw.iter().all(u8::is_ascii_whitespace) {
        raw = b"{}".to_vec();
    }

    serde_json::from_slice(&raw)
        .map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {e}")))
}
