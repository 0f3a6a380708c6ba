// errors.rs
use astra::Response;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, validation, authorization) or downstream layers (DB).
///
/// Adapter failures (geocoding, model calls, scraping) never become a
/// `ServerError`; they are resolved to a fallback inside the adapter.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Too Many Requests")]
    TooManyRequests,
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound(_) => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Forbidden(_) => 403,
            ServerError::TooManyRequests => 429,
            ServerError::DbError(_) | ServerError::InternalError => 500,
        }
    }

    /// Message safe to show a client. Internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::NotFound(msg)
            | ServerError::BadRequest(msg)
            | ServerError::Forbidden(msg) => msg.clone(),
            ServerError::TooManyRequests => "Too many requests, please try again later".into(),
            ServerError::DbError(_) | ServerError::InternalError => "Internal server error".into(),
        }
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::DbError(e.to_string())
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
