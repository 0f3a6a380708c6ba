pub mod errors;
pub mod json;
pub mod sse;

pub use errors::error_to_response;
pub use json::{created, ok, ok_with, preflight};
pub use sse::event_stream;

pub use crate::errors::ResultResp;
