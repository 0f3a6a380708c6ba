// src/handlers/events.rs
use crate::handlers::Ctx;
use crate::responses::{event_stream, ResultResp};

/// Subscribes the caller to `disaster_updated` broadcasts. 429 once the
/// subscriber cap is reached.
pub fn stream(ctx: &Ctx) -> ResultResp {
    let subscription = ctx.state.notifier.subscribe()?;
    tracing::info!(user = %ctx.who.id, "stream client connected");
    event_stream(subscription)
}
