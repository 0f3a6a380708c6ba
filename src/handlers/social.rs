// src/handlers/social.rs
use chrono::Utc;
use serde_json::json;

use crate::handlers::Ctx;
use crate::responses::{ok_with, ResultResp};
use crate::social;

pub fn feed(ctx: &Ctx, disaster_id: &str) -> ResultResp {
    let limit = ctx.limit(10)?;
    let (feed, cached) = social::feed_for(
        &ctx.state.cache,
        disaster_id,
        ctx.param("keywords"),
        ctx.param("priority"),
        limit,
    );

    ok_with(
        200,
        &feed.posts,
        json!({ "cached": cached, "last_updated": feed.last_updated }),
    )
}

pub fn mock_feed(ctx: &Ctx) -> ResultResp {
    let urgent_only = ctx.param("urgent_only") == Some("true");
    let posts = social::raw_feed(ctx.param("keywords"), urgent_only);
    ok_with(
        200,
        &posts,
        json!({ "source": "mock_api", "timestamp": Utc::now() }),
    )
}
