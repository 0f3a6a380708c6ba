// src/handlers/disasters.rs
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::db::disasters::{self as store, DisasterFilter};
use crate::domain::{Disaster, GeoPoint};
use crate::errors::ServerError;
use crate::handlers::Ctx;
use crate::pipeline::{self, DisasterPatch, NewDisaster};
use crate::responses::json::json_response;
use crate::responses::{created, ok, ok_with, ResultResp};

pub const DEFAULT_RADIUS_METERS: f64 = 10_000.0;
pub const OFFICIAL_UPDATES_TTL_MINUTES: i64 = 60;

#[derive(Debug, Default, Deserialize)]
pub struct DisasterBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location_name: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// `lat` and `lng` from the query, validated; `None` unless both are set.
pub(crate) fn query_point(ctx: &Ctx) -> Result<Option<GeoPoint>, ServerError> {
    let lat = ctx.param_parsed::<f64>("lat")?;
    let lng = ctx.param_parsed::<f64>("lng")?;
    match (lat, lng) {
        (Some(lat), Some(lng)) => GeoPoint::new(lat, lng)
            .map(Some)
            .ok_or_else(|| ServerError::BadRequest("Invalid coordinates provided".into())),
        (None, None) => Ok(None),
        _ => Err(ServerError::BadRequest(
            "lat and lng must be provided together".into(),
        )),
    }
}

pub(crate) fn query_radius(ctx: &Ctx) -> Result<f64, ServerError> {
    let radius = ctx.param_parsed::<f64>("radius")?.unwrap_or(DEFAULT_RADIUS_METERS);
    if !radius.is_finite() || radius < 0.0 {
        return Err(ServerError::BadRequest("radius must be a positive number".into()));
    }
    Ok(radius)
}

pub fn list(ctx: &Ctx) -> ResultResp {
    let near = match query_point(ctx)? {
        Some(p) => Some((p, query_radius(ctx)?)),
        None => None,
    };
    let filter = DisasterFilter {
        tag: ctx.param("tag").map(str::to_string),
        near,
    };

    let data = ctx
        .state
        .db
        .with_conn(|conn| store::list_disasters(conn, &filter))?;
    ok_with(200, &data, json!({ "count": data.len() }))
}

fn load(ctx: &Ctx, id: &str) -> Result<Disaster, ServerError> {
    ctx.state
        .db
        .with_conn(|conn| store::get_disaster(conn, id))?
        .ok_or_else(|| ServerError::NotFound("Disaster not found".into()))
}

pub fn get(ctx: &Ctx, id: &str) -> ResultResp {
    ok(&load(ctx, id)?)
}

pub fn create(ctx: &Ctx, body: DisasterBody) -> ResultResp {
    let input = NewDisaster {
        title: body.title,
        description: body.description,
        location_name: body.location_name,
        tags: body.tags,
    };
    let disaster = pipeline::create_disaster(ctx.state, &ctx.who, input)?;
    created(&disaster)
}

pub fn update(ctx: &Ctx, id: &str, body: DisasterBody) -> ResultResp {
    let patch = DisasterPatch {
        title: body.title,
        description: body.description,
        location_name: body.location_name,
        tags: body.tags,
    };
    let disaster = pipeline::update_disaster(ctx.state, &ctx.who, id, patch)?;
    ok(&disaster)
}

pub fn delete(ctx: &Ctx, id: &str) -> ResultResp {
    pipeline::delete_disaster(ctx.state, &ctx.who, id)?;
    json_response(
        200,
        &json!({ "success": true, "message": "Disaster deleted successfully" }),
    )
}

/// News from the official agencies relevant to one disaster.
pub fn official_updates(ctx: &Ctx, id: &str) -> ResultResp {
    let limit = ctx.limit(10)?;
    let requested_type = ctx.param("disasterType");
    let cache_key = format!(
        "official_updates_{id}_{limit}_{}",
        requested_type.unwrap_or("all")
    );

    if let Some(hit) = ctx.state.cache.get(&cache_key) {
        return ok_with(200, &hit, json!({ "cached": true, "cache_key": cache_key }));
    }

    let disaster = load(ctx, id)?;
    let disaster_type = requested_type.or_else(|| disaster.inferred_type());
    let outcome = match disaster_type {
        Some(t) => ctx.state.updates.fetch_by_type(t, limit),
        None => ctx.state.updates.fetch_all(limit),
    };
    let degraded = outcome.is_degraded();
    let updates = outcome.into_value();

    let mut sources: Vec<&str> = Vec::new();
    for u in &updates {
        if !sources.contains(&u.source.as_str()) {
            sources.push(&u.source);
        }
    }

    let data = json!({
        "disaster": {
            "id": disaster.id,
            "title": disaster.title,
            "location_name": disaster.location_name,
            "tags": disaster.tags,
        },
        "official_updates": updates,
        "total_updates": updates.len(),
        "sources": sources,
        "last_updated": Utc::now(),
        "degraded": degraded,
    });

    ctx.state
        .cache
        .set(&cache_key, &data, OFFICIAL_UPDATES_TTL_MINUTES);
    ok_with(
        200,
        &data,
        json!({
            "cached": false,
            "cache_key": cache_key,
            "cache_ttl_minutes": OFFICIAL_UPDATES_TTL_MINUTES,
        }),
    )
}
