// src/handlers/geocode.rs
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::errors::ServerError;
use crate::handlers::Ctx;
use crate::pipeline::non_blank;
use crate::responses::{ok, ResultResp};

#[derive(Debug, Default, Deserialize)]
pub struct GeocodeBody {
    pub description: Option<String>,
    pub location_name: Option<String>,
}

/// Stand-alone extract-then-geocode, nothing persisted.
pub fn geocode(ctx: &Ctx, body: GeocodeBody) -> ResultResp {
    let explicit = non_blank(body.location_name.as_deref());
    let description = non_blank(body.description.as_deref());

    let location_name = match (explicit, description) {
        (None, None) => {
            return Err(ServerError::BadRequest(
                "Either description or location_name is required".into(),
            ))
        }
        (Some(name), _) => Some(name.to_string()),
        (None, Some(text)) => ctx.state.extractor.extract(text).into_value(),
    };

    let Some(location_name) = location_name else {
        return ok(&json!({
            "location_name": null,
            "coordinates": null,
            "message": "No location found in description",
        }));
    };

    let result = ctx.state.geocoder.geocode(&location_name).into_value();
    tracing::debug!(%location_name, found = result.is_some(), "geocode request");

    ok(&json!({
        "location_name": location_name,
        "coordinates": result.as_ref().map(|g| json!({ "lat": g.lat, "lng": g.lng })),
        "formatted_address": result.as_ref().map(|g| g.formatted_address.clone()),
        "geocoded_at": Utc::now(),
    }))
}
