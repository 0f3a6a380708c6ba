// src/pipeline/resources.rs
use chrono::Utc;
use serde_json::Value;

use crate::db::{disasters, resources as store};
use crate::domain::{GeoPoint, Resource, ResourceType};
use crate::errors::ServerError;
use crate::pipeline::{derive_location, non_blank};
use crate::state::AppState;

/// Raw resource input. Coordinates arrive as JSON numbers or numeric strings.
#[derive(Debug, Clone, Default)]
pub struct NewResource {
    pub name: Option<String>,
    pub resource_type: Option<String>,
    pub location_name: Option<String>,
    pub lat: Option<Value>,
    pub lng: Option<Value>,
}

fn coordinate(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_absent(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

/// `None` when neither coordinate is given. One without the other, a
/// non-numeric value or an out-of-range value is a 400.
pub fn parse_coordinates(lat: Option<&Value>, lng: Option<&Value>) -> Result<Option<GeoPoint>, ServerError> {
    match (is_absent(lat), is_absent(lng)) {
        (true, true) => return Ok(None),
        (false, false) => {}
        _ => {
            return Err(ServerError::BadRequest(
                "lat and lng must be provided together".into(),
            ))
        }
    }

    lat.and_then(coordinate)
        .zip(lng.and_then(coordinate))
        .and_then(|(lat, lng)| GeoPoint::new(lat, lng))
        .map(Some)
        .ok_or_else(|| ServerError::BadRequest("Invalid coordinates provided".into()))
}

/// Location is required for a resource: coordinates, a name that
/// geocodes or not, or a place the model can read out of the resource name.
pub fn create_resource(
    state: &AppState,
    disaster_id: &str,
    input: NewResource,
) -> Result<Resource, ServerError> {
    let (name, raw_type) = match (
        non_blank(input.name.as_deref()),
        non_blank(input.resource_type.as_deref()),
    ) {
        (Some(n), Some(t)) => (n.to_string(), t),
        _ => return Err(ServerError::BadRequest("Name and type are required".into())),
    };
    let resource_type: ResourceType = raw_type.parse().map_err(ServerError::BadRequest)?;

    if !state
        .db
        .with_conn(|conn| disasters::disaster_exists(conn, disaster_id))?
    {
        return Err(ServerError::NotFound("Disaster not found".into()));
    }

    let coordinates = parse_coordinates(input.lat.as_ref(), input.lng.as_ref())?;
    let derived = derive_location(
        state,
        input.location_name.as_deref(),
        coordinates,
        Some(&format!("name: {name}")),
    );

    if derived.location_name.is_none() && derived.location.is_none() {
        return Err(ServerError::BadRequest(
            "Please provide either coordinates or a location name".into(),
        ));
    }

    let resource = Resource {
        id: uuid::Uuid::new_v4().to_string(),
        disaster_id: disaster_id.to_string(),
        name,
        resource_type,
        location_name: derived.location_name,
        location: derived.location,
        created_at: Utc::now(),
    };
    state.db.with_conn(|conn| store::insert_resource(conn, &resource))?;

    tracing::info!(
        id = %resource.id,
        disaster_id,
        kind = %resource.resource_type,
        located = resource.location.is_some(),
        "resource mapped"
    );
    Ok(resource)
}
