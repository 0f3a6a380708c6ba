// src/handlers/resources.rs
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::resources as store;
use crate::domain::ResourceType;
use crate::errors::ServerError;
use crate::handlers::disasters::{query_point, query_radius};
use crate::handlers::Ctx;
use crate::pipeline::{self, NewResource};
use crate::responses::{ok_with, ResultResp};

#[derive(Debug, Default, Deserialize)]
pub struct ResourceBody {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub location_name: Option<String>,
    pub lat: Option<Value>,
    pub lng: Option<Value>,
}

fn type_filter(ctx: &Ctx) -> Result<Option<ResourceType>, ServerError> {
    ctx.param("type")
        .map(|t| t.parse().map_err(ServerError::BadRequest))
        .transpose()
}

/// With `lat`/`lng`: resources within `radius` of that point, closest
/// first. Without: every resource of the disaster, newest first.
pub fn list(ctx: &Ctx, disaster_id: &str) -> ResultResp {
    let resource_type = type_filter(ctx)?;

    if let Some(center) = query_point(ctx)? {
        let radius = query_radius(ctx)?;
        let mut nearby = ctx
            .state
            .db
            .with_conn(|conn| store::nearby_resources(conn, disaster_id, center, radius))?;
        if let Some(t) = resource_type {
            nearby.retain(|r| r.resource.resource_type == t);
        }

        return ok_with(
            200,
            &nearby,
            json!({
                "count": nearby.len(),
                "query_params": {
                    "lat": center.lat,
                    "lng": center.lng,
                    "radius": radius,
                    "type": resource_type,
                },
            }),
        );
    }

    let data = ctx
        .state
        .db
        .with_conn(|conn| store::list_resources(conn, disaster_id, resource_type))?;
    ok_with(200, &data, json!({ "count": data.len() }))
}

pub fn create(ctx: &Ctx, disaster_id: &str, body: ResourceBody) -> ResultResp {
    let input = NewResource {
        name: body.name,
        resource_type: body.resource_type,
        location_name: body.location_name,
        lat: body.lat,
        lng: body.lng,
    };
    let resource = pipeline::create_resource(ctx.state, disaster_id, input)?;
    let message = format!("Resource \"{}\" mapped successfully", resource.name);
    ok_with(201, &resource, json!({ "message": message }))
}

pub fn delete(ctx: &Ctx, disaster_id: &str, resource_id: &str) -> ResultResp {
    let removed = ctx
        .state
        .db
        .with_conn(|conn| store::delete_resource(conn, disaster_id, resource_id))?
        .ok_or_else(|| ServerError::NotFound("Resource not found".into()))?;

    tracing::info!(resource_id, disaster_id, "resource deleted");
    ok_with(
        200,
        &removed,
        json!({ "message": "Resource deleted successfully" }),
    )
}
