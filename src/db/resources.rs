// src/db/resources.rs
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::domain::{GeoPoint, NearbyResource, Resource, ResourceType};
use crate::errors::ServerError;

const RESOURCE_COLUMNS: &str = "id, disaster_id, name, type, location_name, lat, lng, created_at";

fn row_to_resource(row: &Row<'_>) -> rusqlite::Result<Resource> {
    let raw_type: String = row.get(3)?;
    let resource_type = raw_type.parse::<ResourceType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into())
    })?;

    Ok(Resource {
        id: row.get(0)?,
        disaster_id: row.get(1)?,
        name: row.get(2)?,
        resource_type,
        location_name: row.get(4)?,
        location: GeoPoint::from_columns(row.get(5)?, row.get(6)?),
        created_at: row.get(7)?,
    })
}

pub fn insert_resource(conn: &Connection, r: &Resource) -> Result<(), ServerError> {
    conn.execute(
        r#"
        insert into resources (id, disaster_id, name, type, location_name, lat, lng, created_at)
        values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            r.id,
            r.disaster_id,
            r.name,
            r.resource_type.as_str(),
            r.location_name,
            r.location.map(|p| p.lat),
            r.location.map(|p| p.lng),
            r.created_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert resource failed: {e}")))?;
    Ok(())
}

/// Newest first, optionally restricted to one type.
pub fn list_resources(
    conn: &Connection,
    disaster_id: &str,
    resource_type: Option<ResourceType>,
) -> Result<Vec<Resource>, ServerError> {
    let mut sql = format!("select {RESOURCE_COLUMNS} from resources where disaster_id = ?");
    let mut args = vec![SqlValue::Text(disaster_id.to_string())];
    if let Some(t) = resource_type {
        sql.push_str(" and type = ?");
        args.push(SqlValue::Text(t.as_str().to_string()));
    }
    sql.push_str(" order by created_at desc");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(args), row_to_resource)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

/// The store's `get_nearby_resources`: a disaster's located resources within
/// `radius_meters` of `center`, closest first.
pub fn nearby_resources(
    conn: &Connection,
    disaster_id: &str,
    center: GeoPoint,
    radius_meters: f64,
) -> Result<Vec<NearbyResource>, ServerError> {
    let sql = format!(
        r#"
        select * from (
            select {RESOURCE_COLUMNS}, distance_meters(lat, lng, ?2, ?3) as distance
              from resources
             where disaster_id = ?1
        )
        where distance is not null and distance <= ?4
        order by distance asc
        "#
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![disaster_id, center.lat, center.lng, radius_meters],
            |row| {
                let resource = row_to_resource(row)?;
                let distance: f64 = row.get(8)?;
                Ok(NearbyResource::new(resource, distance))
            },
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

/// Deletes a resource scoped to its disaster, returning the removed row.
pub fn delete_resource(
    conn: &Connection,
    disaster_id: &str,
    resource_id: &str,
) -> Result<Option<Resource>, ServerError> {
    let existing = conn
        .query_row(
            &format!("select {RESOURCE_COLUMNS} from resources where id = ? and disaster_id = ?"),
            params![resource_id, disaster_id],
            row_to_resource,
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select resource failed: {e}")))?;

    if existing.is_some() {
        conn.execute(
            "delete from resources where id = ? and disaster_id = ?",
            params![resource_id, disaster_id],
        )
        .map_err(|e| ServerError::DbError(format!("delete resource failed: {e}")))?;
    }
    Ok(existing)
}
