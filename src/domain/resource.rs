// src/domain/resource.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Shelter,
    Hospital,
    Food,
    Water,
    Medical,
    Evacuation,
    Other,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Shelter => "shelter",
            ResourceType::Hospital => "hospital",
            ResourceType::Food => "food",
            ResourceType::Water => "water",
            ResourceType::Medical => "medical",
            ResourceType::Evacuation => "evacuation",
            ResourceType::Other => "other",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shelter" => Ok(ResourceType::Shelter),
            "hospital" => Ok(ResourceType::Hospital),
            "food" => Ok(ResourceType::Food),
            "water" => Ok(ResourceType::Water),
            "medical" => Ok(ResourceType::Medical),
            "evacuation" => Ok(ResourceType::Evacuation),
            "other" => Ok(ResourceType::Other),
            other => Err(format!("unknown resource type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub disaster_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub location_name: Option<String>,
    pub location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}

/// A resource returned by a radius query.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyResource {
    #[serde(flatten)]
    pub resource: Resource,
    pub distance_meters: f64,
    pub distance_km: f64,
}

impl NearbyResource {
    pub fn new(resource: Resource, distance_meters: f64) -> Self {
        let distance_km = (distance_meters / 10.0).round() / 100.0;
        Self {
            resource,
            distance_meters,
            distance_km,
        }
    }
}
