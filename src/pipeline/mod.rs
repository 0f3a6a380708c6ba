// src/pipeline/mod.rs
//! Turns loosely specified location input into a name and/or point, then
//! persists the record. Adapter failures never fail a write here; they only
//! leave the location less complete.
mod disasters;
mod resources;

pub use disasters::{create_disaster, delete_disaster, update_disaster, DisasterPatch, NewDisaster};
pub use resources::{create_resource, NewResource};

use crate::domain::{GeoPoint, Outcome};
use crate::state::AppState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedLocation {
    pub location_name: Option<String>,
    pub location: Option<GeoPoint>,
}

/// Blank strings count as not supplied.
pub(crate) fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Explicit name wins, explicit coordinates skip the adapters entirely,
/// otherwise the name is extracted from `free_text`. Whatever name results
/// is geocoded.
pub(crate) fn derive_location(
    state: &AppState,
    explicit_name: Option<&str>,
    coordinates: Option<GeoPoint>,
    free_text: Option<&str>,
) -> DerivedLocation {
    let explicit = non_blank(explicit_name).map(str::to_string);

    if coordinates.is_some() {
        return DerivedLocation {
            location_name: explicit,
            location: coordinates,
        };
    }

    let location_name = match explicit {
        Some(name) => Some(name),
        None => match non_blank(free_text) {
            Some(text) => {
                let extracted = state.extractor.extract(text);
                if let Outcome::Degraded { reason, .. } = &extracted {
                    tracing::info!(reason = %reason, "extraction degraded, continuing without a name");
                }
                extracted.into_value()
            }
            None => None,
        },
    };

    let location = location_name
        .as_deref()
        .and_then(|name| state.geocoder.geocode(name).into_value())
        .map(|g| g.point());

    DerivedLocation {
        location_name,
        location,
    }
}
