pub mod disaster;
pub mod geo;
pub mod outcome;
pub mod report;
pub mod resource;
pub mod updates;

pub use disaster::{AuditAction, AuditEntry, Disaster, FieldChange};
pub use geo::{GeoPoint, GeocodeResult};
pub use outcome::Outcome;
pub use report::{Report, VerificationStatus};
pub use resource::{NearbyResource, Resource, ResourceType};
pub use updates::OfficialUpdate;
