//! Multi-leg travel itinerary: the form manager that builds and re-indexes
//! leg groups, and the parser for what that form submits.

pub mod manager;
pub mod travel;
pub mod types;

pub use manager::FieldManager;
pub use travel::{parse_local_datetime, Travel, TravelError, TravelForm, Trip};
pub use types::{TripLeg, TripRecord};
