//! Leg data and the form naming contract shared with the server-side parser.

use serde::{Deserialize, Serialize};

/// Id of the element that holds the leg groups.
pub const TRAVEL_FORM_ID: &str = "travel_form";
/// Class carried by every leg group.
pub const LEG_CLASS: &str = "form-id";

pub const GEO_FIELD: &str = "geo[]";
pub const LOCATION_FIELD: &str = "location[]";
pub const DATE_FIELD: &str = "date[]";

pub fn leg_id(index: usize) -> String {
    format!("form-id_{}", index)
}

pub fn geo_id(index: usize) -> String {
    format!("geo_{}", index)
}

pub fn datetime_id(index: usize) -> String {
    format!("datetime_{}", index)
}

pub fn origin_id(index: usize) -> String {
    format!("origin_{}", index)
}

pub fn remove_handler(index: usize) -> String {
    format!("remove_trip({})", index)
}

/// Parse the index out of a `remove_trip(<n>)` handler.
pub fn parse_remove_handler(handler: &str) -> Option<usize> {
    handler
        .trim()
        .strip_prefix("remove_trip(")?
        .strip_suffix(')')?
        .trim()
        .parse()
        .ok()
}

/// A trip as persisted with a post and handed back when the post is edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    /// `geo:<lat>,<lon>` or empty.
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub location_name: String,
    /// Local date-time, `YYYY-MM-DDTHH:MM`.
    #[serde(default)]
    pub date: String,
}

impl TripRecord {
    pub fn new(location: &str, location_name: &str, date: &str) -> Self {
        Self {
            location: location.to_string(),
            location_name: location_name.to_string(),
            date: date.to_string(),
        }
    }

    /// True when no field carries anything; such records produce no leg.
    pub fn is_blank(&self) -> bool {
        self.location.is_empty() && self.location_name.is_empty() && self.date.is_empty()
    }
}

/// Snapshot of one leg group as currently shown in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripLeg {
    pub index: usize,
    pub coordinate: String,
    pub location_name: String,
    pub departure_time: String,
}

impl TripLeg {
    /// All three values blank after trimming: no travel intended.
    pub fn is_empty(&self) -> bool {
        self.coordinate.trim().is_empty()
            && self.location_name.trim().is_empty()
            && self.departure_time.trim().is_empty()
    }
}
