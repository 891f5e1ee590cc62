//! Core types for the place-search subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One candidate place, as carried by `GET /geonames/<query>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub title: String,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub fn new(title: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            title: title.into(),
            lat,
            lng,
        }
    }

    /// Value written into the hidden `geo[]` field when this place is chosen.
    pub fn geo(&self) -> String {
        crate::geo::compose(self.lat, self.lng)
    }
}

/// Wire envelope of the suggestion endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceList {
    #[serde(default)]
    pub geonames: Vec<Place>,
}

/// Where a search result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceSource {
    Cache,
    Geonames,
    Endpoint,
}

impl fmt::Display for PlaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => write!(f, "Cache"),
            Self::Geonames => write!(f, "GeoNames"),
            Self::Endpoint => write!(f, "Endpoint"),
        }
    }
}

/// Place lookup errors.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    /// The service answered with its own error object (bad username, quota).
    #[error("Place service error {code}: {message}")]
    Service { code: i64, message: String },
    #[error("No place found near {lat},{lon}")]
    NotFound { lat: f64, lon: f64 },
    #[error("Empty place query")]
    NoInput,
    #[error("Offline: no cached result for '{0}'")]
    Offline(String),
}

/// Anything that can turn free text into candidate places.
pub trait PlaceSearch {
    fn search(&self, query: &str) -> Result<Vec<Place>, PlaceError>;

    /// Label for results this searcher fetched itself.
    fn source(&self) -> PlaceSource;
}

/// Coordinate to human-readable place name.
pub trait ReverseGeocode {
    fn nearby_place_name(&self, lat: f64, lon: f64) -> Result<String, PlaceError>;
}

impl<T: ReverseGeocode + ?Sized> ReverseGeocode for Box<T> {
    fn nearby_place_name(&self, lat: f64, lon: f64) -> Result<String, PlaceError> {
        (**self).nearby_place_name(lat, lon)
    }
}

impl<T: PlaceSearch + ?Sized> PlaceSearch for &T {
    fn search(&self, query: &str) -> Result<Vec<Place>, PlaceError> {
        (**self).search(query)
    }

    fn source(&self) -> PlaceSource {
        (**self).source()
    }
}

impl<T: PlaceSearch + ?Sized> PlaceSearch for Box<T> {
    fn search(&self, query: &str) -> Result<Vec<Place>, PlaceError> {
        (**self).search(query)
    }

    fn source(&self) -> PlaceSource {
        (**self).source()
    }
}
