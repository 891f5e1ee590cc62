//! `geo:` URIs as stored in the hidden coordinate field of a trip leg.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static WELL_FORMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^geo:-?\d+(\.\d+)?,-?\d+(\.\d+)?$").expect("static pattern")
});

/// A coordinate pair in the `geo:<lat>,<lon>` form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoUri {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoParseError {
    #[error("Invalid geo format: {0}. Expected format: geo:latitude,longitude")]
    Format(String),
    #[error("Coordinates out of range: {lat},{lon} (lat -90..90, lon -180..180)")]
    OutOfRange { lat: f64, lon: f64 },
}

impl GeoUri {
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoParseError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(GeoParseError::OutOfRange { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// Strict textual check used by form validation. Rejects exponents,
    /// whitespace and anything `f64::from_str` would otherwise tolerate.
    pub fn is_well_formed(s: &str) -> bool {
        WELL_FORMED.is_match(s)
    }

    /// `lat,lon` without the scheme, as used in map URLs.
    pub fn pair(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

impl fmt::Display for GeoUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geo:{},{}", self.lat, self.lon)
    }
}

impl FromStr for GeoUri {
    type Err = GeoParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let body = raw
            .strip_prefix("geo:")
            .ok_or_else(|| GeoParseError::Format(raw.to_string()))?;
        // `;u=10`-style parameters carry no position.
        let coords = body.split(';').next().unwrap_or(body);
        let (lat, lon) = coords
            .split_once(',')
            .ok_or_else(|| GeoParseError::Format(raw.to_string()))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| GeoParseError::Format(raw.to_string()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| GeoParseError::Format(raw.to_string()))?;
        Self::new(lat, lon)
    }
}

/// Compose the hidden-field value for a suggestion. The numbers are written
/// as the place service returned them.
pub fn compose(lat: f64, lng: f64) -> String {
    format!("geo:{},{}", lat, lng)
}
