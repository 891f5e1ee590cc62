//! Place providers: the GeoNames web service and the site's own
//! `/geonames/<query>` suggestion endpoint.

use super::types::{Place, PlaceError, PlaceList, PlaceSearch, PlaceSource, ReverseGeocode};
use serde::Deserialize;
use url::Url;

pub const GEONAMES_BASE_URL: &str = "http://api.geonames.org";
const USER_AGENT: &str = concat!("legwork/", env!("CARGO_PKG_VERSION"));
const NEARBY_RADIUS_KM: u32 = 15;

// ─── GeoNames ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GeonamesEnvelope {
    #[serde(default)]
    geonames: Vec<GeonamesRecord>,
    status: Option<GeonamesStatus>,
}

#[derive(Deserialize)]
struct GeonamesStatus {
    message: String,
    value: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeonamesRecord {
    name: String,
    lat: Coord,
    lng: Coord,
    #[serde(default)]
    admin_name1: Option<String>,
    #[serde(default)]
    admin_name2: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
}

/// GeoNames sends coordinates as strings; tolerate numbers too.
#[derive(Deserialize)]
#[serde(untagged)]
enum Coord {
    Number(f64),
    Text(String),
}

impl Coord {
    fn value(&self) -> Option<f64> {
        match self {
            Coord::Number(n) => Some(*n),
            Coord::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl GeonamesRecord {
    /// "Name, Admin1, Country" with empty or repeated parts dropped.
    fn title(&self) -> String {
        let mut parts: Vec<&str> = vec![self.name.as_str()];
        for extra in [&self.admin_name1, &self.country_name] {
            if let Some(s) = extra.as_deref() {
                let s = s.trim();
                if !s.is_empty() && !parts.contains(&s) {
                    parts.push(s);
                }
            }
        }
        parts.join(", ")
    }

    /// Reverse-geocode label: name plus the most specific admin level known.
    fn nearby_label(&self) -> String {
        let qualifier = [&self.admin_name2, &self.admin_name1, &self.country_name]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .map(str::trim)
            .find(|s| !s.is_empty());
        match qualifier {
            Some(q) => format!("{}, {}", self.name, q),
            None => self.name.clone(),
        }
    }

    fn to_place(&self) -> Option<Place> {
        Some(Place::new(self.title(), self.lat.value()?, self.lng.value()?))
    }
}

/// Client of the GeoNames web service.
#[derive(Debug, Clone)]
pub struct GeonamesClient {
    base_url: String,
    username: String,
    max_rows: usize,
}

impl GeonamesClient {
    pub fn new(base_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            max_rows: 10,
        }
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows.clamp(1, 1000);
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, PlaceError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PlaceError::Network(format!("bad base url '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| PlaceError::Network(format!("base url cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(path);
        Ok(url)
    }

    fn fetch(&self, url: Url) -> Result<GeonamesEnvelope, PlaceError> {
        let response = ureq::get(url.as_str())
            .set("User-Agent", USER_AGENT)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| PlaceError::Network(e.to_string()))?;

        let envelope: GeonamesEnvelope = response
            .into_json()
            .map_err(|e| PlaceError::InvalidResponse(e.to_string()))?;

        if let Some(status) = envelope.status {
            return Err(PlaceError::Service {
                code: status.value,
                message: status.message,
            });
        }
        Ok(envelope)
    }

    /// Full-text place search (`searchJSON`).
    pub fn search_places(&self, query: &str) -> Result<Vec<Place>, PlaceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PlaceError::NoInput);
        }

        let mut url = self.endpoint("searchJSON")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("maxRows", &self.max_rows.to_string())
            .append_pair("username", &self.username);

        let envelope = self.fetch(url)?;
        let places: Vec<Place> = envelope.geonames.iter().filter_map(|r| r.to_place()).collect();
        tracing::debug!(query, count = places.len(), "geonames search");
        Ok(places)
    }

    /// Reverse geocode a coordinate to a short human label
    /// (`findNearbyPlaceNameJSON`).
    pub fn nearby_place(&self, lat: f64, lon: f64) -> Result<String, PlaceError> {
        let mut url = self.endpoint("findNearbyPlaceNameJSON")?;
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lng", &lon.to_string())
            .append_pair("style", "Full")
            .append_pair("radius", &NEARBY_RADIUS_KM.to_string())
            .append_pair("username", &self.username);

        let envelope = self.fetch(url)?;
        envelope
            .geonames
            .first()
            .map(|r| r.nearby_label())
            .ok_or(PlaceError::NotFound { lat, lon })
    }
}

impl PlaceSearch for GeonamesClient {
    fn search(&self, query: &str) -> Result<Vec<Place>, PlaceError> {
        self.search_places(query)
    }

    fn source(&self) -> PlaceSource {
        PlaceSource::Geonames
    }
}

impl ReverseGeocode for GeonamesClient {
    fn nearby_place_name(&self, lat: f64, lon: f64) -> Result<String, PlaceError> {
        self.nearby_place(lat, lon)
    }
}

// ─── Site endpoint ───────────────────────────────────────────────

/// Client of `GET <base>/geonames/<query>`, the endpoint the location inputs
/// talk to.
#[derive(Debug, Clone)]
pub struct EndpointPlaces {
    base_url: String,
}

impl EndpointPlaces {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// The query becomes a single percent-encoded path segment.
    pub fn url_for(&self, query: &str) -> Result<Url, PlaceError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PlaceError::Network(format!("bad base url '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| PlaceError::Network(format!("base url cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .push("geonames")
            .push(query);
        Ok(url)
    }
}

impl PlaceSearch for EndpointPlaces {
    fn search(&self, query: &str) -> Result<Vec<Place>, PlaceError> {
        if query.is_empty() {
            return Err(PlaceError::NoInput);
        }
        let url = self.url_for(query)?;
        let response = ureq::get(url.as_str())
            .set("Accept", "application/json")
            .call()
            .map_err(|e| PlaceError::Network(e.to_string()))?;
        let list: PlaceList = response
            .into_json()
            .map_err(|e| PlaceError::InvalidResponse(e.to_string()))?;
        Ok(list.geonames)
    }

    fn source(&self) -> PlaceSource {
        PlaceSource::Endpoint
    }
}
