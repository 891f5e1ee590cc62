//! Server-side handling of a submitted itinerary.
//!
//! The form posts three parallel arrays (`geo[]`, `location[]`, `date[]`)
//! aligned by position. This module turns them into validated trips and
//! builds the static route map URL for a post.

use super::types::{TripRecord, DATE_FIELD, GEO_FIELD, LOCATION_FIELD};
use crate::geo::{GeoParseError, GeoUri};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

const STATIC_MAP_BASE: &str = "https://maps.googleapis.com/maps/api/staticmap";

#[derive(Debug, thiserror::Error)]
pub enum TravelError {
    #[error("Missing required dates for locations: {}", ordinals(.0))]
    MissingDates(Vec<usize>),
    #[error("Invalid date '{value}' for location {}", ordinal(.position))]
    InvalidDate { position: usize, value: String },
    #[error("Invalid coordinates for location {}: {source}", ordinal(.position))]
    InvalidCoordinate {
        position: usize,
        #[source]
        source: GeoParseError,
    },
}

fn ordinal(position: &usize) -> usize {
    position + 1
}

fn ordinals(positions: &[usize]) -> String {
    positions
        .iter()
        .map(|p| ordinal(p).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One validated leg of a submitted itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    /// `geo:<lat>,<lon>` exactly as submitted.
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    pub date: NaiveDateTime,
    #[serde(skip)]
    pub point: GeoUri,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Travel {
    pub trips: Vec<Trip>,
}

/// Parse a local date-time as sent by a `datetime-local` input. A bare date
/// means midnight.
pub fn parse_local_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// The three arrays as they arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelForm {
    pub geo: Vec<String>,
    pub location: Vec<String>,
    pub date: Vec<String>,
}

impl TravelForm {
    /// Decode an `application/x-www-form-urlencoded` body. Other fields are
    /// ignored.
    pub fn parse(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                GEO_FIELD => form.geo.push(value.into_owned()),
                LOCATION_FIELD => form.location.push(value.into_owned()),
                DATE_FIELD => form.date.push(value.into_owned()),
                _ => {}
            }
        }
        form
    }

    /// Rows aligned by position. None when the arrays disagree in length.
    pub fn records(&self) -> Option<Vec<TripRecord>> {
        if self.geo.len() != self.location.len() || self.geo.len() != self.date.len() {
            return None;
        }
        Some(
            self.geo
                .iter()
                .zip(&self.location)
                .zip(&self.date)
                .map(|((g, l), d)| TripRecord::new(g.trim(), l.trim(), d.trim()))
                .collect(),
        )
    }

    /// Validate into a `Travel`.
    ///
    /// Mismatched arrays yield an empty itinerary rather than an error; the
    /// page may legitimately post a partial form when a leg group was removed
    /// mid-edit. Rows with every value blank are skipped.
    pub fn into_travel(self) -> Result<Travel, TravelError> {
        let Some(records) = self.records() else {
            tracing::warn!(
                geo = self.geo.len(),
                location = self.location.len(),
                date = self.date.len(),
                "travel arrays differ in length; ignoring travel"
            );
            return Ok(Travel::default());
        };

        let rows: Vec<(usize, TripRecord)> = records
            .into_iter()
            .enumerate()
            .filter(|(_, r)| !r.is_blank())
            .collect();

        let missing: Vec<usize> = rows
            .iter()
            .filter(|(_, r)| r.date.is_empty())
            .map(|(i, _)| *i)
            .collect();
        if !missing.is_empty() {
            return Err(TravelError::MissingDates(missing));
        }

        let mut trips = Vec::with_capacity(rows.len());
        for (position, record) in rows {
            let point: GeoUri = record
                .location
                .parse()
                .map_err(|source| TravelError::InvalidCoordinate { position, source })?;
            let date = parse_local_datetime(&record.date).ok_or_else(|| TravelError::InvalidDate {
                position,
                value: record.date.clone(),
            })?;
            trips.push(Trip {
                location: record.location,
                location_name: Some(record.location_name).filter(|s| !s.is_empty()),
                date,
                point,
            });
        }
        Ok(Travel { trips })
    }
}

impl Travel {
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Static map with a green marker per stop and a green route through
    /// them. None when there are no stops.
    pub fn map_url(&self, api_key: &str) -> Option<String> {
        if self.trips.is_empty() {
            return None;
        }
        let points: Vec<String> = self.trips.iter().map(|t| t.point.pair()).collect();
        let points = points.join("|");
        Some(format!(
            "{}?markers=color:green|{}&path=color:green|weight:5|{}&size=500x500&maptype=roadmap&key={}",
            STATIC_MAP_BASE, points, points, api_key
        ))
    }

    /// Back to the persisted shape, dates in `datetime-local` form.
    pub fn to_records(&self) -> Vec<TripRecord> {
        self.trips
            .iter()
            .map(|t| TripRecord {
                location: t.location.clone(),
                location_name: t.location_name.clone().unwrap_or_default(),
                date: t.date.format("%Y-%m-%dT%H:%M").to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn own(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn form(geo: &[&str], location: &[&str], date: &[&str]) -> TravelForm {
        TravelForm {
            geo: own(geo),
            location: own(location),
            date: own(date),
        }
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_single_location() {
        let travel = form(&["geo:45.5231,-122.6765"], &["Portland, OR"], &["2024-03-01"])
            .into_travel()
            .unwrap();
        assert_eq!(travel.trips.len(), 1);
        assert_eq!(travel.trips[0].location, "geo:45.5231,-122.6765");
        assert_eq!(travel.trips[0].location_name.as_deref(), Some("Portland, OR"));
        assert_eq!(travel.trips[0].date, midnight(2024, 3, 1));
    }

    #[test]
    fn test_multiple_locations_and_map_url() {
        let travel = form(
            &["geo:45.5231,-122.6765", "geo:47.6062,-122.3321"],
            &["Portland, OR", "Seattle, WA"],
            &["2024-03-01T08:30", "2024-03-02T10:00"],
        )
        .into_travel()
        .unwrap();
        assert_eq!(travel.trips.len(), 2);
        assert_eq!(travel.trips[1].location_name.as_deref(), Some("Seattle, WA"));

        let url = travel.map_url("KEY").unwrap();
        assert!(url.contains("markers=color:green|45.5231,-122.6765|47.6062,-122.3321"));
        assert!(url.contains("path=color:green|weight:5|45.5231,-122.6765"));
        assert!(url.contains("size=500x500"));
        assert!(url.contains("maptype=roadmap"));
        assert!(url.ends_with("key=KEY"));
    }

    #[test]
    fn test_missing_dates() {
        let err = form(
            &["geo:45.5231,-122.6765", "geo:47.6062,-122.3321"],
            &["Portland, OR", "Seattle, WA"],
            &["2024-03-01", ""],
        )
        .into_travel()
        .unwrap_err();
        assert!(matches!(&err, TravelError::MissingDates(p) if p == &vec![1]));
        assert!(err.to_string().starts_with("Missing required dates"));
    }

    #[test]
    fn test_empty_travel() {
        let travel = form(&[], &[], &[]).into_travel().unwrap();
        assert!(travel.is_empty());
        assert!(travel.map_url("KEY").is_none());
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let travel = form(&["", "geo:1,2"], &["", "X"], &["", "2024-01-01T00:00"])
            .into_travel()
            .unwrap();
        assert_eq!(travel.trips.len(), 1);
        assert_eq!(travel.trips[0].location, "geo:1,2");
    }

    #[test]
    fn test_mismatched_lengths_ignore_travel() {
        let travel = form(&["geo:45.5231,-122.6765"], &["Portland, OR"], &["2024-03-01", "2024-03-02"])
            .into_travel()
            .unwrap();
        assert!(travel.is_empty());
    }

    #[test]
    fn test_invalid_date() {
        let err = form(&["geo:45.5231,-122.6765"], &["Portland, OR"], &["not-a-date"])
            .into_travel()
            .unwrap_err();
        assert!(matches!(err, TravelError::InvalidDate { position: 0, .. }));
    }

    #[test]
    fn test_geo_parameters_are_accepted() {
        let travel = form(&["geo:35.6762,139.6503;u=10"], &["Tokyo, Japan"], &["2024-04-01T08:00"])
            .into_travel()
            .unwrap();
        assert_eq!(travel.trips[0].location, "geo:35.6762,139.6503;u=10");
        assert_eq!(travel.map_url("KEY").unwrap().matches("35.6762,139.6503").count(), 2);
    }

    #[test]
    fn test_invalid_coordinate() {
        let err = form(&[""], &["Portland, OR"], &["2024-03-01"]).into_travel().unwrap_err();
        assert!(matches!(err, TravelError::InvalidCoordinate { position: 0, .. }));
    }

    #[test]
    fn test_parse_urlencoded_body() {
        let body = b"title=Road+trip&geo%5B%5D=geo%3A1%2C2&location%5B%5D=Banff%2C+AB&date%5B%5D=2024-06-01T09%3A00\
&geo%5B%5D=&location%5B%5D=&date%5B%5D=";
        let parsed = TravelForm::parse(body);
        assert_eq!(parsed.geo, vec!["geo:1,2", ""]);
        assert_eq!(parsed.location, vec!["Banff, AB", ""]);
        assert_eq!(parsed.date, vec!["2024-06-01T09:00", ""]);

        let travel = parsed.into_travel().unwrap();
        assert_eq!(travel.to_records(), vec![TripRecord::new("geo:1,2", "Banff, AB", "2024-06-01T09:00")]);
    }

    #[test]
    fn test_datetime_formats() {
        assert!(parse_local_datetime("2024-01-01T00:00").is_some());
        assert!(parse_local_datetime("2024-01-01T00:00:30").is_some());
        assert!(parse_local_datetime("2024-01-01").is_some());
        assert!(parse_local_datetime("01/01/2024").is_none());
    }
}
