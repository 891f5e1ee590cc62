//! Post editor form validation.
//!
//! Every check returns human-readable messages; an empty list means the form
//! may be submitted.

use crate::geo::GeoUri;
use crate::itinerary::{parse_local_datetime, TripRecord};
use serde::{Deserialize, Serialize};
use url::Url;

const ALLOWED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoUpload {
    pub name: String,
    /// MIME type reported by the browser.
    #[serde(rename = "type")]
    pub mime: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventForm {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub dt_start: String,
    #[serde(default)]
    pub dt_end: String,
    #[serde(default)]
    pub event_url: String,
}

/// Everything the post editor submits that can be checked client-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Comma-separated.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub in_reply_to: String,
    #[serde(default)]
    pub syndication: String,
    #[serde(default)]
    pub photos: Vec<PhotoUpload>,
    #[serde(default)]
    pub travel: Vec<TripRecord>,
    #[serde(default)]
    pub event: EventForm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl From<Vec<String>> for ValidationReport {
    fn from(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// True when any leg carries a coordinate.
pub fn has_travel(legs: &[TripRecord]) -> bool {
    legs.iter().any(|l| !l.location.trim().is_empty())
}

/// All-or-nothing per leg: a leg with any value needs all three.
pub fn validate_travel(legs: &[TripRecord]) -> Vec<String> {
    let mut errors = Vec::new();
    for (i, leg) in legs.iter().enumerate() {
        let has_geo = !leg.location.trim().is_empty();
        let has_location = !leg.location_name.trim().is_empty();
        let has_date = !leg.date.trim().is_empty();

        if !has_geo && !has_location && !has_date {
            continue;
        }
        if has_geo && has_location && has_date {
            continue;
        }

        let mut missing = Vec::new();
        if !has_geo {
            missing.push("coordinates");
        }
        if !has_location {
            missing.push("location name");
        }
        if !has_date {
            missing.push("date");
        }
        errors.push(format!("Location {} is missing: {}", i + 1, missing.join(", ")));
    }
    errors
}

pub fn validate_event(event: &EventForm) -> Vec<String> {
    let mut errors = Vec::new();
    let name = event.event_name.trim();
    let start = event.dt_start.trim();
    let end = event.dt_end.trim();
    let url = event.event_url.trim();

    if name.is_empty() && start.is_empty() && end.is_empty() && url.is_empty() {
        return errors;
    }

    if name.is_empty() || start.is_empty() {
        let mut missing = Vec::new();
        if name.is_empty() {
            missing.push("event name");
        }
        if start.is_empty() {
            missing.push("start time");
        }
        errors.push(format!("Event is missing: {}", missing.join(", ")));
    }

    if let (Some(s), Some(e)) = (parse_local_datetime(start), parse_local_datetime(end)) {
        if e < s {
            errors.push("Event end time must be after start time".to_string());
        }
    }
    errors
}

/// None when `value` is a usable http(s) URL.
pub fn check_url(value: &str) -> Option<String> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => None,
        Ok(_) => Some(format!("Invalid URL protocol: {} (must be http or https)", value)),
        Err(_) => Some(format!("Invalid URL format: {}", value)),
    }
}

pub fn validate_tags(tags: &str) -> Vec<String> {
    let tags = tags.trim();
    if tags.is_empty() {
        return Vec::new();
    }
    if tags.split(',').any(|t| t.trim().is_empty()) {
        return vec!["Empty tags are not allowed".to_string()];
    }
    Vec::new()
}

pub fn validate_post(form: &PostForm) -> Vec<String> {
    let mut errors = Vec::new();
    let title = form.title.trim();
    let content = form.content.trim();
    let travel = has_travel(&form.travel);

    if content.is_empty() && title.is_empty() {
        errors.push("Either content or title is required".to_string());
    } else if content.is_empty() && form.photos.is_empty() && !travel {
        errors.push("Title alone is not enough - add content, photos, or travel".to_string());
    }

    errors.extend(validate_event(&form.event));

    for photo in &form.photos {
        if !ALLOWED_PHOTO_TYPES.contains(&photo.mime.as_str()) {
            errors.push(format!(
                "Invalid file type for {}. Allowed types: JPEG, PNG, GIF, WEBP",
                photo.name
            ));
        }
    }

    errors.extend(validate_tags(&form.tags));

    for value in [&form.in_reply_to, &form.syndication, &form.event.event_url] {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if let Some(err) = check_url(value) {
            errors.push(err);
        }
    }

    for leg in &form.travel {
        if !leg.location.is_empty() && !GeoUri::is_well_formed(&leg.location) {
            errors.push(format!(
                "Invalid geo format: {}. Expected format: geo:latitude,longitude",
                leg.location
            ));
        }
    }

    errors.extend(validate_travel(&form.travel));
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(content: &str) -> PostForm {
        PostForm {
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_post() {
        assert_eq!(validate_post(&PostForm::default()), vec!["Either content or title is required"]);
    }

    #[test]
    fn test_title_alone() {
        let form = PostForm {
            title: "Hello".into(),
            ..Default::default()
        };
        assert_eq!(
            validate_post(&form),
            vec!["Title alone is not enough - add content, photos, or travel"]
        );

        let with_travel = PostForm {
            title: "Hello".into(),
            travel: vec![TripRecord::new("geo:1,2", "X", "2024-01-01T00:00")],
            ..Default::default()
        };
        assert!(validate_post(&with_travel).is_empty());
    }

    #[test]
    fn test_travel_all_or_nothing() {
        let legs = vec![
            TripRecord::new("", "", ""),
            TripRecord::new("geo:1,2", "", ""),
            TripRecord::new("geo:1,2", "X", "2024-01-01T00:00"),
            TripRecord::new("", "Banff", "2024-01-01T00:00"),
        ];
        assert_eq!(
            validate_travel(&legs),
            vec![
                "Location 2 is missing: location name, date",
                "Location 4 is missing: coordinates",
            ]
        );
    }

    #[test]
    fn test_event_rules() {
        assert!(validate_event(&EventForm::default()).is_empty());

        let missing = EventForm {
            event_url: "https://example.com".into(),
            ..Default::default()
        };
        assert_eq!(validate_event(&missing), vec!["Event is missing: event name, start time"]);

        let backwards = EventForm {
            event_name: "Meetup".into(),
            dt_start: "2024-05-02T18:00".into(),
            dt_end: "2024-05-01T18:00".into(),
            ..Default::default()
        };
        assert_eq!(validate_event(&backwards), vec!["Event end time must be after start time"]);
    }

    #[test]
    fn test_urls() {
        assert_eq!(check_url("https://example.com/post/1"), None);
        assert_eq!(
            check_url("ftp://example.com"),
            Some("Invalid URL protocol: ftp://example.com (must be http or https)".into())
        );
        assert_eq!(check_url("not a url"), Some("Invalid URL format: not a url".into()));

        let mut form = post("Reply");
        form.in_reply_to = "javascript:alert(1)".into();
        assert_eq!(validate_post(&form).len(), 1);
    }

    #[test]
    fn test_tags() {
        assert!(validate_tags("rust, travel").is_empty());
        assert!(validate_tags("").is_empty());
        assert_eq!(validate_tags("rust,,travel"), vec!["Empty tags are not allowed"]);
    }

    #[test]
    fn test_photos() {
        let mut form = post("Pics");
        form.photos = vec![
            PhotoUpload { name: "a.jpg".into(), mime: "image/jpeg".into() },
            PhotoUpload { name: "b.tiff".into(), mime: "image/tiff".into() },
        ];
        assert_eq!(
            validate_post(&form),
            vec!["Invalid file type for b.tiff. Allowed types: JPEG, PNG, GIF, WEBP"]
        );
    }

    #[test]
    fn test_geo_format() {
        let mut form = post("Trip");
        form.travel = vec![TripRecord::new("geo:1e3,2", "X", "2024-01-01T00:00")];
        assert_eq!(
            validate_post(&form),
            vec!["Invalid geo format: geo:1e3,2. Expected format: geo:latitude,longitude"]
        );
    }

    #[test]
    fn test_report() {
        let report = ValidationReport::from(Vec::new());
        assert!(report.valid);
    }
}
