use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::dom::{self, Document};
use crate::geo::GeoUri;
use crate::itinerary::{FieldManager, Trip, TravelForm, TripRecord};
use crate::places::{PlaceError, PlaceList, ReverseGeocode};
use crate::validation::{self, PostForm, ValidationReport};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<PlaceError> for ApiError {
    fn from(e: PlaceError) -> Self {
        let status = match &e {
            PlaceError::NoInput => StatusCode::BAD_REQUEST,
            PlaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            PlaceError::Offline(_) => StatusCode::SERVICE_UNAVAILABLE,
            PlaceError::Network(_) | PlaceError::InvalidResponse(_) | PlaceError::Service { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };
        api_error(status, e.to_string())
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Run a blocking lookup off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, PlaceError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("lookup task failed: {}", e))),
    }
}

// ─── GET /geonames/{query} ───────────────────────────────────────

#[tracing::instrument(skip(state), level = "info")]
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> Result<Json<PlaceList>, ApiError> {
    let start = Instant::now();

    let lookup = Arc::clone(&state);
    let q = query.clone();
    let result = blocking(move || lookup.places.search_with_source(&q)).await;

    let (places, source) = match result {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(error = %e.1, "place search failed");
            return Err(e);
        }
    };

    tracing::info!(
        count = places.len(),
        %source,
        ms = elapsed_ms(start),
        "GET /geonames"
    );
    Ok(Json(PlaceList { geonames: places }))
}

// ─── GET /geocode ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub name: String,
    pub geo: String,
}

#[tracing::instrument(skip(state), level = "info")]
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let start = Instant::now();

    let point = GeoUri::new(params.lat, params.lon).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let lookup = Arc::clone(&state);
    let name = blocking(move || lookup.geocoder.nearby_place_name(point.lat, point.lon)).await?;

    tracing::info!(%name, ms = elapsed_ms(start), "GET /geocode");
    Ok(Json(GeocodeResponse {
        name,
        geo: point.to_string(),
    }))
}

// ─── POST /travel/form ───────────────────────────────────────────

/// Render the itinerary form pre-filled with `trips`. An empty list yields
/// one blank leg.
#[tracing::instrument(level = "info")]
pub async fn travel_form(Json(trips): Json<Vec<TripRecord>>) -> Html<String> {
    Html(render_travel_form(&trips))
}

pub fn render_travel_form(trips: &[TripRecord]) -> String {
    let mut doc = Document::new();
    let mut manager = FieldManager::mount(&mut doc);
    manager.bootstrap(&mut doc, Some(trips));
    dom::to_html(&doc, manager.container())
}

// ─── POST /travel ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TravelResponse {
    pub trips: Vec<Trip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
}

#[tracing::instrument(skip(state, body), level = "info")]
pub async fn submit_travel(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<TravelResponse>, ApiError> {
    let travel = TravelForm::parse(&body)
        .into_travel()
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let map_url = if state.maps_key.is_empty() {
        None
    } else {
        travel.map_url(&state.maps_key)
    };

    tracing::info!(trips = travel.trips.len(), "POST /travel");
    Ok(Json(TravelResponse {
        trips: travel.trips,
        map_url,
    }))
}

// ─── POST /validate ──────────────────────────────────────────────

#[tracing::instrument(skip(form), level = "info")]
pub async fn validate(Json(form): Json<PostForm>) -> Json<ValidationReport> {
    let report = ValidationReport::from(validation::validate_post(&form));
    if !report.valid {
        tracing::debug!(errors = report.errors.len(), "post form rejected");
    }
    Json(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_error_status() {
        assert_eq!(ApiError::from(PlaceError::NoInput).0, StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(PlaceError::Network("down".into())).0,
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(PlaceError::Offline("x".into())).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_render_blank_form() {
        let html = render_travel_form(&[]);
        assert!(html.starts_with(r#"<div id="travel_form">"#));
        assert!(html.contains(r#"id="form-id_0""#));
        assert!(!html.contains("form-id_1"));
    }

    #[test]
    fn test_render_prefilled_form() {
        let html = render_travel_form(&[
            TripRecord::new("geo:51.1784,-115.5708", "Banff, Alberta", "2024-06-01T09:00"),
            TripRecord::new("geo:49.2827,-123.1207", "Vancouver, BC", "2024-06-03T10:00"),
        ]);
        assert!(html.contains(r#"value="Banff, Alberta""#));
        assert!(html.contains(r#"value="geo:49.2827,-123.1207""#));
        assert!(html.contains(r#"onclick="remove_trip(1)""#));
    }
}
