mod handlers;
mod state;

pub use handlers::render_travel_form;
pub use state::{AppState, GeocodeBackend, SearchBackend};

use anyhow::Context;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/geonames/{query}", get(handlers::suggestions))
        .route("/geocode", get(handlers::geocode))
        .route("/travel/form", post(handlers::travel_form))
        .route("/travel", post(handlers::submit_travel))
        .route("/validate", post(handlers::validate))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let app = build_router(Arc::new(state));
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind to {}", addr))?;

    tracing::info!("legwork listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
