use axum::{
    body::Bytes,
    extract::{Query, Request, State},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::any,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::task::TaskTracker;
use tower_http::trace::TraceLayer;

use crate::{
    cache::{weather_cache_key, CachedResponse, ResponseCache},
    config::Config,
    response::ResponseBuilder,
    upstream::{geo::GeoClient, weather::WeatherClient},
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub geo_client: Arc<GeoClient>,
    pub weather_client: Arc<WeatherClient>,
    pub cache: Arc<dyn ResponseCache>,
    pub responses: ResponseBuilder,
    pub store_tasks: TaskTracker,
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub q: Option<String>,
}

pub async fn get_location(State(state): State<AppState>) -> Response {
    match state.geo_client.lookup().await {
        Ok(data) => {
            let body = json!({
                "latitude": data.get("latitude").cloned().unwrap_or(Value::Null),
                "longitude": data.get("longitude").cloned().unwrap_or(Value::Null),
            });
            state.responses.json(StatusCode::OK, &body)
        }
        Err(e) => {
            tracing::error!("Location lookup failed: {}", e);
            state
                .responses
                .error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get location")
        }
    }
}

pub async fn get_weather(
    State(state): State<AppState>,
    params: Option<Query<WeatherQuery>>,
) -> Response {
    let q = match params {
        Some(Query(WeatherQuery { q: Some(q) })) if !q.is_empty() => q,
        _ => {
            return state
                .responses
                .error(StatusCode::BAD_REQUEST, "Missing query param 'q'");
        }
    };

    let cache_key = weather_cache_key(&q);

    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for {}", cache_key);
        let status = StatusCode::from_u16(cached.status).unwrap_or(StatusCode::OK);
        return state.responses.cacheable_json_bytes(status, cached.body);
    }

    tracing::debug!("Cache miss for {}", cache_key);
    let forecast = match state.weather_client.fetch_forecast(&q).await {
        Ok(forecast) => forecast,
        Err(e) => {
            // Failures are never cached.
            tracing::error!("Forecast fetch failed: {}", e);
            return state
                .responses
                .error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get weather");
        }
    };

    let status = if forecast.ok {
        StatusCode::OK
    } else {
        StatusCode::from_u16(forecast.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    };
    let body = Bytes::from(forecast.payload.to_string());

    // The store must not delay the response; the tracker keeps it alive
    // until it lands, and shutdown drains the tracker.
    let entry = CachedResponse {
        status: status.as_u16(),
        body: body.clone(),
    };
    let cache = Arc::clone(&state.cache);
    let ttl = Duration::from_secs(state.config.cache_ttl_secs);
    state.store_tasks.spawn(async move {
        cache.put(cache_key, entry, ttl).await;
    });

    state.responses.cacheable_json_bytes(status, body)
}

async fn not_found(State(state): State<AppState>) -> Response {
    state.responses.not_found()
}

// Answers CORS preflight for any path before routing happens.
async fn preflight(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return state.responses.preflight();
    }
    next.run(request).await
}

// Create the router. Dispatch is by path; the only method distinction is
// the preflight middleware in front of it.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/location", any(get_location))
        .route("/weather", any(get_weather))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), preflight))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
