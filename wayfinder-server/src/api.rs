//! HTTP surface: `POST /route` and `GET /health`.

use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    error_handling::HandleErrorLayer,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower::{BoxError, ServiceBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use wayfinder_core::{
    RouteError, RouteRequest, RoutingConfig, TravelMode, WalkwayNetwork, compute_route,
    routing::RouteSummary,
};

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    network: Arc<WalkwayNetwork>,
    routing: Arc<RoutingConfig>,
}

impl AppState {
    pub fn new(network: WalkwayNetwork, routing: RoutingConfig) -> Self {
        Self {
            network: Arc::new(network),
            routing: Arc::new(routing),
        }
    }
}

/// Route query; coordinates are `[lon, lat]`.
#[derive(Debug, Deserialize)]
pub struct RouteBody {
    pub start: Option<[f64; 2]>,
    pub destination: Option<[f64; 2]>,
    pub profile: Option<TravelMode>,
    #[serde(default)]
    pub include_geojson: bool,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    #[serde(flatten)]
    pub summary: RouteSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// A failed route query rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(RouteError);

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RouteError::MissingDestination => StatusCode::BAD_REQUEST,
            RouteError::SnapFailure(_) | RouteError::ConnectorTooLong { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            RouteError::PathNotFound { .. } => StatusCode::NOT_FOUND,
            RouteError::MissingNetworkData => StatusCode::SERVICE_UNAVAILABLE,
            RouteError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Route request failed: {}", self.0);
        }
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/route", post(route_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .concurrency_limit(config.concurrency_limit.max(1)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn route_handler(
    State(state): State<AppState>,
    Json(body): Json<RouteBody>,
) -> Result<Json<RouteResponse>, ApiError> {
    let profile = body.profile.unwrap_or(state.routing.default_profile);
    let request = RouteRequest::new(body.start.map(coord), body.destination.map(coord), profile);

    let result = tokio::task::spawn_blocking(move || {
        compute_route(&state.network, &request, &state.routing)
    })
    .await
    .map_err(|e| RouteError::InternalError(format!("route task failed: {e}")))??;

    let geojson = if body.include_geojson {
        let collection = result
            .to_geojson()
            .map_err(|e| RouteError::InternalError(e.to_string()))?;
        Some(
            serde_json::to_value(collection)
                .map_err(|e| RouteError::InternalError(e.to_string()))?,
        )
    } else {
        None
    };

    let summary = result.summary();
    info!(
        "Route served: {:.1} m total, {:.0} s ({})",
        summary.total_length_m, summary.duration_s, summary.profile
    );
    Ok(Json(RouteResponse { summary, geojson }))
}

async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": if state.network.is_empty() { "no_network" } else { "ok" },
        "lines": state.network.len(),
        "segments": state.network.segment_count(),
    }))
}

async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorBody {
                error: "timeout",
                message: "route computation timed out".to_string(),
            }),
        )
            .into_response();
    }
    ApiError(RouteError::InternalError(err.to_string())).into_response()
}

fn coord([x, y]: [f64; 2]) -> Coord<f64> {
    Coord { x, y }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::Request,
    };
    use tower::ServiceExt;

    use super::*;

    const WALKWAYS: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "modes": ["walk", "bike"] },
            "geometry": {
                "type": "LineString",
                "coordinates": [[31.8055, 36.5985], [31.8066, 36.5985]]
            }
        }]
    }"#;

    fn app(network: WalkwayNetwork) -> Router {
        let config = ServerConfig::default();
        router(AppState::new(network, config.routing.clone()), &config)
    }

    fn venue() -> WalkwayNetwork {
        WalkwayNetwork::from_geojson_str(WALKWAYS).unwrap()
    }

    async fn post_route(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/route")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn route_returns_summary_and_geojson() {
        let (status, body) = post_route(
            app(venue()),
            json!({
                "start": [31.8056, 36.59852],
                "destination": [31.8065, 36.59852],
                "profile": "bike",
                "include_geojson": true
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile"], "bike");
        let main = body["main_length_m"].as_f64().unwrap();
        assert!((main - 80.0).abs() < 2.0, "main {main}");
        assert_eq!(body["geojson"]["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn failures_map_to_status_codes() {
        let (status, body) =
            post_route(app(venue()), json!({ "start": [31.8056, 36.59852] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing_destination");

        let (status, body) = post_route(
            app(venue()),
            json!({ "start": [31.8056, 36.59852], "destination": [31.8055, 36.6] }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "connector_too_long");

        let (status, body) = post_route(
            app(venue()),
            json!({
                "start": [31.8056, 36.59852],
                "destination": [31.8065, 36.59852],
                "profile": "shuttle"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "path_not_found");

        let (status, body) = post_route(
            app(WalkwayNetwork::default()),
            json!({ "start": [31.8056, 36.59852], "destination": [31.8065, 36.59852] }),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "missing_network_data");
    }

    #[tokio::test]
    async fn health_reports_network_size() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app(venue()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["lines"], 1);
        assert_eq!(body["segments"], 1);
    }
}
