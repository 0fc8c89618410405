use axum::{
    Router,
    extract::{ConnectInfo, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::domain::status::port::StatusService;

pub const HEALTHY: &str = "healthy";
pub const NO_CONTAINERS_RUNNING: &str = "No containers running";
pub const NOT_FOUND: &str = "Not Found";

#[derive(Clone)]
pub struct AppState<SS: StatusService> {
    pub status_service: Arc<SS>,
}

impl<SS: StatusService> AppState<SS> {
    pub fn new(status_service: SS) -> Self {
        Self {
            status_service: Arc::new(status_service),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

// Access log in the form `<peer> - "<METHOD> <URI>" <status>`
async fn log_request(request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    info!(
        "{peer} - \"{method} {uri}\" {}",
        response.status().as_u16()
    );
    response
}

async fn version<SS: StatusService>(State(state): State<AppState<SS>>) -> Response {
    let version = state.status_service.version().await;
    match serde_json::to_string_pretty(&version) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Error serializing version response: {e:?}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health<SS: StatusService>(State(state): State<AppState<SS>>) -> Response {
    if state.status_service.is_healthy().await {
        Json(HealthResponse {
            status: HEALTHY.to_string(),
        })
        .into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, NO_CONTAINERS_RUNNING).into_response()
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NOT_FOUND)
}

pub fn create_app<SS: StatusService>(state: AppState<SS>) -> Router {
    Router::new()
        .route("/version", get(version))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
