use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{create_url_handler, get_url_handler, health_handler, redirect_handler};
use crate::state::AppState;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Self::router_with_timeout(state, REQUEST_TIMEOUT)
    }

    pub fn router_with_timeout(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/url", post(create_url_handler))
            .route("/url/{code}", get(get_url_handler))
            .route("/{code}", get(redirect_handler))
            // trace outermost so timed-out requests still get a response event
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                request_timeout,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
