pub mod timetable;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use timetable_core::RequestError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with its middleware.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(timetable::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Errors that end a request before any calendar data is sent.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Could not fetch the timetable")]
    Upstream(#[source] reqwest::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Request(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Plain-text error body, one line.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Upstream(err) = &self {
            tracing::warn!(error = %err, "upstream fetch failed");
        }
        (self.status(), format!("{self}\n")).into_response()
    }
}
