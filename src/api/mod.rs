//! JSON-over-HTTP surface. Each feature keeps per-client state in a
//! `SessionStore`; nothing is persisted.

mod chat;
mod lessons;
mod quiz;
pub mod sessions;
mod tools;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::quiz::QuizError;
use crate::vocab::UnknownCategory;
use crate::AppContext;

pub(crate) type Ctx = Arc<AppContext>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("completion service is not configured")]
    Unavailable,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::UnknownCategory(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<UnknownCategory> for ApiError {
    fn from(e: UnknownCategory) -> Self {
        ApiError::UnknownCategory(e.0)
    }
}

impl From<QuizError> for ApiError {
    fn from(e: QuizError) -> Self {
        match e {
            QuizError::NotEnoughItems { .. } => {
                ApiError::BadRequest("Not enough items in this category for a quiz".into())
            }
            other => ApiError::Conflict(other.to_string()),
        }
    }
}

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(tools::health))
        .route("/api/categories", get(lessons::list_categories))
        .route("/api/categories/{name}", get(lessons::category_items))
        .route("/api/chat", post(chat::create))
        .route("/api/chat/{id}", get(chat::show))
        .route("/api/chat/{id}/messages", post(chat::send_message))
        .route("/api/chat/{id}/categories/{category}", post(chat::ask_category))
        .route("/api/translate", post(tools::translate))
        .route("/api/speak", post(tools::speak))
        .route("/api/flashcards", post(lessons::create_deck))
        .route("/api/flashcards/{id}", get(lessons::show_deck))
        .route("/api/flashcards/{id}/flip", post(lessons::flip))
        .route("/api/flashcards/{id}/next", post(lessons::next))
        .route("/api/flashcards/{id}/prev", post(lessons::prev))
        .route("/api/flashcards/{id}/reset", post(lessons::reset))
        .route("/api/flashcards/{id}/category", post(lessons::select_category))
        .route("/api/quiz", post(quiz::start))
        .route("/api/quiz/{id}", get(quiz::show))
        .route("/api/quiz/{id}/answer", post(quiz::answer))
        .route("/api/quiz/{id}/next", post(quiz::advance))
        .route("/api/quiz/{id}/restart", post(quiz::restart))
        .route("/api/quiz/{id}/category", post(quiz::choose_category))
        .route("/api/pronunciation", get(lessons::pronunciation))
        .route("/api/pronunciation/{id}", get(lessons::pronunciation_guide))
        .route("/api/metrics", get(tools::metrics))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
