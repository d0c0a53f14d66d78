//! Router and request handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Reply sent when the request carries no usable question.
pub const EMPTY_QUESTION_REPLY: &str = "Please ask a question.";

/// Body of `POST /ask`
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

/// Response of `POST /ask`
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/ask", post(ask))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// GET / - chat page
async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// POST /ask - answer one question
///
/// The body is parsed leniently: a missing, null, blank or undecodable
/// question gets [`EMPTY_QUESTION_REPLY`] and never reaches the matcher.
async fn ask(State(state): State<Arc<AppState>>, body: Bytes) -> Json<AskResponse> {
    let question = serde_json::from_slice::<AskRequest>(&body)
        .ok()
        .and_then(|request| request.question)
        .filter(|question| !question.trim().is_empty());

    let Some(question) = question else {
        tracing::debug!("Rejected /ask request without a question");
        return Json(AskResponse {
            answer: EMPTY_QUESTION_REPLY.to_string(),
        });
    };

    let answer = state
        .matcher
        .answer(&question, state.delegate.as_ref())
        .await;

    tracing::debug!("Answered from {:?} (score {:.3})", answer.source, answer.score);

    Json(AskResponse {
        answer: answer.text,
    })
}
