use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::response::{ok, AppError};
use crate::services::quiz_session::QuizView;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(current))
        .route("/start", post(start))
        .route("/answer", post(answer))
        .route("/reset", post(reset))
}

#[derive(Debug, Deserialize)]
struct AnswerRequest {
    option: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerResponse {
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    correct: Option<bool>,
    quiz: QuizView,
}

async fn current(State(state): State<AppState>) -> Response {
    ok(state.quiz().view()).into_response()
}

async fn start(State(state): State<AppState>) -> Result<Response, AppError> {
    let view = state.quiz().start()?;
    Ok(ok(view).into_response())
}

async fn answer(
    State(state): State<AppState>,
    Json(body): Json<AnswerRequest>,
) -> Result<Response, AppError> {
    let quiz = state.quiz();
    let answered = quiz.answer(&body.option)?;
    Ok(ok(AnswerResponse {
        accepted: answered.is_some(),
        correct: answered.map(|a| a.correct),
        quiz: quiz.view(),
    })
    .into_response())
}

async fn reset(State(state): State<AppState>) -> Response {
    let quiz = state.quiz();
    quiz.reset();
    ok(quiz.view()).into_response()
}
