use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::{SavedWord, Word};
use crate::response::{ok, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    word: Option<String>,
}

#[derive(Serialize)]
struct SaveResponse {
    saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    word: Option<SavedWord>,
}

#[derive(Serialize)]
struct StatusResponse {
    saved: bool,
}

#[derive(Serialize)]
struct RemoveResponse {
    removed: bool,
}

pub async fn list(State(state): State<AppState>) -> Response {
    ok(state.words().snapshot()).into_response()
}

pub async fn save(
    State(state): State<AppState>,
    Json(word): Json<Word>,
) -> Result<Response, AppError> {
    if word.word.trim().is_empty() || word.meaning_kr.trim().is_empty() {
        return Err(AppError::validation("단어와 뜻이 필요해요"));
    }

    match state.words().add(word) {
        Some(saved) => {
            tracing::info!(word = %saved.spelling(), id = %saved.id, "word saved");
            let body = SaveResponse {
                saved: true,
                word: Some(saved),
            };
            Ok((StatusCode::CREATED, ok(body)).into_response())
        }
        None => Ok(ok(SaveResponse {
            saved: false,
            word: None,
        })
        .into_response()),
    }
}

pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Response, AppError> {
    let word = query.word.unwrap_or_default();
    if word.trim().is_empty() {
        return Err(AppError::validation("확인할 단어가 없어요"));
    }
    Ok(ok(StatusResponse {
        saved: state.words().contains(word.trim()),
    })
    .into_response())
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let words = state.words();
    let removed = words.get(&id).is_some();
    words.remove(&id);
    if removed {
        tracing::info!(%id, "saved word removed");
    }
    ok(RemoveResponse { removed }).into_response()
}
