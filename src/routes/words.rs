use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::response::{ok, AppError};
use crate::services::app_view::ViewAction;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    term: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    word: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechResponse {
    audio: String,
    sample_rate: u32,
    channels: u16,
    encoding: &'static str,
}

pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Response, AppError> {
    let term = query.term.unwrap_or_default();
    let term = term.trim();
    if term.is_empty() {
        return Err(AppError::validation("검색할 단어를 입력해 주세요"));
    }

    state.dispatch(ViewAction::SetSearchTerm(term.to_string()));
    let ticket = state.dispatch(ViewAction::SearchStarted).search_ticket;

    match state.content().lookup_word(term).await {
        Ok(word) => {
            state.dispatch(ViewAction::SearchSucceeded(ticket, word.clone()));
            Ok(ok(word).into_response())
        }
        Err(err) => {
            state.dispatch(ViewAction::SearchFailed(ticket));
            if err.is_not_found() {
                tracing::info!(term, "lookup found nothing");
            } else {
                tracing::warn!(term, error = %err, "word lookup failed");
            }
            Err(err.into())
        }
    }
}

pub async fn daily(State(state): State<AppState>) -> Result<Response, AppError> {
    if let Some(word) = state.cached_daily_word() {
        return Ok(ok(word).into_response());
    }

    state.dispatch(ViewAction::DailyStarted);
    match state.content().daily_word().await {
        Ok(word) => {
            state.cache_daily_word(word.clone());
            state.dispatch(ViewAction::DailyLoaded(word.clone()));
            Ok(ok(word).into_response())
        }
        Err(err) => {
            state.dispatch(ViewAction::DailyFailed);
            tracing::warn!(error = %err, "daily word fetch failed");
            Err(err.into())
        }
    }
}

pub async fn speech(
    State(state): State<AppState>,
    Json(body): Json<SpeechRequest>,
) -> Result<Response, AppError> {
    let word = body.word.trim();
    if word.is_empty() {
        return Err(AppError::validation("읽어 줄 단어가 없어요"));
    }

    let clip = state.speech().speak(word).await.map_err(|err| {
        tracing::warn!(word, error = %err, "speech synthesis failed");
        AppError::from(err)
    })?;
    tracing::debug!(word, frames = clip.frame_count(), "speech synthesized");

    Ok(ok(SpeechResponse {
        audio: base64::engine::general_purpose::STANDARD.encode(&clip.pcm),
        sample_rate: clip.sample_rate,
        channels: clip.channels,
        encoding: "pcm_s16le",
    })
    .into_response())
}
