use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::response::{ok, AppError};
use crate::services::app_view::{Tab, ViewAction};
use crate::state::AppState;

/// The subset of view actions a client may send directly. Loading flags and
/// results are driven by the word endpoints.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientAction {
    Navigate { tab: Tab },
    SetSearchTerm { term: String },
    ClearSearchResult,
    OpenSavedWord { id: String },
}

pub async fn current(State(state): State<AppState>) -> Response {
    ok(state.view()).into_response()
}

pub async fn dispatch(
    State(state): State<AppState>,
    Json(action): Json<ClientAction>,
) -> Result<Response, AppError> {
    let action = match action {
        ClientAction::Navigate { tab } => ViewAction::Navigate(tab),
        ClientAction::SetSearchTerm { term } => ViewAction::SetSearchTerm(term),
        ClientAction::ClearSearchResult => ViewAction::ClearSearchResult,
        ClientAction::OpenSavedWord { id } => {
            let saved = state
                .words()
                .get(&id)
                .ok_or_else(|| AppError::not_found("저장된 단어가 아니에요"))?;
            ViewAction::OpenSavedWord(saved.word)
        }
    };
    Ok(ok(state.dispatch(action)).into_response())
}
