pub mod config;
pub mod logging;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::services::content_provider::GeminiProvider;
use crate::services::word_store::WordStore;
use crate::state::AppState;
use crate::storage::{FileStore, StorageError};

/// Wires the production state: file-backed word list and the Gemini provider.
pub fn build_state(config: &Config) -> Result<AppState, StorageError> {
    let backend = Arc::new(FileStore::open(&config.data_dir)?);
    tracing::info!(data_dir = %backend.root().display(), "word storage opened");
    let words = Arc::new(WordStore::open(backend));

    let gemini = Arc::new(GeminiProvider::from_env());
    if !gemini.is_available() {
        tracing::warn!("GEMINI_API_KEY not set, word lookup and speech are disabled");
    }

    Ok(AppState::new(words, gemini.clone(), gemini))
}

pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
