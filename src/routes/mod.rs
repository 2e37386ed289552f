mod health;
mod quiz;
mod saved_words;
mod view;
mod words;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/api/words/lookup", get(words::lookup).fallback(fallback_handler))
        .route("/api/words/daily", get(words::daily).fallback(fallback_handler))
        .route("/api/words/speech", post(words::speech).fallback(fallback_handler))
        .route(
            "/api/saved-words",
            get(saved_words::list)
                .post(saved_words::save)
                .fallback(fallback_handler),
        )
        .route(
            "/api/saved-words/status",
            get(saved_words::status).fallback(fallback_handler),
        )
        .route(
            "/api/saved-words/:id",
            delete(saved_words::remove).fallback(fallback_handler),
        )
        .route("/api/view", get(view::current).fallback(fallback_handler))
        .route("/api/view/actions", post(view::dispatch).fallback(fallback_handler));

    app = app.nest("/api/quiz", quiz::router());

    for path in ["/health", "/api/health"] {
        app = app.nest(path, health::router());
    }

    app.fallback(fallback_handler).with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "없는 주소예요").into_response()
}
