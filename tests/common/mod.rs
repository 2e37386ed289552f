#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use voxlingo_backend::models::{Level, Word};
use voxlingo_backend::services::content_provider::{
    AudioClip, ContentError, ContentProvider, SpeechProvider,
};
use voxlingo_backend::services::word_store::WordStore;
use voxlingo_backend::state::AppState;
use voxlingo_backend::storage::MemoryStore;

pub const DICTIONARY: [(&str, &str); 7] = [
    ("apple", "사과"),
    ("cat", "고양이"),
    ("happy", "행복한"),
    ("tree", "나무"),
    ("moon", "달"),
    ("river", "강"),
    ("brave", "용감한"),
];

pub fn word(spelling: &str, meaning: &str) -> Word {
    Word {
        word: spelling.to_string(),
        phonetic: format!("/{spelling}/"),
        meaning_kr: meaning.to_string(),
        meaning_en: format!("definition of {spelling}"),
        example_en: format!("Look at the {spelling}."),
        example_kr: format!("{meaning}을 보세요."),
        synonyms: vec![],
        antonyms: vec![],
        level: Level::Beginner,
    }
}

pub fn meaning_of(spelling: &str) -> &'static str {
    DICTIONARY
        .iter()
        .find(|(w, _)| *w == spelling)
        .map(|(_, m)| *m)
        .unwrap()
}

/// Answers from a fixed dictionary and counts daily-word requests.
#[derive(Default)]
pub struct FakeProvider {
    pub daily_calls: AtomicUsize,
    pub offline: bool,
}

#[async_trait]
impl ContentProvider for FakeProvider {
    async fn lookup_word(&self, term: &str) -> Result<Word, ContentError> {
        if self.offline {
            return Err(ContentError::Malformed("offline".into()));
        }
        let entries: HashMap<&str, &str> = DICTIONARY.into_iter().collect();
        entries
            .get(term.to_lowercase().as_str())
            .map(|meaning| word(&term.to_lowercase(), meaning))
            .ok_or_else(|| ContentError::NotFound(term.to_string()))
    }

    async fn daily_word(&self) -> Result<Word, ContentError> {
        if self.offline {
            return Err(ContentError::Malformed("offline".into()));
        }
        self.daily_calls.fetch_add(1, Ordering::SeqCst);
        Ok(word("sun", "해"))
    }
}

#[async_trait]
impl SpeechProvider for FakeProvider {
    async fn speak(&self, _word: &str) -> Result<AudioClip, ContentError> {
        Ok(AudioClip {
            sample_rate: 24_000,
            channels: 1,
            pcm: vec![0, 0, 1, 0],
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub provider: Arc<FakeProvider>,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(FakeProvider::default())
}

pub fn create_test_app_with(provider: FakeProvider) -> TestApp {
    let provider = Arc::new(provider);
    let words = Arc::new(WordStore::open(Arc::new(MemoryStore::new())));
    let state = AppState::new(words, provider.clone(), provider.clone());
    let router = voxlingo_backend::create_app(state.clone());
    TestApp {
        router,
        state,
        provider,
    }
}

impl TestApp {
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub fn seed(&self, count: usize) {
        for (spelling, meaning) in DICTIONARY.iter().take(count) {
            self.state.words().add(word(spelling, meaning));
        }
    }
}
