use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;
use tokio::time::sleep;
use tracing::warn;

use crate::models::{Level, Word};

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
const DEFAULT_VOICE: &str = "Kore";
const DEFAULT_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_MS: u64 = 60_000;
const MAX_RETRIES: usize = 3;
const BASE_BACKOFF_MS: u64 = 200;

pub const TTS_SAMPLE_RATE: u32 = 24_000;
pub const TTS_CHANNELS: u16 = 1;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content provider not configured: {0}")]
    NotConfigured(&'static str),
    #[error("word not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: reqwest::StatusCode, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Raw 16-bit little-endian PCM as returned by the speech model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub channels: u16,
    pub pcm: Vec<u8>,
}

impl AudioClip {
    pub fn frame_count(&self) -> usize {
        self.pcm.len() / (2 * self.channels.max(1) as usize)
    }
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn lookup_word(&self, term: &str) -> Result<Word, ContentError>;
    async fn daily_word(&self) -> Result<Word, ContentError>;
}

#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn speak(&self, word: &str) -> Result<AudioClip, ContentError>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub tts_model: String,
    pub voice: String,
    pub api_endpoint: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct GeminiProvider {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn from_env() -> Self {
        let config = GeminiConfig {
            api_key: env_string("GEMINI_API_KEY"),
            model: env_string("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            tts_model: env_string("GEMINI_TTS_MODEL")
                .unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
            voice: env_string("GEMINI_VOICE").unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            api_endpoint: env_string("GEMINI_API_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_millis(env_u64("GEMINI_TIMEOUT").unwrap_or(DEFAULT_TIMEOUT_MS)),
        };
        Self::new(config)
    }

    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    pub fn is_available(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty())
    }

    async fn generate_word(&self, prompt: &str) -> Result<Option<Word>, ContentError> {
        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": word_schema(),
            }
        });
        let response = self.generate(&self.config.model, &payload).await?;
        let Some(text) = response.first_text() else {
            return Ok(None);
        };
        parse_word(text)
    }

    async fn generate(
        &self,
        model: &str,
        payload: &serde_json::Value,
    ) -> Result<GenerateResponse, ContentError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ContentError::NotConfigured("GEMINI_API_KEY"))?;
        let url = format!("{}/models/{}:generateContent", self.config.api_endpoint, model);

        let mut last_error: Option<ContentError> = None;
        for retry in 0..=MAX_RETRIES {
            let sent = self
                .client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(payload)
                .send()
                .await;

            let err = match sent {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let bytes = resp.bytes().await?;
                        return serde_json::from_slice(&bytes).map_err(|e| {
                            tracing::error!(error = %e, "failed to decode Gemini response");
                            ContentError::Json(e)
                        });
                    }
                    let body = resp.text().await.unwrap_or_default();
                    let err = ContentError::HttpStatus { status, body };
                    if !is_retryable(status) {
                        return Err(err);
                    }
                    err
                }
                Err(e) => ContentError::Request(e),
            };

            if retry < MAX_RETRIES {
                let backoff = Duration::from_millis(BASE_BACKOFF_MS * (1 << retry));
                warn!(retry, error = %err, "Gemini request failed, retrying");
                sleep(backoff).await;
                last_error = Some(err);
                continue;
            }
            return Err(err);
        }
        Err(last_error.unwrap_or(ContentError::NotConfigured("unknown")))
    }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    async fn lookup_word(&self, term: &str) -> Result<Word, ContentError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ContentError::NotFound(String::new()));
        }
        self.generate_word(&lookup_prompt(term))
            .await?
            .ok_or_else(|| ContentError::NotFound(term.to_string()))
    }

    async fn daily_word(&self) -> Result<Word, ContentError> {
        self.generate_word(DAILY_PROMPT)
            .await?
            .ok_or_else(|| ContentError::Malformed("daily word was empty".to_string()))
    }
}

#[async_trait]
impl SpeechProvider for GeminiProvider {
    async fn speak(&self, word: &str) -> Result<AudioClip, ContentError> {
        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": format!("Say clearly and slowly for kids: {word}") }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.config.voice }
                    }
                }
            }
        });
        let response = self.generate(&self.config.tts_model, &payload).await?;
        let data = response
            .first_inline_data()
            .ok_or_else(|| ContentError::Malformed("no audio in response".to_string()))?;
        decode_audio(data)
    }
}

const DAILY_PROMPT: &str = "Pick a random, useful, and common English word for kids \
(level: Beginner or Intermediate) and provide full details in JSON.";

fn lookup_prompt(term: &str) -> String {
    format!(
        "Analyze the English word \"{term}\" for elementary/middle school students. \
Provide its phonetic transcription, Korean meaning, English definition, a simple example \
sentence with its Korean translation, synonyms, antonyms, and its difficulty level. \
If \"{term}\" is not a real English word, answer with an empty string for \"word\"."
    )
}

fn word_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "word": { "type": "STRING" },
            "phonetic": { "type": "STRING" },
            "meaning_kr": { "type": "STRING" },
            "meaning_en": { "type": "STRING" },
            "example_en": { "type": "STRING" },
            "example_kr": { "type": "STRING" },
            "synonyms": { "type": "ARRAY", "items": { "type": "STRING" } },
            "antonyms": { "type": "ARRAY", "items": { "type": "STRING" } },
            "level": { "type": "STRING", "description": "Beginner, Intermediate, or Advanced" }
        },
        "required": ["word", "phonetic", "meaning_kr", "meaning_en", "example_en", "example_kr", "level"]
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

impl GenerateResponse {
    fn first_part(&self) -> Option<&Part> {
        self.candidates.first()?.content.as_ref()?.parts.first()
    }

    fn first_text(&self) -> Option<&str> {
        self.first_part()?
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    fn first_inline_data(&self) -> Option<&str> {
        self.first_part()?.inline_data.as_ref().map(|d| d.data.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct WordDraft {
    word: Option<String>,
    phonetic: Option<String>,
    meaning_kr: Option<String>,
    meaning_en: Option<String>,
    example_en: Option<String>,
    example_kr: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
    level: Option<String>,
}

/// Parses model output into a [`Word`]. `Ok(None)` means the model did not
/// recognise the term.
fn parse_word(text: &str) -> Result<Option<Word>, ContentError> {
    let draft: WordDraft = serde_json::from_str(strip_code_fence(text))?;

    let spelling = draft.word.as_deref().map(str::trim).unwrap_or_default();
    if spelling.is_empty() {
        return Ok(None);
    }

    let level_raw = required("level", draft.level)?;
    let level = Level::parse(&level_raw)
        .ok_or_else(|| ContentError::Malformed(format!("unknown level {level_raw:?}")))?;

    Ok(Some(Word {
        word: spelling.to_string(),
        phonetic: required("phonetic", draft.phonetic)?,
        meaning_kr: required("meaning_kr", draft.meaning_kr)?,
        meaning_en: required("meaning_en", draft.meaning_en)?,
        example_en: required("example_en", draft.example_en)?,
        example_kr: required("example_kr", draft.example_kr)?,
        synonyms: clean_list(draft.synonyms),
        antonyms: clean_list(draft.antonyms),
        level,
    }))
}

fn required(field: &str, value: Option<String>) -> Result<String, ContentError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ContentError::Malformed(format!("missing field {field}")))
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

fn decode_audio(data: &str) -> Result<AudioClip, ContentError> {
    let pcm = base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| ContentError::Malformed(format!("audio payload: {e}")))?;
    if pcm.is_empty() {
        return Err(ContentError::Malformed("audio payload was empty".to_string()));
    }
    Ok(AudioClip {
        sample_rate: TTS_SAMPLE_RATE,
        channels: TTS_CHANNELS,
        pcm,
    })
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    env_string(key)?.parse().ok()
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}
