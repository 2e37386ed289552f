//! Vocabulary data shared by the word store, the quiz and the HTTP layer.
//!
//! The serialized shape matches the snapshot the browser client kept under
//! `voxlingo_words`: word fields stay snake_case, bookkeeping fields are
//! camelCase.

use serde::{Deserialize, Serialize};

pub const MASTERY_MIN: i32 = 0;
pub const MASTERY_MAX: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(alias = "beginner", alias = "BEGINNER")]
    Beginner,
    #[serde(alias = "intermediate", alias = "INTERMEDIATE")]
    Intermediate,
    #[serde(alias = "advanced", alias = "ADVANCED")]
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// A vocabulary entry as produced by the content provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub phonetic: String,
    pub meaning_kr: String,
    pub meaning_en: String,
    pub example_en: String,
    pub example_kr: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
    pub level: Level,
}

impl Word {
    /// Case-insensitive identity used for duplicate detection.
    pub fn same_spelling(&self, other: &str) -> bool {
        self.word.to_lowercase() == other.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWord {
    #[serde(flatten)]
    pub word: Word,
    pub id: String,
    pub date_added: i64,
    /// Written at save time and never read.
    pub last_reviewed: i64,
    #[serde(default)]
    pub mastery: i32,
}

impl SavedWord {
    pub fn new(word: Word, now_ms: i64) -> Self {
        Self {
            word,
            id: uuid::Uuid::new_v4().to_string(),
            date_added: now_ms,
            last_reviewed: now_ms,
            mastery: MASTERY_MIN,
        }
    }

    pub fn spelling(&self) -> &str {
        &self.word.word
    }

    pub fn meaning(&self) -> &str {
        &self.word.meaning_kr
    }

    pub fn apply_mastery_delta(&mut self, delta: i32) {
        self.mastery = self
            .mastery
            .saturating_add(delta)
            .clamp(MASTERY_MIN, MASTERY_MAX);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub word: String,
    pub correct_answer: String,
    pub options: Vec<String>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse_is_case_insensitive() {
        assert_eq!(Level::parse("beginner"), Some(Level::Beginner));
        assert_eq!(Level::parse(" Advanced "), Some(Level::Advanced));
        assert_eq!(Level::parse("expert"), None);
    }

    #[test]
    fn test_saved_word_reads_browser_snapshot() {
        let json = r#"{
            "word": "apple",
            "phonetic": "/ˈæp.əl/",
            "meaning_kr": "사과",
            "meaning_en": "a round fruit",
            "example_en": "I eat an apple.",
            "example_kr": "나는 사과를 먹어요.",
            "level": "Beginner",
            "id": "abc",
            "dateAdded": 1,
            "lastReviewed": 2
        }"#;

        let saved: SavedWord = serde_json::from_str(json).unwrap();
        assert_eq!(saved.spelling(), "apple");
        assert_eq!(saved.mastery, 0);
        assert!(saved.word.synonyms.is_empty());
        assert_eq!(saved.date_added, 1);
    }

    #[test]
    fn test_saved_word_serializes_flat() {
        let saved = fixtures::saved("cat", "고양이");
        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(value["meaning_kr"], "고양이");
        assert_eq!(value["mastery"], 0);
        assert!(value.get("dateAdded").is_some());
        assert!(value.get("word").is_some_and(|w| w.is_string()));
    }

    #[test]
    fn test_mastery_delta_is_clamped() {
        let mut saved = fixtures::saved("dog", "개");
        saved.apply_mastery_delta(90);
        saved.apply_mastery_delta(20);
        assert_eq!(saved.mastery, MASTERY_MAX);
        saved.apply_mastery_delta(-500);
        assert_eq!(saved.mastery, MASTERY_MIN);
    }

    #[test]
    fn test_same_spelling_ignores_case() {
        let word = fixtures::word("Apple", "사과");
        assert!(word.same_spelling("apple"));
        assert!(!word.same_spelling("apples"));
    }
}
