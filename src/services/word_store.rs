use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::models::{SavedWord, Word, MASTERY_MAX, MASTERY_MIN};
use crate::storage::KeyValueStore;

pub const STORAGE_KEY: &str = "voxlingo_words";

/// The learner's saved words, newest first.
///
/// Every mutation writes the full collection back to the key-value store.
/// A failed write is logged and the in-memory list stays authoritative.
pub struct WordStore {
    words: RwLock<Vec<SavedWord>>,
    backend: Arc<dyn KeyValueStore>,
}

impl WordStore {
    pub fn open(backend: Arc<dyn KeyValueStore>) -> Self {
        let words = Self::load(backend.as_ref());
        debug!(count = words.len(), "word store loaded");
        Self {
            words: RwLock::new(words),
            backend,
        }
    }

    /// Reads the persisted snapshot. Missing or unreadable data means an
    /// empty list.
    pub fn load(backend: &dyn KeyValueStore) -> Vec<SavedWord> {
        let blob = match backend.get(STORAGE_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "saved words unavailable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<SavedWord>>(&blob) {
            Ok(mut words) => {
                for word in &mut words {
                    word.mastery = word.mastery.clamp(MASTERY_MIN, MASTERY_MAX);
                }
                words
            }
            Err(err) => {
                warn!(error = %err, "saved words snapshot is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Saves a word unless one with the same spelling (ignoring case) exists.
    /// Returns the stored entry, or `None` for the duplicate no-op.
    pub fn add(&self, word: Word) -> Option<SavedWord> {
        let mut words = self.words.write();
        if words.iter().any(|w| w.word.same_spelling(&word.word)) {
            return None;
        }

        let saved = SavedWord::new(word, Utc::now().timestamp_millis());
        words.insert(0, saved.clone());
        self.persist(&words);
        Some(saved)
    }

    pub fn remove(&self, id: &str) {
        let mut words = self.words.write();
        words.retain(|w| w.id != id);
        self.persist(&words);
    }

    /// Exact spelling match. Unknown words are ignored.
    pub fn update_mastery(&self, word: &str, delta: i32) {
        let mut words = self.words.write();
        let Some(entry) = words.iter_mut().find(|w| w.spelling() == word) else {
            debug!(word, "mastery update for unknown word ignored");
            return;
        };
        entry.apply_mastery_delta(delta);
        self.persist(&words);
    }

    pub fn snapshot(&self) -> Vec<SavedWord> {
        self.words.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<SavedWord> {
        self.words.read().iter().find(|w| w.id == id).cloned()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.read().iter().any(|w| w.word.same_spelling(word))
    }

    pub fn len(&self) -> usize {
        self.words.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.read().is_empty()
    }

    fn persist(&self, words: &[SavedWord]) {
        let blob = match serde_json::to_string(words) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(error = %err, "failed to serialize saved words");
                return;
            }
        };
        if let Err(err) = self.backend.set(STORAGE_KEY, &blob) {
            warn!(error = %err, "failed to persist saved words");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{saved, word};
    use crate::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, WordStore) {
        let backend = Arc::new(MemoryStore::new());
        let words = WordStore::open(backend.clone());
        (backend, words)
    }

    fn persisted(backend: &MemoryStore) -> Vec<SavedWord> {
        let blob = backend.get(STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&blob).unwrap()
    }

    #[test]
    fn test_add_prepends_and_persists() {
        let (backend, words) = store();
        let first = words.add(word("apple", "사과")).unwrap();
        words.add(word("banana", "바나나")).unwrap();

        let snapshot = words.snapshot();
        assert_eq!(snapshot[0].spelling(), "banana");
        assert_eq!(snapshot[1].id, first.id);
        assert_eq!(first.mastery, 0);
        assert_eq!(first.date_added, first.last_reviewed);
        assert_eq!(persisted(&backend), snapshot);
    }

    #[test]
    fn test_duplicate_add_is_noop_ignoring_case() {
        let (_, words) = store();
        words.add(word("apple", "사과")).unwrap();
        words.add(word("cat", "고양이")).unwrap();
        let before = words.snapshot();

        assert!(words.add(word("APPLE", "사과!")).is_none());
        assert_eq!(words.snapshot(), before);
        assert!(words.contains("Apple"));
    }

    #[test]
    fn test_remove_absent_id_is_harmless() {
        let (backend, words) = store();
        let apple = words.add(word("apple", "사과")).unwrap();

        words.remove("missing");
        assert_eq!(words.len(), 1);

        words.remove(&apple.id);
        assert!(words.is_empty());
        assert!(persisted(&backend).is_empty());
    }

    #[test]
    fn test_update_mastery_clamps_and_matches_exactly() {
        let (backend, words) = store();
        words.add(word("apple", "사과")).unwrap();

        for _ in 0..7 {
            words.update_mastery("apple", 20);
        }
        assert_eq!(words.snapshot()[0].mastery, 100);

        words.update_mastery("Apple", -100);
        assert_eq!(words.snapshot()[0].mastery, 100);
        assert_eq!(persisted(&backend)[0].mastery, 100);
    }

    #[test]
    fn test_load_tolerates_corrupt_snapshot() {
        let backend = Arc::new(MemoryStore::with_entry(STORAGE_KEY, "{not json"));
        let words = WordStore::open(backend);
        assert!(words.is_empty());
    }

    #[test]
    fn test_load_restores_previous_session() {
        let mut entry = saved("tree", "나무");
        entry.mastery = 250;
        let blob = serde_json::to_string(&vec![entry.clone()]).unwrap();
        let backend = Arc::new(MemoryStore::with_entry(STORAGE_KEY, &blob));

        let words = WordStore::open(backend);
        let restored = words.get(&entry.id).unwrap();
        assert_eq!(restored.spelling(), "tree");
        assert_eq!(restored.mastery, 100);
    }
}
