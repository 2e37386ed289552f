use std::sync::Arc;
use std::time::{Instant, SystemTime};

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;

use crate::models::Word;
use crate::services::app_view::{self, AppView, ViewAction, ViewEffect};
use crate::services::content_provider::{ContentProvider, SpeechProvider};
use crate::services::quiz_session::QuizController;
use crate::services::word_store::WordStore;

#[derive(Debug, Clone)]
struct DailyWord {
    date: NaiveDate,
    word: Word,
}

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    words: Arc<WordStore>,
    quiz: Arc<QuizController>,
    content: Arc<dyn ContentProvider>,
    speech: Arc<dyn SpeechProvider>,
    view: Arc<RwLock<AppView>>,
    daily: Arc<RwLock<Option<DailyWord>>>,
}

impl AppState {
    pub fn new(
        words: Arc<WordStore>,
        content: Arc<dyn ContentProvider>,
        speech: Arc<dyn SpeechProvider>,
    ) -> Self {
        let quiz = Arc::new(QuizController::new(Arc::clone(&words)));
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            words,
            quiz,
            content,
            speech,
            view: Arc::new(RwLock::new(AppView::default())),
            daily: Arc::new(RwLock::new(None)),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn words(&self) -> Arc<WordStore> {
        Arc::clone(&self.words)
    }

    pub fn quiz(&self) -> Arc<QuizController> {
        Arc::clone(&self.quiz)
    }

    pub fn content(&self) -> Arc<dyn ContentProvider> {
        Arc::clone(&self.content)
    }

    pub fn speech(&self) -> Arc<dyn SpeechProvider> {
        Arc::clone(&self.speech)
    }

    pub fn view(&self) -> AppView {
        self.view.read().clone()
    }

    /// Runs one action through the view reducer and applies its effects.
    pub fn dispatch(&self, action: ViewAction) -> AppView {
        let (next, effects) = {
            let mut view = self.view.write();
            let (next, effects) = app_view::reduce(&view, action);
            *view = next.clone();
            (next, effects)
        };

        for effect in effects {
            match effect {
                ViewEffect::ResetQuiz => self.quiz.reset(),
            }
        }
        next
    }

    pub fn cached_daily_word(&self) -> Option<Word> {
        let today = Utc::now().date_naive();
        self.daily
            .read()
            .as_ref()
            .filter(|daily| daily.date == today)
            .map(|daily| daily.word.clone())
    }

    pub fn cache_daily_word(&self, word: Word) {
        *self.daily.write() = Some(DailyWord {
            date: Utc::now().date_naive(),
            word,
        });
    }
}
