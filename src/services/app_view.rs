//! UI state container.
//!
//! All client-visible navigation and loading state lives in one serializable
//! [`AppView`] value and changes only through [`reduce`]. Side effects that
//! belong to other services are returned as [`ViewEffect`]s for the caller to
//! carry out.

use serde::{Deserialize, Serialize};

use crate::models::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Discover,
    MyWords,
    Quiz,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppView {
    pub active_tab: Tab,
    pub search_term: String,
    pub search_result: Option<Word>,
    pub daily_word: Option<Word>,
    pub is_loading: bool,
    pub is_daily_loading: bool,
    /// Ticket of the newest lookup; only that lookup may settle the search.
    #[serde(skip)]
    pub search_ticket: u64,
}

impl Default for AppView {
    fn default() -> Self {
        Self {
            active_tab: Tab::Discover,
            search_term: String::new(),
            search_result: None,
            daily_word: None,
            is_loading: false,
            is_daily_loading: true,
            search_ticket: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    Navigate(Tab),
    SetSearchTerm(String),
    SearchStarted,
    SearchSucceeded(u64, Word),
    SearchFailed(u64),
    ClearSearchResult,
    DailyStarted,
    DailyLoaded(Word),
    DailyFailed,
    OpenSavedWord(Word),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEffect {
    /// Leaving or re-entering any tab returns the quiz to idle.
    ResetQuiz,
}

pub fn reduce(view: &AppView, action: ViewAction) -> (AppView, Vec<ViewEffect>) {
    let mut next = view.clone();
    let mut effects = Vec::new();

    match action {
        ViewAction::Navigate(tab) => {
            next.active_tab = tab;
            effects.push(ViewEffect::ResetQuiz);
        }
        ViewAction::SetSearchTerm(term) => next.search_term = term,
        ViewAction::SearchStarted => {
            next.search_ticket += 1;
            next.is_loading = true;
        }
        ViewAction::SearchSucceeded(ticket, word) if ticket == next.search_ticket => {
            next.is_loading = false;
            next.search_result = Some(word);
        }
        ViewAction::SearchFailed(ticket) if ticket == next.search_ticket => {
            next.is_loading = false;
        }
        ViewAction::SearchSucceeded(..) | ViewAction::SearchFailed(_) => {}
        ViewAction::ClearSearchResult => next.search_result = None,
        ViewAction::DailyStarted => next.is_daily_loading = true,
        ViewAction::DailyLoaded(word) => {
            next.is_daily_loading = false;
            next.daily_word = Some(word);
        }
        ViewAction::DailyFailed => next.is_daily_loading = false,
        ViewAction::OpenSavedWord(word) => {
            next.search_term = word.word.clone();
            next.search_result = Some(word);
            next.active_tab = Tab::Discover;
        }
    }

    (next, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::word;

    #[test]
    fn test_navigation_resets_quiz() {
        let view = AppView::default();
        let (next, effects) = reduce(&view, ViewAction::Navigate(Tab::Quiz));
        assert_eq!(next.active_tab, Tab::Quiz);
        assert_eq!(effects, vec![ViewEffect::ResetQuiz]);

        let (_, effects) = reduce(&next, ViewAction::Navigate(Tab::Quiz));
        assert_eq!(effects, vec![ViewEffect::ResetQuiz]);
    }

    #[test]
    fn test_search_lifecycle() {
        let view = AppView::default();
        let (view, _) = reduce(&view, ViewAction::SetSearchTerm("apple".into()));
        let (view, _) = reduce(&view, ViewAction::SearchStarted);
        assert!(view.is_loading);
        let ticket = view.search_ticket;

        let (failed, effects) = reduce(&view, ViewAction::SearchFailed(ticket));
        assert!(!failed.is_loading);
        assert!(failed.search_result.is_none());
        assert!(effects.is_empty());

        let (found, _) = reduce(&view, ViewAction::SearchSucceeded(ticket, word("apple", "사과")));
        assert!(!found.is_loading);
        assert_eq!(found.search_result.as_ref().unwrap().word, "apple");

        let (cleared, _) = reduce(&found, ViewAction::ClearSearchResult);
        assert!(cleared.search_result.is_none());
        assert_eq!(cleared.search_term, "apple");
    }

    #[test]
    fn test_only_newest_search_settles_loading() {
        let view = AppView::default();
        let (first, _) = reduce(&view, ViewAction::SearchStarted);
        let (second, _) = reduce(&first, ViewAction::SearchStarted);
        let (older, newer) = (first.search_ticket, second.search_ticket);
        assert_ne!(older, newer);

        let (view, _) = reduce(&second, ViewAction::SearchSucceeded(older, word("cat", "고양이")));
        assert!(view.is_loading);
        assert!(view.search_result.is_none());

        let (view, _) = reduce(&view, ViewAction::SearchFailed(older));
        assert!(view.is_loading);

        let (view, _) = reduce(&view, ViewAction::SearchSucceeded(newer, word("dog", "개")));
        assert!(!view.is_loading);
        assert_eq!(view.search_result.unwrap().word, "dog");
    }

    #[test]
    fn test_daily_loading_flags() {
        let view = AppView::default();
        assert!(view.is_daily_loading);
        let (loaded, _) = reduce(&view, ViewAction::DailyLoaded(word("sun", "해")));
        assert!(!loaded.is_daily_loading);
        assert!(loaded.daily_word.is_some());

        let (failed, _) = reduce(&view, ViewAction::DailyFailed);
        assert!(!failed.is_daily_loading);
        assert!(failed.daily_word.is_none());
    }

    #[test]
    fn test_open_saved_word_switches_to_discover() {
        let view = AppView {
            active_tab: Tab::MyWords,
            ..AppView::default()
        };
        let (next, effects) = reduce(&view, ViewAction::OpenSavedWord(word("moon", "달")));
        assert_eq!(next.active_tab, Tab::Discover);
        assert_eq!(next.search_term, "moon");
        assert!(effects.is_empty());
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let value = serde_json::to_value(AppView::default()).unwrap();
        assert_eq!(value["activeTab"], "discover");
        assert_eq!(value["isDailyLoading"], true);
    }
}
