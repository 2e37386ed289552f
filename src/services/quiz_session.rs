//! Quiz session state machine and the controller that drives it.
//!
//! `QuizMachine` is a plain synchronous state machine: `idle -> running ->
//! finished -> idle`, with each running question either awaiting an answer or
//! revealed. `QuizController` owns the side effects: it credits mastery on a
//! correct answer and schedules the timed advance after each answer.
//!
//! Every start and reset bumps a generation counter. A scheduled advance
//! carries the generation and question index it was armed for and is
//! discarded if either no longer matches, so a reset can never be undone by a
//! late timer.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::models::{QuizQuestion, SavedWord};
use crate::services::quiz::{self, MIN_POOL_SIZE};
use crate::services::word_store::WordStore;

pub const MASTERY_STEP: i32 = 20;
pub const ADVANCE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("quiz needs at least {required} saved words, found {available}")]
    InsufficientWords { required: usize, available: usize },
    #[error("no quiz is running")]
    NotRunning,
    #[error("a quiz is already in progress")]
    AlreadyActive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    pub questions: Vec<QuizQuestion>,
    pub current_index: usize,
    pub score: usize,
    pub selected_option: Option<String>,
    pub answer_correct: Option<bool>,
}

impl QuizSession {
    fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current_index: 0,
            score: 0,
            selected_option: None,
            answer_correct: None,
        }
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current_index]
    }

    pub fn is_revealed(&self) -> bool {
        self.selected_option.is_some()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    Idle,
    Running(QuizSession),
    Finished { score: usize, total: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizPhase {
    Idle,
    Running,
    Finished,
}

/// An accepted answer. `generation` and `index` identify the question it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answered {
    pub generation: u64,
    pub index: usize,
    pub word: String,
    pub correct: bool,
}

#[derive(Debug)]
pub struct QuizMachine {
    state: QuizState,
    generation: u64,
}

impl Default for QuizMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizMachine {
    pub fn new() -> Self {
        Self {
            state: QuizState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> QuizPhase {
        match self.state {
            QuizState::Idle => QuizPhase::Idle,
            QuizState::Running(_) => QuizPhase::Running,
            QuizState::Finished { .. } => QuizPhase::Finished,
        }
    }

    pub fn start<R: Rng + ?Sized>(
        &mut self,
        pool: &[SavedWord],
        rng: &mut R,
    ) -> Result<u64, QuizError> {
        if !matches!(self.state, QuizState::Idle) {
            return Err(QuizError::AlreadyActive);
        }
        if pool.len() < MIN_POOL_SIZE {
            return Err(QuizError::InsufficientWords {
                required: MIN_POOL_SIZE,
                available: pool.len(),
            });
        }

        let questions = quiz::generate(pool, rng);
        self.generation += 1;
        self.state = QuizState::Running(QuizSession::new(questions));
        Ok(self.generation)
    }

    /// Records the first answer to the current question. Later answers to the
    /// same question return `Ok(None)` and change nothing.
    pub fn answer(&mut self, option: &str) -> Result<Option<Answered>, QuizError> {
        let QuizState::Running(session) = &mut self.state else {
            return Err(QuizError::NotRunning);
        };
        if session.is_revealed() {
            return Ok(None);
        }

        let question = session.current_question();
        let correct = option == question.correct_answer;
        let word = question.word.clone();

        session.selected_option = Some(option.to_string());
        session.answer_correct = Some(correct);
        if correct {
            session.score += 1;
        }

        Ok(Some(Answered {
            generation: self.generation,
            index: session.current_index,
            word,
            correct,
        }))
    }

    /// Moves past a revealed question. Returns false when the request is stale
    /// (different generation or question) or nothing is revealed.
    pub fn advance(&mut self, generation: u64, index: usize) -> bool {
        if generation != self.generation {
            return false;
        }
        let QuizState::Running(session) = &mut self.state else {
            return false;
        };
        if session.current_index != index || !session.is_revealed() {
            return false;
        }

        if session.is_last_question() {
            let score = session.score;
            let total = session.questions.len();
            self.state = QuizState::Finished { score, total };
        } else {
            session.current_index += 1;
            session.selected_option = None;
            session.answer_correct = None;
        }
        true
    }

    /// Discards any session. Allowed from every state.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = QuizState::Idle;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub word: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

/// Client-facing snapshot of the quiz. The correct answer is only exposed
/// once the current question has been answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub phase: QuizPhase,
    pub generation: u64,
    pub score: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_correct: Option<bool>,
}

impl QuizView {
    pub fn of(machine: &QuizMachine) -> Self {
        let mut view = Self {
            phase: machine.phase(),
            generation: machine.generation(),
            score: 0,
            total: 0,
            current_index: None,
            question: None,
            selected_option: None,
            answer_correct: None,
        };

        match machine.state() {
            QuizState::Idle => {}
            QuizState::Finished { score, total } => {
                view.score = *score;
                view.total = *total;
            }
            QuizState::Running(session) => {
                let question = session.current_question();
                view.score = session.score;
                view.total = session.questions.len();
                view.current_index = Some(session.current_index);
                view.question = Some(QuestionView {
                    word: question.word.clone(),
                    options: question.options.clone(),
                    correct_answer: session
                        .is_revealed()
                        .then(|| question.correct_answer.clone()),
                });
                view.selected_option = session.selected_option.clone();
                view.answer_correct = session.answer_correct;
            }
        }
        view
    }
}

struct AdvanceTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Drives a [`QuizMachine`] against the word store.
///
/// Answering spawns the delayed advance on the current tokio runtime, so
/// `answer` must be called from within one.
pub struct QuizController {
    machine: Arc<Mutex<QuizMachine>>,
    words: Arc<WordStore>,
    timer: Mutex<Option<AdvanceTimer>>,
}

impl QuizController {
    pub fn new(words: Arc<WordStore>) -> Self {
        Self {
            machine: Arc::new(Mutex::new(QuizMachine::new())),
            words,
            timer: Mutex::new(None),
        }
    }

    pub fn view(&self) -> QuizView {
        QuizView::of(&self.machine.lock())
    }

    pub fn start(&self) -> Result<QuizView, QuizError> {
        let pool = self.words.snapshot();
        let mut machine = self.machine.lock();
        let generation = machine.start(&pool, &mut rand::rng())?;
        info!(generation, pool = pool.len(), "quiz started");
        Ok(QuizView::of(&machine))
    }

    pub fn answer(&self, option: &str) -> Result<Option<Answered>, QuizError> {
        let Some(answered) = self.machine.lock().answer(option)? else {
            debug!("repeated answer ignored");
            return Ok(None);
        };
        // Mastery is written with the machine lock released.
        if answered.correct {
            self.words.update_mastery(&answered.word, MASTERY_STEP);
        }

        debug!(
            generation = answered.generation,
            index = answered.index,
            correct = answered.correct,
            "quiz answer recorded"
        );
        self.schedule_advance(answered.generation, answered.index);
        Ok(Some(answered))
    }

    pub fn reset(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.handle.abort();
        }
        let mut machine = self.machine.lock();
        machine.reset();
        debug!(generation = machine.generation(), "quiz reset");
    }

    fn schedule_advance(&self, generation: u64, index: usize) {
        let machine = Arc::clone(&self.machine);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ADVANCE_DELAY).await;
            let mut machine = machine.lock();
            if machine.advance(generation, index) {
                if let QuizState::Finished { score, total } = machine.state() {
                    info!(generation, score, total, "quiz finished");
                }
            } else {
                debug!(generation, index, "stale quiz advance dropped");
            }
        });

        let previous = self
            .timer
            .lock()
            .replace(AdvanceTimer { generation, handle });
        if let Some(previous) = previous {
            debug!(generation = previous.generation, "replacing advance timer");
            previous.handle.abort();
        }
    }
}

impl Drop for QuizController {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().take() {
            timer.handle.abort();
        }
    }
}
