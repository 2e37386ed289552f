//! Multiple-choice question generation from the saved-word pool.

use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::models::{QuizQuestion, SavedWord};

pub const QUESTIONS_PER_QUIZ: usize = 5;
pub const MIN_POOL_SIZE: usize = QUESTIONS_PER_QUIZ;
pub const DISTRACTORS_PER_QUESTION: usize = 3;

/// Builds one quiz from `pool` without mutating it.
///
/// Returns an empty list when the pool holds fewer than
/// [`MIN_POOL_SIZE`] words; callers are expected to check first.
/// Questions come out in target draw order.
pub fn generate<R: Rng + ?Sized>(pool: &[SavedWord], rng: &mut R) -> Vec<QuizQuestion> {
    if pool.len() < MIN_POOL_SIZE {
        return Vec::new();
    }

    index::sample(rng, pool.len(), QUESTIONS_PER_QUIZ)
        .into_iter()
        .map(|target| build_question(pool, &pool[target], rng))
        .collect()
}

fn build_question<R: Rng + ?Sized>(
    pool: &[SavedWord],
    target: &SavedWord,
    rng: &mut R,
) -> QuizQuestion {
    let others: Vec<&SavedWord> = pool
        .iter()
        .filter(|w| w.spelling() != target.spelling())
        .collect();
    let amount = DISTRACTORS_PER_QUESTION.min(others.len());

    let mut options = Vec::with_capacity(amount + 1);
    options.push(target.meaning().to_string());
    options.extend(
        index::sample(rng, others.len(), amount)
            .into_iter()
            .map(|i| others[i].meaning().to_string()),
    );
    options.shuffle(rng);

    QuizQuestion {
        word: target.spelling().to_string(),
        correct_answer: target.meaning().to_string(),
        options,
    }
}
