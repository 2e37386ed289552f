//! Property-based tests for quiz generation.
//!
//! - Pools of at least five words always yield five questions of four options
//! - Each option set contains the correct answer exactly once
//! - Target words within a quiz are distinct
//! - The pool is never mutated
//! - Smaller pools yield nothing

use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use voxlingo_backend::models::{Level, SavedWord, Word};
use voxlingo_backend::services::quiz::{generate, QUESTIONS_PER_QUIZ};

fn arb_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Beginner),
        Just(Level::Intermediate),
        Just(Level::Advanced),
    ]
}

fn saved_word(index: usize, level: Level, mastery: i32) -> SavedWord {
    let mut saved = SavedWord::new(
        Word {
            word: format!("word{index}"),
            phonetic: String::new(),
            meaning_kr: format!("뜻 {index}"),
            meaning_en: String::new(),
            example_en: String::new(),
            example_kr: String::new(),
            synonyms: vec![],
            antonyms: vec![],
            level,
        },
        0,
    );
    saved.mastery = mastery;
    saved
}

fn arb_pool(min: usize, max: usize) -> impl Strategy<Value = Vec<SavedWord>> {
    prop::collection::vec((arb_level(), 0i32..=100), min..=max).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (level, mastery))| saved_word(i, level, mastery))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_quiz_shape(pool in arb_pool(5, 40), seed in any::<u64>()) {
        let before = pool.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let questions = generate(&pool, &mut rng);

        prop_assert_eq!(questions.len(), QUESTIONS_PER_QUIZ);
        for q in &questions {
            prop_assert_eq!(q.options.len(), 4);
            prop_assert_eq!(q.options.iter().filter(|o| **o == q.correct_answer).count(), 1);
            let distinct: HashSet<_> = q.options.iter().collect();
            prop_assert_eq!(distinct.len(), 4);

            let target = pool.iter().find(|w| w.word.word == q.word);
            prop_assert!(target.is_some());
            prop_assert_eq!(&target.unwrap().word.meaning_kr, &q.correct_answer);
        }

        let targets: HashSet<_> = questions.iter().map(|q| q.word.clone()).collect();
        prop_assert_eq!(targets.len(), QUESTIONS_PER_QUIZ);
        prop_assert_eq!(pool, before);
    }

    #[test]
    fn prop_small_pool_yields_nothing(pool in arb_pool(0, 4), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        prop_assert!(generate(&pool, &mut rng).is_empty());
    }
}
