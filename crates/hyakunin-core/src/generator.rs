//! Multiple-choice question generation.
//!
//! A question shows one field of a poem and asks for another: the correct
//! value plus three distractors drawn from the rest of the corpus. All
//! randomness comes from the caller's RNG, so a seeded generator reproduces
//! the same question.

use rand::{Rng, RngCore};

use crate::error::{QuizError, Result};
use crate::model::{Poem, Question, QuestionType, CHOICE_COUNT, DISTRACTOR_COUNT};
use crate::traits::PoemCatalog;

/// Build a question of `question_type` about `poem`.
///
/// Distractors are drawn from the catalog's poems other than `poem`, which
/// does not itself have to be in the catalog.
pub fn generate(
    poem: &Poem,
    question_type: QuestionType,
    catalog: &dyn PoemCatalog,
    rng: &mut dyn RngCore,
) -> Result<Question> {
    let answer_field = question_type.answer_field();
    let correct = poem.field(answer_field);

    let mut choices =
        catalog.sample_distractors(poem, DISTRACTOR_COUNT, answer_field, rng)?;
    let correct_index = rng.random_range(0..CHOICE_COUNT);
    choices.insert(correct_index, correct);

    let available = choices.len() - 1;
    let choices: [String; CHOICE_COUNT] =
        choices
            .try_into()
            .map_err(|_| QuizError::InsufficientData {
                field: answer_field,
                needed: DISTRACTOR_COUNT,
                available,
            })?;

    tracing::debug!(
        poem_id = poem.id,
        %question_type,
        correct_index,
        "generated question"
    );

    Ok(Question {
        poem_id: poem.id,
        question_type,
        instruction: question_type.instruction().to_string(),
        prompt: poem.field(question_type.prompt_field()),
        choices,
        correct_index,
        number: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize_choice;
    use crate::store::PoemStore;
    use crate::testing::{poem, store_of, synthetic_store};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn assert_well_formed(question: &Question, poem: &Poem) {
        let normalized: HashSet<String> =
            question.choices.iter().map(|c| normalize_choice(c)).collect();
        assert_eq!(normalized.len(), CHOICE_COUNT, "duplicate choices: {:?}", question.choices);

        let correct = poem.field(question.question_type.answer_field());
        let occurrences = question.choices.iter().filter(|c| **c == correct).count();
        assert_eq!(occurrences, 1);
        assert_eq!(question.correct_answer(), correct);
        assert!(question.correct_index < CHOICE_COUNT);
    }

    #[test]
    fn every_bundled_poem_and_type_yields_a_valid_question() {
        let store = PoemStore::bundled().unwrap();
        let mut rng = StdRng::seed_from_u64(2024);

        for poem in store.all() {
            for question_type in QuestionType::ALL {
                let question = generate(poem, question_type, &store, &mut rng).unwrap();
                assert_eq!(question.poem_id, poem.id);
                assert_eq!(question.question_type, question_type);
                assert_well_formed(&question, poem);
            }
        }
    }

    #[test]
    fn prompt_and_answer_follow_question_type() {
        let store = synthetic_store(10);
        let p = store.all()[3].clone();
        let mut rng = StdRng::seed_from_u64(1);

        let q = generate(&p, QuestionType::LowerVerse, &store, &mut rng).unwrap();
        assert_eq!(q.prompt, p.upper_verse);
        assert_eq!(q.correct_answer(), p.lower_verse);

        let q = generate(&p, QuestionType::UpperVerse, &store, &mut rng).unwrap();
        assert_eq!(q.prompt, p.lower_verse);
        assert_eq!(q.correct_answer(), p.upper_verse);

        let q = generate(&p, QuestionType::Author, &store, &mut rng).unwrap();
        assert_eq!(q.prompt, p.full_text());
        assert_eq!(q.correct_answer(), p.author);

        let q = generate(&p, QuestionType::PoemFromAuthor, &store, &mut rng).unwrap();
        assert_eq!(q.prompt, p.author);
        assert_eq!(q.correct_answer(), p.full_text());
        assert_eq!(q.instruction, QuestionType::PoemFromAuthor.instruction());
    }

    #[test]
    fn same_seed_reproduces_the_question() {
        let store = PoemStore::bundled().unwrap();
        let p = store.get(17).unwrap();

        let a = generate(p, QuestionType::Author, &store, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate(p, QuestionType::Author, &store, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn correct_slot_is_spread_over_all_positions() {
        let store = synthetic_store(40);
        let p = store.get(1).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let mut counts = [0usize; CHOICE_COUNT];

        for _ in 0..400 {
            let q = generate(p, QuestionType::LowerVerse, &store, &mut rng).unwrap();
            counts[q.correct_index] += 1;
        }

        for (slot, count) in counts.iter().enumerate() {
            assert!(*count > 40, "slot {slot} chosen only {count} times");
        }
    }

    #[test]
    fn shared_authors_never_duplicate_author_choices() {
        let store = store_of(vec![
            poem(1, "Teika"),
            poem(2, "Teika"),
            poem(3, "Teika"),
            poem(4, "Saigyo"),
            poem(5, "Komachi"),
            poem(6, "Narihira"),
        ]);
        let mut rng = StdRng::seed_from_u64(77);

        for _ in 0..100 {
            let p = store.get(2).unwrap();
            let q = generate(p, QuestionType::Author, &store, &mut rng).unwrap();
            assert_well_formed(&q, p);
        }
    }

    #[test]
    fn poem_outside_the_catalog_gets_a_question() {
        let store = synthetic_store(6);
        let outsider = poem(77, "guest");
        let q = generate(&outsider, QuestionType::Author, &store, &mut StdRng::seed_from_u64(4))
            .unwrap();
        assert_eq!(q.poem_id, 77);
        assert_well_formed(&q, &outsider);
    }

    #[test]
    fn tiny_corpus_fails_with_insufficient_data() {
        let store = synthetic_store(3);
        let p = store.get(1).unwrap();
        let err = generate(p, QuestionType::LowerVerse, &store, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, QuizError::InsufficientData { available: 2, .. }));
    }
}
