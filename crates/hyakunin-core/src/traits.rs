//! The query contract the generator and the quiz session need from a poem
//! store.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::error::{QuizError, Result};
use crate::model::{normalize_choice, ChoiceField, Poem, PoemId};

/// Read-only access to a loaded corpus.
///
/// Implementors must be immutable after construction so one catalog can be
/// shared by any number of sessions.
pub trait PoemCatalog: Send + Sync {
    /// Look up a poem by id.
    fn get(&self, id: PoemId) -> Result<&Poem>;

    /// Every poem, in ascending id order.
    fn all(&self) -> &[Poem];

    /// Number of poems.
    fn count(&self) -> usize {
        self.all().len()
    }

    /// Draw `count` distinct values of `field` from poems other than `answer`.
    ///
    /// `answer` need not belong to the catalog. Candidates are visited in a
    /// uniformly shuffled order. A value is kept only if its normalized form
    /// differs from the answer's value and
    /// from every value kept before it, so poems that share an author do not
    /// produce duplicate choices. The whole remaining pool is scanned before
    /// giving up with [`QuizError::InsufficientData`].
    fn sample_distractors(
        &self,
        answer: &Poem,
        count: usize,
        field: ChoiceField,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        seen.insert(normalize_choice(&answer.field(field)));

        let mut candidates: Vec<&Poem> =
            self.all().iter().filter(|p| p.id != answer.id).collect();
        candidates.shuffle(rng);

        let mut values = Vec::with_capacity(count);
        for poem in candidates {
            if values.len() == count {
                break;
            }
            let value = poem.field(field);
            if seen.insert(normalize_choice(&value)) {
                values.push(value);
            }
        }

        if values.len() < count {
            return Err(QuizError::InsufficientData {
                field,
                needed: count,
                available: values.len(),
            });
        }

        Ok(values)
    }
}
