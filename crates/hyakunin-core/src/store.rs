//! The in-memory poem store.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{RngCore, SeedableRng};

use crate::error::{QuizError, Result};
use crate::model::{normalize_choice, Poem, PoemId};
use crate::parser::{self, LoadOptions};
use crate::traits::PoemCatalog;

/// The Hyakunin Isshu corpus shipped with the crate.
const BUNDLED_CORPUS: &str = include_str!("../data/hyakunin_isshu.json");

/// An immutable, id-ordered collection of poems.
#[derive(Debug, Clone)]
pub struct PoemStore {
    poems: Vec<Poem>,
}

impl PoemStore {
    /// Build a store from already-parsed poems, validating them first.
    pub fn from_poems(mut poems: Vec<Poem>, options: &LoadOptions) -> Result<Self> {
        parser::validate_poems(&poems, options)?;
        poems.sort_by_key(|p| p.id);
        Ok(Self { poems })
    }

    /// Parse a JSON corpus.
    pub fn from_json_str(content: &str, options: &LoadOptions) -> Result<Self> {
        let poems = parser::parse_corpus_str(content)?;
        Self::from_poems(poems, options)
    }

    /// Load a JSON corpus file.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let poems = parser::parse_corpus_file(path)?;
        let store = Self::from_poems(poems, options)?;
        tracing::info!("loaded {} poems from {}", store.count(), path.display());
        Ok(store)
    }

    /// The 100-poem corpus embedded in the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_CORPUS, &LoadOptions::default())
    }

    /// Distinct author names, sorted.
    pub fn authors(&self) -> Vec<&str> {
        let mut authors: Vec<&str> = self.poems.iter().map(|p| p.author.as_str()).collect();
        authors.sort_unstable();
        authors.dedup();
        authors
    }

    /// Poems whose author matches `author` (whitespace and case insensitive).
    pub fn poems_by_author(&self, author: &str) -> Vec<&Poem> {
        let wanted = normalize_choice(author);
        self.poems
            .iter()
            .filter(|p| normalize_choice(&p.author) == wanted)
            .collect()
    }

    /// Up to `count` distinct random poems, optionally excluding one id.
    pub fn random_poems(
        &self,
        count: usize,
        exclude: Option<PoemId>,
        rng: &mut dyn RngCore,
    ) -> Vec<&Poem> {
        let pool: Vec<&Poem> = self
            .poems
            .iter()
            .filter(|p| Some(p.id) != exclude)
            .collect();
        pool.choose_multiple(rng, count).copied().collect()
    }

    /// The poem of the day for `date`, followed by `more` other poems.
    ///
    /// All poems are distinct. The first one depends only on the date, so it
    /// stays the same however many extra poems are asked for.
    pub fn daily_poems(&self, date: NaiveDate, more: usize) -> Vec<&Poem> {
        let mut rng = StdRng::seed_from_u64(date_seed(date));
        let Some(today) = self.random_poems(1, None, &mut rng).into_iter().next() else {
            return Vec::new();
        };

        let mut poems = vec![today];
        poems.extend(self.random_poems(more, Some(today.id), &mut rng));
        poems
    }
}

/// `20240131` for 2024-01-31.
fn date_seed(date: NaiveDate) -> u64 {
    date.year() as u64 * 10_000 + u64::from(date.month()) * 100 + u64::from(date.day())
}

impl PoemCatalog for PoemStore {
    fn get(&self, id: PoemId) -> Result<&Poem> {
        self.poems
            .binary_search_by_key(&id, |p| p.id)
            .map(|index| &self.poems[index])
            .map_err(|_| QuizError::NotFound(id))
    }

    fn all(&self) -> &[Poem] {
        &self.poems
    }
}
