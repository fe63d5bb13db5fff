//! Fixtures shared by the unit tests.

use std::sync::Arc;

use crate::model::{Poem, PoemId};
use crate::parser::LoadOptions;
use crate::store::PoemStore;

/// A poem with predictable verse text and no reading or description.
pub(crate) fn poem(id: PoemId, author: &str) -> Poem {
    Poem {
        id,
        author: author.to_string(),
        upper_verse: format!("upper {id}"),
        lower_verse: format!("lower {id}"),
        reading_upper: String::new(),
        reading_lower: String::new(),
        description: String::new(),
    }
}

/// `n` poems with ids `1..=n` and one author each.
pub(crate) fn synthetic_poems(n: u32) -> Vec<Poem> {
    (1..=n)
        .map(|id| {
            let mut p = poem(id, &format!("author {id}"));
            p.description = format!("description {id}");
            p
        })
        .collect()
}

pub(crate) fn store_of(poems: Vec<Poem>) -> PoemStore {
    PoemStore::from_poems(poems, &LoadOptions::any_size()).unwrap()
}

pub(crate) fn synthetic_store(n: u32) -> PoemStore {
    store_of(synthetic_poems(n))
}

pub(crate) fn shared_store(n: u32) -> Arc<PoemStore> {
    Arc::new(synthetic_store(n))
}
