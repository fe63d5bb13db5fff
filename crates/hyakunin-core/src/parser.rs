//! JSON corpus parser.
//!
//! Turns the static corpus file into validated [`Poem`] records and lints a
//! loaded corpus for non-fatal issues.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::{QuizError, Result};
use crate::model::{normalize_choice, ChoiceField, Poem, PoemId};

/// Number of poems in the Hyakunin Isshu.
pub const STANDARD_POEM_COUNT: usize = 100;

/// Expectations checked while loading a corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Exact number of poems required. Ids must then lie in `1..=n`.
    /// `None` accepts any non-empty corpus with positive, unique ids.
    pub expected_count: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            expected_count: Some(STANDARD_POEM_COUNT),
        }
    }
}

impl LoadOptions {
    /// Accept a corpus of any size.
    pub fn any_size() -> Self {
        Self {
            expected_count: None,
        }
    }
}

/// Intermediate record with every field optional so missing fields can be
/// reported with the record index instead of a bare serde message.
#[derive(Debug, Deserialize)]
struct RawPoem {
    id: Option<i64>,
    author: Option<String>,
    upper: Option<String>,
    lower: Option<String>,
    #[serde(default)]
    reading_upper: String,
    #[serde(default)]
    reading_lower: String,
    #[serde(default)]
    description: String,
}

/// Read and parse a corpus file.
pub fn parse_corpus_file(path: &Path) -> Result<Vec<Poem>> {
    let content = std::fs::read_to_string(path).map_err(|source| QuizError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_corpus_str(&content)
}

/// Parse a JSON array of poem records.
///
/// Only per-record checks happen here; corpus-level invariants are left to
/// [`validate_poems`].
pub fn parse_corpus_str(content: &str) -> Result<Vec<Poem>> {
    let raw: Vec<RawPoem> = serde_json::from_str(content)
        .map_err(|e| QuizError::Data(format!("malformed corpus JSON: {e}")))?;

    let poems = raw
        .into_iter()
        .enumerate()
        .map(|(index, r)| {
            let id = r
                .id
                .ok_or_else(|| missing(index, "id"))
                .and_then(|id| {
                    PoemId::try_from(id)
                        .ok()
                        .filter(|id| *id >= 1)
                        .ok_or_else(|| QuizError::Data(format!("record {index}: invalid id {id}")))
                })?;

            Ok(Poem {
                id,
                author: required(index, "author", r.author)?,
                upper_verse: required(index, "upper", r.upper)?,
                lower_verse: required(index, "lower", r.lower)?,
                reading_upper: r.reading_upper,
                reading_lower: r.reading_lower,
                description: r.description,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(poems)
}

fn missing(index: usize, field: &str) -> QuizError {
    QuizError::Data(format!("record {index}: missing required field '{field}'"))
}

fn required(index: usize, field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(QuizError::Data(format!(
            "record {index}: required field '{field}' is empty"
        ))),
        None => Err(missing(index, field)),
    }
}

/// Check corpus-level invariants: non-empty, unique ids, expected size.
pub fn validate_poems(poems: &[Poem], options: &LoadOptions) -> Result<()> {
    if poems.is_empty() {
        return Err(QuizError::Data("corpus is empty".into()));
    }

    let mut seen = HashSet::new();
    for (index, poem) in poems.iter().enumerate() {
        if poem.id < 1 {
            return Err(QuizError::Data(format!(
                "record {index}: invalid id {}",
                poem.id
            )));
        }
        if let Some(expected) = options.expected_count {
            if poem.id as usize > expected {
                return Err(QuizError::Data(format!(
                    "record {index}: id {} is outside 1..={expected}",
                    poem.id
                )));
            }
        }
        if !seen.insert(poem.id) {
            return Err(QuizError::Data(format!(
                "record {index}: duplicate id {}",
                poem.id
            )));
        }
    }

    if let Some(expected) = options.expected_count {
        if poems.len() != expected {
            return Err(QuizError::Data(format!(
                "expected {expected} poems, found {}",
                poems.len()
            )));
        }
    }

    Ok(())
}

/// A non-fatal issue found in a loaded corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusWarning {
    /// The poem id (if applicable).
    pub poem_id: Option<PoemId>,
    /// Warning message.
    pub message: String,
}

/// Lint a corpus for issues that do not prevent quizzing but degrade it.
pub fn lint_corpus(poems: &[Poem]) -> Vec<CorpusWarning> {
    let mut warnings = Vec::new();

    for poem in poems {
        if poem.reading_upper.is_empty() || poem.reading_lower.is_empty() {
            warnings.push(CorpusWarning {
                poem_id: Some(poem.id),
                message: "reading is missing".into(),
            });
        }
        if poem.description.trim().is_empty() {
            warnings.push(CorpusWarning {
                poem_id: Some(poem.id),
                message: "description is missing".into(),
            });
        }
    }

    let mut authors: HashMap<String, Vec<PoemId>> = HashMap::new();
    for poem in poems {
        authors
            .entry(normalize_choice(&poem.author))
            .or_default()
            .push(poem.id);
    }
    let mut shared: Vec<_> = authors.into_values().filter(|ids| ids.len() > 1).collect();
    shared.sort();
    for ids in shared {
        warnings.push(CorpusWarning {
            poem_id: ids.first().copied(),
            message: format!("author shared by poems {ids:?}"),
        });
    }

    for field in [ChoiceField::UpperVerse, ChoiceField::LowerVerse] {
        let mut seen: HashMap<String, PoemId> = HashMap::new();
        for poem in poems {
            let key = normalize_choice(&poem.field(field));
            if let Some(&first) = seen.get(&key) {
                warnings.push(CorpusWarning {
                    poem_id: Some(poem.id),
                    message: format!("{field} duplicates poem {first}"),
                });
            } else {
                seen.insert(key, poem.id);
            }
        }
    }

    warnings
}
