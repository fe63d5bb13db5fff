//! CLI configuration loaded from `hyakunin.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use hyakunin_core::session::{OrderMode, QuestionTypeMode, SessionConfig};
use hyakunin_core::QuestionType;

/// Environment variable overriding the corpus path.
pub const DATA_ENV: &str = "HYAKUNIN_DATA";

/// Top-level hyakunin configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyakuninConfig {
    /// Corpus JSON to load instead of the bundled one.
    #[serde(default)]
    pub data_path: Option<PathBuf>,
    /// Order in which poems are asked.
    #[serde(default)]
    pub order_mode: OrderMode,
    /// One entry fixes the type, several are mixed, none means all four at random.
    #[serde(default)]
    pub question_types: Vec<QuestionType>,
    /// Cap on the number of questions per session.
    #[serde(default)]
    pub max_questions: Option<usize>,
    /// Show kana readings in answer feedback.
    #[serde(default = "default_true")]
    pub show_reading: bool,
    /// Show the commentary in answer feedback.
    #[serde(default = "default_true")]
    pub show_description: bool,
    /// Where `play --save` writes reports when no directory is given.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_true() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./hyakunin-results")
}

impl Default for HyakuninConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            order_mode: OrderMode::default(),
            question_types: Vec::new(),
            max_questions: None,
            show_reading: true,
            show_description: true,
            output_dir: default_output_dir(),
        }
    }
}

impl HyakuninConfig {
    /// The question type mode described by `question_types`.
    pub fn question_type_mode(&self) -> QuestionTypeMode {
        let mut types = self.question_types.clone();
        types.sort();
        types.dedup();
        match types.as_slice() {
            [] => QuestionTypeMode::Random,
            [only] => QuestionTypeMode::Fixed(*only),
            _ => QuestionTypeMode::Mixed(types),
        }
    }

    /// Session settings for a corpus of `corpus_size` poems.
    ///
    /// `max_questions` larger than the corpus is clamped to the corpus size.
    pub fn session_config(&self, corpus_size: usize) -> SessionConfig {
        SessionConfig {
            order_mode: self.order_mode,
            question_type_mode: self.question_type_mode(),
            subset_size: self.max_questions.map(|n| n.min(corpus_size)),
        }
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(DATA_ENV).filter(|p| !p.trim().is_empty()) {
            self.data_path = Some(PathBuf::from(path));
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `path`, which must exist when given
/// 2. `hyakunin.toml` in the current directory
/// 3. `~/.config/hyakunin/config.toml`
///
/// `HYAKUNIN_DATA` overrides `data_path`.
pub fn load_config_from(path: Option<&Path>) -> Result<HyakuninConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("hyakunin.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("using config {}", path.display());
            parse_config_file(&path)?
        }
        None => HyakuninConfig::default(),
    };

    config.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<HyakuninConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<HyakuninConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("hyakunin"))
}
