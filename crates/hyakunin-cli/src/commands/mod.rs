pub mod init;
pub mod list;
pub mod play;
pub mod review;
pub mod show;
pub mod today;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use hyakunin_core::parser::LoadOptions;
use hyakunin_core::PoemStore;

/// Load the corpus at `path`, or the bundled one when no path is set.
///
/// Returns the store and a label naming where it came from.
pub fn load_store(path: Option<&Path>) -> Result<(PoemStore, String)> {
    match path {
        Some(path) => {
            let store = PoemStore::load(path, &LoadOptions::default())
                .with_context(|| format!("failed to load corpus {}", path.display()))?;
            Ok((store, path.display().to_string()))
        }
        None => {
            let store = PoemStore::bundled().context("bundled corpus is invalid")?;
            Ok((store, "bundled corpus".to_string()))
        }
    }
}

/// `--data` wins over the configured path.
pub fn data_path(flag: Option<PathBuf>, configured: Option<&Path>) -> Option<PathBuf> {
    flag.or_else(|| configured.map(Path::to_path_buf))
}
