//! The `hyakunin validate` command.

use std::path::PathBuf;

use anyhow::Result;

use hyakunin_core::parser::lint_corpus;
use hyakunin_core::PoemCatalog;

use crate::config::load_config_from;

pub fn execute(data: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(None)?;
    let path = super::data_path(data, config.data_path.as_deref());
    let (store, source) = super::load_store(path.as_deref())?;

    println!("Corpus: {source} ({} poems, {} authors)", store.count(), store.authors().len());

    let warnings = lint_corpus(store.all());
    for w in &warnings {
        let prefix = w
            .poem_id
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Corpus valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
