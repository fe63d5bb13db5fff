//! The `hyakunin show` command.

use std::path::PathBuf;

use anyhow::Result;

use hyakunin_core::{PoemCatalog, PoemId};

use crate::config::load_config_from;

pub fn execute(id: PoemId, data: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(None)?;
    let path = super::data_path(data, config.data_path.as_deref());
    let (store, _) = super::load_store(path.as_deref())?;

    let poem = store.get(id)?;
    println!("{}", poem.explanation(true, true));
    Ok(())
}
