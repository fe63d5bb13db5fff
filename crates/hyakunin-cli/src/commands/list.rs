//! The `hyakunin list` command.

use std::path::PathBuf;

use anyhow::{bail, Result};

use hyakunin_core::PoemCatalog;

use crate::config::load_config_from;
use crate::display::poem_table;

pub fn execute(author: Option<String>, data: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(None)?;
    let path = super::data_path(data, config.data_path.as_deref());
    let (store, _) = super::load_store(path.as_deref())?;

    match author {
        Some(author) => {
            let poems = store.poems_by_author(&author);
            if poems.is_empty() {
                bail!("no poems by author '{author}'");
            }
            println!("{}", poem_table(poems));
        }
        None => println!("{}", poem_table(store.all())),
    }
    Ok(())
}
