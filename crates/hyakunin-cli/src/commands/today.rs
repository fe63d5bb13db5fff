//! The `hyakunin today` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};

use hyakunin_core::Poem;

use crate::config::load_config_from;

pub fn execute(date: Option<NaiveDate>, more: usize, data: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(None)?;
    let path = super::data_path(data, config.data_path.as_deref());
    let (store, _) = super::load_store(path.as_deref())?;

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let poems = store.daily_poems(date, more);
    print!("{}", render(date, &poems));
    Ok(())
}

/// The poem of the day first, then any extra picks.
fn render(date: NaiveDate, poems: &[&Poem]) -> String {
    let mut text = String::new();
    let Some((today, rest)) = poems.split_first() else {
        return text;
    };

    text.push_str(&format!("今日の一首 ({})\n\n", date.format("%Y-%m-%d")));
    text.push_str(&format!("{}\n", today.explanation(true, true)));
    if !rest.is_empty() {
        text.push_str("\nほかのおすすめ\n\n");
        for poem in rest {
            text.push_str(&format!("{}\n", poem.explanation(true, false)));
        }
    }
    text
}
