//! Terminal tables for poems and session results.

use comfy_table::{Cell, Table};

use hyakunin_core::statistics::SessionSummary;
use hyakunin_core::Poem;

/// Overall score of a session.
pub fn score_table(summary: &SessionSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["回答数", "正解", "不正解", "未回答", "正答率"]);
    table.add_row(vec![
        Cell::new(summary.total),
        Cell::new(summary.correct),
        Cell::new(summary.incorrect),
        Cell::new(summary.remaining),
        Cell::new(format!("{:.1}%", summary.percent())),
    ]);
    table
}

/// Accuracy per question type.
pub fn type_table(summary: &SessionSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["問題タイプ", "正解", "回答数", "正答率"]);
    for (question_type, stats) in &summary.by_type {
        table.add_row(vec![
            Cell::new(question_type.display_name()),
            Cell::new(stats.correct),
            Cell::new(stats.total),
            Cell::new(format!("{:.1}%", stats.accuracy() * 100.0)),
        ]);
    }
    table
}

/// Questions answered wrongly, or `None` when there were none.
pub fn missed_table(summary: &SessionSummary) -> Option<Table> {
    let mut misses = summary.breakdown.iter().filter(|e| !e.correct).peekable();
    misses.peek()?;

    let mut table = Table::new();
    table.set_header(vec!["#", "首", "問題タイプ", "あなたの答え", "正解"]);
    for entry in misses {
        table.add_row(vec![
            Cell::new(entry.position + 1),
            Cell::new(entry.poem_id),
            Cell::new(entry.question_type.display_name()),
            Cell::new(&entry.chosen_text),
            Cell::new(&entry.correct_text),
        ]);
    }
    Some(table)
}

/// Full result block printed at the end of `play` and by `review`.
pub fn render_summary(summary: &SessionSummary) -> String {
    let mut out = format!("{}\n", score_table(summary));
    if !summary.by_type.is_empty() {
        out.push_str(&format!("\n{}\n", type_table(summary)));
    }
    if let Some(table) = missed_table(summary) {
        out.push_str(&format!("\n間違えた問題:\n{table}\n"));
    }
    out
}

/// One row per poem.
pub fn poem_table<'a>(poems: impl IntoIterator<Item = &'a Poem>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["番号", "作者", "上の句", "下の句"]);
    for poem in poems {
        table.add_row(vec![
            Cell::new(poem.id),
            Cell::new(&poem.author),
            Cell::new(&poem.upper_verse),
            Cell::new(&poem.lower_verse),
        ]);
    }
    table
}
