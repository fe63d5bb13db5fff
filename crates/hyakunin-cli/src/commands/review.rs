//! The `hyakunin review` command.

use std::path::PathBuf;

use anyhow::Result;

use hyakunin_core::report::SessionReport;

use crate::display;

pub fn execute(report_path: PathBuf, format: String) -> Result<()> {
    let report = SessionReport::load_json(&report_path)?;

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            // text format
            println!("Session {}", report.id);
            println!(
                "Played {} ({}, {})",
                report.created_at.format("%Y-%m-%d %H:%M UTC"),
                report.config.order_mode,
                if report.completed { "completed" } else { "stopped early" }
            );
            println!("{}", report.summary.score_text());
            println!("{}", report.summary.grade_message());
            print!("{}", display::render_summary(&report.summary));
        }
    }

    Ok(())
}
