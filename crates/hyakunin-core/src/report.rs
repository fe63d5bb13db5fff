//! Session reports with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{QuestionTypeMode, QuizSession, SessionConfig, SessionState};
use crate::statistics::SessionSummary;

/// The record of one finished or abandoned quiz session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Id of the session the report was taken from.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Configuration the session was started with.
    pub config: SessionConfig,
    /// Whether every planned question was answered.
    pub completed: bool,
    /// Scores and per-question breakdown.
    pub summary: SessionSummary,
}

impl SessionReport {
    /// Snapshot a started session.
    pub fn from_session<R: RngCore>(session: &QuizSession<R>) -> Result<Self> {
        let summary = session
            .summary()
            .context("cannot report on a session that was never started")?;
        Ok(Self {
            id: session.id(),
            created_at: Utc::now(),
            config: session.config().cloned().unwrap_or_default(),
            completed: session.state() == SessionState::Completed,
            summary,
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// File name used when saving into a directory.
    pub fn file_name(&self) -> String {
        format!(
            "session-{}-{}.json",
            self.created_at.format("%Y%m%d-%H%M%S"),
            &self.id.simple().to_string()[..8]
        )
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let summary = &self.summary;
        let mut md = String::new();

        md.push_str("# Hyakunin Isshu quiz report\n\n");
        md.push_str(&format!("- **Session:** {}\n", self.id));
        md.push_str(&format!(
            "- **Date:** {}\n",
            self.created_at.format("%Y-%m-%d %H:%M UTC")
        ));
        md.push_str(&format!("- **Order:** {}\n", self.config.order_mode));
        md.push_str(&format!(
            "- **Question types:** {}\n",
            describe_types(&self.config.question_type_mode)
        ));
        md.push_str(&format!(
            "- **Status:** {}\n\n",
            if self.completed {
                "completed".to_string()
            } else {
                format!("stopped with {} of {} unanswered", summary.remaining, summary.planned)
            }
        ));

        md.push_str(&format!(
            "**Score:** {}/{} ({:.1}%)\n\n",
            summary.correct,
            summary.total,
            summary.percent()
        ));
        md.push_str(&format!("{}\n\n", summary.grade_message()));

        if !summary.by_type.is_empty() {
            md.push_str("## By question type\n\n");
            md.push_str("| Type | Correct | Total | Accuracy |\n");
            md.push_str("|------|---------|-------|----------|\n");
            for (question_type, stats) in &summary.by_type {
                md.push_str(&format!(
                    "| {} | {} | {} | {:.1}% |\n",
                    question_type.display_name(),
                    stats.correct,
                    stats.total,
                    stats.accuracy() * 100.0
                ));
            }
            md.push('\n');
        }

        let misses: Vec<_> = summary.breakdown.iter().filter(|e| !e.correct).collect();
        if !misses.is_empty() {
            md.push_str("## Missed questions\n\n");
            md.push_str("| # | Poem | Type | Your answer | Correct answer |\n");
            md.push_str("|---|------|------|-------------|----------------|\n");
            for entry in misses {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    entry.position + 1,
                    entry.poem_id,
                    entry.question_type.display_name(),
                    entry.chosen_text,
                    entry.correct_text
                ));
            }
        }

        md
    }
}

fn describe_types(mode: &QuestionTypeMode) -> String {
    match mode {
        QuestionTypeMode::Fixed(question_type) => question_type.display_name().to_string(),
        QuestionTypeMode::Random => "random".to_string(),
        QuestionTypeMode::Mixed(types) => types
            .iter()
            .map(|t| t.display_name())
            .collect::<Vec<_>>()
            .join(", "),
    }
}
