//! Accuracy and score statistics for a quiz session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerRecord, PoemId, QuestionType};

/// Fraction of correct answers, or `0.0` when nothing was answered.
pub fn accuracy(correct: usize, answered: usize) -> f64 {
    if answered == 0 {
        return 0.0;
    }
    correct as f64 / answered as f64
}

/// Tiered verdict on a session's accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// 90% or better.
    Master,
    /// 70% or better.
    Good,
    /// 50% or better.
    Fair,
    NeedsPractice,
}

impl Grade {
    /// Grade for `correct` out of `answered`; nothing answered is `NeedsPractice`.
    pub fn from_counts(correct: usize, answered: usize) -> Self {
        if answered == 0 {
            return Grade::NeedsPractice;
        }
        // Integer comparison keeps exact boundaries such as 9/10 in the upper tier.
        let scaled = correct * 100;
        if scaled >= 90 * answered {
            Grade::Master
        } else if scaled >= 70 * answered {
            Grade::Good
        } else if scaled >= 50 * answered {
            Grade::Fair
        } else {
            Grade::NeedsPractice
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Grade::Master => "素晴らしい！百人一首マスターですね！",
            Grade::Good => "よくできました！もう少しで完璧です！",
            Grade::Fair => "まずまずの成績です。もう一度挑戦してみましょう！",
            Grade::NeedsPractice => "もっと練習が必要かもしれません。頑張りましょう！",
        }
    }
}

/// Correct/total counts for one question type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeStats {
    pub total: usize,
    pub correct: usize,
}

impl TypeStats {
    pub fn accuracy(&self) -> f64 {
        accuracy(self.correct, self.total)
    }
}

/// One answered question in a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// Index into the session's poem sequence.
    pub position: usize,
    pub poem_id: PoemId,
    pub question_type: QuestionType,
    pub correct: bool,
    pub chosen_text: String,
    pub correct_text: String,
}

/// Partial or final results of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Number of answered questions.
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// `correct / total`, 0.0 before the first answer.
    pub accuracy: f64,
    /// Number of questions the session was started with.
    pub planned: usize,
    /// Questions not yet answered.
    pub remaining: usize,
    /// Per question type counts.
    pub by_type: BTreeMap<QuestionType, TypeStats>,
    /// Answered questions in the order they were asked.
    pub breakdown: Vec<SummaryEntry>,
}

impl SessionSummary {
    /// Summarize a session history against the planned question count.
    pub fn from_history(history: &[AnswerRecord], planned: usize) -> Self {
        let mut by_type: BTreeMap<QuestionType, TypeStats> = BTreeMap::new();
        let mut breakdown = Vec::with_capacity(history.len());

        for record in history {
            let stats = by_type.entry(record.question.question_type).or_default();
            stats.total += 1;
            if record.correct {
                stats.correct += 1;
            }

            breakdown.push(SummaryEntry {
                position: record.position,
                poem_id: record.question.poem_id,
                question_type: record.question.question_type,
                correct: record.correct,
                chosen_text: record.selected_text().to_string(),
                correct_text: record.question.correct_answer().to_string(),
            });
        }

        let total = history.len();
        let correct = history.iter().filter(|r| r.correct).count();

        Self {
            total,
            correct,
            incorrect: total - correct,
            accuracy: accuracy(correct, total),
            planned,
            remaining: planned.saturating_sub(total),
            by_type,
            breakdown,
        }
    }

    /// Accuracy as a percentage.
    pub fn percent(&self) -> f64 {
        self.accuracy * 100.0
    }

    /// Score line in the form "スコア: 3/5 (60.0%)".
    pub fn score_text(&self) -> String {
        format!(
            "スコア: {}/{} ({:.1}%)",
            self.correct,
            self.total,
            self.percent()
        )
    }

    pub fn grade(&self) -> Grade {
        Grade::from_counts(self.correct, self.total)
    }

    /// Encouragement shown with the final score.
    pub fn grade_message(&self) -> &'static str {
        self.grade().message()
    }
}
