//! Core data model types.
//!
//! Poems are loaded once and never mutated. Questions, answer records and
//! answer outcomes are plain values produced by the generator and the quiz
//! session.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Poem number in the anthology (1-100 for the standard corpus).
pub type PoemId = u32;

/// Number of choices in every question.
pub const CHOICE_COUNT: usize = 4;

/// Number of wrong choices drawn for every question.
pub const DISTRACTOR_COUNT: usize = CHOICE_COUNT - 1;

/// A single poem of the anthology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
    /// Poem number, unique within a corpus.
    pub id: PoemId,
    /// Poet name.
    pub author: String,
    /// Upper verse (kami no ku).
    #[serde(rename = "upper")]
    pub upper_verse: String,
    /// Lower verse (shimo no ku).
    #[serde(rename = "lower")]
    pub lower_verse: String,
    /// Kana reading of the upper verse.
    #[serde(default)]
    pub reading_upper: String,
    /// Kana reading of the lower verse.
    #[serde(default)]
    pub reading_lower: String,
    /// Short commentary shown as answer feedback.
    #[serde(default)]
    pub description: String,
}

impl Poem {
    /// Upper and lower verse joined by an ideographic space.
    pub fn full_text(&self) -> String {
        format!("{}\u{3000}{}", self.upper_verse, self.lower_verse)
    }

    /// Project one of the fields used as question choices.
    pub fn field(&self, field: ChoiceField) -> String {
        match field {
            ChoiceField::Author => self.author.clone(),
            ChoiceField::UpperVerse => self.upper_verse.clone(),
            ChoiceField::LowerVerse => self.lower_verse.clone(),
            ChoiceField::FullPoem => self.full_text(),
        }
    }

    /// Feedback block shown after a question about this poem is answered.
    pub fn explanation(&self, show_reading: bool, show_description: bool) -> String {
        let mut text = format!(
            "【第{}首】\n作者：{}\n\n上の句：{}\n下の句：{}\n",
            self.id, self.author, self.upper_verse, self.lower_verse
        );

        if show_reading && !self.reading_upper.is_empty() {
            text.push_str("\n読み：\n");
            text.push_str(&format!("  {}\n", self.reading_upper));
            text.push_str(&format!("  {}\n", self.reading_lower));
        }

        if show_description && !self.description.is_empty() {
            text.push_str("\n解説：\n");
            text.push_str(&self.description);
        }

        text
    }
}

/// Which poem field a question shows or asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceField {
    Author,
    UpperVerse,
    LowerVerse,
    /// Upper and lower verse together.
    FullPoem,
}

impl fmt::Display for ChoiceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceField::Author => write!(f, "author"),
            ChoiceField::UpperVerse => write!(f, "upper verse"),
            ChoiceField::LowerVerse => write!(f, "lower verse"),
            ChoiceField::FullPoem => write!(f, "poem"),
        }
    }
}

/// The four kinds of question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Show the upper verse, choose the lower verse.
    #[serde(alias = "lower", alias = "lower_match")]
    LowerVerse,
    /// Show the lower verse, choose the upper verse.
    #[serde(alias = "upper", alias = "upper_match")]
    UpperVerse,
    /// Show the whole poem, choose the author.
    #[serde(alias = "author_match")]
    Author,
    /// Show the author, choose the poem.
    #[serde(alias = "poem", alias = "poem_by_author")]
    PoemFromAuthor,
}

impl QuestionType {
    /// Every question type, in display order.
    pub const ALL: [QuestionType; 4] = [
        QuestionType::LowerVerse,
        QuestionType::UpperVerse,
        QuestionType::Author,
        QuestionType::PoemFromAuthor,
    ];

    /// Field shown to the player.
    pub fn prompt_field(self) -> ChoiceField {
        match self {
            QuestionType::LowerVerse => ChoiceField::UpperVerse,
            QuestionType::UpperVerse => ChoiceField::LowerVerse,
            QuestionType::Author => ChoiceField::FullPoem,
            QuestionType::PoemFromAuthor => ChoiceField::Author,
        }
    }

    /// Field the correct answer and the distractors are drawn from.
    pub fn answer_field(self) -> ChoiceField {
        match self {
            QuestionType::LowerVerse => ChoiceField::LowerVerse,
            QuestionType::UpperVerse => ChoiceField::UpperVerse,
            QuestionType::Author => ChoiceField::Author,
            QuestionType::PoemFromAuthor => ChoiceField::FullPoem,
        }
    }

    /// Name shown in menus and statistics.
    pub fn display_name(self) -> &'static str {
        match self {
            QuestionType::LowerVerse => "下の句当て",
            QuestionType::UpperVerse => "上の句当て",
            QuestionType::Author => "作者当て",
            QuestionType::PoemFromAuthor => "作者から歌当て",
        }
    }

    /// Instruction line printed above the prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            QuestionType::LowerVerse => "次の上の句に続く下の句を選んでください",
            QuestionType::UpperVerse => "次の下の句に対応する上の句を選んでください",
            QuestionType::Author => "次の歌の作者を選んでください",
            QuestionType::PoemFromAuthor => "次の作者の歌を選んでください",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::LowerVerse => write!(f, "lower"),
            QuestionType::UpperVerse => write!(f, "upper"),
            QuestionType::Author => write!(f, "author"),
            QuestionType::PoemFromAuthor => write!(f, "poem"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lower" | "lower_verse" | "lower_match" => Ok(QuestionType::LowerVerse),
            "upper" | "upper_verse" | "upper_match" => Ok(QuestionType::UpperVerse),
            "author" | "author_match" => Ok(QuestionType::Author),
            "poem" | "poem_from_author" | "poem_by_author" => Ok(QuestionType::PoemFromAuthor),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A multiple-choice question about one poem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Poem the question is about.
    pub poem_id: PoemId,
    /// Kind of question.
    pub question_type: QuestionType,
    /// Instruction line for the player.
    pub instruction: String,
    /// Text shown to the player (verse, poem or author).
    pub prompt: String,
    /// The choices, in display order.
    pub choices: [String; CHOICE_COUNT],
    /// Slot holding the correct answer.
    pub correct_index: usize,
    /// 1-based position within a session, when asked as part of one.
    #[serde(default)]
    pub number: Option<usize>,
}

impl Question {
    /// Text of the correct choice.
    pub fn correct_answer(&self) -> &str {
        &self.choices[self.correct_index]
    }

    /// Whether `index` selects the correct choice.
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

/// One answered question in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Index into the session's poem sequence.
    pub position: usize,
    /// The question as it was shown.
    pub question: Question,
    /// Choice the player selected.
    pub selected_index: usize,
    /// Whether the selection was correct.
    pub correct: bool,
    /// When the answer was (last) submitted.
    pub answered_at: DateTime<Utc>,
}

impl AnswerRecord {
    /// Text of the selected choice.
    pub fn selected_text(&self) -> &str {
        &self.question.choices[self.selected_index]
    }
}

/// What the presentation layer needs to render answer feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub poem_id: PoemId,
    pub correct: bool,
    pub correct_index: usize,
    pub correct_text: String,
    pub selected_text: String,
    pub description: String,
}

/// Normalize choice text for duplicate detection.
///
/// Lowercases and collapses every whitespace run (including U+3000) into a
/// single ASCII space.
pub fn normalize_choice(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
