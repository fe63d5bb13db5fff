//! The `hyakunin play` command.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use rand::RngCore;

use hyakunin_core::report::SessionReport;
use hyakunin_core::session::{OrderMode, QuizSession, SessionState};
use hyakunin_core::{PoemCatalog, QuestionType, CHOICE_COUNT};

use crate::config::load_config_from;
use crate::display;

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Question order: sequential or random
    #[arg(long)]
    pub mode: Option<OrderMode>,

    /// Question types (comma-separated): lower, upper, author, poem
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<QuestionType>,

    /// Number of questions
    #[arg(long)]
    pub count: Option<usize>,

    /// Seed for a reproducible session
    #[arg(long)]
    pub seed: Option<u64>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Corpus JSON to use instead of the bundled poems
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Save a JSON report after each round, into DIR or the configured output_dir
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    pub save: Option<Option<PathBuf>>,
}

/// What to show after each answer.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackOptions {
    pub show_reading: bool,
    pub show_description: bool,
}

/// How the interactive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizExit {
    Completed,
    /// The player typed `q` or input ended.
    Quit,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let mut config = load_config_from(args.config.as_deref())?;
    if let Some(mode) = args.mode {
        config.order_mode = mode;
    }
    if !args.types.is_empty() {
        config.question_types = args.types;
    }
    if let Some(count) = args.count {
        config.max_questions = Some(count);
    }

    let path = super::data_path(args.data, config.data_path.as_deref());
    let (store, source) = super::load_store(path.as_deref())?;
    tracing::debug!("quizzing from {source}");

    let store = Arc::new(store);
    let catalog: Arc<dyn PoemCatalog> = store.clone();
    let mut session = match args.seed {
        Some(seed) => QuizSession::seeded(catalog, seed),
        None => QuizSession::new(catalog),
    };
    session
        .start(config.session_config(store.count()))
        .context("failed to start quiz")?;

    let options = FeedbackOptions {
        show_reading: config.show_reading,
        show_description: config.show_description,
    };

    let save_dir = args
        .save
        .map(|dir| dir.unwrap_or_else(|| config.output_dir.clone()));

    let stdin = io::stdin();
    let stdout = io::stdout();
    play_rounds(
        &mut session,
        store.as_ref(),
        &mut stdin.lock(),
        &mut stdout.lock(),
        &options,
        save_dir.as_deref(),
    )?;

    Ok(())
}

/// Play the started session, then offer to restart it with the same settings
/// until the player declines or quits. Returns the number of rounds played.
pub fn play_rounds<R: RngCore>(
    session: &mut QuizSession<R>,
    catalog: &dyn PoemCatalog,
    input: &mut impl BufRead,
    out: &mut impl Write,
    options: &FeedbackOptions,
    save_dir: Option<&Path>,
) -> Result<usize> {
    let mut rounds = 0;
    loop {
        let exit = run_quiz(session, catalog, input, out, options)?;
        rounds += 1;

        match exit {
            QuizExit::Completed => writeln!(out, "\nクイズ終了！")?,
            QuizExit::Quit => writeln!(out, "\nクイズを中断しました。")?,
        }
        let summary = session.summary()?;
        writeln!(out, "{}", summary.score_text())?;
        writeln!(out, "{}", summary.grade_message())?;
        write!(out, "{}", display::render_summary(&summary))?;

        if let Some(dir) = save_dir {
            let report = SessionReport::from_session(session)?;
            let path = dir.join(report.file_name());
            report.save_json(&path)?;
            writeln!(out, "\nReport saved to {}", path.display())?;
        }

        if exit == QuizExit::Quit || !ask_play_again(input, out)? {
            return Ok(rounds);
        }
        session.restart()?;
    }
}

/// Ask whether to play again; only an explicit yes counts.
pub fn ask_play_again(input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(out, "\nもう一度同じ設定で遊びますか？ (y/N): ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    let answer = line.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes" | "はい"))
}

/// Drive a started session from `input` until it completes or the player quits.
pub fn run_quiz<R: RngCore>(
    session: &mut QuizSession<R>,
    catalog: &dyn PoemCatalog,
    input: &mut impl BufRead,
    out: &mut impl Write,
    options: &FeedbackOptions,
) -> Result<QuizExit> {
    while session.state() == SessionState::InProgress {
        writeln!(out, "\n[{}] {}", session.progress(), session.score_text())?;

        let question = session.current_question()?.clone();
        writeln!(
            out,
            "{}: {}\n\n  {}\n",
            question.question_type.display_name(),
            question.instruction,
            question.prompt
        )?;
        for (i, choice) in question.choices.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, choice)?;
        }

        let outcome = loop {
            write!(out, "\n答え (1-{CHOICE_COUNT}, q で終了): ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(QuizExit::Quit);
            }
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") {
                return Ok(QuizExit::Quit);
            }

            let Ok(number) = line.parse::<usize>() else {
                writeln!(out, "1〜{CHOICE_COUNT} の数字を入力してください。")?;
                continue;
            };
            // 0 maps past the end so it is rejected like any other bad number.
            let index = number.checked_sub(1).unwrap_or(CHOICE_COUNT);

            match session.submit_answer(index) {
                Ok(outcome) => break outcome,
                Err(e) if e.is_input_error() => {
                    writeln!(out, "1〜{CHOICE_COUNT} の数字を入力してください。")?;
                    tracing::debug!("rejected answer {number}: {e}");
                }
                Err(e) => return Err(e.into()),
            }
        };

        if outcome.correct {
            writeln!(out, "\n◯ 正解！")?;
        } else {
            writeln!(
                out,
                "\n✕ 不正解… 正解は {}. {}",
                outcome.correct_index + 1,
                outcome.correct_text
            )?;
        }

        let poem = catalog.get(outcome.poem_id)?;
        writeln!(
            out,
            "\n{}",
            poem.explanation(options.show_reading, options.show_description)
        )?;

        session.advance()?;
    }

    Ok(QuizExit::Completed)
}
