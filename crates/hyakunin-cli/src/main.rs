//! hyakunin CLI: a terminal quiz over the Hyakunin Isshu.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use hyakunin_core::PoemId;

mod commands;
mod config;
mod display;

#[derive(Parser)]
#[command(name = "hyakunin", version, about = "Hyakunin Isshu quiz")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive quiz
    Play(commands::play::PlayArgs),

    /// Check a corpus file and report warnings
    Validate {
        /// Corpus JSON (defaults to the bundled poems)
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Show one poem with its reading and commentary
    Show {
        /// Poem number
        id: PoemId,

        /// Corpus JSON (defaults to the bundled poems)
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Show the poem of the day
    Today {
        /// Day to pick for, as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Also suggest this many other poems
        #[arg(long, default_value_t = 0)]
        more: usize,

        /// Corpus JSON (defaults to the bundled poems)
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// List poems
    List {
        /// Only poems by this author
        #[arg(long)]
        author: Option<String>,

        /// Corpus JSON (defaults to the bundled poems)
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Print a saved session report
    Review {
        /// Report JSON written by `play --save`
        report: PathBuf,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create a starter hyakunin.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hyakunin=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play(args) => commands::play::execute(args),
        Commands::Validate { data } => commands::validate::execute(data),
        Commands::Show { id, data } => commands::show::execute(id, data),
        Commands::Today { date, more, data } => commands::today::execute(date, more, data),
        Commands::List { author, data } => commands::list::execute(author, data),
        Commands::Review { report, format } => commands::review::execute(report, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
