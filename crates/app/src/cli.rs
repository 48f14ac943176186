//! Command-line definitions for the quiz client.

use clap::{Args, Parser, Subcommand, ValueEnum};
use quiz_core::model::Difficulty;
use services::SourceKind;

#[derive(Parser, Debug)]
#[command(name = "quiz", version, about = "Take multiple-choice quizzes from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// `SQLite` database url (overrides `QUIZ_DB_URL`).
    #[arg(long = "db", value_name = "URL", global = true)]
    pub db_url: Option<String>,

    /// Question bank base url (overrides `QUIZ_API_BASE_URL`).
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a quiz interactively.
    Play(PlayArgs),

    /// List the quiz catalog.
    Quizzes(QuizzesArgs),

    /// Insert sample questions and catalog entries into the local database.
    Seed,
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Catalog quiz to play; its subject selects the questions.
    #[arg(long = "quiz", value_name = "ID")]
    pub quiz: Option<u64>,

    /// Only ask questions of this subject.
    #[arg(long = "subject", conflicts_with = "quiz")]
    pub subject: Option<String>,

    /// Where to load questions from.
    #[arg(long = "source", value_enum, default_value = "http")]
    pub source: SourceArg,

    /// Ask questions in random order.
    #[arg(long = "shuffle")]
    pub shuffle: bool,

    /// Send answers for grading once the quiz is complete.
    #[arg(long = "submit")]
    pub submit: bool,
}

#[derive(Args, Debug, Default)]
pub struct QuizzesArgs {
    /// Case-insensitive text to look for in titles and subjects.
    #[arg(long = "search")]
    pub search: Option<String>,

    #[arg(long = "subject")]
    pub subject: Option<String>,

    #[arg(long = "difficulty", value_enum)]
    pub difficulty: Option<DifficultyArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Http,
    Db,
}

impl From<SourceArg> for SourceKind {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::Http => SourceKind::Http,
            SourceArg::Db => SourceKind::Stored,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_play_flags() {
        let cli = Cli::try_parse_from([
            "quiz", "play", "--subject", "Java", "--source", "db", "--shuffle", "--db",
            "sqlite::memory:",
        ])
        .unwrap();

        assert_eq!(cli.db_url.as_deref(), Some("sqlite::memory:"));
        let Command::Play(args) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.subject.as_deref(), Some("Java"));
        assert_eq!(args.source, SourceArg::Db);
        assert!(args.shuffle);
        assert!(!args.submit);
    }

    #[test]
    fn quiz_and_subject_conflict() {
        let err = Cli::try_parse_from(["quiz", "play", "--quiz", "2", "--subject", "Java"]);
        assert!(err.is_err());
    }

    #[test]
    fn parses_catalog_filters() {
        let cli =
            Cli::try_parse_from(["quiz", "quizzes", "--difficulty", "hard", "--search", "tcp"])
                .unwrap();
        let Command::Quizzes(args) = cli.command else {
            panic!("expected quizzes");
        };
        assert_eq!(args.difficulty, Some(DifficultyArg::Hard));
        assert_eq!(args.search.as_deref(), Some("tcp"));
    }
}
