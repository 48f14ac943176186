use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use services::{AppServices, Clock, QuizConfig};

mod cli;
mod commands;
mod logging;
mod seed;

use crate::cli::{Cli, Command};

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its directory so the pool can open it.
fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid sqlite url: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid sqlite url: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<QuizConfig> {
    let mut config = QuizConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_api_base_url(base_url)?;
    }
    let db_url = cli.db_url.as_deref().unwrap_or(&config.db_url);
    let db_url = normalize_sqlite_url(db_url);
    Ok(config.with_db_url(db_url))
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    prepare_sqlite_file(&config.db_url)?;
    let services = AppServices::new_sqlite(config, Clock::system())
        .await
        .context("opening quiz storage")?;

    match &cli.command {
        Command::Play(args) => commands::run_play(&services, args).await,
        Command::Quizzes(args) => commands::run_quizzes(&services, args).await,
        Command::Seed => {
            let report = seed::seed(&services).await?;
            println!(
                "Seeded {} questions and {} quizzes.",
                report.questions, report.quizzes
            );
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging();

    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_explicit_sqlite_urls() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url(" sqlite:///tmp/quiz.sqlite3 "),
            "sqlite:///tmp/quiz.sqlite3"
        );
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/quiz.sqlite3");
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/quiz.sqlite3"));
    }

    #[test]
    fn rejects_urls_without_a_path() {
        assert!(prepare_sqlite_file("sqlite://").is_err());
        assert!(prepare_sqlite_file("postgres://db").is_err());
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
    }
}
