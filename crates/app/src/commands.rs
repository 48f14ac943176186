//! Subcommand implementations.

use std::io::Write;

use anyhow::{Context, Result};
use quiz_core::model::{CatalogFilter, OptionSlot, Outcome, QuizId, QuizResult};
use services::{AppServices, QuizRequest, QuizRunner, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::cli::{PlayArgs, QuizzesArgs};

/// A line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Slot(OptionSlot),
    Text(String),
}

/// Single letters `a`..`d` pick an option by position; anything else is option text.
#[must_use]
pub fn parse_answer(line: &str) -> Option<Answer> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut chars = trimmed.chars();
    if let (Some(letter), None) = (chars.next(), chars.next()) {
        if let Some(slot) = OptionSlot::from_letter(letter) {
            return Some(Answer::Slot(slot));
        }
    }
    Some(Answer::Text(trimmed.to_owned()))
}

pub async fn run_play(services: &AppServices, args: &PlayArgs) -> Result<()> {
    let request = match args.quiz {
        Some(id) => {
            let quiz = services
                .catalog()
                .get(QuizId::new(id))
                .await
                .with_context(|| format!("quiz {id} is not in the catalog"))?;
            QuizRequest::from_quiz(&quiz)
        }
        None => match &args.subject {
            Some(subject) => QuizRequest::new(format!("{subject} Quiz")).with_subject(subject),
            None => QuizRequest::new("Quick Quiz"),
        },
    };

    let quiz_loop = services
        .quiz_loop(args.source.into())
        .with_shuffle(args.shuffle);
    let mut runner = match quiz_loop.start_quiz(request).await {
        Ok(runner) => runner,
        Err(SessionError::Empty | SessionError::Fetch(_)) => {
            println!("No questions available.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("{}", runner.request().title);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while !runner.is_complete() {
        print_question(&runner)?;
        let Some(line) = lines.next_line().await? else {
            runner.cancel();
            println!("\nQuiz abandoned.");
            return Ok(());
        };
        let Some(answer) = parse_answer(&line) else {
            continue;
        };

        let outcome = match answer {
            Answer::Slot(slot) => runner.select_slot(slot),
            Answer::Text(text) => runner.select_option(&text),
        };
        if let Outcome::Recorded { correct } = outcome {
            print_feedback(&runner, correct);
            let _ = runner.wait_reveal().await;
        }
    }

    let result = quiz_loop.finish(&runner)?;
    print_result(&result);

    if args.submit {
        match quiz_loop.submit(&runner).await {
            Ok(graded) => println!("Submitted: {}/{} graded correct", graded.score, graded.total),
            Err(err) => warn!(error = %err, "submission failed"),
        }
    }
    Ok(())
}

fn print_question(runner: &QuizRunner) -> Result<()> {
    let Some(question) = runner.session().current_question() else {
        return Ok(());
    };
    let progress = runner.progress();
    println!();
    println!(
        "Question {} of {}: {}",
        progress.answered + 1,
        progress.total,
        question.text()
    );
    for slot in OptionSlot::ALL {
        println!("  {}) {}", slot.letter(), question.option(slot));
    }
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

fn print_feedback(runner: &QuizRunner, correct: bool) {
    if correct {
        println!("Correct!");
        return;
    }
    if let Some(question) = runner.session().current_question() {
        println!("Wrong. The answer is {}.", question.correct_answer());
    }
}

fn print_result(result: &QuizResult) {
    println!();
    println!("{} ({})", result.quiz_title, result.subject);
    println!(
        "Score: {}% ({}/{}) grade {}",
        result.score,
        result.correct_answers,
        result.total_questions,
        result.grade()
    );
    println!("{}", result.performance().message());
    print!("Time: {}", result.formatted_time());
    match result.questions_per_minute() {
        Some(speed) => println!(", {speed:.1} questions per minute"),
        None => println!(),
    }
}

pub async fn run_quizzes(services: &AppServices, args: &QuizzesArgs) -> Result<()> {
    let filter = CatalogFilter {
        search: args.search.clone(),
        subject: args.subject.clone(),
        difficulty: args.difficulty.map(Into::into),
    };
    let quizzes = services.catalog().list(&filter).await?;
    if quizzes.is_empty() {
        println!("No quizzes found.");
        return Ok(());
    }

    for quiz in quizzes {
        println!(
            "{:>3}  {:<22} {:<18} {:<6} {:>3} min  {:>2} questions",
            quiz.id().value(),
            quiz.title(),
            quiz.subject(),
            quiz.difficulty().as_str(),
            quiz.duration_minutes(),
            quiz.question_count()
        );
        if let Some(description) = quiz.description() {
            println!("     {description}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_select_slots() {
        assert_eq!(parse_answer("a"), Some(Answer::Slot(OptionSlot::A)));
        assert_eq!(parse_answer(" D \n"), Some(Answer::Slot(OptionSlot::D)));
    }

    #[test]
    fn other_input_is_option_text() {
        assert_eq!(parse_answer("Stack"), Some(Answer::Text("Stack".into())));
        assert_eq!(parse_answer("e"), Some(Answer::Text("e".into())));
        assert_eq!(parse_answer("4"), Some(Answer::Text("4".into())));
    }

    #[test]
    fn blank_input_is_ignored() {
        assert_eq!(parse_answer("   "), None);
    }
}
