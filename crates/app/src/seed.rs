//! Sample content for a fresh database.

use anyhow::Result;
use quiz_core::model::{Difficulty, QuestionDraft, QuizId, QuizInfo};
use services::AppServices;
use tracing::info;

/// Counts of what `seed` inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub questions: usize,
    pub quizzes: usize,
}

pub fn sample_quizzes() -> Result<Vec<QuizInfo>> {
    let rows = [
        (
            1,
            "Process Management",
            "Operating Systems",
            Difficulty::Medium,
            30,
            15,
            "Test your knowledge of process scheduling and management",
        ),
        (
            2,
            "OOP Concepts",
            "Java",
            Difficulty::Easy,
            20,
            10,
            "Object-oriented programming fundamentals",
        ),
        (
            3,
            "SQL Queries",
            "DBMS",
            Difficulty::Medium,
            25,
            12,
            "Advanced SQL query writing and optimization",
        ),
        (
            4,
            "TCP/IP Protocol",
            "Computer Networks",
            Difficulty::Hard,
            40,
            20,
            "Deep dive into TCP/IP stack and networking protocols",
        ),
        (
            5,
            "Binary Trees",
            "DSA",
            Difficulty::Medium,
            35,
            18,
            "Tree data structures and algorithms",
        ),
        (
            6,
            "Logical Reasoning",
            "Aptitude",
            Difficulty::Easy,
            15,
            8,
            "Logical reasoning and problem solving",
        ),
    ];

    let mut quizzes = Vec::with_capacity(rows.len());
    for (id, title, subject, difficulty, minutes, count, description) in rows {
        quizzes.push(QuizInfo::new(
            QuizId::new(id),
            title,
            subject,
            difficulty,
            minutes,
            count,
            Some(description.to_owned()),
        )?);
    }
    Ok(quizzes)
}

#[must_use]
pub fn sample_questions() -> Vec<QuestionDraft> {
    vec![
        QuestionDraft::new(
            "Which scheduling algorithm can cause starvation?",
            ["Round Robin", "Shortest Job First", "FCFS", "None of these"],
            "Shortest Job First",
            Some("Operating Systems"),
        ),
        QuestionDraft::new(
            "Which state does a process enter while waiting for I/O?",
            ["Running", "Ready", "Blocked", "Terminated"],
            "Blocked",
            Some("Operating Systems"),
        ),
        QuestionDraft::new(
            "Which keyword is used to inherit a class in Java?",
            ["implements", "extends", "super", "this"],
            "extends",
            Some("Java"),
        ),
        QuestionDraft::new(
            "Which OOP principle hides internal state behind methods?",
            ["Inheritance", "Polymorphism", "Encapsulation", "Abstraction"],
            "Encapsulation",
            Some("Java"),
        ),
        QuestionDraft::new(
            "Which clause filters groups after aggregation?",
            ["WHERE", "HAVING", "ORDER BY", "LIMIT"],
            "HAVING",
            Some("DBMS"),
        ),
        QuestionDraft::new(
            "Which normal form removes partial dependencies?",
            ["1NF", "2NF", "3NF", "BCNF"],
            "2NF",
            Some("DBMS"),
        ),
        QuestionDraft::new(
            "Which layer does TCP belong to?",
            ["Network", "Transport", "Session", "Data link"],
            "Transport",
            Some("Computer Networks"),
        ),
        QuestionDraft::new(
            "How many packets does a TCP handshake take?",
            ["1", "2", "3", "4"],
            "3",
            Some("Computer Networks"),
        ),
        QuestionDraft::new(
            "Which traversal visits a binary search tree in sorted order?",
            ["Preorder", "Inorder", "Postorder", "Level order"],
            "Inorder",
            Some("DSA"),
        ),
        QuestionDraft::new(
            "What is the maximum number of nodes at level 3 of a binary tree (root at 0)?",
            ["4", "6", "8", "16"],
            "8",
            Some("DSA"),
        ),
        QuestionDraft::new(
            "Find the next number: 2, 6, 12, 20, ?",
            ["28", "30", "32", "36"],
            "30",
            Some("Aptitude"),
        ),
        QuestionDraft::new(
            "If all roses are flowers and some flowers fade, which must be true?",
            [
                "All roses fade",
                "Some roses fade",
                "No roses fade",
                "None of these must be true",
            ],
            "None of these must be true",
            Some("Aptitude"),
        ),
    ]
}

/// Insert the sample catalog and, when the bank is empty, the sample questions.
///
/// # Errors
///
/// Returns an error if storage rejects a write.
pub async fn seed(services: &AppServices) -> Result<SeedReport> {
    let quizzes = sample_quizzes()?;
    services.catalog().upsert_all(&quizzes).await?;

    let questions = &services.storage().questions;
    let inserted = if questions.list_questions(None).await?.is_empty() {
        questions.insert_questions(&sample_questions()).await?.len()
    } else {
        0
    };

    let report = SeedReport {
        questions: inserted,
        quizzes: quizzes.len(),
    };
    info!(questions = report.questions, quizzes = report.quizzes, "seed complete");
    Ok(report)
}
