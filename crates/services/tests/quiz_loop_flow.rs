use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{MatchPolicy, OptionSlot, Outcome, QuestionDraft, SubmitResponse};
use quiz_core::time::fixed_now;
use services::{Clock, QuizLoopService, QuizRequest, SessionError, StoredQuestionBank};
use storage::repository::{InMemoryRepository, QuestionRepository};

async fn seeded_repo() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    repo.insert_questions(&[
        QuestionDraft::new("First letter?", ["A", "X", "Y", "Z"], "A", Some("Alphabet")),
        QuestionDraft::new("Second letter?", ["X", "B", "Y", "D"], "B", Some("Alphabet")),
        QuestionDraft::new("Third letter?", ["X", "Y", "C", "Z"], "C", Some("Alphabet")),
        QuestionDraft::new("2 + 2?", ["3", "4", "5", "22"], "4", Some("Aptitude")),
    ])
    .await
    .unwrap();
    repo
}

fn service(repo: &InMemoryRepository, clock: Clock) -> QuizLoopService {
    QuizLoopService::new(clock, Arc::new(StoredQuestionBank::new(Arc::new(repo.clone()))))
}

#[tokio::test(start_paused = true)]
async fn plays_a_subject_quiz_to_completion() {
    let repo = seeded_repo().await;
    let mut clock = Clock::fixed(fixed_now());
    let loop_svc = service(&repo, clock);

    let mut runner = loop_svc
        .start_quiz(QuizRequest::new("Letters").with_subject("alphabet"))
        .await
        .unwrap();
    assert_eq!(runner.progress().total, 3);

    for answer in ["A", "D", "c"] {
        let _ = runner.select_option(answer);
        let _ = runner.wait_reveal().await;
    }
    assert!(runner.is_complete());

    clock.advance(chrono::Duration::seconds(42));
    let result = QuizLoopService::new(clock, Arc::new(StoredQuestionBank::new(Arc::new(repo))))
        .finish(&runner)
        .unwrap();
    assert_eq!(result.correct_answers, 2);
    assert_eq!(result.total_questions, 3);
    assert_eq!(result.time_spent, 42);
    assert_eq!(result.subject, "alphabet");

    let graded = loop_svc.submit(&runner).await.unwrap();
    assert_eq!(graded, SubmitResponse { score: 2, total: 3 });
}

#[tokio::test]
async fn empty_subject_yields_no_session() {
    let repo = seeded_repo().await;
    let loop_svc = service(&repo, Clock::fixed(fixed_now()));

    let err = loop_svc
        .start_quiz(QuizRequest::new("Nothing").with_subject("Astronomy"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Empty));
}

#[tokio::test]
async fn finishing_early_is_rejected() {
    let repo = seeded_repo().await;
    let loop_svc = service(&repo, Clock::fixed(fixed_now()));
    let runner = loop_svc.start_quiz(QuizRequest::new("All")).await.unwrap();

    assert!(matches!(loop_svc.finish(&runner), Err(SessionError::NotComplete)));
    assert!(matches!(
        loop_svc.submit(&runner).await,
        Err(SessionError::NotComplete)
    ));
}

#[tokio::test]
async fn shuffle_keeps_the_question_set() {
    let repo = seeded_repo().await;
    let loop_svc = service(&repo, Clock::fixed(fixed_now())).with_shuffle(true);
    let runner = loop_svc.start_quiz(QuizRequest::new("All")).await.unwrap();

    let mut ids: Vec<_> = runner
        .session()
        .questions()
        .iter()
        .map(|q| q.id().value())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn configured_delay_and_policy_reach_the_session() {
    let repo = seeded_repo().await;
    let loop_svc = service(&repo, Clock::fixed(fixed_now()))
        .with_reveal_delay(Duration::from_millis(250))
        .with_policy(MatchPolicy::OptionSlot);
    let mut runner = loop_svc
        .start_quiz(QuizRequest::new("Math").with_subject("Aptitude"))
        .await
        .unwrap();

    assert_eq!(runner.session().reveal_delay(), Duration::from_millis(250));
    assert_eq!(
        runner.select_slot(OptionSlot::B),
        Outcome::Recorded { correct: true }
    );
    let armed = tokio::time::Instant::now();
    assert_eq!(runner.wait_reveal().await, Some(Outcome::Completed));
    assert!(armed.elapsed() >= Duration::from_millis(250));
    assert!(armed.elapsed() < Duration::from_millis(1000));
}

#[tokio::test]
async fn stored_source_sees_new_questions() {
    let repo = seeded_repo().await;
    repo.insert_question(&QuestionDraft::new(
        "Primary key?",
        ["Unique row id", "Index", "View", "Trigger"],
        "Unique row id",
        Some("DBMS"),
    ))
    .await
    .unwrap();

    let loop_svc = service(&repo, Clock::fixed(fixed_now()));
    let runner = loop_svc
        .start_quiz(QuizRequest::new("SQL").with_subject("dbms"))
        .await
        .unwrap();
    assert_eq!(runner.progress().total, 1);
}
