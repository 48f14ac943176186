use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use quiz_core::model::{Outcome, QuizSubmission, SubmitResponse, UserAnswer};
use quiz_core::time::fixed_now;
use serde_json::{Value, json};
use services::{
    Clock, HttpQuestionBank, QuestionBankError, QuestionSource, QuizLoopService, QuizRequest,
    SessionError,
};
use url::Url;

fn question_rows() -> Value {
    json!([
        {
            "id": 1,
            "questionText": "Which structure is LIFO?",
            "optionA": "Queue",
            "optionB": "Stack",
            "optionC": "Heap",
            "optionD": "Graph",
            "correctAnswer": "Stack",
            "subject": "DSA"
        },
        {
            "id": 2,
            "questionText": "Which keyword inherits a class?",
            "optionA": "implements",
            "optionB": "extends",
            "optionC": "super",
            "optionD": "this",
            "correctAnswer": "extends",
            "subject": "Java"
        },
        {
            "id": 3,
            "questionText": "Broken row",
            "optionA": "a",
            "optionB": "b",
            "optionC": "c",
            "optionD": "d",
            "correctAnswer": "e",
            "subject": null
        }
    ])
}

async fn list_questions(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let rows = question_rows();
    let Some(subject) = params.get("subject") else {
        return Json(rows);
    };
    let filtered: Vec<Value> = rows
        .as_array()
        .into_iter()
        .flatten()
        .filter(|row| {
            row["subject"]
                .as_str()
                .is_some_and(|s| s.eq_ignore_ascii_case(subject))
        })
        .cloned()
        .collect();
    Json(Value::Array(filtered))
}

async fn submit(Json(body): Json<Value>) -> Json<Value> {
    let answers = body["answers"].as_array().cloned().unwrap_or_default();
    let score = answers
        .iter()
        .filter(|a| a["questionId"] == 1 && a["answer"] == "Stack")
        .count();
    Json(json!({ "score": score, "total": answers.len() }))
}

async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/api")).unwrap()
}

async fn mock_backend() -> Url {
    serve(
        Router::new()
            .route("/api/questions", get(list_questions))
            .route("/api/quiz/submit", post(submit)),
    )
    .await
}

fn bank(base: Url) -> HttpQuestionBank {
    HttpQuestionBank::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn loads_questions_and_drops_malformed_rows() {
    let bank = bank(mock_backend().await);

    let questions = bank.load_questions(None).await.unwrap();
    let ids: Vec<_> = questions.iter().map(|q| q.id().value()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(questions[0].correct_answer(), "Stack");
    assert_eq!(questions[1].subject(), Some("Java"));
}

#[tokio::test]
async fn rows_with_null_or_missing_fields_do_not_fail_the_load() {
    let rows = json!([
        {
            "id": 7,
            "questionText": "Which structure is FIFO?",
            "optionA": "Stack",
            "optionB": "Queue",
            "optionC": "Heap",
            "optionD": "Tree",
            "correctAnswer": "Queue"
        },
        {
            "id": 8,
            "questionText": "Broken row",
            "optionA": "a",
            "optionB": "b",
            "optionC": "c",
            "optionD": "d",
            "correctAnswer": null
        },
        { "id": 9, "questionText": "No options at all" },
        "not even an object"
    ]);
    let base = serve(Router::new().route(
        "/api/questions",
        get(move || {
            let rows = rows.clone();
            async move { Json(rows) }
        }),
    ))
    .await;

    let questions = bank(base).load_questions(None).await.unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].id().value(), 7);
    assert_eq!(questions[0].correct_answer(), "Queue");
}

#[tokio::test]
async fn forwards_subject_filter() {
    let bank = bank(mock_backend().await);

    let questions = bank.load_questions(Some("dsa")).await.unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].text(), "Which structure is LIFO?");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let base = serve(Router::new().route(
        "/api/questions",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;

    let err = bank(base).load_questions(None).await.unwrap_err();
    assert!(matches!(
        err,
        QuestionBankError::HttpStatus(status) if status == StatusCode::INTERNAL_SERVER_ERROR
    ));
}

#[tokio::test]
async fn posts_submissions() {
    let bank = bank(mock_backend().await);
    let submission = QuizSubmission {
        answers: vec![
            UserAnswer {
                question_id: quiz_core::model::QuestionId::new(1),
                answer: "Stack".into(),
            },
            UserAnswer {
                question_id: quiz_core::model::QuestionId::new(2),
                answer: "super".into(),
            },
        ],
    };

    let response = bank.submit(&submission).await.unwrap();
    assert_eq!(response, SubmitResponse { score: 1, total: 2 });
}

#[tokio::test]
async fn quiz_loop_over_http() {
    let bank = bank(mock_backend().await);
    let loop_svc = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(bank))
        .with_reveal_delay(Duration::from_millis(10));

    let mut runner = loop_svc
        .start_quiz(QuizRequest::new("Mixed"))
        .await
        .unwrap();
    assert_eq!(runner.select_option("stack"), Outcome::Recorded { correct: true });
    assert_eq!(runner.wait_reveal().await, Some(Outcome::Advanced { index: 1 }));
    assert_eq!(runner.select_option("this"), Outcome::Recorded { correct: false });
    assert_eq!(runner.wait_reveal().await, Some(Outcome::Completed));

    let result = loop_svc.finish(&runner).unwrap();
    assert_eq!(result.correct_answers, 1);
    assert_eq!(result.score, 50);

    let graded = loop_svc.submit(&runner).await.unwrap();
    assert_eq!(graded.total, 2);
}

#[tokio::test]
async fn fetch_failure_yields_no_session() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{addr}/api")).unwrap();
    let loop_svc = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(bank(base)));

    let err = loop_svc
        .start_quiz(QuizRequest::new("Offline"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Fetch(QuestionBankError::Http(_))));
}

#[tokio::test]
async fn empty_bank_yields_no_session() {
    let base = serve(Router::new().route("/api/questions", get(|| async { Json(json!([])) }))).await;
    let loop_svc = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(bank(base)));

    let err = loop_svc
        .start_quiz(QuizRequest::new("Empty"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Empty));
}
