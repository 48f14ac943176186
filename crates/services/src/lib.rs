#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank;
pub mod catalog_service;
pub mod config;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::{AppServices, SourceKind};
pub use bank::{HttpQuestionBank, QuestionSource, StoredQuestionBank};
pub use catalog_service::CatalogService;
pub use config::QuizConfig;
pub use error::{AppServicesError, ConfigError, QuestionBankError, SessionError};
pub use sessions::{QuizLoopService, QuizProgress, QuizRequest, QuizRunner};
