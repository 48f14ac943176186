use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::bank::{HttpQuestionBank, QuestionSource, StoredQuestionBank};
use crate::catalog_service::CatalogService;
use crate::config::QuizConfig;
use crate::error::AppServicesError;
use crate::sessions::QuizLoopService;

/// Where quiz questions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// The REST question bank at `QUIZ_API_BASE_URL`.
    #[default]
    Http,
    /// The local question repository.
    Stored,
}

/// Assembles app-facing services from configuration.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    config: QuizConfig,
    storage: Storage,
    catalog: Arc<CatalogService>,
    http_bank: Arc<HttpQuestionBank>,
    stored_bank: Arc<StoredQuestionBank>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage at `config.db_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage or the HTTP client cannot be initialized.
    pub async fn new_sqlite(config: QuizConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        Self::from_storage(config, clock, storage)
    }

    /// Build services over in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be initialized.
    pub fn in_memory(config: QuizConfig, clock: Clock) -> Result<Self, AppServicesError> {
        Self::from_storage(config, clock, Storage::in_memory())
    }

    fn from_storage(
        config: QuizConfig,
        clock: Clock,
        storage: Storage,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(CatalogService::new(Arc::clone(&storage.quizzes)));
        let http_bank = Arc::new(HttpQuestionBank::from_config(&config)?);
        let stored_bank = Arc::new(StoredQuestionBank::new(Arc::clone(&storage.questions)));

        Ok(Self {
            clock,
            config,
            storage,
            catalog,
            http_bank,
            stored_bank,
        })
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn question_source(&self, kind: SourceKind) -> Arc<dyn QuestionSource> {
        match kind {
            SourceKind::Http => self.http_bank.clone(),
            SourceKind::Stored => self.stored_bank.clone(),
        }
    }

    /// Quiz loop over the chosen source, using the configured reveal delay.
    #[must_use]
    pub fn quiz_loop(&self, kind: SourceKind) -> QuizLoopService {
        QuizLoopService::new(self.clock, self.question_source(kind))
            .with_reveal_delay(self.config.reveal_delay)
    }
}
