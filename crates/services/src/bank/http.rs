use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{Question, QuestionRecord, QuizSubmission, SubmitResponse};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::QuestionSource;
use crate::config::QuizConfig;
use crate::error::QuestionBankError;

/// Question source backed by the quiz REST backend.
///
/// `GET {base}/questions[?subject=..]` lists questions and
/// `POST {base}/quiz/submit` grades answers. One request per call, no retry.
#[derive(Clone, Debug)]
pub struct HttpQuestionBank {
    client: Client,
    base_url: Url,
}

impl HttpQuestionBank {
    /// # Errors
    ///
    /// Returns `QuestionBankError::InvalidBaseUrl` if `base_url` cannot carry a path,
    /// or `QuestionBankError::Http` if the client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, QuestionBankError> {
        if base_url.cannot_be_a_base() {
            return Err(QuestionBankError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// # Errors
    ///
    /// See [`HttpQuestionBank::new`].
    pub fn from_config(config: &QuizConfig) -> Result<Self, QuestionBankError> {
        Self::new(config.api_base_url.clone(), config.http_timeout)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, QuestionBankError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| QuestionBankError::InvalidBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }
}

/// Decodes each row on its own and drops the ones that are not valid questions.
fn keep_valid(rows: Vec<Value>) -> Vec<Question> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(position, row)| {
            let id = row.get("id").cloned();
            let question = serde_json::from_value::<QuestionRecord>(row)
                .map_err(|err| err.to_string())
                .and_then(|record| record.into_question().map_err(|err| err.to_string()));
            match question {
                Ok(question) => Some(question),
                Err(error) => {
                    warn!(position, ?id, %error, "dropping malformed question");
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl QuestionSource for HttpQuestionBank {
    async fn load_questions(
        &self,
        subject: Option<&str>,
    ) -> Result<Vec<Question>, QuestionBankError> {
        let mut url = self.endpoint(&["questions"])?;
        if let Some(subject) = subject.filter(|s| !s.trim().is_empty()) {
            url.query_pairs_mut().append_pair("subject", subject);
        }
        debug!(%url, "fetching questions");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(QuestionBankError::HttpStatus(response.status()));
        }

        let rows: Vec<Value> = response.json().await?;
        Ok(keep_valid(rows))
    }

    async fn submit(
        &self,
        submission: &QuizSubmission,
    ) -> Result<SubmitResponse, QuestionBankError> {
        let url = self.endpoint(&["quiz", "submit"])?;
        let response = self.client.post(url).json(submission).send().await?;
        if !response.status().is_success() {
            return Err(QuestionBankError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}
