use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 1000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Runtime settings for the quiz client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    pub api_base_url: Url,
    pub db_url: String,
    pub reveal_delay: Duration,
    pub http_timeout: Duration,
}

impl QuizConfig {
    /// Read settings from `QUIZ_*` environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`QuizConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_base_url = match read("QUIZ_API_BASE_URL") {
            Some(raw) => parse_url("QUIZ_API_BASE_URL", raw.trim())?,
            None => default_base_url(),
        };
        let db_url = read("QUIZ_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string());
        let reveal_delay = Duration::from_millis(parse_number(
            "QUIZ_REVEAL_DELAY_MS",
            read("QUIZ_REVEAL_DELAY_MS"),
            DEFAULT_REVEAL_DELAY_MS,
        )?);
        let http_timeout = Duration::from_secs(parse_number(
            "QUIZ_HTTP_TIMEOUT_SECS",
            read("QUIZ_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);

        Ok(Self {
            api_base_url,
            db_url,
            reveal_delay,
            http_timeout,
        })
    }

    /// Override the question bank base url.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `raw` does not parse.
    pub fn with_api_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_url("--base-url", raw)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_db_url(mut self, db_url: impl Into<String>) -> Self {
        self.db_url = db_url.into();
        self
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            db_url: DEFAULT_DB_URL.to_string(),
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_DELAY_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).unwrap_or_else(|_| unreachable!("default url is valid"))
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { var, source })
}

fn parse_number(var: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = QuizConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, QuizConfig::default());
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/api");
        assert_eq!(config.reveal_delay, Duration::from_millis(1000));
    }

    #[test]
    fn reads_overrides() {
        let config = QuizConfig::from_lookup(lookup(&[
            ("QUIZ_API_BASE_URL", "https://quiz.example.com/v2/"),
            ("QUIZ_DB_URL", "sqlite::memory:"),
            ("QUIZ_REVEAL_DELAY_MS", " 250 "),
            ("QUIZ_HTTP_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url.host_str(), Some("quiz.example.com"));
        assert_eq!(config.db_url, "sqlite::memory:");
        assert_eq!(config.reveal_delay, Duration::from_millis(250));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = QuizConfig::from_lookup(lookup(&[("QUIZ_DB_URL", "  ")])).unwrap();
        assert_eq!(config.db_url, DEFAULT_DB_URL);
    }

    #[test]
    fn rejects_garbage() {
        let err = QuizConfig::from_lookup(lookup(&[("QUIZ_REVEAL_DELAY_MS", "soon")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber { var: "QUIZ_REVEAL_DELAY_MS", .. }
        ));

        let err = QuizConfig::from_lookup(lookup(&[("QUIZ_API_BASE_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
