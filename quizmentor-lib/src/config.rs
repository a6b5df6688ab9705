//! Runtime configuration
//!
//! Values come from the process environment, after loading a `.env` file from
//! the working directory when one exists.
//!
//! | Variable                | Default                                   |
//! |-------------------------|-------------------------------------------|
//! | `MISTRAL_API_KEY`       | none                                      |
//! | `MISTRAL_API_URL`       | `https://api.mistral.ai/v1/chat/completions` |
//! | `MISTRAL_MODEL`         | `mistral-small-latest`                    |
//! | `MISTRAL_TEMPERATURE`   | `0.7`                                     |
//! | `MISTRAL_TIMEOUT_SECS`  | none (transport default)                  |
//! | `QUIZMENTOR_INDEX_DIR`  | `data`                                    |
//! | `QUIZMENTOR_RESULTS`    | `dashboard_results.json`                  |
//! | `QUIZMENTOR_USERS_DB`   | `users.db`                                |
//! | `RAG_API_URL`           | hosted hackathon endpoint                 |
//! | `RAG_COLLECTION`        | `secourisme`                              |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::generate::{MistralClient, MISTRAL_API_URL, MISTRAL_DEFAULT_MODEL};
use crate::index::IndexPaths;
use crate::rag_client::RagClient;
use crate::results::{ResultLog, DEFAULT_RESULTS_FILE};
use crate::users::DEFAULT_USERS_DB;
use crate::{Error, Result};

pub const DEFAULT_RAG_API_URL: &str = "https://hackathon-ia-et-crise.fr/reminai/chatbot/api/app/back_app/";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mistral_api_key: Option<String>,
    pub mistral_api_url: String,
    pub mistral_model: String,
    pub temperature: f32,
    pub request_timeout: Option<Duration>,
    pub index_dir: PathBuf,
    pub results_path: PathBuf,
    pub users_db: PathBuf,
    pub rag_api_url: String,
    pub rag_collection: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mistral_api_key: None,
            mistral_api_url: MISTRAL_API_URL.to_string(),
            mistral_model: MISTRAL_DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            request_timeout: None,
            index_dir: PathBuf::from("data"),
            results_path: PathBuf::from(DEFAULT_RESULTS_FILE),
            users_db: PathBuf::from(DEFAULT_USERS_DB),
            rag_api_url: DEFAULT_RAG_API_URL.to_string(),
            rag_collection: "secourisme".to_string(),
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read the environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!(path = %path.display(), ".env loaded");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            mistral_api_key: get("MISTRAL_API_KEY"),
            mistral_api_url: get("MISTRAL_API_URL").unwrap_or(defaults.mistral_api_url),
            mistral_model: get("MISTRAL_MODEL").unwrap_or(defaults.mistral_model),
            temperature: parse_var("MISTRAL_TEMPERATURE", get("MISTRAL_TEMPERATURE"))?
                .unwrap_or(defaults.temperature),
            request_timeout: parse_var::<u64>("MISTRAL_TIMEOUT_SECS", get("MISTRAL_TIMEOUT_SECS"))?
                .map(Duration::from_secs),
            index_dir: get("QUIZMENTOR_INDEX_DIR").map_or(defaults.index_dir, PathBuf::from),
            results_path: get("QUIZMENTOR_RESULTS").map_or(defaults.results_path, PathBuf::from),
            users_db: get("QUIZMENTOR_USERS_DB").map_or(defaults.users_db, PathBuf::from),
            rag_api_url: get("RAG_API_URL").unwrap_or(defaults.rag_api_url),
            rag_collection: get("RAG_COLLECTION").unwrap_or(defaults.rag_collection),
        })
    }

    #[must_use]
    pub fn index_paths(&self) -> IndexPaths {
        IndexPaths::in_dir(&self.index_dir)
    }

    #[must_use]
    pub fn result_log(&self) -> ResultLog {
        ResultLog::new(&self.results_path)
    }

    fn api_key(&self) -> Result<&str> {
        self.mistral_api_key
            .as_deref()
            .ok_or_else(|| Error::Config("MISTRAL_API_KEY is not set".to_string()))
    }

    /// Generation client from the configured endpoint, model and key
    pub fn mistral_client(&self) -> Result<MistralClient> {
        MistralClient::new(
            self.api_key()?,
            self.mistral_api_url.clone(),
            self.mistral_model.clone(),
            self.request_timeout,
        )
    }

    /// RAG service client; it authenticates with the Mistral key
    pub fn rag_client(&self) -> Result<RagClient> {
        RagClient::new(
            self.api_key()?,
            self.rag_api_url.clone(),
            self.rag_collection.clone(),
        )
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| Error::Config(format!("{key} has an invalid value: {v}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.index_paths().index, PathBuf::from("data/rag_index.json"));
        assert!(config.mistral_client().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MISTRAL_API_KEY", "k-123"),
            ("MISTRAL_MODEL", "mistral-large-latest"),
            ("MISTRAL_TEMPERATURE", "0.2"),
            ("MISTRAL_TIMEOUT_SECS", "30"),
            ("QUIZMENTOR_INDEX_DIR", "/srv/index"),
            ("RAG_COLLECTION", "pse1"),
        ]))
        .unwrap();

        assert_eq!(config.mistral_api_key.as_deref(), Some("k-123"));
        assert_eq!(config.mistral_model, "mistral-large-latest");
        assert!((config.temperature - 0.2).abs() < 1e-6);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.index_dir, PathBuf::from("/srv/index"));
        assert_eq!(config.rag_collection, "pse1");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = Config::from_lookup(lookup(&[("MISTRAL_API_KEY", "  "), ("MISTRAL_MODEL", "")])).unwrap();

        assert_eq!(config.mistral_api_key, None);
        assert_eq!(config.mistral_model, MISTRAL_DEFAULT_MODEL);
    }

    #[test]
    fn test_invalid_number() {
        let err = Config::from_lookup(lookup(&[("MISTRAL_TEMPERATURE", "chaud")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
