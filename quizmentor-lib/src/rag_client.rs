//! Client for the hosted RAG question-answering service
//!
//! Forwards a question and hands back the service's JSON untouched.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{Error, Result};

pub struct RagClient {
    client: Client,
    endpoint: String,
    collection: String,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    query: &'a str,
    collection: &'a str,
}

impl RagClient {
    pub fn new(
        api_key: &str,
        endpoint: impl Into<String>,
        collection: impl Into<String>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
                .map_err(|_| Error::Config("invalid RAG API key".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            client: Client::builder().default_headers(headers).build()?,
            endpoint: endpoint.into(),
            collection: collection.into(),
        })
    }

    /// Ask a question and hand back the service's JSON body unmodified.
    ///
    /// A JSON body is returned whatever the HTTP status. Only a non-2xx reply
    /// whose body is not JSON becomes [`Error::Upstream`].
    pub async fn ask(&self, question: &str) -> Result<Value> {
        let body = AskRequest {
            query: question,
            collection: &self.collection,
        };
        let resp = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => {
                if !status.is_success() {
                    warn!(status = status.as_u16(), "rag service answered with an error status");
                }
                debug!(bytes = text.len(), "rag answer received");
                Ok(value)
            }
            Err(_) if !status.is_success() => Err(Error::Upstream {
                status: status.as_u16(),
                body: text,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    const QUESTION: &str = "Comment réagir face à une noyade ?";

    async fn server_replying(status: usize, body: &str) -> (mockito::ServerGuard, mockito::Mock) {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer secret-key")
            .match_body(Matcher::Json(json!({"query": QUESTION, "collection": "secourisme"})))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        (server, mock)
    }

    #[tokio::test]
    async fn test_ask_returns_body_unchanged() {
        let (server, mock) =
            server_replying(200, r#"{"answer": "Sortir la victime de l'eau", "sources": [3, 7]}"#).await;
        let client = RagClient::new("secret-key", server.url(), "secourisme").unwrap();

        let answer = client.ask(QUESTION).await.unwrap();

        assert_eq!(answer, json!({"answer": "Sortir la victime de l'eau", "sources": [3, 7]}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ask_passes_json_error_body_through() {
        let (server, mock) = server_replying(500, r#"{"detail": "collection unavailable"}"#).await;
        let client = RagClient::new("secret-key", server.url(), "secourisme").unwrap();

        let answer = client.ask(QUESTION).await.unwrap();

        assert_eq!(answer, json!({"detail": "collection unavailable"}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ask_non_json_error_is_upstream() {
        let (server, _mock) = server_replying(502, "<html>Bad Gateway</html>").await;
        let client = RagClient::new("secret-key", server.url(), "secourisme").unwrap();

        match client.ask(QUESTION).await {
            Err(Error::Upstream { status, body }) => {
                assert_eq!(status, 502);
                assert!(body.contains("Bad Gateway"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ask_non_json_success_is_json_error() {
        let (server, _mock) = server_replying(200, "not json").await;
        let client = RagClient::new("secret-key", server.url(), "secourisme").unwrap();

        assert!(matches!(client.ask(QUESTION).await, Err(Error::Json(_))));
    }

    #[test]
    fn test_request_shape() {
        let body = AskRequest {
            query: "Comment réagir face à une noyade ?",
            collection: "secourisme",
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"query": "Comment réagir face à une noyade ?", "collection": "secourisme"})
        );
    }

    #[test]
    fn test_rejects_key_with_newline() {
        let err = RagClient::new("abc\ndef", "http://localhost", "secourisme").err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}
