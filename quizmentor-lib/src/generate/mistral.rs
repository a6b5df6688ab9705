use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generate::{ChatMessage, GenerationRequest, Generator};
use crate::{Error, Result};

pub const MISTRAL_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
pub const MISTRAL_DEFAULT_MODEL: &str = "mistral-small-latest";

/// Client for Mistral's chat-completions endpoint.
///
/// No retries. Without an explicit timeout the transport default applies.
pub struct MistralClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl MistralClient {
    pub fn new(
        api_key: &str,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("missing Mistral API key".to_string()));
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| Error::Config("invalid Mistral API key".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl Generator for MistralClient {
    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
        };

        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        debug!(bytes = text.len(), model = %self.model, "completion received");
        parse_completion(&text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Content of the first choice of a chat-completions response body.
fn parse_completion(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| Error::Generation("response has no choices".to_string()))
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> MistralClient {
        MistralClient::new("secret-key", server.url(), MISTRAL_DEFAULT_MODEL, None).unwrap()
    }

    #[tokio::test]
    async fn test_complete_against_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer secret-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "mistral-small-latest",
                "messages": [{"role": "user", "content": "Une question ?"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "A) Alerter"}}]}"#)
            .create_async()
            .await;

        let text = client_for(&server)
            .complete(&GenerationRequest::prompt("Une question ?", 0.7))
            .await
            .unwrap();

        assert_eq!(text, "A) Alerter");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(429)
            .with_body(r#"{"message": "Requests rate limit exceeded"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .complete(&GenerationRequest::prompt("Une question ?", 0.7))
            .await
            .unwrap_err();

        match err {
            Error::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("rate limit"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body("{\"choices\": ")
            .create_async()
            .await;

        let err = client_for(&server)
            .complete(&GenerationRequest::prompt("Une question ?", 0.7))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_request_shape() {
        let messages = vec![ChatMessage::user("Bonjour")];
        let body = ChatRequest {
            model: MISTRAL_DEFAULT_MODEL,
            messages: &messages,
            temperature: 0.5,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "model": "mistral-small-latest",
                "messages": [{"role": "user", "content": "Bonjour"}],
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "id": "cmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Quelle est la bonne conduite ?"}, "finish_reason": "stop"}
            ]
        }"#;

        assert_eq!(parse_completion(body).unwrap(), "Quelle est la bonne conduite ?");
    }

    #[test]
    fn test_parse_completion_without_choices() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn test_parse_completion_not_json() {
        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_missing_key_rejected() {
        let err = MistralClient::new("  ", MISTRAL_API_URL, MISTRAL_DEFAULT_MODEL, None)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}
