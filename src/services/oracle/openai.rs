//! OpenAI-compatible chat completions oracle
//!
//! Sends the selection prompt with a strict JSON-schema response format and
//! parses the first choice's message content as the selection.
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    services::oracle::{
        parse_response,
        prompt::{build_user_prompt, response_schema, SELECTION_SYSTEM_PROMPT},
        OracleResponse, RankingOracle, SelectionRequest,
    },
};

const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiOracle {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiOracle {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait::async_trait]
impl RankingOracle for OpenAiOracle {
    async fn select(&self, request: &SelectionRequest) -> AppResult<OracleResponse> {
        let url = format!("{}/chat/completions", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "temperature": TEMPERATURE,
                "messages": [
                    {
                        "role": "system",
                        "content": SELECTION_SYSTEM_PROMPT,
                    },
                    {
                        "role": "user",
                        "content": build_user_prompt(request),
                    },
                ],
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {
                        "name": "video_selection",
                        "strict": true,
                        "schema": response_schema(),
                    },
                },
            }))
            .send()
            .await
            .map_err(|e| {
                AppError::OracleRequest(format!("Network error talking to ranking service: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| AppError::OracleRequest(format!("Failed to read response: {}", e)))?;
        tracing::debug!(response = %response_text, "Raw ranking oracle response");

        let completion: ChatCompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                tracing::error!(error = %e, "Failed to deserialize chat completion");
                AppError::OracleResponseInvalid(format!("unexpected completion shape: {}", e))
            })?;

        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AppError::OracleResponseInvalid("no choices returned".to_string()))?;

        if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
            return Err(AppError::OracleResponseInvalid(format!(
                "model refused: {}",
                refusal
            )));
        }

        let content = message
            .content
            .ok_or_else(|| AppError::OracleResponseInvalid("empty message content".to_string()))?;

        let selection = parse_response(&content)?;

        tracing::info!(
            selected = %selection.selected_video_id,
            candidates = request.candidates.len(),
            oracle = self.name(),
            model = %self.model,
            "Ranking oracle selection received"
        );

        Ok(selection)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

fn classify_status(status: StatusCode, body: &str) -> AppError {
    let hint = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "credentials rejected, check ORACLE_API_KEY",
        StatusCode::TOO_MANY_REQUESTS => "rate limit or quota exceeded",
        _ => "unexpected status",
    };
    AppError::OracleRequest(format!("{} ({}): {}", hint, status, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::oracle::CandidateSummary;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::Value;

    fn request() -> SelectionRequest {
        SelectionRequest {
            moods: vec!["Curious".to_string()],
            target_minutes: 15,
            candidates: vec![CandidateSummary {
                index: 1,
                video_id: "aaaaaaaaaaa".to_string(),
                title: "Slime molds solve mazes".to_string(),
                channel_title: "Tiny Science".to_string(),
                duration: "14:02".to_string(),
                description: "Biology without a brain".to_string(),
            }],
        }
    }

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn completion(content: Value) -> Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content, "refusal": null}}]
        })
    }

    #[tokio::test]
    async fn test_select_parses_structured_output() {
        let router = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(
                    headers.get("authorization").and_then(|h| h.to_str().ok()),
                    Some("Bearer test_key")
                );
                assert_eq!(body["model"], "test-model");
                assert_eq!(body["response_format"]["type"], "json_schema");
                let user = body["messages"][1]["content"].as_str().unwrap_or_default();
                assert!(user.contains("[aaaaaaaaaaa]"));

                Json(completion(json!(
                    r#"{"selectedVideoId":"aaaaaaaaaaa","tags":["biology","curious","short film"],"summary":"Slime molds are wild."}"#
                )))
            }),
        );
        let base = spawn_stub(router).await;
        let oracle = OpenAiOracle::new("test_key".into(), base, "test-model".into());

        let selection = oracle.select(&request()).await.unwrap();
        assert_eq!(selection.selected_video_id, "aaaaaaaaaaa");
        assert_eq!(selection.tags, vec!["biology", "curious", "short film"]);
    }

    #[tokio::test]
    async fn test_select_invalid_content() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { Json(completion(json!("I like the first one"))) }),
        );
        let base = spawn_stub(router).await;
        let oracle = OpenAiOracle::new("test_key".into(), base, "test-model".into());

        let result = oracle.select(&request()).await;
        assert!(matches!(result, Err(AppError::OracleResponseInvalid(_))));
    }

    #[tokio::test]
    async fn test_select_refusal_is_invalid() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async {
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": null, "refusal": "I can't help with that."}}]
                }))
            }),
        );
        let base = spawn_stub(router).await;
        let oracle = OpenAiOracle::new("test_key".into(), base, "test-model".into());

        let result = oracle.select(&request()).await;
        assert!(matches!(result, Err(AppError::OracleResponseInvalid(_))));
    }

    #[tokio::test]
    async fn test_select_unauthorized() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (axum::http::StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let base = spawn_stub(router).await;
        let oracle = OpenAiOracle::new("wrong".into(), base, "test-model".into());

        match oracle.select(&request()).await {
            Err(AppError::OracleRequest(msg)) => assert!(msg.contains("ORACLE_API_KEY")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
