use std::time::Duration;

use async_trait::async_trait;
use config::AiConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::AssistError;
use crate::provider::{GenerationRequest, ModelBackend};

/// Client for the Generative Language `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key_env: String,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AssistError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> Result<String, AssistError> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AssistError::MissingCredential {
                var: self.api_key_env.clone(),
            })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistError> {
        let api_key = self.api_key()?;

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key.as_str())])
            .json(&request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let output: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| AssistError::MalformedResponse(err.to_string()))?;

        let text = output.text();
        if text.is_empty() {
            warn!(model = %self.model, "empty generation content");
        } else {
            debug!(model = %self.model, chars = text.len(), "generation complete");
        }
        Ok(text)
    }
}

fn request_body(request: &GenerationRequest) -> Value {
    let mut body = json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }],
        }],
    });

    if let Some(schema) = request.response_schema.as_ref() {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }

    body
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key_env(var: &str) -> AiConfig {
        AiConfig {
            api_key_env: var.to_owned(),
            ..AiConfig::default()
        }
    }

    #[test]
    fn plain_request_has_no_generation_config() {
        let body = request_body(&GenerationRequest::text("title please"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "title please");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn schema_request_asks_for_json() {
        let schema = json!({"type": "OBJECT"});
        let body = request_body(&GenerationRequest::json("rewrite", schema.clone()));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
    }

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let raw = json!({
            "candidates": [
                {"content": {"parts": [{"text": "[{\"a\":"}, {"text": "1}]"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).expect("decode");
        assert_eq!(response.text(), "[{\"a\":1}]");
    }

    #[test]
    fn missing_candidates_yield_empty_text() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({})).expect("decode");
        assert_eq!(response.text(), "");
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let mut config = config_with_key_env("SCRIBE_UNUSED_KEY");
        config.base_url = "http://localhost:8080/".to_owned();
        config.model = "m1".to_owned();
        let client = GeminiClient::new(&config).expect("client");
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/m1:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        let mut config = config_with_key_env("SCRIBE_TEST_KEY_THAT_IS_NEVER_SET_7F3A");
        // Unroutable on purpose: the call must not get as far as the network.
        config.base_url = "http://127.0.0.1:9".to_owned();
        let client = GeminiClient::new(&config).expect("client");
        let err = client
            .generate(&GenerationRequest::text("hello"))
            .await
            .expect_err("must fail");
        assert!(err.is_missing_credential(), "unexpected error: {err}");
    }
}
