//! Gemini `generateContent` client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeminiConfig;
use crate::llm::{Error, Generator};

pub struct GeminiClient {
    api_key: String,
    url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: String,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            url: format!(
                "{}/v1beta/models/{}:generateContent",
                config.api_base, config.model
            ),
            client,
        })
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, Error> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("failed to read response: {e}")))?;

        debug!("Gemini response status: {status}");

        if !status.is_success() {
            return Err(Error::Api(format!("{status}: {body}")));
        }

        parse_reply(&body)
    }
}

fn parse_reply(body: &str) -> Result<String, Error> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| Error::Parse(e.to_string()))?;

    if let Some(error) = parsed.error {
        return Err(Error::Api(error.message));
    }

    let content = parsed
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or(Error::Empty)?;

    let texts: Vec<String> = content.parts.into_iter().filter_map(|p| p.text).collect();
    if texts.is_empty() {
        return Err(Error::Empty);
    }
    Ok(texts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "contents": [{"parts": [{"text": "hello"}]}],
                "generationConfig": {"responseMimeType": "application/json"}
            })
        );
    }

    #[test]
    fn test_parse_joins_text_parts() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": " 1}"}], "role": "model"}}]}"#;
        assert_eq!(parse_reply(body).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_uses_first_candidate() {
        let body = r#"{"candidates": [
            {"content": {"parts": [{"text": "first"}]}},
            {"content": {"parts": [{"text": "second"}]}}
        ]}"#;
        assert_eq!(parse_reply(body).unwrap(), "first");
    }

    #[test]
    fn test_parse_blocked_prompt_is_empty() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert!(matches!(parse_reply(body), Err(Error::Empty)));

        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        assert!(matches!(parse_reply(body), Err(Error::Empty)));

        let body = r#"{"candidates": [{"content": {"parts": []}}]}"#;
        assert!(matches!(parse_reply(body), Err(Error::Empty)));
    }

    #[test]
    fn test_parse_error_object() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        match parse_reply(body) {
            Err(Error::Api(msg)) => assert_eq!(msg, "API key not valid"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_garbage_body() {
        assert!(matches!(parse_reply("<html>"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_url_from_config() {
        let config = GeminiConfig {
            api_key: "k".into(),
            model: "gemini-1.5-flash".into(),
            api_base: "http://127.0.0.1:1".into(),
            timeout: None,
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.url,
            "http://127.0.0.1:1/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
