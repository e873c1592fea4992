use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::TextGenerator;

/// Gemini `generateContent` client.
///
/// The summarizer system instruction is serialized once at construction and
/// attached unchanged to every request.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    system_instruction: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Empty AI response (finish reason: {finish_reason})")]
    EmptyResponse { finish_reason: String },
}

impl GeminiClient {
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
    const SYSTEM_PROMPT: &str = include_str!("./prompts/system_0.txt");

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            system_instruction: serde_json::json!({
                "parts": [{ "text": Self::SYSTEM_PROMPT }]
            }),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub async fn send_generate_request(
        &self,
        user_content: &str,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let body = serde_json::json!({
            "systemInstruction": self.system_instruction,
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": user_content }]
                }
            ]
        });

        let resp = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, message });
        }

        Ok(resp.json::<GenerateContentResponse>().await?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, trimmed
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<String>();

        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Why the first candidate stopped, e.g. `SAFETY` for a blocked answer
    pub fn finish_reason(&self) -> &str {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("UNKNOWN")
    }
}

impl TextGenerator for GeminiClient {
    type Error = GeminiError;

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let response = self
            .send_generate_request(prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to generate content"))?;

        response.text().ok_or_else(|| GeminiError::EmptyResponse {
            finish_reason: response.finish_reason().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "  Banyak pengunjung " }, { "text": "merasa tersentuh.\n" }]
                    },
                    "finishReason": "STOP"
                },
                {
                    "content": { "parts": [{ "text": "ignored" }] }
                }
            ]
        }))
        .expect("valid response");

        assert_eq!(
            response.text().as_deref(),
            Some("Banyak pengunjung merasa tersentuh.")
        );
    }

    #[test]
    fn test_response_without_text_is_empty() {
        let blocked: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .expect("valid response");
        assert!(blocked.text().is_none());
        assert_eq!(blocked.finish_reason(), "SAFETY");
        assert_eq!(
            GeminiError::EmptyResponse {
                finish_reason: blocked.finish_reason().to_string()
            }
            .to_string(),
            "Empty AI response (finish reason: SAFETY)"
        );

        let whitespace: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  \n" }] } }]
        }))
        .expect("valid response");
        assert!(whitespace.text().is_none());

        let no_candidates: GenerateContentResponse =
            serde_json::from_value(json!({})).expect("valid response");
        assert!(no_candidates.text().is_none());
        assert_eq!(no_candidates.finish_reason(), "UNKNOWN");
    }

    #[test]
    fn test_builder_overrides() {
        let client = GeminiClient::new("key")
            .with_model("gemini-2.0-flash")
            .with_base_url("http://localhost:9999");
        assert_eq!(client.model(), "gemini-2.0-flash");
        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(
            client.system_instruction["parts"][0]["text"],
            GeminiClient::SYSTEM_PROMPT
        );
    }
}
