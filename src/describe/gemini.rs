use super::DescriptionGenerator;
use crate::config::DescribeConfig;
use crate::error::DescribeError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// Marketing copy for a fractional listing, at most three sentences, in Russian.
pub fn build_prompt(title: &str, category: &str) -> String {
    format!(
        "Напиши продающее, привлекательное описание для товара на маркетплейсе.\n\
         Товар: {title}\n\
         Категория: {category}\n\
         Особенность: Этот товар продается по долям (частичное владение). \
         Упомяни выгоду совместной покупки или инвестиции.\n\
         Длина: не более 3 предложений. На русском языке."
    )
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiDescriber {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiDescriber {
    pub fn new(config: &DescribeConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl DescriptionGenerator for GeminiDescriber {
    async fn generate(&self, title: &str, category: &str) -> Result<String, DescribeError> {
        let api_key = self.api_key.as_deref().ok_or(DescribeError::MissingApiKey)?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(title, category)),
                }],
            }],
        };

        debug!(model = %self.model, title, "requesting description");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DescribeError::Status(response.status()));
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.text().ok_or(DescribeError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_listing() {
        let prompt = build_prompt("Яхта Azimut", "Транспорт");
        assert!(prompt.contains("Товар: Яхта Azimut"));
        assert!(prompt.contains("Категория: Транспорт"));
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Первое. "}, {"text": "Второе."}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Первое. Второе."));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert_eq!(empty.text(), None);

        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert_eq!(blocked.text(), None);
    }

    #[test]
    fn test_endpoint_uses_model() {
        let describer = GeminiDescriber::new(&DescribeConfig {
            base_url: "https://example.test/v1beta/".to_string(),
            ..DescribeConfig::default()
        });
        assert_eq!(
            describer.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_an_error() {
        let describer = GeminiDescriber::new(&DescribeConfig::default());
        let result = describer.generate("Лот", "Бизнес").await;
        assert!(matches!(result, Err(DescribeError::MissingApiKey)));
    }
}
