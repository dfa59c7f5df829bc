use crate::config::Config;
use crate::error::ConfigError;
use crate::models::*;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

/// A hosted model that turns a prompt (and optional image) into text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &ModelRequest) -> Result<String>;
}

pub struct GeminiService {
    client: Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiService {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_base: config.gemini_api_base.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        }
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base,
            self.model,
            urlencoding::encode(api_key)
        )
    }
}

/// Map a [`ModelRequest`] onto the generateContent body: the prompt first,
/// then the image as inline data.
pub fn build_request(request: &ModelRequest) -> GeminiRequest {
    let mut parts = vec![GeminiPart::Text {
        text: request.prompt.clone(),
    }];

    if let Some(image) = &request.image {
        parts.push(GeminiPart::InlineData {
            inline_data: GeminiInlineData {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            },
        });
    }

    GeminiRequest {
        contents: vec![GeminiContent {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: request.json_output.then(|| GeminiGenerationConfig {
            response_mime_type: Some("application/json".to_string()),
        }),
    }
}

/// Join the text parts of the first candidate.
pub fn response_text(response: GeminiResponse) -> Result<String> {
    let Some(content) = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
    else {
        let feedback = response
            .prompt_feedback
            .map(|f| f.to_string())
            .unwrap_or_else(|| "none".to_string());
        return Err(anyhow::anyhow!("Gemini returned no candidates (feedback: {})", feedback));
    };

    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| match part {
            GeminiPart::Text { text } => Some(text),
            GeminiPart::InlineData { .. } => None,
        })
        .collect();

    Ok(text)
}

#[async_trait]
impl GenerativeModel for GeminiService {
    async fn generate(&self, request: &ModelRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let response = self
            .client
            .post(self.endpoint(api_key))
            .json(&build_request(request))
            .send()
            .await
            .context("Gemini request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Gemini API error ({}): {}", status, error_text));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .context("Gemini returned an unreadable response")?;

        response_text(gemini_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(image: Option<InlineImage>) -> ModelRequest {
        ModelRequest {
            prompt: "match me".to_string(),
            image,
            json_output: true,
        }
    }

    #[test]
    fn text_only_request_has_one_part() {
        let body = serde_json::to_value(build_request(&request(None))).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "match me"}]}],
                "generationConfig": {"responseMimeType": "application/json"}
            })
        );
    }

    #[test]
    fn image_follows_the_prompt() {
        let image = InlineImage {
            mime_type: "image/png".to_string(),
            data: "iVBORw0KGgo=".to_string(),
        };
        let body = serde_json::to_value(build_request(&request(Some(image)))).unwrap();
        assert_eq!(
            body["contents"][0]["parts"][1],
            json!({"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}})
        );
    }

    #[test]
    fn response_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "{\"matches\":"}, {"text": "[]}"}]}}]
        }))
        .unwrap();
        assert_eq!(response_text(response).unwrap(), "{\"matches\":[]}");
    }

    #[test]
    fn blocked_prompt_is_an_error() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        let err = response_text(response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn endpoint_names_the_model() {
        let config = Config::from_lookup(|_| None).unwrap();
        let service = GeminiService::new(Client::new(), &config);
        assert_eq!(
            service.endpoint("abc"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=abc"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_the_call() {
        let config = Config::from_lookup(|_| None).unwrap();
        let service = GeminiService::new(Client::new(), &config);
        let err = service.generate(&request(None)).await.unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
