//! HTTP client for a Gemini-style `generateContent` endpoint

use crate::{AssistantError, EMPTY_REPLY, GenerativeService, GeneratedImage};
use nexus_config::AssistantSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reasoning budget requested for chat replies
const THINKING_BUDGET: u32 = 1024;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text parts of the first candidate
    pub(crate) fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }

    /// First inline image of the first candidate
    pub(crate) fn image(&self) -> Result<Option<GeneratedImage>, AssistantError> {
        self.first_parts()
            .iter()
            .find_map(|p| p.inline_data.as_ref())
            .map(|data| GeneratedImage::from_base64(&data.mime_type, &data.data))
            .transpose()
    }
}

/// Client for the hosted generative models
#[derive(Debug, Clone)]
pub struct GeminiClient {
    endpoint: String,
    text_model: String,
    image_model: String,
    api_key: Option<String>,
    api_key_env: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(settings: &AssistantSettings) -> Result<Self, AssistantError> {
        Self::with_api_key(settings, settings.api_key())
    }

    pub fn with_api_key(
        settings: &AssistantSettings,
        api_key: Option<String>,
    ) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout().max(Duration::from_secs(1)))
            .user_agent(format!("NexusSimulator/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        if api_key.is_none() {
            tracing::warn!(
                "No assistant API key in {}, requests will fail",
                settings.api_key_env
            );
        }

        Ok(Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            text_model: settings.text_model.clone(),
            image_model: settings.image_model.clone(),
            api_key,
            api_key_env: settings.api_key_env.clone(),
            client,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, model)
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, AssistantError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AssistantError::MissingApiKey(self.api_key_env.clone()))?;

        let url = self.model_url(model);
        tracing::debug!("Requesting {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AssistantError::Service {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl GenerativeService for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, AssistantError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: Some(GenerationConfig {
                thinking_config: ThinkingConfig {
                    thinking_budget: THINKING_BUDGET,
                },
            }),
        };

        let response = self.generate(&self.text_model, &request).await?;
        Ok(response.text().unwrap_or_else(|| EMPTY_REPLY.to_string()))
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, AssistantError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: None,
        };

        self.generate(&self.image_model, &request).await?.image()
    }

    async fn edit_image(
        &self,
        image: &GeneratedImage,
        prompt: &str,
    ) -> Result<Option<GeneratedImage>, AssistantError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.to_base64(),
                        }),
                    },
                    Part {
                        text: Some(prompt.to_string()),
                        inline_data: None,
                    },
                ],
            }],
            generation_config: None,
        };

        self.generate(&self.image_model, &request).await?.image()
    }
}
