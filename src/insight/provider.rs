//! Text-generation backends. Every provider answers `Option<String>`: a
//! transport error, non-2xx status or empty completion is logged and turned
//! into `None`, never surfaced to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, context: &str, instruction: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Xai,
    OpenRouter,
    Ollama,
    Anthropic,
}

impl ProviderKind {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "xai" | "grok" => Some(ProviderKind::Xai),
            "openrouter" => Some(ProviderKind::OpenRouter),
            "ollama" => Some(ProviderKind::Ollama),
            "anthropic" | "claude" => Some(ProviderKind::Anthropic),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Xai => "xai",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Xai => "https://api.x.ai/v1",
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
            ProviderKind::Ollama => "http://localhost:11434/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Xai => "grok-2-latest",
            ProviderKind::OpenRouter => "openai/gpt-4o-mini",
            ProviderKind::Ollama => "llama3.1",
            ProviderKind::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    fn requires_api_key(self) -> bool {
        !matches!(self, ProviderKind::Ollama)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: None,
            api_key: None,
            base_url: None,
            model: None,
            timeout_ms: 30_000,
        }
    }
}

impl ProviderConfig {
    pub fn kind(&self) -> Option<ProviderKind> {
        self.provider.as_deref().and_then(ProviderKind::from_str)
    }
}

/// Returns `None` for an absent or unknown provider, or a missing API key.
pub fn build_generator(config: &ProviderConfig) -> Option<Arc<dyn TextGenerator>> {
    let Some(kind) = config.kind() else {
        if let Some(provider) = config.provider.as_deref() {
            warn!(provider, "unknown text generation provider");
        }
        return None;
    };

    let api_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string);
    if kind.requires_api_key() && api_key.is_none() {
        debug!(provider = kind.label(), "provider configured without api key");
        return None;
    }

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            warn!(provider = kind.label(), error = %err, "http client init failed");
            return None;
        }
    };

    let api_base = config
        .base_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| kind.default_base_url().to_string());
    let model = config
        .model
        .clone()
        .filter(|model| !model.trim().is_empty())
        .unwrap_or_else(|| kind.default_model().to_string());

    let generator: Arc<dyn TextGenerator> = match kind {
        ProviderKind::Anthropic => Arc::new(AnthropicClient {
            client,
            api_key: api_key.unwrap_or_default(),
            api_base,
            model,
        }),
        _ => Arc::new(ChatCompletionsClient {
            kind,
            client,
            api_key,
            api_base,
            model,
        }),
    };
    Some(generator)
}

/// OpenAI-compatible `/chat/completions` endpoint (OpenAI, xAI, OpenRouter,
/// Ollama).
#[derive(Clone)]
pub struct ChatCompletionsClient {
    kind: ProviderKind,
    client: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
}

impl ChatCompletionsClient {
    async fn complete(&self, context: &str, instruction: &str) -> Result<String, String> {
        let provider = self.kind.label();
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let request = ChatRequest {
            model: self.model.clone(),
            temperature: 0.7,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: context.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: instruction.to_string(),
                },
            ],
        };

        let mut builder = self.client.post(url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", api_key));
        }
        let response = builder
            .send()
            .await
            .map_err(|err| format!("{} request failed: {}", provider, err))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("{} API error: {}", provider, status));
            }
            return Err(format!("{} API error: {} {}", provider, status, detail));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| format!("{} response parse failed: {}", provider, err))?;

        body.choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| format!("{} response missing choices", provider))
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    fn name(&self) -> &str {
        self.kind.label()
    }

    async fn generate(&self, context: &str, instruction: &str) -> Option<String> {
        match self.complete(context, instruction).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(provider = self.kind.label(), model = %self.model, error = %err, "text generation failed");
                None
            }
        }
    }
}

/// Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl AnthropicClient {
    async fn complete(&self, context: &str, instruction: &str) -> Result<String, String> {
        let url = format!("{}/messages", self.api_base.trim_end_matches('/'));
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            system: context.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: instruction.to_string(),
            }],
        };

        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|err| format!("anthropic request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(format!("anthropic API error: {} {}", status, error_body.trim()));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|err| format!("anthropic response parse failed: {}", err))?;

        let text: Vec<String> = body
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        let text = text.join("\n").trim().to_string();
        if text.is_empty() {
            return Err("anthropic response missing text".to_string());
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    fn name(&self) -> &str {
        ProviderKind::Anthropic.label()
    }

    async fn generate(&self, context: &str, instruction: &str) -> Option<String> {
        match self.complete(context, instruction).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(provider = "anthropic", model = %self.model, error = %err, "text generation failed");
                None
            }
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}
