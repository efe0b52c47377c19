use crate::error::CompletionError;
use crate::titler::derive::{Completer, CompletionRequest};
use reqwest::blocking::Client;
use serde_json::Value;
use std::env;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteProvider {
    OpenAi,
    Anthropic,
    Gemini,
    OpenAiCompatible,
}

impl RemoteProvider {
    pub fn label(self) -> &'static str {
        match self {
            RemoteProvider::OpenAi => "openai",
            RemoteProvider::Anthropic => "anthropic",
            RemoteProvider::Gemini => "gemini",
            RemoteProvider::OpenAiCompatible => "openai-compatible",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: RemoteProvider,
    pub model: String,
    pub api_key: String,
    pub base_url: Option<String>,
}

fn env_non_empty(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

fn parse_provider_alias(raw: &str) -> Option<RemoteProvider> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "openai" => Some(RemoteProvider::OpenAi),
        "anthropic" | "claude" => Some(RemoteProvider::Anthropic),
        "gemini" | "google" => Some(RemoteProvider::Gemini),
        "openai-compatible" | "compatible" | "deepseek" => Some(RemoteProvider::OpenAiCompatible),
        _ => None,
    }
}

fn parse_prefixed_model(raw: &str) -> (Option<RemoteProvider>, String) {
    let trimmed = raw.trim();
    if let Some((prefix, model)) = trimmed.split_once(':')
        && let Some(provider) = parse_provider_alias(prefix)
    {
        return (Some(provider), model.trim().to_string());
    }
    (None, trimmed.to_string())
}

fn infer_provider_from_model(model: &str) -> Option<RemoteProvider> {
    let lower = model.trim().to_ascii_lowercase();
    if lower.starts_with("deepseek-") {
        return Some(RemoteProvider::OpenAiCompatible);
    }
    if lower.starts_with("claude-") {
        return Some(RemoteProvider::Anthropic);
    }
    if lower.starts_with("gemini-") {
        return Some(RemoteProvider::Gemini);
    }
    if lower.starts_with("gpt-")
        || lower.starts_with("o1")
        || lower.starts_with("o3")
        || lower.starts_with("o4")
    {
        return Some(RemoteProvider::OpenAi);
    }
    None
}

fn first_available_provider() -> Option<RemoteProvider> {
    if env_non_empty("AI_API_KEY").is_some() {
        return Some(RemoteProvider::OpenAiCompatible);
    }
    if env_non_empty("OPENAI_API_KEY").is_some() {
        return Some(RemoteProvider::OpenAi);
    }
    if env_non_empty("ANTHROPIC_API_KEY").is_some() {
        return Some(RemoteProvider::Anthropic);
    }
    if env_non_empty("GEMINI_API_KEY").is_some() {
        return Some(RemoteProvider::Gemini);
    }
    None
}

fn default_model_for_provider(provider: RemoteProvider) -> &'static str {
    match provider {
        RemoteProvider::OpenAi => "gpt-4.1-mini",
        RemoteProvider::Anthropic => "claude-3-5-haiku-latest",
        RemoteProvider::Gemini => "gemini-2.5-flash-lite",
        RemoteProvider::OpenAiCompatible => "deepseek-chat",
    }
}

fn resolve_api_key(provider: RemoteProvider) -> Option<String> {
    match provider {
        RemoteProvider::OpenAi => {
            env_non_empty("OPENAI_API_KEY").or_else(|| env_non_empty("AI_API_KEY"))
        }
        RemoteProvider::Anthropic => {
            env_non_empty("ANTHROPIC_API_KEY").or_else(|| env_non_empty("AI_API_KEY"))
        }
        RemoteProvider::Gemini => {
            env_non_empty("GEMINI_API_KEY").or_else(|| env_non_empty("AI_API_KEY"))
        }
        RemoteProvider::OpenAiCompatible => env_non_empty("AI_API_KEY")
            .or_else(|| env_non_empty("DEEPSEEK_API_KEY"))
            .or_else(|| env_non_empty("OPENAI_API_KEY")),
    }
}

fn resolve_compatible_base_url(model: &str) -> Option<String> {
    if let Some(base) = env_non_empty("AI_BASE_URL") {
        return Some(base);
    }
    if model.trim().to_ascii_lowercase().starts_with("deepseek-") {
        return Some("https://api.deepseek.com".to_string());
    }
    None
}

/// Resolve the completion provider from the environment: explicit
/// `RETITLE_PROVIDER` / `AI_PROVIDER` aliases first, then a provider prefix
/// on the model string, then inference from the model name, then whichever
/// API key is present.
pub fn resolve_provider_config() -> Option<ProviderConfig> {
    let configured_model = env_non_empty("RETITLE_MODEL")
        .or_else(|| env_non_empty("AI_MODEL"))
        .or_else(|| first_available_provider().map(|p| default_model_for_provider(p).to_string()));

    let mut chosen_provider = env_non_empty("RETITLE_PROVIDER")
        .as_deref()
        .and_then(parse_provider_alias)
        .or_else(|| {
            env_non_empty("AI_PROVIDER")
                .as_deref()
                .and_then(parse_provider_alias)
        });
    let (prefixed_provider, mut model) = configured_model
        .as_deref()
        .map(parse_prefixed_model)
        .unwrap_or((None, String::new()));
    if chosen_provider.is_none() {
        chosen_provider = prefixed_provider
            .or_else(|| infer_provider_from_model(&model))
            .or_else(first_available_provider);
    }

    let provider = chosen_provider?;
    if model.trim().is_empty() {
        model = default_model_for_provider(provider).to_string();
    }
    let base_url = match provider {
        RemoteProvider::OpenAiCompatible => resolve_compatible_base_url(&model),
        _ => None,
    };
    let api_key = resolve_api_key(provider)?;
    Some(ProviderConfig {
        provider,
        model,
        api_key,
        base_url,
    })
}

/// Build the completer for a resolved provider.
pub fn completer_for(config: &ProviderConfig) -> Box<dyn Completer> {
    match config.provider {
        RemoteProvider::OpenAi => Box::new(OpenAiCompleter {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }),
        RemoteProvider::Anthropic => Box::new(AnthropicCompleter {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }),
        RemoteProvider::Gemini => Box::new(GeminiCompleter {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }),
        RemoteProvider::OpenAiCompatible => Box::new(OpenAiCompatCompleter {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
        }),
    }
}

pub struct OpenAiCompleter {
    pub api_key: String,
    pub model: String,
}

pub struct AnthropicCompleter {
    pub api_key: String,
    pub model: String,
}

pub struct GeminiCompleter {
    pub api_key: String,
    pub model: String,
}

pub struct OpenAiCompatCompleter {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

fn http_client() -> Result<Client, CompletionError> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(CompletionError::from)
}

fn read_body(provider: &str, response: reqwest::blocking::Response) -> Result<Value, CompletionError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .map_err(|err| CompletionError::Malformed(format!("{provider}: {err}")));
    }
    let detail = format!("{provider} returned status {status}");
    match status.as_u16() {
        401 | 403 => Err(CompletionError::Auth(detail)),
        429 => Err(CompletionError::RateLimited(detail)),
        _ => Err(CompletionError::Service(detail)),
    }
}

fn extract_openai_text(json: &Value) -> Option<String> {
    if let Some(text) = json.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let mut chunks = Vec::new();
    let output = json.get("output").and_then(Value::as_array)?;
    for item in output {
        let Some(content) = item.get("content").and_then(Value::as_array) else {
            continue;
        };
        for part in content {
            if let Some(text) = part.get("text").and_then(Value::as_str) {
                chunks.push(text.to_string());
            }
        }
    }

    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n"))
    }
}

fn extract_anthropic_text(json: &Value) -> Option<String> {
    let mut chunks = Vec::new();
    let content = json.get("content").and_then(Value::as_array)?;
    for part in content {
        if let Some(text) = part.get("text").and_then(Value::as_str) {
            chunks.push(text.to_string());
        }
    }
    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n"))
    }
}

fn extract_gemini_text(json: &Value) -> Option<String> {
    json.get("candidates")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(|v| v.get("content"))
        .and_then(|v| v.get("parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(|v| v.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn extract_first_choice_text(json: &Value) -> Option<String> {
    let choices = json.get("choices").and_then(Value::as_array)?;
    let first = choices.first()?;
    let content = first.get("message")?.get("content")?;
    match content {
        Value::String(s) => Some(s.to_string()),
        Value::Array(parts) => {
            let mut chunks = Vec::new();
            for part in parts {
                if let Some(text) = part.get("text").and_then(Value::as_str) {
                    chunks.push(text.to_string());
                }
            }
            if chunks.is_empty() {
                None
            } else {
                Some(chunks.join("\n"))
            }
        }
        _ => None,
    }
}

impl Completer for OpenAiCompleter {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let payload = serde_json::json!({
            "model": self.model,
            "instructions": request.system,
            "input": request.user,
            "max_output_tokens": request.max_tokens,
            "temperature": 0.7
        });

        let response = http_client()?
            .post("https://api.openai.com/v1/responses")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()?;
        let json = read_body("openai", response)?;
        extract_openai_text(&json).ok_or(CompletionError::EmptyResponse)
    }
}

impl Completer for AnthropicCompleter {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let payload = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "temperature": 0.7,
            "system": request.system,
            "messages": [
                {
                    "role": "user",
                    "content": request.user
                }
            ]
        });

        let response = http_client()?
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&payload)
            .send()?;
        let json = read_body("anthropic", response)?;
        extract_anthropic_text(&json).ok_or(CompletionError::EmptyResponse)
    }
}

impl Completer for GeminiCompleter {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let payload = serde_json::json!({
            "systemInstruction": {
                "parts": [
                    {"text": request.system}
                ]
            },
            "contents": [
                {
                    "parts": [
                        {"text": request.user}
                    ]
                }
            ],
            "generationConfig": {
                "maxOutputTokens": request.max_tokens,
                "temperature": 0.7
            }
        });

        let response = http_client()?.post(&url).json(&payload).send()?;
        let json = read_body("gemini", response)?;
        extract_gemini_text(&json).ok_or(CompletionError::EmptyResponse)
    }
}

impl Completer for OpenAiCompatCompleter {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let base = self.base_url.trim_end_matches('/');
        let url = format!("{base}/v1/chat/completions");
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user}
            ],
            "max_tokens": request.max_tokens,
            "temperature": 0.7
        });

        let response = http_client()?
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()?;
        let json = read_body("openai-compatible", response)?;
        extract_first_choice_text(&json).ok_or(CompletionError::EmptyResponse)
    }
}
