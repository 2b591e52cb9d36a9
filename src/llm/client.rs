//! 统一 LLM 客户端
//!
//! 面向 OpenAI 兼容的 Chat Completions 接口（默认 OpenRouter），
//! 非流式调用。每次请求无论成败都写入 JSONL 请求日志。

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::get_config;
use crate::services::paper_pipeline::CompletionModel;
use crate::utils::request_logger;

use super::format::{
    build_chat_endpoint, extract_api_error_message, openrouter_headers, strip_think_tags,
};
use super::types::{ChatMessage, ChatOptions, LlmError};

/// 统一 LLM 客户端
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }

        // 构建 HTTP 客户端
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(LlmError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
        })
    }

    /// 从全局配置构建客户端
    pub fn from_config() -> Result<Self, LlmError> {
        let config = get_config();
        Self::new(config.api_key, config.base_url)
    }

    /// 非流式聊天调用，返回完整回复文本
    ///
    /// 失败（网络错误、非 2xx、响应缺字段）原样上抛，不做重试。
    /// 回复中的 <think> 推理块在返回前剥除。
    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        options: &ChatOptions,
    ) -> Result<String, LlmError> {
        let endpoint = build_chat_endpoint(&self.base_url);
        info!("LLM request: model={}, endpoint={}", model, endpoint);

        let message_pairs: Vec<(String, String)> = messages
            .iter()
            .map(|m| (m.role.clone(), m.content.clone()))
            .collect();
        let entry = request_logger().log_request(
            &endpoint,
            &self.base_url,
            &self.api_key,
            model,
            &message_pairs,
            options.temperature,
            options.max_tokens,
        );
        let started = Instant::now();

        match self.chat_inner(&endpoint, &messages, model, options).await {
            Ok(content) => {
                debug!(
                    "LLM response: {} chars in {}ms",
                    content.len(),
                    started.elapsed().as_millis()
                );
                request_logger().log_success(entry, started, &content);
                Ok(content)
            }
            Err(err) => {
                let status_code = match &err {
                    LlmError::ApiError { status, .. } => Some(*status),
                    _ => None,
                };
                request_logger().log_error(entry, started, &err.to_string(), status_code);
                Err(err)
            }
        }
    }

    async fn chat_inner(
        &self,
        endpoint: &str,
        messages: &[ChatMessage],
        model: &str,
        options: &ChatOptions,
    ) -> Result<String, LlmError> {
        let mut body = json!({
            "model": model,
            "messages": messages,
            "stream": false,
        });
        if let Some(temperature) = options.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        let mut request = self
            .client
            .post(endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        for (name, value) in openrouter_headers(&self.base_url) {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::HttpError(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = extract_api_error_message(&text)
                .unwrap_or_else(|| text.chars().take(200).collect());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let reply: Value = serde_json::from_str(&text)?;
        let content = reply
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| LlmError::ApiError {
                status: status.as_u16(),
                message: "响应缺少 choices[0].message.content 字段".to_string(),
            })?;

        Ok(strip_think_tags(content))
    }
}

/// 管线外部能力实现：用配置的论文模型补全单条 user 消息
#[async_trait]
impl CompletionModel for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let config = get_config();
        let options = ChatOptions {
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        };
        self.chat(vec![ChatMessage::user(prompt)], &config.model, &options)
            .await
    }
}
