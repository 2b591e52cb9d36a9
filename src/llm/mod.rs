//! LLM 模块
//!
//! 提供统一的非流式 LLM 客户端，面向 OpenAI 兼容接口。

mod client;
mod format;
mod types;

pub use client::LlmClient;
pub use format::{build_chat_endpoint, fix_base_url, strip_think_tags};
pub use types::*;
