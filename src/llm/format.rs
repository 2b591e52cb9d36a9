//! 端点构建与回复清理工具

use once_cell::sync::Lazy;
use regex::Regex;

/// <think>…</think> 推理块匹配
///
/// deepseek-r1 蒸馏系模型会在正文前输出推理过程，必须剥掉
/// 否则会混进论文章节正文。
static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("invalid think-block regex"));

/// 修复 base_url
///
/// - 移除末尾斜杠
/// - 修复双斜杠（保留协议部分）
pub fn fix_base_url(base_url: &str) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();

    if let Some(pos) = url.find("://") {
        let (protocol, rest) = url.split_at(pos + 3);
        let fixed_rest = rest.replace("//", "/");
        url = format!("{}{}", protocol, fixed_rest);
    }

    url
}

/// 构建 Chat Completions 端点
pub fn build_chat_endpoint(base_url: &str) -> String {
    let url = fix_base_url(base_url);

    if url.ends_with("/chat/completions") {
        url
    } else if url.ends_with("/v1") {
        format!("{}/chat/completions", url)
    } else {
        format!("{}/v1/chat/completions", url)
    }
}

/// OpenRouter 应用归属请求头
///
/// 只在目标是 openrouter.ai 时附加；其他 OpenAI 兼容服务不需要。
pub fn openrouter_headers(base_url: &str) -> Vec<(&'static str, &'static str)> {
    if base_url.contains("openrouter.ai") {
        vec![
            ("HTTP-Referer", "http://localhost:5000"),
            ("X-Title", "papergen-rs"),
        ]
    } else {
        Vec::new()
    }
}

/// 剥除回复中的 <think> 推理块并去除首尾空白
pub fn strip_think_tags(text: &str) -> String {
    THINK_BLOCK.replace_all(text, "").trim().to_string()
}

/// 从错误响应体中提取 error.message
///
/// 响应体不是 JSON 或不含该字段时返回 None，由调用方降级处理。
pub fn extract_api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_base_url() {
        assert_eq!(
            fix_base_url("https://openrouter.ai/api/v1/"),
            "https://openrouter.ai/api/v1"
        );
        assert_eq!(
            fix_base_url("https://openrouter.ai//api/v1"),
            "https://openrouter.ai/api/v1"
        );
    }

    #[test]
    fn test_build_chat_endpoint() {
        assert_eq!(
            build_chat_endpoint("https://openrouter.ai/api/v1"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            build_chat_endpoint("https://openrouter.ai/api/v1/chat/completions"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            build_chat_endpoint("https://api.example.com"),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_openrouter_headers_only_for_openrouter() {
        assert!(!openrouter_headers("https://openrouter.ai/api/v1").is_empty());
        assert!(openrouter_headers("https://api.example.com/v1").is_empty());
    }

    #[test]
    fn test_strip_think_tags() {
        assert_eq!(
            strip_think_tags("<think>let me reason…</think>\nSection: Title"),
            "Section: Title"
        );
        assert_eq!(strip_think_tags("no tags here"), "no tags here");
    }

    #[test]
    fn test_strip_think_tags_multiline_and_multiple() {
        let text = "<think>first\nblock</think>keep<think>second</think> this";
        assert_eq!(strip_think_tags(text), "keep this");
    }

    #[test]
    fn test_strip_think_tags_unclosed_left_alone() {
        let text = "<think>never closed\nSection: Title";
        assert_eq!(strip_think_tags(text), text);
    }

    #[test]
    fn test_extract_api_error_message() {
        let body = r#"{"error": {"message": "Rate limit exceeded", "code": 429}}"#;
        assert_eq!(
            extract_api_error_message(body).as_deref(),
            Some("Rate limit exceeded")
        );
        assert_eq!(extract_api_error_message("plain text error"), None);
        assert_eq!(extract_api_error_message(r#"{"detail": "other shape"}"#), None);
    }
}
