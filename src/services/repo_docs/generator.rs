//! 逐文件代码文档生成
//!
//! 对每个源码文件调用一次文档模型。单个文件失败降级为错误说明文本，
//! 不中断整个仓库的处理。

use futures::{stream, StreamExt};
use tempfile::TempDir;
use tracing::{info, warn};

use crate::config::get_config;
use crate::error::AppError;
use crate::llm::{ChatMessage, ChatOptions, LlmClient};

use super::cloner::{clone_repo, validate_github_url};
use super::scanner::{RepoScanner, SourceFile};

/// 逐文件文档 Prompt 模板
const CODE_DOC_PROMPT: &str = "Code to document:\n{code}";

/// 格式化逐文件文档 Prompt
pub fn format_code_doc_prompt(code: &str) -> String {
    CODE_DOC_PROMPT.replace("{code}", code)
}

/// 克隆 GitHub 仓库并汇总全部源码文档
///
/// 返回拼接后的文档文本，作为论文管线的 documentation 输入。
pub async fn process_github_repo(client: &LlmClient, repo_url: &str) -> Result<String, AppError> {
    validate_github_url(repo_url)?;

    let checkout = TempDir::new().map_err(|e| AppError::Repo(format!("创建临时目录失败: {}", e)))?;
    clone_repo(repo_url, checkout.path()).await?;

    let files = RepoScanner::new().collect_sources(checkout.path());
    info!("仓库扫描完成, 共 {} 个源码文件", files.len());

    Ok(document_files(client, files).await)
}

/// 为一组源码文件生成文档并按扫描顺序拼接
async fn document_files(client: &LlmClient, files: Vec<SourceFile>) -> String {
    let config = get_config();
    let concurrency = config.doc_concurrency.clamp(1, 10);
    let options = ChatOptions {
        temperature: Some(config.doc_temperature),
        max_tokens: Some(config.max_tokens),
    };
    let doc_model = config.doc_model;

    // buffered 限制并发数且保持输入顺序，输出顺序与扫描排序一致
    let docs: Vec<String> = stream::iter(files.into_iter().map(|file| {
        let options = options.clone();
        let doc_model = doc_model.clone();
        async move {
            let prompt = format_code_doc_prompt(&file.code);
            let doc = match client
                .chat(vec![ChatMessage::user(prompt)], &doc_model, &options)
                .await
            {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("文件 {} 文档生成失败: {}", file.rel_path, e);
                    format!("Documentation generation failed: {}", e)
                }
            };
            format!("=== File: {} ===\n{}", file.rel_path, doc)
        }
    }))
    .buffered(concurrency)
    .collect()
    .await;

    docs.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_code_doc_prompt() {
        let prompt = format_code_doc_prompt("fn main() {}");
        assert_eq!(prompt, "Code to document:\nfn main() {}");
        assert!(!prompt.contains("{code}"));
    }
}
