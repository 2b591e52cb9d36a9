//! REST API 请求/响应模型

use serde::{Deserialize, Serialize};

/// 论文输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    #[default]
    Docx,
    Pdf,
}

/// 文档直供的论文生成请求
#[derive(Debug, Deserialize)]
pub struct GeneratePaperRequest {
    /// 原始代码文档文本
    pub documentation: Option<String>,
    /// 输出格式，缺省 DOCX
    #[serde(default)]
    pub format: PaperFormat,
}

/// GitHub 仓库驱动的论文生成请求
#[derive(Debug, Deserialize)]
pub struct GenerateFromGithubRequest {
    /// 仓库地址，须以 https://github.com/ 开头
    pub repo_url: Option<String>,
    /// 输出格式，缺省 DOCX
    #[serde(default)]
    pub format: PaperFormat,
}

/// 直接渲染 PDF 的请求（不经模型，字段即章节）
#[derive(Debug, Deserialize)]
pub struct ShowPaperRequest {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub conclusion: Option<String>,
    pub references: Option<String>,
}
