//! LaTeX 渲染与 PDF 编译
//!
//! 把论文字段填进内置的 IEEE 会议模板，写成 .tex 后调用 pdflatex
//! 编译。每次编译用 uuid 命名，避免并发请求互相覆盖产物。

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::paper_pipeline::PAPER_SECTIONS;

/// pdflatex 超时时间
const PDFLATEX_TIMEOUT: Duration = Duration::from_secs(60);

/// IEEE 会议论文模板，占位符由 render_tex 替换
const TEX_TEMPLATE: &str = r#"\documentclass[conference]{IEEEtran}

\begin{document}

\title{{paper_title}}
\author{}
\maketitle

\begin{abstract}
{paper_abstract}
\end{abstract}

{paper_body}
\section{Conclusion}
{paper_conclusion}

\section*{References}
{paper_references}

\end{document}
"#;

/// 填入模板的论文字段，内容在构造时完成 LaTeX 转义
#[derive(Debug, Clone, Default)]
pub struct PaperFields {
    pub title: String,
    pub abstract_text: String,
    /// Abstract 与 Conclusion 之间的正文章节，已带 \section 标题
    pub body: String,
    pub conclusion: String,
    pub references: String,
}

impl PaperFields {
    /// 从四个独立字段构造（正文为空），用于直接给定内容的渲染
    pub fn from_parts(title: &str, abstract_text: &str, conclusion: &str, references: &str) -> Self {
        Self {
            title: escape_latex(title),
            abstract_text: escape_latex(abstract_text),
            body: String::new(),
            conclusion: escape_latex(conclusion),
            references: escape_latex(references),
        }
    }

    /// 从管线编译出的章节映射构造，中间章节进入正文
    pub fn from_sections(sections: &HashMap<String, String>) -> Self {
        let get = |name: &str| sections.get(name).map(String::as_str).unwrap_or("");

        let title = match get(PAPER_SECTIONS[0]) {
            "" => "Untitled".to_string(),
            t => escape_latex(t),
        };
        let abstract_text = match get("Abstract") {
            "" => "No abstract provided.".to_string(),
            a => escape_latex(a),
        };

        let mut body = String::new();
        for section in ["Introduction", "Methodology", "Results & Discussion"] {
            let content = get(section);
            if content.is_empty() {
                continue;
            }
            body.push_str(&format!(
                "\\section{{{}}}\n{}\n\n",
                escape_latex(section),
                escape_latex(content)
            ));
        }

        Self {
            title,
            abstract_text,
            body,
            conclusion: escape_latex(get("Conclusion")),
            references: escape_latex(get("References")),
        }
    }
}

/// 渲染完整的 .tex 文本
pub fn render_tex(fields: &PaperFields) -> String {
    TEX_TEMPLATE
        .replace("{paper_title}", &fields.title)
        .replace("{paper_abstract}", &fields.abstract_text)
        .replace("{paper_body}", &fields.body)
        .replace("{paper_conclusion}", &fields.conclusion)
        .replace("{paper_references}", &fields.references)
}

/// 转义 LaTeX 特殊字符
fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '$' => out.push_str("\\$"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    out
}

/// 渲染并编译 PDF，返回文件字节
///
/// .tex 与 .pdf 都落在 papers_dir 下，编译失败（非零退出）
/// 报 "PDF compilation failed"。
pub async fn render_pdf(papers_dir: &Path, fields: &PaperFields) -> Result<Vec<u8>, AppError> {
    tokio::fs::create_dir_all(papers_dir)
        .await
        .map_err(|e| AppError::Render(format!("创建输出目录失败: {}", e)))?;

    let job_id = Uuid::new_v4().to_string();
    let tex_path = papers_dir.join(format!("{}.tex", job_id));
    let pdf_path = papers_dir.join(format!("{}.pdf", job_id));

    tokio::fs::write(&tex_path, render_tex(fields))
        .await
        .map_err(|e| AppError::Render(format!("写入 .tex 失败: {}", e)))?;

    info!("编译 PDF: {}", tex_path.display());

    let mut child = Command::new("pdflatex")
        .arg("-interaction=nonstopmode")
        .arg("-halt-on-error")
        .arg("-output-directory")
        .arg(papers_dir)
        .arg(&tex_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| AppError::Render(format!("无法启动 pdflatex: {}", e)))?;

    let status = match timeout(PDFLATEX_TIMEOUT, child.wait()).await {
        Ok(result) => {
            result.map_err(|e| AppError::Render(format!("等待 pdflatex 进程失败: {}", e)))?
        }
        Err(_) => return Err(AppError::Render("pdflatex 超时".to_string())),
    };

    if !status.success() {
        return Err(AppError::Render("PDF compilation failed".to_string()));
    }

    tokio::fs::read(&pdf_path)
        .await
        .map_err(|e| AppError::Render(format!("读取 PDF 失败: {}", e)))
}
