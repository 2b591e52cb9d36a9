//! 论文生成端点
//!
//! 三个入口共用同一条管线：内联文档、GitHub 仓库、直接给定字段。
//! 生成结果以附件形式返回（DOCX 默认，可选 PDF）。

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::post, Json, Router};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::llm::LlmClient;
use crate::models::api::{
    GenerateFromGithubRequest, GeneratePaperRequest, PaperFormat, ShowPaperRequest,
};
use crate::services::paper_pipeline::{PaperPipeline, RunContext};
use crate::services::render::{build_ieee_docx, render_pdf, PaperFields};
use crate::services::repo_docs::process_github_repo;
use crate::state::AppState;

/// DOCX 下载的 MIME 类型
const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// 跑一遍论文管线，返回运行完成的上下文
async fn run_paper_pipeline(documentation: String) -> AppResult<RunContext> {
    let client = LlmClient::from_config()?;
    let pipeline = PaperPipeline::new(&client);

    let mut ctx = RunContext::new(documentation);
    pipeline.run(&mut ctx).await?;

    if ctx.paper_sections.is_empty() {
        return Err(AppError::Paper(
            "Paper generation failed - no sections produced".to_string(),
        ));
    }

    Ok(ctx)
}

/// 按请求格式渲染章节并打包下载响应
async fn render_paper_response(
    state: &AppState,
    ctx: &RunContext,
    format: PaperFormat,
) -> AppResult<Response> {
    match format {
        PaperFormat::Docx => {
            let bytes = build_ieee_docx(&ctx.paper_sections)?;
            Ok(file_download(bytes, "ieee_paper.docx", DOCX_MIME))
        }
        PaperFormat::Pdf => {
            let fields = PaperFields::from_sections(&ctx.paper_sections);
            let bytes = render_pdf(&state.papers_dir, &fields).await?;
            Ok(file_download(bytes, "research_paper.pdf", "application/pdf"))
        }
    }
}

/// 构造附件下载响应
fn file_download(bytes: Vec<u8>, filename: &str, mime: &str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// 从内联文档生成论文
async fn generate_paper_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GeneratePaperRequest>,
) -> AppResult<Response> {
    let documentation = match req.documentation {
        Some(doc) if !doc.is_empty() => doc,
        _ => {
            return Err(AppError::BadRequest(
                "Missing documentation payload".to_string(),
            ))
        }
    };

    let ctx = run_paper_pipeline(documentation).await?;
    render_paper_response(&state, &ctx, req.format).await
}

/// 克隆 GitHub 仓库、生成代码文档并产出论文
async fn generate_from_github_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateFromGithubRequest>,
) -> AppResult<Response> {
    let repo_url = match req.repo_url {
        Some(url) if !url.is_empty() => url,
        _ => return Err(AppError::BadRequest("GitHub URL required".to_string())),
    };

    info!("从 GitHub 仓库生成论文: {}", repo_url);

    let client = LlmClient::from_config()?;
    let documentation = process_github_repo(&client, &repo_url).await?;

    let ctx = run_paper_pipeline(documentation).await?;
    render_paper_response(&state, &ctx, req.format).await
}

/// 用给定的论文字段直接编译 PDF
async fn show_paper_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ShowPaperRequest>,
) -> AppResult<Response> {
    let fields = PaperFields::from_parts(
        req.title.as_deref().unwrap_or("Untitled"),
        req.abstract_text
            .as_deref()
            .unwrap_or("No abstract provided."),
        req.conclusion.as_deref().unwrap_or(""),
        req.references.as_deref().unwrap_or(""),
    );

    let bytes = render_pdf(&state.papers_dir, &fields).await?;
    Ok(file_download(bytes, "research_paper.pdf", "application/pdf"))
}

/// 创建论文生成路由
pub fn paper_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/generate_paper", post(generate_paper_handler))
        .route(
            "/api/generate_from_github",
            post(generate_from_github_handler),
        )
        .route("/api/show_paper", post(show_paper_handler))
}
