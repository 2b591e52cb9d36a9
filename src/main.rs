//! IEEE Paper Generator - Rust Backend
//!
//! 把代码文档转写成 IEEE 格式研究论文的后端服务。
//! `serve` 参数启动 HTTP 服务，否则进入命令行模式。

use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod llm;
mod models;
mod services;
mod state;
mod utils;

use api::create_api_routes;
use llm::LlmClient;
use services::paper_pipeline::{PaperPipeline, RunContext};
use state::create_shared_state;

/// 未提供输入文件时使用的占位文档
const DEFAULT_DOCUMENTATION: &str = r#"
[Insert your doxygen-generated code documentation here]
...
"#;

/// 在 Windows 上设置控制台代码页为 UTF-8
#[cfg(windows)]
fn setup_console_encoding() {
    unsafe {
        // 设置控制台输出代码页为 UTF-8 (65001)
        extern "system" {
            fn SetConsoleOutputCP(code_page: u32) -> i32;
            fn SetConsoleCP(code_page: u32) -> i32;
        }
        SetConsoleOutputCP(65001);
        SetConsoleCP(65001);
    }
}

#[cfg(not(windows))]
fn setup_console_encoding() {
    // 非 Windows 平台不需要特殊处理
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 设置控制台编码
    setup_console_encoding();

    // 日志走 stderr，命令行模式的论文输出走 stdout，互不干扰
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "papergen_rs=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("serve") => run_server().await,
        doc_path => run_cli(doc_path).await,
    }
}

/// 服务器模式：监听 127.0.0.1:5000
async fn run_server() -> anyhow::Result<()> {
    info!("Starting IEEE paper generator backend...");

    // 创建共享状态
    let state = create_shared_state();

    // 配置 CORS（允许所有来源，与前端本地开发配合）
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 构建路由
    let app = Router::new()
        .merge(create_api_routes(Arc::clone(&state)))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let addr = SocketAddr::from(([127, 0, 0, 1], 5000));
    info!("Server listening on: {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("绑定地址失败: {}", addr))?;
    axum::serve(listener, app).await.context("服务器运行失败")?;

    Ok(())
}

/// 命令行模式：从文件（或内置占位文档）生成论文并打印到标准输出
async fn run_cli(doc_path: Option<&str>) -> anyhow::Result<()> {
    let documentation = match doc_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("读取文档文件失败: {}", path))?,
        None => DEFAULT_DOCUMENTATION.to_string(),
    };

    let client = LlmClient::from_config().context("初始化 LLM 客户端失败")?;
    let pipeline = PaperPipeline::new(&client);

    let mut ctx = RunContext::new(documentation);
    pipeline.run(&mut ctx).await.context("论文生成失败")?;

    match ctx.final_paper {
        Some(paper) => println!("{}", paper),
        None => println!("No paper generated"),
    }

    Ok(())
}
