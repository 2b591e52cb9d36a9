//! 论文生成管线模块
//!
//! 将代码文档转换为 IEEE 风格研究论文的顺序生成管线
//!
//! # 功能
//!
//! - 固定的七章节规范结构（Title → References）
//! - 状态机驱动：每章节恰好一次模型调用，串行推进
//! - 容错解析：模型回复不守格式时降级为空内容而非中断
//! - 编译输出：按规范顺序拼接带下划线标题的纯文本论文
//!
//! # 使用示例
//!
//! ```ignore
//! use papergen_rs::services::paper_pipeline::{PaperPipeline, RunContext};
//! use papergen_rs::llm::LlmClient;
//!
//! let client = LlmClient::from_config()?;
//! let mut ctx = RunContext::new(documentation);
//! PaperPipeline::new(&client).run(&mut ctx).await?;
//!
//! // HTTP 驱动读取 ctx.paper_sections 交给渲染器，
//! // CLI 驱动读取 ctx.final_paper 直接输出
//! ```

mod compiler;
mod parser;
mod pipeline;
pub mod prompts;
pub mod types;

pub use compiler::compile_paper;
pub use parser::parse_section_reply;
pub use pipeline::{CompletionModel, PaperPipeline};
pub use types::{PipelineState, RunContext, SectionRecord, PAPER_SECTIONS};
