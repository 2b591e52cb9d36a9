//! 章节生成管线
//!
//! 顺序状态机：每个章节恰好一次模型调用，解析回复后按游标章节
//! 存储并推进游标，全部章节完成后编译为最终论文。模型调用失败
//! 视为致命错误并向上传播；回复格式不符仅降级为空内容。

use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm::LlmError;

use super::compiler::compile_paper;
use super::parser::parse_section_reply;
use super::prompts::{format_section_prompt, format_title_prompt};
use super::types::{next_state, PipelineState, RunContext, SectionRecord, PAPER_SECTIONS};

/// 管线唯一依赖的外部能力：提交提示词，取回补全文本
///
/// 生产实现是 `LlmClient`；测试用脚本化实现替代，不触网络。
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// 论文章节生成管线
///
/// 不含任何跨运行状态，每次运行配合一个全新的 [`RunContext`] 使用。
pub struct PaperPipeline<'a> {
    model: &'a dyn CompletionModel,
}

impl<'a> PaperPipeline<'a> {
    pub fn new(model: &'a dyn CompletionModel) -> Self {
        Self { model }
    }

    /// 运行管线直至终态
    ///
    /// 章节生成严格串行，每步阻塞在一次模型往返上；没有重试，
    /// 也没有取消机制。返回 `Err` 即整次运行中止。
    pub async fn run(&self, ctx: &mut RunContext) -> Result<(), LlmError> {
        let mut state = PipelineState::DecidingStructure;
        loop {
            match state {
                PipelineState::DecidingStructure => self.decide_structure(ctx).await?,
                PipelineState::GeneratingSection => self.generate_section(ctx).await?,
                PipelineState::Compiling => self.compile(ctx),
                PipelineState::Done => break,
            }
            state = next_state(state, ctx);
        }
        Ok(())
    }

    /// 初始阶段：写入规范章节结构，生成 Title 章节
    async fn decide_structure(&self, ctx: &mut RunContext) -> Result<(), LlmError> {
        ctx.sections = PAPER_SECTIONS.iter().map(|s| s.to_string()).collect();
        ctx.current_section = 0;

        let prompt = format_title_prompt(&ctx.documentation);
        let reply = self.model.complete(&prompt).await?;
        let record = parse_section_reply(&reply);
        store_section(ctx, PAPER_SECTIONS[0], record);
        Ok(())
    }

    /// 循环阶段：生成游标指向的章节
    async fn generate_section(&self, ctx: &mut RunContext) -> Result<(), LlmError> {
        // 游标已越界时不发起调用、不写入内容，防止被多驱动一步
        let Some(section_name) = ctx.sections.get(ctx.current_section).cloned() else {
            return Ok(());
        };

        let prompt = format_section_prompt(&section_name, &ctx.documentation);
        let reply = self.model.complete(&prompt).await?;
        let record = parse_section_reply(&reply);
        store_section(ctx, &section_name, record);
        Ok(())
    }

    /// 终结阶段：编译最终论文
    fn compile(&self, ctx: &mut RunContext) {
        ctx.final_paper = Some(compile_paper(&ctx.paper_sections));
        info!("研究论文编译完成");
    }
}

/// 将一次生成结果存入上下文并推进游标
///
/// 存储键始终取游标对应的章节名；模型自报章节名不一致时只告警，
/// 不改变存储位置。正文缺失与为空都落成空字符串。
fn store_section(ctx: &mut RunContext, expected: &str, record: SectionRecord) {
    if let Some(reported) = record.section.as_deref() {
        if reported != expected {
            warn!(
                "模型自报章节名 '{}' 与游标章节 '{}' 不一致，按游标章节存储",
                reported, expected
            );
        }
    }

    ctx.paper_sections
        .insert(expected.to_string(), record.content.unwrap_or_default());
    ctx.current_section += 1;
    info!("已生成章节: {}", expected);
}
