//! 论文生成管线核心类型
//!
//! 定义运行上下文、状态机状态集合与纯状态转移函数。

use std::collections::HashMap;

/// IEEE 论文的规范章节顺序
///
/// 编译输出始终按此顺序排列，与各章节的实际生成顺序无关。
pub const PAPER_SECTIONS: [&str; 7] = [
    "Title",
    "Abstract",
    "Introduction",
    "Methodology",
    "Results & Discussion",
    "Conclusion",
    "References",
];

/// 单次运行的共享上下文
///
/// 每次调用（HTTP 请求或 CLI 执行）都创建全新实例，由管线各阶段
/// 以 `&mut` 方式就地修改；运行结束后调用方取走 `paper_sections`
/// 或 `final_paper`，上下文随即丢弃，不跨运行持久化。
#[derive(Debug, Clone)]
pub struct RunContext {
    /// 原始代码文档输入
    pub documentation: String,
    /// 有序章节列表（由初始阶段写入）
    pub sections: Vec<String>,
    /// 当前章节游标（0 起始）
    pub current_section: usize,
    /// 已生成的章节内容，按章节名索引
    pub paper_sections: HashMap<String, String>,
    /// 编译完成的论文全文，终态前为 None
    pub final_paper: Option<String>,
}

impl RunContext {
    /// 以文档文本创建新的运行上下文
    pub fn new(documentation: impl Into<String>) -> Self {
        Self {
            documentation: documentation.into(),
            sections: Vec::new(),
            current_section: 0,
            paper_sections: HashMap::new(),
            final_paper: None,
        }
    }
}

/// 管线状态机的状态集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// 初始状态：写入章节结构并生成 Title 章节
    DecidingStructure,
    /// 自循环状态：生成后续各章节
    GeneratingSection,
    /// 终结入口：编译最终论文
    Compiling,
    /// 终态
    Done,
}

/// 纯状态转移函数
///
/// 在阶段副作用（章节存储、游标递增）完成之后求值：
/// 游标仍在章节数以内则继续生成，否则进入编译；编译后即完成。
pub fn next_state(current: PipelineState, ctx: &RunContext) -> PipelineState {
    match current {
        PipelineState::DecidingStructure | PipelineState::GeneratingSection => {
            if ctx.current_section < ctx.sections.len() {
                PipelineState::GeneratingSection
            } else {
                PipelineState::Compiling
            }
        }
        PipelineState::Compiling => PipelineState::Done,
        PipelineState::Done => PipelineState::Done,
    }
}

/// 单个生成步骤解析出的三字段记录
///
/// 三个字段均可能缺失：`None` 表示对应标记行从未出现，
/// `Some("")` 表示标记出现但未恢复出任何文本。记录在步骤
/// 完成逻辑中即时消费，不做保留。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRecord {
    /// 模型自报的章节名（可能缺失或与游标章节不一致）
    pub section: Option<String>,
    /// 章节正文
    pub content: Option<String>,
    /// 模型建议的下一步动作令牌，仅供参考，管线不依据其路由
    pub next_action: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_context(cursor: usize) -> RunContext {
        let mut ctx = RunContext::new("doc");
        ctx.sections = PAPER_SECTIONS.iter().map(|s| s.to_string()).collect();
        ctx.current_section = cursor;
        ctx
    }

    #[test]
    fn test_new_context_defaults() {
        let ctx = RunContext::new("some docs");
        assert_eq!(ctx.documentation, "some docs");
        assert!(ctx.sections.is_empty());
        assert_eq!(ctx.current_section, 0);
        assert!(ctx.paper_sections.is_empty());
        assert!(ctx.final_paper.is_none());
    }

    #[test]
    fn test_next_state_keeps_generating_while_sections_remain() {
        let ctx = seeded_context(1);
        assert_eq!(
            next_state(PipelineState::DecidingStructure, &ctx),
            PipelineState::GeneratingSection
        );

        let ctx = seeded_context(6);
        assert_eq!(
            next_state(PipelineState::GeneratingSection, &ctx),
            PipelineState::GeneratingSection
        );
    }

    #[test]
    fn test_next_state_moves_to_compiling_at_section_count() {
        let ctx = seeded_context(PAPER_SECTIONS.len());
        assert_eq!(
            next_state(PipelineState::GeneratingSection, &ctx),
            PipelineState::Compiling
        );
    }

    #[test]
    fn test_next_state_terminal_transitions() {
        let ctx = seeded_context(PAPER_SECTIONS.len());
        assert_eq!(next_state(PipelineState::Compiling, &ctx), PipelineState::Done);
        assert_eq!(next_state(PipelineState::Done, &ctx), PipelineState::Done);
    }

    #[test]
    fn test_canonical_section_order() {
        assert_eq!(PAPER_SECTIONS.len(), 7);
        assert_eq!(PAPER_SECTIONS[0], "Title");
        assert_eq!(PAPER_SECTIONS[6], "References");
    }
}
