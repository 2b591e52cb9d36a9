//! 论文生成 Prompt 模板
//!
//! 所有章节提示词都要求模型以 `Section:` / `Content:` / `Next Action:`
//! 三字段纯文本格式回复。Title 章节使用强调简洁性的独立模板，
//! 其余章节共用通用模板。文档文本不做任何校验或截断，原样嵌入。

/// Title 章节生成 Prompt
pub const TITLE_SECTION_PROMPT: &str = r#"You are a highly qualified research paper writer tasked with producing a research paper strictly in IEEE format with high academic value.
Use the following code documentation (from doxygen) as the basis for your work:

{documentation}

Begin by generating the 'Title' section. Ensure the title is concise, technically precise, and conforms to IEEE standards.
Format your response as follows:

Section: Title
Content:
<Generated Title content in IEEE style>
Next Action: generate_next

Change the language to English. Make sure to use the IEEE format."#;

/// 通用章节生成 Prompt
pub const PAPER_SECTION_PROMPT: &str = r#"You are a research paper writer tasked with composing a section of a research paper strictly following IEEE format.
The paper is based on the following doxygen-generated code documentation:

{documentation}

Now, generate the '{section_name}' section. Ensure that your response is written with high academic quality,
adheres to IEEE formatting rules, and employs appropriate technical language.
Format your response as follows:

Section: {section_name}
Content:
<Generated content for {section_name} in IEEE style>
Next Action: generate_next

Change the language to English. Make sure to use the IEEE format."#;

/// 格式化 Title 章节 Prompt
pub fn format_title_prompt(documentation: &str) -> String {
    TITLE_SECTION_PROMPT.replace("{documentation}", documentation)
}

/// 格式化通用章节 Prompt
pub fn format_section_prompt(section_name: &str, documentation: &str) -> String {
    // 文档文本不受控，最后替换，避免其中的占位符被二次展开
    PAPER_SECTION_PROMPT
        .replace("{section_name}", section_name)
        .replace("{documentation}", documentation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_title_prompt() {
        let prompt = format_title_prompt("func foo() returns int");
        assert!(prompt.contains("func foo() returns int"));
        assert!(prompt.contains("Begin by generating the 'Title' section"));
        assert!(prompt.contains("Section: Title"));
        assert!(!prompt.contains("{documentation}"));
    }

    #[test]
    fn test_format_section_prompt() {
        let prompt = format_section_prompt("Methodology", "some docs");
        assert!(prompt.contains("some docs"));
        assert!(prompt.contains("generate the 'Methodology' section"));
        assert!(prompt.contains("Section: Methodology"));
        assert!(!prompt.contains("{section_name}"));
        assert!(!prompt.contains("{documentation}"));
    }

    #[test]
    fn test_section_prompt_keeps_placeholder_text_in_documentation() {
        let prompt = format_section_prompt("Results & Discussion", "docs with {section_name} token");
        assert!(prompt.contains("docs with {section_name} token"));
        assert!(prompt.contains("generate the 'Results & Discussion' section"));
    }

    #[test]
    fn test_prompts_request_three_field_format() {
        for prompt in [
            format_title_prompt("d"),
            format_section_prompt("Abstract", "d"),
        ] {
            assert!(prompt.contains("Content:"));
            assert!(prompt.contains("Next Action: generate_next"));
        }
    }
}
