//! 论文编译器
//!
//! 将已生成的章节映射按规范顺序拼接为单一纯文本文档。
//! DOCX / PDF 渲染不经过这里，它们直接消费章节映射；
//! 编译产物只用于 CLI 调用路径。

use std::collections::HashMap;

use super::types::PAPER_SECTIONS;

/// 编译最终论文
///
/// 每个章节输出四部分：标题行、与标题等长的 `=` 下划线、正文
/// （映射中缺失则为空字符串）、空行分隔。无论章节的插入顺序
/// 如何，输出始终按规范章节顺序排列。
pub fn compile_paper(paper_sections: &HashMap<String, String>) -> String {
    let mut compiled = String::new();
    for section in PAPER_SECTIONS {
        let content = paper_sections
            .get(section)
            .map(String::as_str)
            .unwrap_or("");
        compiled.push_str(section);
        compiled.push('\n');
        compiled.push_str(&"=".repeat(section.len()));
        compiled.push('\n');
        compiled.push_str(content);
        compiled.push_str("\n\n");
    }
    compiled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_emits_canonical_order_regardless_of_insertion() {
        // 故意乱序插入
        let mut sections = HashMap::new();
        sections.insert("References".to_string(), "r".to_string());
        sections.insert("Title".to_string(), "t".to_string());
        sections.insert("Conclusion".to_string(), "c".to_string());
        sections.insert("Abstract".to_string(), "a".to_string());

        let compiled = compile_paper(&sections);

        let mut last_pos = 0;
        for section in PAPER_SECTIONS {
            let pos = compiled.find(section).unwrap();
            assert!(pos >= last_pos, "section {} out of order", section);
            last_pos = pos;
        }
    }

    #[test]
    fn test_compile_heading_and_underline_format() {
        let mut sections = HashMap::new();
        sections.insert("Title".to_string(), "A Paper".to_string());

        let compiled = compile_paper(&sections);
        assert!(compiled.starts_with("Title\n=====\nA Paper\n\n"));
    }

    #[test]
    fn test_compile_underline_matches_heading_length() {
        let compiled = compile_paper(&HashMap::new());
        for section in PAPER_SECTIONS {
            let underlined = format!("{}\n{}\n", section, "=".repeat(section.len()));
            assert!(
                compiled.contains(&underlined),
                "missing underlined heading for {}",
                section
            );
        }
    }

    #[test]
    fn test_compile_missing_sections_are_empty() {
        let mut sections = HashMap::new();
        sections.insert("Abstract".to_string(), "only this".to_string());

        let compiled = compile_paper(&sections);
        // 缺失章节的标题仍然出现，正文为空
        assert!(compiled.contains("Methodology\n===========\n\n\n"));
        assert!(compiled.contains("Abstract\n========\nonly this\n\n"));
    }

    #[test]
    fn test_compile_empty_map_keeps_all_seven_headings() {
        let compiled = compile_paper(&HashMap::new());
        for section in PAPER_SECTIONS {
            assert!(compiled.contains(section));
        }
    }
}
