//! IEEE 论文 DOCX 渲染
//!
//! 把编译完成的章节内容排版成 Word 文档：标题居中、
//! 章节标题加粗、正文按空行分段。

use std::collections::HashMap;
use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run, Style, StyleType};

use crate::error::AppError;
use crate::services::paper_pipeline::PAPER_SECTIONS;

/// 标题章节缺失时的默认论文标题
const DEFAULT_TITLE: &str = "Untitled IEEE Paper";

/// 把章节内容渲染成 DOCX 字节流
///
/// Title 之外的章节缺失或为空时整节跳过（含标题行），
/// 正文按空行拆成段落，空白段落丢弃。
pub fn build_ieee_docx(sections: &HashMap<String, String>) -> Result<Vec<u8>, AppError> {
    let title = sections
        .get(PAPER_SECTIONS[0])
        .cloned()
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let mut docx = Docx::new()
        .add_style(title_style())
        .add_style(heading_style())
        .add_paragraph(
            Paragraph::new()
                .style("PaperTitle")
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(title)),
        );

    for section in &PAPER_SECTIONS[1..] {
        let Some(content) = sections.get(*section) else {
            continue;
        };
        if content.is_empty() {
            continue;
        }

        docx = docx.add_paragraph(
            Paragraph::new()
                .style("SectionHeading")
                .add_run(Run::new().add_text(*section)),
        );
        for para in content.split("\n\n") {
            let para = para.trim();
            if para.is_empty() {
                continue;
            }
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(para)));
        }
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| AppError::Render(format!("DOCX 打包失败: {}", e)))?;

    Ok(buf.into_inner())
}

/// 论文主标题样式（24pt 加粗）
fn title_style() -> Style {
    Style::new("PaperTitle", StyleType::Paragraph)
        .name("Paper Title")
        .size(48)
        .bold()
}

/// 章节标题样式（14pt 加粗）
fn heading_style() -> Style {
    Style::new("SectionHeading", StyleType::Paragraph)
        .name("Section Heading")
        .size(28)
        .bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sections() -> HashMap<String, String> {
        let mut sections = HashMap::new();
        sections.insert("Title".to_string(), "A Study of Things".to_string());
        sections.insert(
            "Abstract".to_string(),
            "First paragraph.\n\nSecond paragraph.".to_string(),
        );
        sections.insert("Conclusion".to_string(), "It works.".to_string());
        sections
    }

    #[test]
    fn test_build_ieee_docx_produces_zip() {
        let bytes = build_ieee_docx(&sample_sections()).unwrap();
        // DOCX 本质是 zip，检查魔数
        assert_eq!(&bytes[..4], b"PK\x03\x04");
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn test_build_ieee_docx_without_title_uses_default() {
        let mut sections = sample_sections();
        sections.remove("Title");
        let bytes = build_ieee_docx(&sections).unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_build_ieee_docx_empty_map() {
        let bytes = build_ieee_docx(&HashMap::new()).unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }
}
