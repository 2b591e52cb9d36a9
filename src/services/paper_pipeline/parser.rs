//! 模型回复解析器
//!
//! 按行扫描模型的半结构化文本回复，尽力恢复 Section / Content /
//! Next Action 三个字段。解析永不失败：模型不守格式时降级为
//! 部分字段或空内容，由调用方原样存储。

use super::types::SectionRecord;

/// 解析模型回复为三字段记录
///
/// 行导向文法，三字段均可选：
/// - `Section:` 行设置章节名并清除当前字段标记
/// - `Content:` 行进入正文累积模式，同行余文作为首行捕获
/// - `Next Action:` 行设置动作令牌并清除当前字段标记
/// - 处于正文模式时的其他行（去除首尾空白后）追加进正文
/// - `Content:` 之前、`Next Action:` 之后的散行一律丢弃
///
/// 正文最终由累积行以换行符连接并去除首尾空白。`Content:` 标记
/// 从未出现时正文为 `None`，出现但无文本时为 `Some("")`。
pub fn parse_section_reply(reply: &str) -> SectionRecord {
    let mut section = None;
    let mut next_action = None;
    let mut content_lines: Vec<String> = Vec::new();
    let mut saw_content = false;
    let mut in_content = false;

    for raw_line in reply.lines() {
        let line = raw_line.trim();
        if let Some(rest) = line.strip_prefix("Section:") {
            section = Some(rest.trim().to_string());
            in_content = false;
        } else if let Some(rest) = line.strip_prefix("Content:") {
            saw_content = true;
            in_content = true;
            let inline = rest.trim();
            if !inline.is_empty() {
                content_lines.push(inline.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("Next Action:") {
            next_action = Some(rest.trim().to_string());
            in_content = false;
        } else if in_content {
            content_lines.push(line.to_string());
        }
    }

    let content = saw_content.then(|| content_lines.join("\n").trim().to_string());

    SectionRecord {
        section,
        content,
        next_action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_reply() {
        let reply = "Section: Title\nContent:\nHello World\nNext Action: generate_next";
        let record = parse_section_reply(reply);
        assert_eq!(record.section.as_deref(), Some("Title"));
        assert_eq!(record.content.as_deref(), Some("Hello World"));
        assert_eq!(record.next_action.as_deref(), Some("generate_next"));
    }

    #[test]
    fn test_parse_inline_content() {
        let reply = "Section: Abstract\nContent: first line inline\nsecond line\nNext Action: generate_next";
        let record = parse_section_reply(reply);
        assert_eq!(record.content.as_deref(), Some("first line inline\nsecond line"));
    }

    #[test]
    fn test_parse_multiline_content_trims_each_line() {
        let reply = "Content:\n   indented body   \n\tsecond\nNext Action: done";
        let record = parse_section_reply(reply);
        assert_eq!(record.content.as_deref(), Some("indented body\nsecond"));
    }

    #[test]
    fn test_parse_missing_content_marker_yields_none() {
        let reply = "Section: Title\nsome stray prose\nNext Action: generate_next";
        let record = parse_section_reply(reply);
        assert_eq!(record.section.as_deref(), Some("Title"));
        // 标记从未出现：区别于出现但为空
        assert_eq!(record.content, None);
        assert_eq!(record.next_action.as_deref(), Some("generate_next"));
    }

    #[test]
    fn test_parse_content_marker_without_text_yields_empty() {
        let reply = "Section: Title\nContent:\nNext Action: generate_next";
        let record = parse_section_reply(reply);
        assert_eq!(record.content.as_deref(), Some(""));
    }

    #[test]
    fn test_parse_empty_reply() {
        let record = parse_section_reply("");
        assert_eq!(record, SectionRecord::default());
    }

    #[test]
    fn test_parse_lines_before_content_are_discarded() {
        let reply = "preamble the model added\nSection: Title\nmore chatter\nContent:\nreal body";
        let record = parse_section_reply(reply);
        assert_eq!(record.content.as_deref(), Some("real body"));
    }

    #[test]
    fn test_parse_lines_after_next_action_are_discarded() {
        let reply = "Content:\nbody\nNext Action: generate_next\ntrailing remark";
        let record = parse_section_reply(reply);
        assert_eq!(record.content.as_deref(), Some("body"));
        assert_eq!(record.next_action.as_deref(), Some("generate_next"));
    }

    #[test]
    fn test_parse_indented_markers_are_recognized() {
        let reply = "   Section: Methodology\n  Content:\n    body text\n Next Action: generate_next";
        let record = parse_section_reply(reply);
        assert_eq!(record.section.as_deref(), Some("Methodology"));
        assert_eq!(record.content.as_deref(), Some("body text"));
    }

    #[test]
    fn test_parse_repeated_content_markers_accumulate() {
        let reply = "Content: part one\nContent: part two\nmore";
        let record = parse_section_reply(reply);
        assert_eq!(record.content.as_deref(), Some("part one\npart two\nmore"));
    }
}
