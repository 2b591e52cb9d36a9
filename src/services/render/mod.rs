//! 论文渲染模块
//!
//! 把编译完成的章节内容输出成可下载的文件：
//! DOCX（默认）或经 pdflatex 编译的 PDF。

mod docx;
mod latex;

pub use docx::build_ieee_docx;
pub use latex::{render_pdf, PaperFields};
