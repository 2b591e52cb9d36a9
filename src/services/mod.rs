//! 业务服务层
//!
//! paper_pipeline 负责逐章节生成与编译，repo_docs 负责把 GitHub
//! 仓库转成文档输入，render 负责 DOCX / PDF 输出。

pub mod paper_pipeline;
pub mod render;
pub mod repo_docs;
