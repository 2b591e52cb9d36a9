//! 仓库文档提取模块
//!
//! 把一个 GitHub 仓库变成论文管线的输入文本：
//! 浅克隆 → 扫描源码文件 → 逐文件调用文档模型 → 按路径顺序拼接。

mod cloner;
mod generator;
mod scanner;

pub use generator::process_github_repo;
