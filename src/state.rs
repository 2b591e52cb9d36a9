//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。论文运行上下文从不跨请求共享
//! （每个请求独立构建自己的管线），因此这里只承载渲染产物目录。

use std::path::PathBuf;
use std::sync::Arc;

/// 应用共享状态
///
/// 使用 Arc 包裹以便在多个处理器之间安全共享
#[derive(Clone)]
pub struct AppState {
    /// 渲染出的 .tex / .pdf 产物目录
    pub papers_dir: PathBuf,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new() -> Self {
        Self {
            papers_dir: PathBuf::from("static").join("papers"),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// 创建可共享的应用状态
pub fn create_shared_state() -> Arc<AppState> {
    Arc::new(AppState::new())
}
