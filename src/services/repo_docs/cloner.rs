//! GitHub 仓库克隆
//!
//! 以浅克隆方式取回仓库源码，供扫描器提取文件。

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::info;

use crate::error::AppError;

/// git clone 超时时间
const CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// 校验 GitHub 仓库地址格式
pub fn validate_github_url(repo_url: &str) -> Result<(), AppError> {
    if !repo_url.starts_with("https://github.com/") {
        return Err(AppError::BadRequest(
            "Invalid GitHub URL format".to_string(),
        ));
    }
    Ok(())
}

/// 浅克隆仓库到目标目录
///
/// 只取最近一次提交（--depth 1）。超时或非零退出视为仓库处理失败，
/// stderr 内容带进错误信息方便排查。
pub async fn clone_repo(repo_url: &str, dest: &Path) -> Result<(), AppError> {
    info!("克隆仓库: {}", repo_url);

    let child = Command::new("git")
        .args(["clone", "--depth", "1", repo_url])
        .arg(dest)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| AppError::Repo(format!("无法启动 git: {}", e)))?;

    let output = match timeout(CLONE_TIMEOUT, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| AppError::Repo(format!("等待 git 进程失败: {}", e)))?,
        Err(_) => return Err(AppError::Repo("git clone 超时".to_string())),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::Repo(format!(
            "git clone 失败: {}",
            stderr.trim()
        )));
    }

    info!("仓库克隆完成: {}", dest.display());
    Ok(())
}
