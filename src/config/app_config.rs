//! 应用配置管理
//!
//! 提供配置的加载、保存、更新功能，使用全局单例模式管理配置状态。

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::AppError;

/// 获取配置文件路径
fn get_config_path() -> PathBuf {
    // 配置文件位于可执行文件同级目录
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.json")
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM API 密钥，缺省从 OPENROUTER_API_KEY 环境变量读取
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// LLM API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 论文章节生成模型
    #[serde(default = "default_model")]
    pub model: String,

    /// 代码文档生成模型（逐文件）
    #[serde(default = "default_doc_model")]
    pub doc_model: String,

    /// 论文章节生成温度
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// 代码文档生成温度
    #[serde(default = "default_doc_temperature")]
    pub doc_temperature: f64,

    /// 最大 token 数
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// 逐文件文档生成并发数（使用时收敛到 1..=10）
    #[serde(default = "default_doc_concurrency")]
    pub doc_concurrency: usize,
}

fn default_api_key() -> String {
    std::env::var("OPENROUTER_API_KEY").unwrap_or_default()
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "deepseek/deepseek-r1-distill-llama-70b:free".to_string()
}

fn default_doc_model() -> String {
    "qwen/qwen-2.5-coder-32b-instruct:free".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_doc_temperature() -> f64 {
    0.3
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_doc_concurrency() -> usize {
    4
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            model: default_model(),
            doc_model: default_doc_model(),
            temperature: default_temperature(),
            doc_temperature: default_doc_temperature(),
            max_tokens: default_max_tokens(),
            doc_concurrency: default_doc_concurrency(),
        }
    }
}

/// 全局配置单例
static CONFIG: Lazy<RwLock<AppConfig>> =
    Lazy::new(|| RwLock::new(load_config_from_file().unwrap_or_default()));

/// 从文件加载配置
fn load_config_from_file() -> Option<AppConfig> {
    let path = get_config_path();
    if path.exists() {
        let content = fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    } else {
        None
    }
}

/// 保存配置到文件
fn save_config_to_file(config: &AppConfig) -> Result<(), AppError> {
    let path = get_config_path();
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("序列化配置失败: {}", e)))?;
    fs::write(&path, content).map_err(|e| AppError::Config(format!("写入配置文件失败: {}", e)))?;
    Ok(())
}

/// 获取当前配置（克隆）
pub fn get_config() -> AppConfig {
    CONFIG.read().clone()
}

/// 更新配置
///
/// 接收一个闭包来修改配置，修改后自动保存到文件
pub fn update_config<F>(updater: F) -> Result<AppConfig, AppError>
where
    F: FnOnce(&mut AppConfig),
{
    let mut config = CONFIG.write();
    updater(&mut config);
    save_config_to_file(&config)?;
    Ok(config.clone())
}
