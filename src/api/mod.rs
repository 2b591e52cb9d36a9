//! API 路由模块

mod config;
mod health;
mod paper;

pub use config::config_routes;
pub use health::health_routes;
pub use paper::paper_routes;

use axum::Router;

use crate::state::AppState;
use std::sync::Arc;

/// 创建所有 API 路由
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(config_routes())
        .merge(paper_routes())
        .with_state(state)
}
