//! # Taskboard API
//!
//! 任务看板的 REST 接口，基于 Axum。
//!
//! ## API 端点
//!
//! - `GET /` - 存活检查
//! - `GET /health` - 健康检查（包含数据库连通性）
//! - `GET /api/tasks[?status=...]` - 获取任务列表，按创建时间倒序
//! - `POST /api/tasks` - 创建新任务
//! - `GET /api/tasks/{id}` - 获取任务详情
//! - `PUT /api/tasks/{id}` - 更新任务
//! - `DELETE /api/tasks/{id}` - 删除任务
//!
//! 所有错误响应的格式都是 `{"error": "..."}`。
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskboard_api::create_app;
//! use taskboard_core::ApiConfig;
//! use taskboard_domain::TaskRepository;
//!
//! async fn serve(repo: Arc<dyn TaskRepository>) -> std::io::Result<()> {
//!     let app = create_app(repo, &ApiConfig::default());
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:4000").await?;
//!     axum::serve(listener, app).await
//! }
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use taskboard_core::ApiConfig;
use taskboard_domain::{TaskRepository, TaskService};
use tower::ServiceBuilder;

use middleware::{cors_layer, json_error_body, request_logging, timeout_layer, trace_layer};
use routes::{create_routes, AppState};

pub use error::{ApiError, ApiResult};

/// 创建完整的API应用
pub fn create_app(task_repo: Arc<dyn TaskRepository>, api_config: &ApiConfig) -> Router {
    let state = AppState {
        task_service: TaskService::new(task_repo),
    };

    let router = create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(axum::middleware::from_fn(json_error_body))
            .layer(timeout_layer(api_config))
            .layer(axum::middleware::from_fn(request_logging)),
    );

    if api_config.cors_enabled {
        router.layer(cors_layer(api_config))
    } else {
        router
    }
}
