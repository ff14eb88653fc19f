use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::routes::AppState;

/// 健康检查：存储不可达时返回 503
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.task_service.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(err) => {
            warn!(error = %err, "健康检查失败");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "database": "unreachable",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            )
        }
    }
}
