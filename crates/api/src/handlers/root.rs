use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;

/// 根路径处理器，用于确认服务存活
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Task Manager API is running" }))
}

pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
