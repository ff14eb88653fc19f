use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use taskboard_domain::{Task, TaskDraft, TaskPatch};

use crate::{error::ApiResult, routes::AppState};

/// 任务查询参数
#[derive(Debug, Deserialize)]
pub struct TaskQueryParams {
    pub status: Option<String>,
}

/// 创建任务
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(draft) = payload?;
    let task = state.task_service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// 获取任务列表，按创建时间倒序
pub async fn list_tasks(
    State(state): State<AppState>,
    params: Result<Query<TaskQueryParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Query(params) = params?;
    let tasks = state.task_service.list(params.status.as_deref()).await?;
    Ok(Json(tasks))
}

/// 获取单个任务
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.task_service.get(&id).await?))
}

/// 更新任务，未提供的字段保持不变
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(patch) = payload?;
    Ok(Json(state.task_service.update(&id, patch).await?))
}

/// 删除任务
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.task_service.delete(&id).await?;
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
