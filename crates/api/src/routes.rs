use axum::{
    routing::get,
    Router,
};
use taskboard_domain::TaskService;

use crate::handlers::{
    health::health_check,
    root::{not_found_handler, root_handler},
    tasks::{create_task, delete_task, get_task, list_tasks, update_task},
};

#[derive(Clone)]
pub struct AppState {
    pub task_service: TaskService,
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        // 任务管理
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .fallback(not_found_handler)
        .with_state(state)
}
