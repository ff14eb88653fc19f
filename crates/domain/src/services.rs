//! # 任务服务
//!
//! 把 HTTP 层传入的原始输入转成校验过的命令，再交给仓储执行。
//! 不存在的任务统一变成 [`TaskboardError::TaskNotFound`]，格式错误的 id
//! 也按不存在处理。
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskboard_domain::{TaskDraft, TaskRepository, TaskService};
//!
//! async fn demo(repo: Arc<dyn TaskRepository>) -> taskboard_domain::TaskboardResult<()> {
//!     let service = TaskService::new(repo);
//!     let task = service.create(TaskDraft::new("Buy milk")).await?;
//!     let fetched = service.get(&task.id.to_string()).await?;
//!     assert_eq!(fetched.title, "Buy milk");
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    entities::{NewTask, Task, TaskChanges, TaskDraft, TaskFilter, TaskId, TaskPatch},
    repositories::TaskRepository,
    validation,
};
use taskboard_core::{TaskboardError, TaskboardResult};

#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: TaskDraft) -> TaskboardResult<Task> {
        let new_task = NewTask::try_from(draft)?;
        let task = self.repository.insert(&new_task).await?;
        info!(task_id = %task.id, status = %task.status, "任务已创建");
        Ok(task)
    }

    /// `status` 为空或缺省时返回全部任务
    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<&str>) -> TaskboardResult<Vec<Task>> {
        let filter = TaskFilter {
            status: validation::parse_status(status)?,
        };
        let tasks = self.repository.list(&filter).await?;
        debug!(count = tasks.len(), "查询任务列表");
        Ok(tasks)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> TaskboardResult<Task> {
        let task_id = parse_id(id)?;
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| TaskboardError::task_not_found(id))
    }

    /// 先校验输入再查找任务，所以无效输入总是返回校验错误
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: TaskPatch) -> TaskboardResult<Task> {
        let changes = TaskChanges::try_from(patch)?;
        let task_id = parse_id(id)?;
        let task = self
            .repository
            .update(task_id, &changes)
            .await?
            .ok_or_else(|| TaskboardError::task_not_found(id))?;
        info!(task_id = %task.id, status = %task.status, "任务已更新");
        Ok(task)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> TaskboardResult<()> {
        let task_id = parse_id(id)?;
        if !self.repository.delete(task_id).await? {
            return Err(TaskboardError::task_not_found(id));
        }
        info!(task_id = %task_id, "任务已删除");
        Ok(())
    }

    pub async fn health_check(&self) -> TaskboardResult<()> {
        self.repository.health_check().await
    }
}

fn parse_id(id: &str) -> TaskboardResult<TaskId> {
    id.parse().map_err(|_| {
        debug!(id, "任务ID格式无效");
        TaskboardError::task_not_found(id)
    })
}
