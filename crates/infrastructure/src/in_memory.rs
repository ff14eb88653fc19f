//! 内存任务仓库
//!
//! 进程内保存任务，重启后丢失。用于测试以及不需要持久化的本地运行。

use async_trait::async_trait;
use chrono::{Duration, Utc};
use taskboard_core::TaskboardResult;
use taskboard_domain::{NewTask, Task, TaskChanges, TaskFilter, TaskId, TaskRepository};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Default)]
pub struct InMemoryTaskRepository {
    // 按插入顺序保存
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    #[instrument(skip(self, task), fields(title = %task.title))]
    async fn insert(&self, task: &NewTask) -> TaskboardResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: TaskId::new(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            created_at: now,
            updated_at: now,
        };
        self.tasks.write().await.push(task.clone());
        debug!(task_id = %task.id, "任务已写入内存仓库");
        Ok(task)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskboardResult<Option<Task>> {
        Ok(self.tasks.read().await.iter().find(|task| task.id == id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> TaskboardResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .iter()
            .rev()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        // 稳定排序：创建时间相同的保持后插入在前
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    #[instrument(skip(self, changes), fields(task_id = %id))]
    async fn update(&self, id: TaskId, changes: &TaskChanges) -> TaskboardResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };

        changes.apply_to(task);
        let now = Utc::now();
        task.updated_at = if now > task.updated_at {
            now
        } else {
            task.updated_at + Duration::microseconds(1)
        };
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: TaskId) -> TaskboardResult<bool> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        Ok(tasks.len() != before)
    }

    async fn health_check(&self) -> TaskboardResult<()> {
        Ok(())
    }
}
