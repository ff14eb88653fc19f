//! 领域仓储抽象
//!
//! 定义数据访问的抽象接口，遵循依赖倒置原则

use async_trait::async_trait;

use crate::entities::{NewTask, Task, TaskChanges, TaskFilter, TaskId};
use taskboard_core::TaskboardResult;

/// 任务仓储抽象
///
/// 实现方负责分配 `id` 与时间戳。`list` 按创建时间倒序返回，同一时刻创建的
/// 任务后插入的排在前面。`update` 必须让 `updated_at` 严格增大。
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: &NewTask) -> TaskboardResult<Task>;
    async fn find_by_id(&self, id: TaskId) -> TaskboardResult<Option<Task>>;
    async fn list(&self, filter: &TaskFilter) -> TaskboardResult<Vec<Task>>;
    /// 任务不存在时返回 `None`
    async fn update(&self, id: TaskId, changes: &TaskChanges) -> TaskboardResult<Option<Task>>;
    /// 返回是否真的删除了一条记录
    async fn delete(&self, id: TaskId) -> TaskboardResult<bool>;
    async fn health_check(&self) -> TaskboardResult<()>;
}
