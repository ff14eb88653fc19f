use async_trait::async_trait;
use sqlx::SqlitePool;
use taskboard_core::TaskboardResult;
use taskboard_domain::{NewTask, Task, TaskChanges, TaskFilter, TaskId, TaskRepository};
use tracing::{debug, instrument};

use crate::{
    database::mapping::{MappingHelpers, TASK_COLUMNS},
    error_handling::{RepositoryErrorHelpers, RepositoryOperation},
    task_context,
};

/// SQLite 任务仓库
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    #[instrument(skip(self, task), fields(title = %task.title, status = %task.status))]
    async fn insert(&self, task: &NewTask) -> TaskboardResult<Task> {
        let id = TaskId::new();
        let context = task_context!(RepositoryOperation::Create, task_id = id, task_title = &task.title);
        let now = MappingHelpers::now();

        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(MappingHelpers::to_micros(now))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryErrorHelpers::task_database_error(&context, e))?;

        RepositoryErrorHelpers::log_operation_success(&context, None);

        Ok(Task {
            id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self), fields(task_id = %id))]
    async fn find_by_id(&self, id: TaskId) -> TaskboardResult<Option<Task>> {
        let context = task_context!(RepositoryOperation::Read, task_id = id);

        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::task_database_error(&context, e))?;

        match row {
            Some(row) => {
                let task = MappingHelpers::row_to_task(&context, &row)?;
                RepositoryErrorHelpers::log_operation_success(&context, None);
                Ok(Some(task))
            }
            None => {
                debug!("任务 (ID: {id}) 不存在");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self), fields(status = ?filter.status))]
    async fn list(&self, filter: &TaskFilter) -> TaskboardResult<Vec<Task>> {
        let context = task_context!(RepositoryOperation::Query);

        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY created_at DESC, seq DESC"
        ))
        .bind(filter.status.map(|status| status.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryErrorHelpers::task_database_error(&context, e))?;

        let tasks = rows
            .iter()
            .map(|row| MappingHelpers::row_to_task(&context, row))
            .collect::<TaskboardResult<Vec<_>>>()?;

        RepositoryErrorHelpers::log_operation_success(
            &context,
            Some(&format!("返回 {} 条记录", tasks.len())),
        );
        Ok(tasks)
    }

    #[instrument(skip(self, changes), fields(task_id = %id))]
    async fn update(&self, id: TaskId, changes: &TaskChanges) -> TaskboardResult<Option<Task>> {
        let mut context = task_context!(RepositoryOperation::Update, task_id = id);
        if let Some(title) = &changes.title {
            context = context.with_task_title(title.clone());
        }
        if let Some(status) = changes.status {
            context = context.with_additional_info(format!("status={status}"));
        }

        // updated_at 至少前进一微秒，时钟没走动时也保持严格递增
        let row = sqlx::query(&format!(
            "UPDATE tasks SET
                title = COALESCE(?1, title),
                description = COALESCE(?2, description),
                status = COALESCE(?3, status),
                updated_at = MAX(?4, updated_at + 1)
             WHERE id = ?5
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.status.map(|status| status.as_str()))
        .bind(MappingHelpers::to_micros(MappingHelpers::now()))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryErrorHelpers::task_database_error(&context, e))?;

        match row {
            Some(row) => {
                let task = MappingHelpers::row_to_task(&context, &row)?;
                RepositoryErrorHelpers::log_operation_success(&context, None);
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(task_id = %id))]
    async fn delete(&self, id: TaskId) -> TaskboardResult<bool> {
        let context = task_context!(RepositoryOperation::Delete, task_id = id);

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::task_database_error(&context, e))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            RepositoryErrorHelpers::log_operation_success(&context, None);
        }
        Ok(deleted)
    }

    async fn health_check(&self) -> TaskboardResult<()> {
        let context = task_context!(RepositoryOperation::HealthCheck);
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::task_database_error(&context, e))?;
        Ok(())
    }
}
