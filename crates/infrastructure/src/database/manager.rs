use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use taskboard_core::{DatabaseConfig, TaskboardError, TaskboardResult};
use taskboard_domain::TaskRepository;
use tracing::{debug, info};

use super::sqlite::{run_migrations, SqliteTaskRepository};
use crate::{
    error_handling::{RepositoryErrorHelpers, RepositoryOperation},
    task_context,
};

/// SQLite 连接池的持有者：建立连接、执行迁移、提供仓库
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    /// 连接数据库并执行迁移
    ///
    /// 文件数据库不存在时会被创建。内存数据库只使用一个永不过期的连接，
    /// 否则每个新连接都会看到一个空库。
    pub async fn new(config: &DatabaseConfig) -> TaskboardResult<Self> {
        let context = task_context!(RepositoryOperation::Migrate)
            .with_additional_info(format!("连接 {}", config.url));

        let mut connect_options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| TaskboardError::config_error(format!("无效的数据库URL {}: {e}", config.url)))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds));

        if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
            pool_options = pool_options
                .max_connections(config.max_connections)
                .min_connections(config.min_connections);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| RepositoryErrorHelpers::task_database_error(&context, e))?;
        debug!("数据库连接池已建立");

        run_migrations(&pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::task_database_error(&context, e))?;

        info!(url = %config.url, "数据库已就绪");
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> TaskboardResult<()> {
        let context = task_context!(RepositoryOperation::HealthCheck);
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::task_database_error(&context, e))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("数据库连接池已关闭");
    }

    pub fn task_repository(&self) -> Arc<dyn TaskRepository> {
        Arc::new(SqliteTaskRepository::new(self.pool.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_domain::{NewTask, TaskFilter, TaskStatus};

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_in_memory_database_keeps_data_across_calls() {
        let manager = DatabaseManager::new(&memory_config()).await.unwrap();
        let repo = manager.task_repository();

        repo.insert(&NewTask {
            title: "persisted".to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
        })
        .await
        .unwrap();

        let tasks = repo.list(&TaskFilter::all()).await.unwrap();
        assert_eq!(tasks.len(), 1);
        manager.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_database_is_created_and_reopened() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("tasks.db").display());
        let config = DatabaseConfig {
            url,
            ..Default::default()
        };

        let manager = DatabaseManager::new(&config).await.unwrap();
        manager
            .task_repository()
            .insert(&NewTask {
                title: "survives restart".to_string(),
                description: String::new(),
                status: TaskStatus::Done,
            })
            .await
            .unwrap();
        manager.close().await;

        let reopened = DatabaseManager::new(&config).await.unwrap();
        let tasks = reopened
            .task_repository()
            .list(&TaskFilter::with_status(TaskStatus::Done))
            .await
            .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "survives restart");
    }

    #[tokio::test]
    async fn test_health_check_fails_when_closed() {
        let manager = DatabaseManager::new(&memory_config()).await.unwrap();
        manager.close().await;
        assert!(manager.health_check().await.is_err());
    }
}
