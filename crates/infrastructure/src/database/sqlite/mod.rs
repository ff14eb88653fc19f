pub mod sqlite_task_repository;

pub use sqlite_task_repository::SqliteTaskRepository;

use sqlx::SqlitePool;
use tracing::debug;

/// 建表语句，可重复执行
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'in-progress', 'done')),
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at DESC, seq DESC)",
];

/// 运行数据库迁移
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    debug!("Running SQLite database migrations");
    for statement in MIGRATIONS {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!("Successfully completed SQLite database migrations");
    Ok(())
}
