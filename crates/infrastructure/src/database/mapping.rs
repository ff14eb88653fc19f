//! Row mapping shared by the SQLite repository
//!
//! Timestamps are stored as integer microseconds since the Unix epoch so that they
//! compare numerically and keep sub-second resolution.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use taskboard_core::TaskboardResult;
use taskboard_domain::{Task, TaskId, TaskStatus};

use crate::error_handling::{RepositoryErrorHelpers, TaskOperationContext};

/// Columns selected for every task query, in the order [`MappingHelpers::row_to_task`] expects
pub const TASK_COLUMNS: &str = "id, title, description, status, created_at, updated_at";

/// Helper functions for converting between rows and domain types
pub struct MappingHelpers;

impl MappingHelpers {
    pub fn to_micros(timestamp: DateTime<Utc>) -> i64 {
        timestamp.timestamp_micros()
    }

    pub fn from_micros(context: &TaskOperationContext, micros: i64) -> TaskboardResult<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_micros(micros).ok_or_else(|| {
            RepositoryErrorHelpers::task_mapping_error(context, format!("时间戳超出范围: {micros}"))
        })
    }

    /// 当前时间，截断到数据库能保存的精度
    pub fn now() -> DateTime<Utc> {
        let now = Utc::now();
        DateTime::<Utc>::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
    }

    pub fn row_to_task(context: &TaskOperationContext, row: &SqliteRow) -> TaskboardResult<Task> {
        let column = |e| RepositoryErrorHelpers::task_database_error(context, e);

        let id: String = row.try_get("id").map_err(column)?;
        let status: String = row.try_get("status").map_err(column)?;
        let created_at: i64 = row.try_get("created_at").map_err(column)?;
        let updated_at: i64 = row.try_get("updated_at").map_err(column)?;

        Ok(Task {
            id: id.parse::<TaskId>().map_err(|e| {
                RepositoryErrorHelpers::task_mapping_error(context, format!("无效的任务ID {id}: {e}"))
            })?,
            title: row.try_get("title").map_err(column)?,
            description: row.try_get("description").map_err(column)?,
            status: status.parse::<TaskStatus>().map_err(|e| {
                RepositoryErrorHelpers::task_mapping_error(context, e)
            })?,
            created_at: Self::from_micros(context, created_at)?,
            updated_at: Self::from_micros(context, updated_at)?,
        })
    }
}
