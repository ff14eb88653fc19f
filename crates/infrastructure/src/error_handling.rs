//! Error handling for repository operations with rich context
//!
//! Repository code builds a [`TaskOperationContext`] before touching the store, so that
//! a failing statement is logged together with the operation and the task it concerned,
//! and is converted into a [`TaskboardError`] whose details never reach HTTP clients.

use chrono::{DateTime, Utc};
use sqlx::Error as SqlxError;
use std::fmt;
use taskboard_core::TaskboardError;
use tracing::{debug, error, instrument};

/// Operation context for repository operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOperation {
    Create,
    Read,
    Update,
    Delete,
    Query,
    Migrate,
    HealthCheck,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryOperation::Create => write!(f, "创建"),
            RepositoryOperation::Read => write!(f, "查询"),
            RepositoryOperation::Update => write!(f, "更新"),
            RepositoryOperation::Delete => write!(f, "删除"),
            RepositoryOperation::Query => write!(f, "列表查询"),
            RepositoryOperation::Migrate => write!(f, "迁移"),
            RepositoryOperation::HealthCheck => write!(f, "健康检查"),
        }
    }
}

/// Context information for task repository operations
#[derive(Debug, Clone)]
pub struct TaskOperationContext {
    pub operation: RepositoryOperation,
    pub task_id: Option<String>,
    pub task_title: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub additional_info: Option<String>,
}

impl TaskOperationContext {
    pub fn new(operation: RepositoryOperation) -> Self {
        Self {
            operation,
            task_id: None,
            task_title: None,
            timestamp: Utc::now(),
            additional_info: None,
        }
    }

    pub fn with_task_id(mut self, task_id: impl fmt::Display) -> Self {
        self.task_id = Some(task_id.to_string());
        self
    }

    pub fn with_task_title(mut self, title: impl Into<String>) -> Self {
        self.task_title = Some(title.into());
        self
    }

    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }

    pub fn entity_description(&self) -> String {
        match (&self.task_id, &self.task_title) {
            (Some(id), Some(title)) => format!("任务 '{title}' (ID: {id})"),
            (Some(id), None) => format!("任务 (ID: {id})"),
            (None, Some(title)) => format!("任务 '{title}'"),
            (None, None) => "任务".to_string(),
        }
    }
}

/// Error helpers for repository operations
pub struct RepositoryErrorHelpers;

impl RepositoryErrorHelpers {
    /// Create a database error with task context
    #[instrument(skip_all, fields(
        operation = %context.operation,
        task_id = ?context.task_id,
        timestamp = %context.timestamp,
    ))]
    pub fn task_database_error(context: &TaskOperationContext, error: SqlxError) -> TaskboardError {
        let entity_desc = context.entity_description();
        let operation_desc = context.operation.to_string();

        let error_msg = match &error {
            SqlxError::Database(db_error) => match db_error.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    format!("{operation_desc}{entity_desc}时发生唯一约束冲突: {db_error}")
                }
                sqlx::error::ErrorKind::CheckViolation => {
                    format!("{operation_desc}{entity_desc}时违反检查约束: {db_error}")
                }
                _ => format!("{operation_desc}{entity_desc}时发生数据库错误: {db_error}"),
            },
            SqlxError::PoolClosed => format!("{operation_desc}{entity_desc}时数据库连接池已关闭"),
            SqlxError::PoolTimedOut => format!("{operation_desc}{entity_desc}时数据库连接池超时"),
            SqlxError::Io(io_error) => {
                format!("{operation_desc}{entity_desc}时发生I/O错误: {io_error}")
            }
            SqlxError::ColumnNotFound(column) => {
                format!("{operation_desc}{entity_desc}时缺少字段: {column}")
            }
            _ => format!("{operation_desc}{entity_desc}时发生未知数据库错误: {error}"),
        };

        match &context.additional_info {
            Some(info) => error!(error = %error, info = %info, "{}", error_msg),
            None => error!(error = %error, "{}", error_msg),
        }
        TaskboardError::database_error(error_msg)
    }

    /// A stored row that cannot be turned back into a task
    pub fn task_mapping_error(context: &TaskOperationContext, detail: impl fmt::Display) -> TaskboardError {
        let error_msg = format!(
            "{}{}时数据格式错误: {detail}",
            context.operation,
            context.entity_description()
        );
        error!("{}", error_msg);
        TaskboardError::Serialization(error_msg)
    }

    /// Log successful repository operation
    pub fn log_operation_success(context: &TaskOperationContext, additional_info: Option<&str>) {
        let base_msg = format!("{}{}成功", context.operation, context.entity_description());
        match additional_info {
            Some(info) => debug!(operation = %context.operation, "{}: {}", base_msg, info),
            None => debug!(operation = %context.operation, "{}", base_msg),
        }
    }
}

/// Macro for creating task operation context easily
#[macro_export]
macro_rules! task_context {
    ($operation:expr) => {
        $crate::error_handling::TaskOperationContext::new($operation)
    };
    ($operation:expr, task_id = $task_id:expr) => {
        $crate::error_handling::TaskOperationContext::new($operation).with_task_id($task_id)
    };
    ($operation:expr, task_title = $title:expr) => {
        $crate::error_handling::TaskOperationContext::new($operation).with_task_title($title)
    };
    ($operation:expr, task_id = $task_id:expr, task_title = $title:expr) => {
        $crate::error_handling::TaskOperationContext::new($operation)
            .with_task_id($task_id)
            .with_task_title($title)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_description() {
        let context = task_context!(RepositoryOperation::Read, task_id = "abc");
        assert_eq!(context.entity_description(), "任务 (ID: abc)");

        let context = task_context!(RepositoryOperation::Create, task_title = "Buy milk");
        assert_eq!(context.entity_description(), "任务 'Buy milk'");

        let context = task_context!(RepositoryOperation::Query);
        assert_eq!(context.entity_description(), "任务");
    }

    #[test]
    fn test_database_error_is_not_client_error() {
        let context = task_context!(RepositoryOperation::Update, task_id = "abc")
            .with_additional_info("status=done");
        let err = RepositoryErrorHelpers::task_database_error(&context, SqlxError::PoolClosed);
        assert!(matches!(err, TaskboardError::Database(ref msg) if msg.contains("连接池已关闭")));
        assert!(!err.is_client_error());
        assert_eq!(err.user_message(), "Internal server error");
    }

    #[test]
    fn test_mapping_error() {
        let context = task_context!(RepositoryOperation::Read, task_id = "abc");
        let err = RepositoryErrorHelpers::task_mapping_error(&context, "bad status");
        assert!(matches!(err, TaskboardError::Serialization(_)));
    }
}
