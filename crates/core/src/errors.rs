use thiserror::Error;

/// 任务看板错误类型定义
#[derive(Debug, Error)]
pub enum TaskboardError {
    #[error("数据验证失败: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("任务未找到: {id}")]
    TaskNotFound { id: String },

    #[error("数据库操作错误: {0}")]
    Database(String),

    #[error("序列化错误: {0}")]
    Serialization(String),

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl TaskboardError {
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn task_not_found<S: Into<String>>(id: S) -> Self {
        Self::TaskNotFound { id: id.into() }
    }

    pub fn database_error<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// 调用方输入导致的错误，按请求返回即可，不需要记录为系统故障
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TaskboardError::Validation { .. } | TaskboardError::TaskNotFound { .. }
        )
    }

    /// 面向最终用户的错误信息
    pub fn user_message(&self) -> String {
        match self {
            TaskboardError::Validation { message, .. } => message.clone(),
            TaskboardError::TaskNotFound { .. } => "Task not found".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<serde_json::Error> for TaskboardError {
    fn from(err: serde_json::Error) -> Self {
        TaskboardError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for TaskboardError {
    fn from(err: anyhow::Error) -> Self {
        TaskboardError::Internal(err.to_string())
    }
}

/// 统一的Result类型
pub type TaskboardResult<T> = std::result::Result<T, TaskboardError>;
