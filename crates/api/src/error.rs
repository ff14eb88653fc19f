use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskboard_core::TaskboardError;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("任务看板错误: {0}")]
    Taskboard(#[from] TaskboardError),

    #[error("请求参数错误: {0}")]
    BadRequest(String),

    #[error("未找到资源: {0}")]
    NotFound(String),

    #[error("请求体过大: {0}")]
    PayloadTooLarge(String),

    /// 没有响应体的错误状态，例如超时或方法不允许
    #[error("请求失败: {0}")]
    Status(StatusCode),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Taskboard(TaskboardError::Validation { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Taskboard(TaskboardError::TaskNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Taskboard(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Status(status) => *status,
        }
    }

    /// 返回给客户端的信息，服务端故障不暴露细节
    pub fn message(&self) -> String {
        match self {
            ApiError::Taskboard(err) => err.user_message(),
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::PayloadTooLarge(msg) => msg.clone(),
            ApiError::Status(status) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = format!("Invalid request body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(message)
        } else {
            ApiError::BadRequest(message)
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "请求处理失败");
        } else {
            warn!(status = status.as_u16(), error = %self, "请求被拒绝");
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
