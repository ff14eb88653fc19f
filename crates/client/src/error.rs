use thiserror::Error;

/// 客户端错误
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("网络请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("服务端返回错误 ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("响应解析失败: {0}")]
    Decode(String),

    #[error("过滤条件保存失败: {0}")]
    Preference(String),

    #[error("{0}")]
    Validation(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
