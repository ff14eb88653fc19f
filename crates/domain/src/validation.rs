//! 任务字段校验
//!
//! 服务端在创建和更新时都会走这里；客户端表单在发请求前也复用同样的规则。

use taskboard_core::{TaskboardError, TaskboardResult};

use crate::value_objects::TaskStatus;

pub const TITLE_REQUIRED: &str = "Task title is required";

/// 去掉首尾空白后标题不能为空
pub fn validate_title(title: Option<&str>) -> TaskboardResult<String> {
    let trimmed = title.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(TaskboardError::validation("title", TITLE_REQUIRED));
    }
    Ok(trimmed.to_string())
}

pub fn normalize_description(description: Option<&str>) -> String {
    description.map(str::trim).unwrap_or_default().to_string()
}

/// 缺省或空字符串视为未提供
pub fn parse_status(status: Option<&str>) -> TaskboardResult<Option<TaskStatus>> {
    match status {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some),
    }
}
