use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::update_value::UpdateValue;
use crate::validation;
use crate::value_objects::TaskStatus;
use taskboard_core::TaskboardResult;

/// 任务标识，由存储在创建时分配，之后不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// 任务实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// 空字符串表示没有描述
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }
}

/// 创建任务的原始输入，字段尚未校验
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TaskDraft {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status.as_str().to_string());
        self
    }
}

/// 更新任务的原始输入；缺省字段保持原值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "is_no_change")]
    pub description: UpdateValue<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

fn is_no_change(value: &UpdateValue<String>) -> bool {
    !value.is_change()
}

impl TaskPatch {
    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = UpdateValue::Set(description.into());
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = UpdateValue::Unset;
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status.as_str().to_string());
        self
    }
}

/// 校验通过的创建命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl TryFrom<TaskDraft> for NewTask {
    type Error = taskboard_core::TaskboardError;

    fn try_from(draft: TaskDraft) -> TaskboardResult<Self> {
        Ok(Self {
            title: validation::validate_title(draft.title.as_deref())?,
            description: validation::normalize_description(draft.description.as_deref()),
            status: validation::parse_status(draft.status.as_deref())?.unwrap_or_default(),
        })
    }
}

/// 校验通过的更新命令，`None` 表示保持原值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    /// `Some("")` 清空描述
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// 把变更应用到已有任务上（不修改时间戳）
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

impl TryFrom<TaskPatch> for TaskChanges {
    type Error = taskboard_core::TaskboardError;

    fn try_from(patch: TaskPatch) -> TaskboardResult<Self> {
        let title = match patch.title {
            Some(title) => Some(validation::validate_title(Some(&title))?),
            None => None,
        };
        let description = patch
            .description
            .into_option()
            .map(|value| validation::normalize_description(value.as_deref()));

        Ok(Self {
            title,
            description,
            status: validation::parse_status(patch.status.as_deref())?,
        })
    }
}

/// 列表查询条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
    }
}
