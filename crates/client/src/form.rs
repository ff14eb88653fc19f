use taskboard_domain::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};

use crate::error::{ClientError, ClientResult};

/// 标题为空时表单显示的提示
pub const TITLE_REQUIRED: &str = "Title is required";
pub const CREATE_FAILED: &str = "Error creating task";

fn require_title(title: &str) -> ClientResult<()> {
    if title.trim().is_empty() {
        return Err(ClientError::Validation(TITLE_REQUIRED.to_string()));
    }
    Ok(())
}

/// 创建任务的表单
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub error: Option<String>,
}

impl TaskForm {
    /// 校验通过时返回要发送的草稿，否则记录错误提示
    pub fn to_draft(&mut self) -> ClientResult<TaskDraft> {
        if let Err(err) = require_title(&self.title) {
            self.error = Some(TITLE_REQUIRED.to_string());
            return Err(err);
        }
        Ok(TaskDraft::new(self.title.clone())
            .with_description(self.description.clone())
            .with_status(self.status))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 正在编辑的任务及其草稿
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub task_id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl EditSession {
    pub fn from_task(task: &Task) -> Self {
        Self {
            task_id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
        }
    }

    /// 三个字段都会发送给服务端
    pub fn to_patch(&self) -> ClientResult<TaskPatch> {
        require_title(&self.title)?;
        Ok(TaskPatch::default()
            .title(self.title.clone())
            .description(self.description.clone())
            .status(self.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_domain::UpdateValue;

    #[test]
    fn test_blank_title_sets_error() {
        let mut form = TaskForm {
            title: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(form.to_draft(), Err(ClientError::Validation(_))));
        assert_eq!(form.error.as_deref(), Some(TITLE_REQUIRED));
    }

    #[test]
    fn test_valid_form_produces_draft() {
        let mut form = TaskForm {
            title: "Buy milk".to_string(),
            description: "2 litres".to_string(),
            status: TaskStatus::InProgress,
            error: None,
        };
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.title.as_deref(), Some("Buy milk"));
        assert_eq!(draft.description.as_deref(), Some("2 litres"));
        assert_eq!(draft.status.as_deref(), Some("in-progress"));

        form.reset();
        assert_eq!(form, TaskForm::default());
    }

    #[test]
    fn test_edit_session_patch() {
        let session = EditSession {
            task_id: TaskId::new(),
            title: "Renamed".to_string(),
            description: String::new(),
            status: TaskStatus::Done,
        };
        let patch = session.to_patch().unwrap();
        assert_eq!(patch.title.as_deref(), Some("Renamed"));
        assert_eq!(patch.description, UpdateValue::Set(String::new()));
        assert_eq!(patch.status.as_deref(), Some("done"));

        let blank = EditSession {
            title: " ".to_string(),
            ..session
        };
        assert!(blank.to_patch().is_err());
    }
}
