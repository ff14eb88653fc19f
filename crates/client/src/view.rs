//! 文本界面的看板状态与渲染

use std::fmt::Write;

use taskboard_domain::{StatusFilter, Task, TaskId, TaskStatus};
use tracing::{error, info, warn};

use crate::{
    api::TaskClient,
    error::{ClientError, ClientResult},
    form::{EditSession, TaskForm, CREATE_FAILED},
    preference::FilterPreference,
    store::TaskListStore,
};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";
pub const EMPTY_MESSAGE: &str = "No tasks yet. Start by adding one!";

/// 删除前的确认
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// 不询问，直接确认
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// 看板：创建表单、过滤标签和任务卡片；同一时间最多编辑一个任务
#[derive(Debug)]
pub struct BoardView {
    store: TaskListStore,
    preference: FilterPreference,
    pub form: TaskForm,
    editing: Option<EditSession>,
}

impl BoardView {
    /// 读取保存的过滤条件并拉取第一页列表；拉取失败不会阻止界面打开
    pub async fn open(client: TaskClient, preference: FilterPreference) -> Self {
        let filter = preference.load();
        let mut view = Self {
            store: TaskListStore::new(client, filter),
            preference,
            form: TaskForm::default(),
            editing: None,
        };
        if let Err(err) = view.store.refresh().await {
            warn!(error = %err, "初始加载任务列表失败");
        }
        view
    }

    pub fn store(&self) -> &TaskListStore {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn filter(&self) -> StatusFilter {
        self.store.filter()
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut EditSession> {
        self.editing.as_mut()
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.store.refresh().await
    }

    /// 保存新的过滤条件后重新拉取
    pub async fn set_filter(&mut self, filter: StatusFilter) -> ClientResult<()> {
        if let Err(err) = self.preference.save(filter) {
            error!(error = %err, "保存过滤条件失败");
        }
        self.store.set_filter(filter).await
    }

    /// 提交创建表单；成功后清空表单
    pub async fn submit_form(&mut self) -> ClientResult<Task> {
        let draft = self.form.to_draft()?;
        match self.store.create(&draft).await {
            Ok(task) => {
                info!(task_id = %task.id, "任务已创建");
                self.form.reset();
                Ok(task)
            }
            Err(err) => {
                error!(error = %err, "创建任务失败");
                self.form.error = Some(CREATE_FAILED.to_string());
                Err(err)
            }
        }
    }

    /// 打开某个任务的编辑；已有的编辑会被替换
    pub fn start_edit(&mut self, id: TaskId) -> bool {
        match self.store.tasks().iter().find(|task| task.id == id) {
            Some(task) => {
                self.editing = Some(EditSession::from_task(task));
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// 保存当前编辑；没有打开的编辑时返回校验错误
    pub async fn save_edit(&mut self) -> ClientResult<Task> {
        let session = self
            .editing
            .as_ref()
            .ok_or_else(|| ClientError::Validation("No task is being edited".to_string()))?;
        let patch = session.to_patch()?;
        let id = session.task_id.to_string();

        let task = self.store.update(&id, &patch).await.inspect_err(|err| {
            error!(error = %err, task_id = %id, "更新任务失败");
        })?;
        self.editing = None;
        Ok(task)
    }

    /// 确认后删除；用户取消时返回 `Ok(false)`
    pub async fn delete(&mut self, id: TaskId, confirm: &dyn Confirm) -> ClientResult<bool> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(false);
        }
        let id_text = id.to_string();
        self.store.delete(&id_text).await.inspect_err(|err| {
            error!(error = %err, task_id = %id_text, "删除任务失败");
        })?;
        if self.editing.as_ref().is_some_and(|session| session.task_id == id) {
            self.editing = None;
        }
        Ok(true)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Task Manager");
        let _ = writeln!(out, "============");
        let _ = writeln!(out);

        let _ = writeln!(out, "Create New Task");
        let _ = writeln!(out, "  Title:       {}", self.form.title);
        let _ = writeln!(out, "  Description: {}", self.form.description);
        let _ = writeln!(out, "  Status:      {}", self.form.status.label());
        if let Some(error) = &self.form.error {
            let _ = writeln!(out, "  ! {error}");
        }
        let _ = writeln!(out);

        let tabs: Vec<String> = StatusFilter::ALL
            .iter()
            .map(|filter| {
                if *filter == self.filter() {
                    format!("[{}]", filter.label())
                } else {
                    format!(" {} ", filter.label())
                }
            })
            .collect();
        let _ = writeln!(out, "{}", tabs.join(" "));
        let _ = writeln!(out);

        if self.tasks().is_empty() {
            let _ = writeln!(out, "{EMPTY_MESSAGE}");
            return out;
        }

        for (index, task) in self.tasks().iter().enumerate() {
            match self.editing.as_ref().filter(|session| session.task_id == task.id) {
                Some(session) => render_edit_card(&mut out, index + 1, session),
                None => render_card(&mut out, index + 1, task),
            }
        }
        out
    }
}

fn render_card(out: &mut String, number: usize, task: &Task) {
    let _ = writeln!(out, "{number}. {}", task.title);
    if task.has_description() {
        let _ = writeln!(out, "   {}", task.description);
    }
    let _ = writeln!(out, "   {}", task.status.label());
}

fn render_edit_card(out: &mut String, number: usize, session: &EditSession) {
    let _ = writeln!(out, "{number}. [editing]");
    let _ = writeln!(out, "   title:       {}", session.title);
    let _ = writeln!(out, "   description: {}", session.description);
    let options: Vec<String> = TaskStatus::ALL
        .iter()
        .map(|status| {
            if *status == session.status {
                format!("({})", status.label())
            } else {
                status.label().to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "   status:      {}", options.join(" | "));
}
