//! 交互式看板的命令解析
//!
//! 看板从同一个行读取器里读取命令和删除确认，确认的回答不会被当成命令。

use taskboard_domain::{Task, TaskId, TaskStatus};
use tokio::io::{AsyncBufRead, Lines};

use crate::{
    error::{ClientError, ClientResult},
    form::{EditSession, TaskForm},
    view::Confirm,
};

pub const BOARD_HELP: &str = "\
命令:
  title <text>              设置表单标题
  desc <text>               设置表单描述
  status <status>           设置表单状态
  add [title | desc | status]  提交表单，带参数时先填写表单
  filter <all|pending|in-progress|done>
  edit <n>                  编辑第 n 个任务
  set title|desc|status <value>
  save | cancel             保存或放弃编辑
  delete <n>                删除第 n 个任务
  refresh | help | quit";

/// 已经读到的确认回答
pub struct Answer(pub bool);

impl Confirm for Answer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// `y` / `yes`（不区分大小写）视为确认
pub fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// 从命令所用的读取器中读下一行作为回答；输入结束视为拒绝
pub async fn read_answer<R>(lines: &mut Lines<R>) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    Ok(lines
        .next_line()
        .await?
        .is_some_and(|line| is_affirmative(&line)))
}

pub fn parse_status(value: &str) -> ClientResult<TaskStatus> {
    value
        .parse::<TaskStatus>()
        .map_err(|err| ClientError::Validation(err.user_message()))
}

/// `add <title> [| <description> [| <status>]]`；参数为空时保持表单不变。
/// 状态无效时表单不会被修改
pub fn fill_form(form: &mut TaskForm, argument: &str) -> ClientResult<()> {
    if argument.is_empty() {
        return Ok(());
    }
    let mut parts = argument.splitn(3, '|').map(str::trim);
    let title = parts.next().unwrap_or_default();
    let description = parts.next().unwrap_or_default();
    let status = match parts.next() {
        Some(value) if !value.is_empty() => parse_status(value)?,
        _ => TaskStatus::default(),
    };
    form.title = title.to_string();
    form.description = description.to_string();
    form.status = status;
    Ok(())
}

/// 按列表中的序号（从 1 开始）找到任务
pub fn task_at(tasks: &[Task], argument: &str) -> ClientResult<TaskId> {
    argument
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| tasks.get(index))
        .map(|task| task.id)
        .ok_or_else(|| ClientError::Validation(format!("没有第 {argument} 个任务")))
}

/// `set title|desc|status <value>`，作用于当前的编辑会话
pub fn set_edit_field(session: Option<&mut EditSession>, argument: &str) -> ClientResult<()> {
    let session =
        session.ok_or_else(|| ClientError::Validation("没有正在编辑的任务".to_string()))?;
    let (field, value) = argument.split_once(' ').unwrap_or((argument, ""));
    let value = value.trim();
    match field {
        "title" => session.title = value.to_string(),
        "desc" | "description" => session.description = value.to_string(),
        "status" => session.status = parse_status(value)?,
        other => return Err(ClientError::Validation(format!("未知字段: {other}"))),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};

    fn task(title: &str) -> Task {
        serde_json::from_value(serde_json::json!({
            "id": TaskId::new().to_string(),
            "title": title,
            "description": "",
            "status": "pending",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        }))
        .unwrap()
    }

    fn session() -> EditSession {
        EditSession::from_task(&task("draft"))
    }

    #[tokio::test]
    async fn test_answer_is_taken_from_command_stream() {
        let mut lines = BufReader::new(&b"y\nquit\n"[..]).lines();

        assert!(read_answer(&mut lines).await.unwrap());
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("quit"));
    }

    #[tokio::test]
    async fn test_answer_defaults_to_no() {
        let mut lines = BufReader::new(&b"\nnope\n"[..]).lines();
        assert!(!read_answer(&mut lines).await.unwrap());
        assert!(!read_answer(&mut lines).await.unwrap());
        // 输入已结束
        assert!(!read_answer(&mut lines).await.unwrap());
    }

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("Y"));
        assert!(is_affirmative(" yes \n"));
        assert!(!is_affirmative("yep"));
        assert!(!is_affirmative(""));
        assert!(Answer(true).confirm("?"));
        assert!(!Answer(false).confirm("?"));
    }

    #[test]
    fn test_task_at_is_one_based() {
        let tasks = vec![task("first"), task("second")];
        assert_eq!(task_at(&tasks, "1").unwrap(), tasks[0].id);
        assert_eq!(task_at(&tasks, " 2 ").unwrap(), tasks[1].id);

        for bad in ["0", "3", "-1", "two", ""] {
            assert!(
                matches!(task_at(&tasks, bad), Err(ClientError::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_fill_form_with_all_parts() {
        let mut form = TaskForm::default();
        fill_form(&mut form, "Ship it | release notes | in-progress").unwrap();
        assert_eq!(form.title, "Ship it");
        assert_eq!(form.description, "release notes");
        assert_eq!(form.status, TaskStatus::InProgress);

        fill_form(&mut form, "Only title").unwrap();
        assert_eq!(form.title, "Only title");
        assert!(form.description.is_empty());
        assert_eq!(form.status, TaskStatus::Pending);
    }

    #[test]
    fn test_fill_form_bad_status_leaves_form_alone() {
        let mut form = TaskForm {
            title: "kept".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            fill_form(&mut form, "a | b | badstatus"),
            Err(ClientError::Validation(_))
        ));
        assert_eq!(form.title, "kept");
        assert!(form.description.is_empty());

        fill_form(&mut form, "").unwrap();
        assert_eq!(form.title, "kept");
    }

    #[test]
    fn test_set_edit_field_requires_session() {
        assert!(matches!(
            set_edit_field(None, "status done"),
            Err(ClientError::Validation(message)) if message == "没有正在编辑的任务"
        ));
    }

    #[test]
    fn test_set_edit_field_updates_draft() {
        let mut session = session();
        session.description = "old".to_string();

        set_edit_field(Some(&mut session), "title Renamed task").unwrap();
        assert_eq!(session.title, "Renamed task");

        set_edit_field(Some(&mut session), "status done").unwrap();
        assert_eq!(session.status, TaskStatus::Done);

        set_edit_field(Some(&mut session), "desc").unwrap();
        assert!(session.description.is_empty());

        assert!(set_edit_field(Some(&mut session), "status finished").is_err());
        assert_eq!(session.status, TaskStatus::Done);
        assert!(set_edit_field(Some(&mut session), "priority high").is_err());
    }
}
