//! 任务列表状态
//!
//! 只缓存当前过滤条件和最近一次拉取的列表。每次修改之后都按当前过滤条件
//! 整体重新拉取，列表只会被替换，不会被局部修改。
//!
//! 每次拉取都会领取一个 [`FetchTicket`]。结果回来时，只有票据仍是最新的、
//! 而且发出时的过滤条件仍是当前条件，才会被应用；否则视为过期响应丢弃。

use taskboard_domain::{StatusFilter, Task, TaskDraft, TaskPatch};
use tracing::{debug, error, warn};

use crate::{api::TaskClient, error::ClientResult};

/// 一次列表拉取的凭据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    filter: StatusFilter,
}

impl FetchTicket {
    pub fn filter(&self) -> StatusFilter {
        self.filter
    }
}

#[derive(Debug)]
pub struct TaskListStore {
    client: TaskClient,
    filter: StatusFilter,
    tasks: Vec<Task>,
    generation: u64,
}

impl TaskListStore {
    pub fn new(client: TaskClient, filter: StatusFilter) -> Self {
        Self {
            client,
            filter,
            tasks: Vec::new(),
            generation: 0,
        }
    }

    pub fn client(&self) -> &TaskClient {
        &self.client
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// 领取新的拉取凭据，之前发出的凭据全部作废
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            filter: self.filter,
        }
    }

    /// 应用一次拉取结果，返回是否被采用
    pub fn apply(&mut self, ticket: FetchTicket, tasks: Vec<Task>) -> bool {
        if ticket.generation != self.generation || ticket.filter != self.filter {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                ticket_filter = %ticket.filter,
                current_filter = %self.filter,
                "丢弃过期的列表响应"
            );
            return false;
        }
        self.tasks = tasks;
        true
    }

    /// 按当前过滤条件重新拉取；失败时保留旧列表
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let ticket = self.begin_fetch();
        match self.client.list(ticket.filter).await {
            Ok(tasks) => {
                self.apply(ticket, tasks);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "拉取任务列表失败");
                Err(err)
            }
        }
    }

    /// 切换过滤条件并重新拉取
    pub async fn set_filter(&mut self, filter: StatusFilter) -> ClientResult<()> {
        self.filter = filter;
        self.refresh().await
    }

    pub async fn create(&mut self, draft: &TaskDraft) -> ClientResult<Task> {
        let task = self.client.create(draft).await?;
        self.refresh_after_mutation().await;
        Ok(task)
    }

    pub async fn update(&mut self, id: &str, patch: &TaskPatch) -> ClientResult<Task> {
        let task = self.client.update(id, patch).await?;
        self.refresh_after_mutation().await;
        Ok(task)
    }

    pub async fn delete(&mut self, id: &str) -> ClientResult<()> {
        self.client.delete(id).await?;
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// 修改已经成功，刷新失败只记录日志，列表保持旧值
    async fn refresh_after_mutation(&mut self) {
        if let Err(err) = self.refresh().await {
            warn!(error = %err, "修改成功但刷新列表失败");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_domain::TaskStatus;

    fn task(title: &str) -> Task {
        serde_json::from_value(serde_json::json!({
            "id": "7d4f3a9e-2b1c-4d5e-8f6a-0b1c2d3e4f5a",
            "title": title,
            "description": "",
            "status": "pending",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        }))
        .unwrap()
    }

    fn store() -> TaskListStore {
        TaskListStore::new(TaskClient::new("http://127.0.0.1:9"), StatusFilter::All)
    }

    #[test]
    fn test_latest_ticket_is_applied() {
        let mut store = store();
        let ticket = store.begin_fetch();
        assert!(store.apply(ticket, vec![task("a")]));
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_stale_response_after_filter_change_is_dropped() {
        let mut store = store();
        let stale = store.begin_fetch();

        store.filter = StatusFilter::Only(TaskStatus::Done);
        let current = store.begin_fetch();

        assert!(store.apply(current, vec![]));
        assert!(!store.apply(stale, vec![task("late")]));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_superseded_ticket_with_same_filter_is_dropped() {
        let mut store = store();
        let first = store.begin_fetch();
        let second = store.begin_fetch();
        assert_eq!(first.filter(), second.filter());

        assert!(store.apply(second, vec![task("new")]));
        assert!(!store.apply(first, vec![task("old"), task("older")]));
        assert_eq!(store.tasks()[0].title, "new");
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_list() {
        let mut store = store();
        let ticket = store.begin_fetch();
        store.apply(ticket, vec![task("kept")]);

        assert!(store.refresh().await.is_err());
        assert_eq!(store.tasks()[0].title, "kept");
    }
}
