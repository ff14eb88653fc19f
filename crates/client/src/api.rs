use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use taskboard_domain::{StatusFilter, Task, TaskDraft, TaskPatch};
use tracing::{debug, instrument, warn};

use crate::error::{ClientError, ClientResult};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// 任务 API 的 HTTP 客户端
#[derive(Debug, Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    base_url: String,
}

impl TaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/api/tasks", self.base_url)
    }

    fn task_url(&self, id: &str) -> String {
        format!("{}/api/tasks/{}", self.base_url, id)
    }

    /// 拉取任务列表，`All` 时不带 `status` 参数
    #[instrument(skip(self))]
    pub async fn list(&self, filter: StatusFilter) -> ClientResult<Vec<Task>> {
        let url = match filter.status() {
            Some(status) => format!("{}?status={}", self.tasks_url(), status),
            None => self.tasks_url(),
        };
        let tasks: Vec<Task> = decode(self.http.get(url).send().await?).await?;
        debug!(count = tasks.len(), "拉取任务列表");
        Ok(tasks)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> ClientResult<Task> {
        decode(self.http.get(self.task_url(id)).send().await?).await
    }

    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &TaskDraft) -> ClientResult<Task> {
        decode(self.http.post(self.tasks_url()).json(draft).send().await?).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: &TaskPatch) -> ClientResult<Task> {
        decode(self.http.put(self.task_url(id)).json(patch).send().await?).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let body: MessageBody = decode(self.http.delete(self.task_url(id)).send().await?).await?;
        debug!(message = %body.message, "任务已删除");
        Ok(())
    }

    /// 访问根路径，返回服务端的存活消息
    pub async fn ping(&self) -> ClientResult<String> {
        let url = format!("{}/", self.base_url);
        let body: MessageBody = decode(self.http.get(url).send().await?).await?;
        Ok(body.message)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.error)
            .unwrap_or_else(|_| fallback_message(status));
        warn!(status = status.as_u16(), message = %message, "请求失败");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

fn fallback_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
