//! HTTP client for the task/category store.
//!
//! A thin request/response wrapper over the store's REST API. Each operation
//! either returns the decoded entity/collection or fails with a remote
//! failure; retry policy is the caller's concern (and the dialog engine does
//! not retry).

use async_trait::async_trait;
use todobot_core::task::TaskService;
use todobot_core::{Category, NewTask, Result, Task, TaskPatch};

use crate::config::ClientConfig;
use crate::remote::{
    BOT_ACCESS_HEADER, BOT_ACCESS_VALUE, checked, decoded, normalize_base_url, transport_error,
};

/// Typed client for the task/category store.
#[derive(Clone)]
pub struct HttpTaskClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskClient {
    /// Creates a client over an already-built HTTP client.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    /// Creates a client from configuration, building the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns a config error if the HTTP client cannot be constructed.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(config.http_client()?, &config.task_service_url))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_list(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<Task>> {
        let response = self
            .client
            .get(self.url(path))
            .header(BOT_ACCESS_HEADER, BOT_ACCESS_VALUE)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        decoded(response).await
    }
}

#[async_trait]
impl TaskService for HttpTaskClient {
    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        tracing::debug!(title = %task.title, "creating task");
        let response = self
            .client
            .post(self.url("/api/tasks/"))
            .header(BOT_ACCESS_HEADER, BOT_ACCESS_VALUE)
            .json(task)
            .send()
            .await
            .map_err(transport_error)?;
        decoded(response).await
    }

    async fn list_tasks(&self, show_completed: bool) -> Result<Vec<Task>> {
        let show = if show_completed { "true" } else { "false" };
        self.get_list("/api/tasks/", &[("show_completed", show)])
            .await
    }

    async fn search_tasks(&self, query: &str) -> Result<Vec<Task>> {
        self.get_list("/api/tasks/search/", &[("search", query)])
            .await
    }

    async fn update_task(&self, task_id: i64, patch: &TaskPatch) -> Result<Task> {
        let response = self
            .client
            .patch(self.url(&format!("/api/tasks/{task_id}/")))
            .header(BOT_ACCESS_HEADER, BOT_ACCESS_VALUE)
            .json(patch)
            .send()
            .await
            .map_err(transport_error)?;
        decoded(response).await
    }

    async fn delete_task(&self, task_id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/tasks/{task_id}/")))
            .header(BOT_ACCESS_HEADER, BOT_ACCESS_VALUE)
            .send()
            .await
            .map_err(transport_error)?;
        checked(response).await?;
        Ok(())
    }

    async fn upcoming_deadlines(&self) -> Result<Vec<Task>> {
        self.get_list("/api/tasks/upcoming_deadlines/", &[]).await
    }

    async fn tasks_in_category(&self, category_id: i64) -> Result<Vec<Task>> {
        // The store has no per-category filter; fetch and filter locally.
        let tasks = self.list_tasks(false).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.in_category(category_id))
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let response = self
            .client
            .get(self.url("/api/categories/"))
            .header(BOT_ACCESS_HEADER, BOT_ACCESS_VALUE)
            .send()
            .await
            .map_err(transport_error)?;
        decoded(response).await
    }

    async fn create_category(&self, name: &str) -> Result<Category> {
        tracing::debug!(%name, "creating category");
        let response = self
            .client
            .post(self.url("/api/categories/"))
            .header(BOT_ACCESS_HEADER, BOT_ACCESS_VALUE)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(transport_error)?;
        decoded(response).await
    }

    async fn delete_category(&self, category_id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/categories/{category_id}/")))
            .header(BOT_ACCESS_HEADER, BOT_ACCESS_VALUE)
            .send()
            .await
            .map_err(transport_error)?;
        checked(response).await?;
        Ok(())
    }
}
