//! HTTP client for the comment store.

use async_trait::async_trait;
use todobot_core::comment::CommentService;
use todobot_core::{Comment, NewComment, Result};

use crate::config::ClientConfig;
use crate::remote::{
    BOT_ACCESS_HEADER, BOT_ACCESS_VALUE, decoded, normalize_base_url, transport_error,
};

/// Typed client for the comment store.
#[derive(Clone)]
pub struct HttpCommentClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCommentClient {
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
        Ok(Self::new(
            config.http_client()?,
            &config.comment_service_url,
        ))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl CommentService for HttpCommentClient {
    async fn comments_for_task(&self, task_id: i64) -> Result<Vec<Comment>> {
        let response = self
            .client
            .get(self.url(&format!("/comments/task/{task_id}")))
            .header(BOT_ACCESS_HEADER, BOT_ACCESS_VALUE)
            .send()
            .await
            .map_err(transport_error)?;
        decoded(response).await
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<Comment> {
        tracing::debug!(task_id = comment.task_id, "creating comment");
        let response = self
            .client
            .post(self.url("/comments/"))
            .header(BOT_ACCESS_HEADER, BOT_ACCESS_VALUE)
            .json(comment)
            .send()
            .await
            .map_err(transport_error)?;
        decoded(response).await
    }
}
