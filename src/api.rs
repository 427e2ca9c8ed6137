//! HTTP adapter for the to-do backend.
//!
//! Every call is a single request: no retries, no auth headers and no
//! timeouts.

use crate::task::{NewTask, NewUser, Task, TaskId, TaskUpdate, User};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Errors returned by [`TodoApi`] calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend rejected request with {status}")]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// The `message` field of a rejection body, when the backend sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Base URL problems caught at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported api url scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The backend contract the client consumes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list_tasks(&self) -> ApiResult<Vec<Task>>;

    async fn create_task(&self, task: &NewTask) -> ApiResult<Task>;

    async fn list_users(&self) -> ApiResult<Vec<User>>;

    async fn create_user(&self, user: &NewUser) -> ApiResult<User>;

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> ApiResult<()>;

    async fn delete_task(&self, id: TaskId) -> ApiResult<()>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// [`TodoApi`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    base: Url,
}

impl HttpTodoApi {
    pub fn new(base: Url) -> Result<Self, ConfigError> {
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base.scheme().to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always take a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn check(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        Err(ApiError::Rejected { status, message })
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        let url = self.url(&["tasks"]);
        debug!(%url, "GET");
        let response = self.client.get(url).send().await.map_err(ApiError::Transport)?;
        Self::check(response).await?.json().await.map_err(ApiError::Decode)
    }

    async fn create_task(&self, task: &NewTask) -> ApiResult<Task> {
        let url = self.url(&["tasks"]);
        debug!(%url, title = %task.title, "POST");
        let response = self
            .client
            .post(url)
            .json(task)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::check(response).await?.json().await.map_err(ApiError::Decode)
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        let url = self.url(&["users"]);
        debug!(%url, "GET");
        let response = self.client.get(url).send().await.map_err(ApiError::Transport)?;
        Self::check(response).await?.json().await.map_err(ApiError::Decode)
    }

    async fn create_user(&self, user: &NewUser) -> ApiResult<User> {
        let url = self.url(&["users"]);
        debug!(%url, username = %user.username, "POST");
        let response = self
            .client
            .post(url)
            .json(user)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::check(response).await?.json().await.map_err(ApiError::Decode)
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> ApiResult<()> {
        let url = self.url(&["tasks", &id.to_string()]);
        debug!(%url, "PUT");
        let response = self
            .client
            .put(url)
            .json(update)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::check(response).await.map(drop)
    }

    async fn delete_task(&self, id: TaskId) -> ApiResult<()> {
        let url = self.url(&["tasks", &id.to_string()]);
        debug!(%url, "DELETE");
        let response = self.client.delete(url).send().await.map_err(ApiError::Transport)?;
        Self::check(response).await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn api(base: &str) -> HttpTodoApi {
        HttpTodoApi::new(Url::parse(base).unwrap()).unwrap()
    }

    #[rstest]
    #[case("http://localhost:5000", "http://localhost:5000/tasks")]
    #[case("http://localhost:5000/", "http://localhost:5000/tasks")]
    #[case("https://example.test/api/", "https://example.test/api/tasks")]
    fn url_appends_segments(#[case] base: &str, #[case] expected: &str) {
        assert_eq!(api(base).url(&["tasks"]).as_str(), expected);
    }

    #[test]
    fn url_builds_item_paths() {
        assert_eq!(
            api(DEFAULT_API_URL).url(&["tasks", "42"]).as_str(),
            "http://localhost:5000/tasks/42"
        );
    }

    #[rstest]
    #[case("ftp://localhost/", ConfigError::UnsupportedScheme("ftp".to_string()))]
    #[case("mailto:me@example.test", ConfigError::UnsupportedScheme("mailto".to_string()))]
    fn rejects_unusable_base_urls(#[case] base: &str, #[case] expected: ConfigError) {
        let err = HttpTodoApi::new(Url::parse(base).unwrap()).unwrap_err();
        assert_eq!(err, expected);
    }

    #[test]
    fn server_message_only_comes_from_rejections() {
        let rejected = ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: Some("duplicate".to_string()),
        };
        let silent = ApiError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };

        assert_eq!(rejected.server_message(), Some("duplicate"));
        assert_eq!(silent.server_message(), None);
    }
}
