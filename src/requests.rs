//! Requests the controller emits and the responses it consumes.
//!
//! Every request runs as its own task. Nothing orders, de-duplicates or
//! cancels them, so responses are applied in whatever order they arrive.

use crate::api::{ApiResult, TodoApi};
use crate::task::{NewTask, NewUser, Task, TaskId, TaskUpdate, User};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Which form a task creation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    TaskForm,
    Editor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    FetchTasks,
    FetchUsers,
    CreateTask(Origin, NewTask),
    CreateUser(NewUser),
    UpdateTask(TaskId, TaskUpdate),
    DeleteTask(TaskId),
}

#[derive(Debug)]
pub enum Response {
    Tasks(ApiResult<Vec<Task>>),
    Users(ApiResult<Vec<User>>),
    TaskCreated(Origin, ApiResult<Task>),
    UserCreated(ApiResult<User>),
    TaskUpdated(TaskId, ApiResult<()>),
    TaskDeleted(TaskId, ApiResult<()>),
}

/// Performs one request against the backend.
pub async fn execute(api: &dyn TodoApi, request: Request) -> Response {
    match request {
        Request::FetchTasks => Response::Tasks(api.list_tasks().await),
        Request::FetchUsers => Response::Users(api.list_users().await),
        Request::CreateTask(origin, task) => {
            Response::TaskCreated(origin, api.create_task(&task).await)
        }
        Request::CreateUser(user) => Response::UserCreated(api.create_user(&user).await),
        Request::UpdateTask(id, update) => {
            Response::TaskUpdated(id, api.update_task(id, &update).await)
        }
        Request::DeleteTask(id) => Response::TaskDeleted(id, api.delete_task(id).await),
    }
}

/// Spawns requests on the runtime and posts their responses to the UI loop.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn TodoApi>,
    responses: UnboundedSender<Response>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn TodoApi>, responses: UnboundedSender<Response>) -> Self {
        Self { api, responses }
    }

    pub fn dispatch(&self, request: Request) {
        debug!(?request, "dispatching");
        let api = Arc::clone(&self.api);
        let responses = self.responses.clone();
        tokio::spawn(async move {
            let response = execute(api.as_ref(), request).await;
            if responses.send(response).is_err() {
                warn!("ui loop gone, dropping response");
            }
        });
    }

    pub fn dispatch_all(&self, requests: impl IntoIterator<Item = Request>) {
        for request in requests {
            self.dispatch(request);
        }
    }
}
