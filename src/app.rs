//! Root controller: owns every piece of client state.
//!
//! Nothing talks to the network from here. Operations queue [`Request`]s in an
//! outbox that the event loop drains, and backend answers come back through
//! [`App::apply`]. The task and user collections are only ever written by
//! fetch responses.

use crate::editor::{EditorEvent, EditorOutcome, TaskEditor};
use crate::field::TextField;
use crate::requests::{Origin, Request, Response};
use crate::task::{
    NewTask, NewUser, Priority, Task, TaskId, TaskUpdate, User, UserId, DEFAULT_DESCRIPTION,
};
use crate::task_list::{TaskActions, TaskListView};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

pub const TASK_REQUIRED: &str = "Please enter task title and select user";
pub const USER_REQUIRED: &str = "Please enter username and email";
const ADD_TASK_FAILED: &str = "Error adding task";
const ADD_USER_FAILED: &str = "Error adding user";
const UPDATE_TASK_FAILED: &str = "Error updating task";
const DELETE_TASK_FAILED: &str = "Error deleting task";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Username,
    Email,
    TaskTitle,
    Author,
    Priority,
    Tasks,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Username,
        Focus::Email,
        Focus::TaskTitle,
        Focus::Author,
        Focus::Priority,
        Focus::Tasks,
    ];

    fn step(self, forward: bool) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let len = Self::ORDER.len();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        Self::ORDER[next]
    }
}

#[derive(Debug)]
pub struct App {
    pub tasks: Vec<Task>,
    pub users: Vec<User>,
    pub task_title: TextField,
    pub selected_author: Option<UserId>,
    pub priority: Priority,
    pub new_username: TextField,
    pub new_email: TextField,
    pub error: Option<String>,
    pub focus: Focus,
    pub selected_task: Option<usize>,
    pub editor: Option<TaskEditor>,
    outbox: Vec<Request>,
    should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            users: Vec::new(),
            task_title: TextField::default(),
            selected_author: None,
            priority: Priority::Low,
            new_username: TextField::default(),
            new_email: TextField::default(),
            error: None,
            focus: Focus::TaskTitle,
            selected_task: None,
            editor: None,
            outbox: Vec::new(),
            should_quit: false,
        }
    }

    /// Initial load, issued once when the screen comes up.
    pub fn mount(&mut self) {
        self.fetch_tasks();
        self.fetch_users();
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Requests queued since the last call, in the order they were issued.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub fn fetch_tasks(&mut self) {
        self.outbox.push(Request::FetchTasks);
    }

    pub fn fetch_users(&mut self) {
        self.outbox.push(Request::FetchUsers);
    }

    pub fn selected_author_name(&self) -> Option<&str> {
        let id = self.selected_author?;
        self.users
            .iter()
            .find(|user| user.id == id)
            .map(|user| user.username.as_str())
    }

    pub fn submit_task(&mut self) {
        let author_id = match self.selected_author {
            Some(id) if !self.task_title.is_blank() => id,
            _ => {
                self.error = Some(TASK_REQUIRED.to_string());
                return;
            }
        };
        let task = NewTask {
            title: self.task_title.value().to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            author_id,
            priority: self.priority,
        };
        self.outbox.push(Request::CreateTask(Origin::TaskForm, task));
    }

    pub fn submit_user(&mut self) {
        if self.new_username.is_blank() || self.new_email.is_blank() {
            self.error = Some(USER_REQUIRED.to_string());
            return;
        }
        self.outbox.push(Request::CreateUser(NewUser {
            username: self.new_username.value().to_string(),
            email: self.new_email.value().to_string(),
        }));
    }

    pub fn apply(&mut self, response: Response) {
        match response {
            Response::Tasks(Ok(tasks)) => {
                self.tasks = tasks;
                self.clamp_selection();
            }
            Response::Tasks(Err(err)) => warn!(error = %err, "error fetching tasks"),
            Response::Users(Ok(users)) => {
                self.users = users;
                if self.selected_author_name().is_none() {
                    self.selected_author = None;
                }
            }
            Response::Users(Err(err)) => warn!(error = %err, "error fetching users"),
            Response::TaskCreated(origin, Ok(task)) => {
                info!(id = task.id, ?origin, "task created");
                match origin {
                    Origin::TaskForm => self.task_title.clear(),
                    Origin::Editor => {
                        if self.editor.as_ref().is_some_and(|e| !e.is_editing()) {
                            self.editor = None;
                        }
                    }
                }
                self.error = None;
                self.fetch_tasks();
            }
            Response::TaskCreated(_, Err(err)) => {
                warn!(error = %err, "error adding task");
                self.error = Some(err.server_message().unwrap_or(ADD_TASK_FAILED).to_string());
            }
            Response::UserCreated(Ok(user)) => {
                info!(id = user.id, username = %user.username, "user created");
                self.new_username.clear();
                self.new_email.clear();
                self.error = None;
                self.fetch_users();
            }
            Response::UserCreated(Err(err)) => {
                warn!(error = %err, "error adding user");
                self.error = Some(err.server_message().unwrap_or(ADD_USER_FAILED).to_string());
            }
            Response::TaskUpdated(id, Ok(())) | Response::TaskDeleted(id, Ok(())) => {
                info!(id, "task changed");
                if self.editor.as_ref().and_then(TaskEditor::editing_id) == Some(id) {
                    self.editor = None;
                }
                self.error = None;
                self.fetch_tasks();
            }
            Response::TaskUpdated(id, Err(err)) => {
                warn!(id, error = %err, "error updating task");
                self.error = Some(
                    err.server_message()
                        .unwrap_or(UPDATE_TASK_FAILED)
                        .to_string(),
                );
            }
            Response::TaskDeleted(id, Err(err)) => {
                warn!(id, error = %err, "error deleting task");
                self.error = Some(
                    err.server_message()
                        .unwrap_or(DELETE_TASK_FAILED)
                        .to_string(),
                );
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if let Some(editor) = self.editor.as_mut() {
            let needs_author = !editor.is_editing() && self.selected_author.is_none();
            if key.code == KeyCode::Enter && needs_author {
                self.error = Some(TASK_REQUIRED.to_string());
                return;
            }
            // Shown until the backend accepts the submission.
            let submitted = editor.clone();
            match editor.handle_key(key) {
                EditorOutcome::Pending => {}
                EditorOutcome::Cancelled => self.editor = None,
                EditorOutcome::Submitted(event) => {
                    self.editor = Some(submitted);
                    self.apply_editor_event(event);
                }
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus = self.focus.step(true),
            KeyCode::BackTab => self.focus = self.focus.step(false),
            _ => match self.focus {
                Focus::Username => {
                    if edit_field(&mut self.new_username, key) {
                        self.submit_user();
                    }
                }
                Focus::Email => {
                    if edit_field(&mut self.new_email, key) {
                        self.submit_user();
                    }
                }
                Focus::TaskTitle => {
                    if edit_field(&mut self.task_title, key) {
                        self.submit_task();
                    }
                }
                Focus::Author => self.handle_author_key(key),
                Focus::Priority => self.handle_priority_key(key),
                Focus::Tasks => self.handle_tasks_key(key),
            },
        }
    }

    fn handle_author_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.step_author(false),
            KeyCode::Right | KeyCode::Char(' ') => self.step_author(true),
            KeyCode::Enter => self.submit_task(),
            _ => {}
        }
    }

    fn handle_priority_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.priority = self.priority.step(false),
            KeyCode::Right | KeyCode::Char(' ') => self.priority = self.priority.step(true),
            KeyCode::Enter => self.submit_task(),
            _ => {}
        }
    }

    fn handle_tasks_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') => {
                self.fetch_tasks();
                self.fetch_users();
            }
            KeyCode::Char('n') => self.editor = Some(TaskEditor::create()),
            KeyCode::Up => {
                self.selected_task = Some(self.selected_task.map_or(0, |i| i.saturating_sub(1)));
                self.clamp_selection();
            }
            KeyCode::Down => {
                self.selected_task = Some(self.selected_task.map_or(0, |i| i + 1));
                self.clamp_selection();
            }
            _ => {
                let view = TaskListView::new(&self.tasks, self.selected_task);
                let mut actions = ListActions {
                    tasks: &self.tasks,
                    outbox: &mut self.outbox,
                    editor: &mut self.editor,
                };
                view.handle_key(key, &mut actions);
            }
        }
    }

    /// Cycles the author selector through "no author" and every known user.
    fn step_author(&mut self, forward: bool) {
        let mut choices: Vec<Option<UserId>> = vec![None];
        choices.extend(self.users.iter().map(|user| Some(user.id)));
        let index = choices
            .iter()
            .position(|choice| *choice == self.selected_author)
            .unwrap_or(0);
        let len = choices.len();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        self.selected_author = choices[next];
    }

    fn apply_editor_event(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::Edit {
                id,
                title,
                description,
            } => {
                self.outbox.push(Request::UpdateTask(
                    id,
                    TaskUpdate {
                        title: Some(title),
                        description: Some(description),
                        is_completed: None,
                    },
                ));
            }
            EditorEvent::Create { title, description } => {
                let Some(author_id) = self.selected_author else {
                    self.error = Some(TASK_REQUIRED.to_string());
                    return;
                };
                let task = NewTask {
                    title,
                    description,
                    author_id,
                    priority: self.priority,
                };
                self.outbox.push(Request::CreateTask(Origin::Editor, task));
            }
        }
    }

    fn clamp_selection(&mut self) {
        self.selected_task = match (self.selected_task, self.tasks.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => None,
        };
    }
}

/// Applies a key to a text field. Returns `true` on Enter.
fn edit_field(field: &mut TextField, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) => field.push(c),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Enter => return true,
        _ => {}
    }
    false
}

/// List callbacks, borrowing only the parts of [`App`] they touch.
struct ListActions<'a> {
    tasks: &'a [Task],
    outbox: &'a mut Vec<Request>,
    editor: &'a mut Option<TaskEditor>,
}

impl<'a> ListActions<'a> {
    fn find(&self, id: TaskId) -> Option<&'a Task> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

impl TaskActions for ListActions<'_> {
    fn toggle(&mut self, id: TaskId) {
        if let Some(task) = self.find(id) {
            let update = TaskUpdate {
                is_completed: Some(!task.is_completed),
                ..TaskUpdate::default()
            };
            self.outbox.push(Request::UpdateTask(id, update));
        }
    }

    fn edit(&mut self, id: TaskId) {
        if let Some(task) = self.find(id) {
            *self.editor = Some(TaskEditor::edit(task));
        }
    }

    fn delete(&mut self, id: TaskId) {
        self.outbox.push(Request::DeleteTask(id));
    }
}
