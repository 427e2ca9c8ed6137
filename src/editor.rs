//! Task editor with a create mode and an edit mode.
//!
//! The mode is chosen when the editor is built and never changes afterwards.

use crate::field::TextField;
use crate::task::{Task, TaskId};
use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Create {
        title: String,
        description: String,
    },
    Edit {
        id: TaskId,
        title: String,
        description: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Description,
}

/// What a key press did to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    Pending,
    Submitted(EditorEvent),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct TaskEditor {
    editing: Option<TaskId>,
    pub title: TextField,
    pub description: TextField,
    pub focus: EditorField,
}

impl TaskEditor {
    pub fn create() -> Self {
        Self {
            editing: None,
            title: TextField::default(),
            description: TextField::default(),
            focus: EditorField::Title,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            editing: Some(task.id),
            title: TextField::with_value(task.title.clone()),
            description: TextField::with_value(task.description.clone()),
            focus: EditorField::Title,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// The id of the task being edited; `None` in create mode.
    pub fn editing_id(&self) -> Option<TaskId> {
        self.editing
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Save"
        } else {
            "Add Task"
        }
    }

    /// Emits the event for the current fields, or nothing when the title is blank.
    ///
    /// Create mode clears both fields after emitting; edit mode keeps them.
    pub fn submit(&mut self) -> Option<EditorEvent> {
        if self.title.is_blank() {
            return None;
        }
        let title = self.title.value().to_string();
        let description = self.description.value().to_string();
        match self.editing {
            Some(id) => Some(EditorEvent::Edit {
                id,
                title,
                description,
            }),
            None => {
                self.title.clear();
                self.description.clear();
                Some(EditorEvent::Create { title, description })
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorOutcome {
        match key.code {
            KeyCode::Esc => return EditorOutcome::Cancelled,
            KeyCode::Enter => {
                if let Some(event) = self.submit() {
                    return EditorOutcome::Submitted(event);
                }
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    EditorField::Title => EditorField::Description,
                    EditorField::Description => EditorField::Title,
                };
            }
            KeyCode::Backspace => self.focused_mut().backspace(),
            KeyCode::Char(c) => self.focused_mut().push(c),
            _ => {}
        }
        EditorOutcome::Pending
    }

    fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            EditorField::Title => &mut self.title,
            EditorField::Description => &mut self.description,
        }
    }
}
