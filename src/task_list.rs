//! Stateless task list over a borrowed slice.
//!
//! Selection is owned by the caller; toggle, edit and delete go through a
//! caller-supplied [`TaskActions`].

use crate::task::{Task, TaskId};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub trait TaskActions {
    fn toggle(&mut self, id: TaskId);
    fn edit(&mut self, id: TaskId);
    fn delete(&mut self, id: TaskId);
}

pub struct TaskListView<'a> {
    tasks: &'a [Task],
    selected: Option<usize>,
}

impl<'a> TaskListView<'a> {
    pub fn new(tasks: &'a [Task], selected: Option<usize>) -> Self {
        Self { tasks, selected }
    }

    fn selected_task(&self) -> Option<&'a Task> {
        self.selected.and_then(|index| self.tasks.get(index))
    }

    /// Routes a key to the matching action for the selected task.
    ///
    /// Returns `true` when the key was one of the list affordances.
    pub fn handle_key(&self, key: KeyEvent, actions: &mut impl TaskActions) -> bool {
        let Some(task) = self.selected_task() else {
            return false;
        };
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => actions.toggle(task.id),
            KeyCode::Char('e') => actions.edit(task.id),
            KeyCode::Char('d') | KeyCode::Delete => actions.delete(task.id),
            _ => return false,
        }
        true
    }

    pub fn render(&self, frame: &mut Frame, area: ratatui::layout::Rect, block: Block<'a>) {
        let items: Vec<ListItem> = self.tasks.iter().map(task_item).collect();
        let list = List::new(items)
            .block(block.borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
        let mut state = ListState::default().with_selected(self.selected);
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// One list row: a bar in the priority color, then title, byline and priority.
pub fn task_item(task: &Task) -> ListItem<'_> {
    let color = task.priority.color();
    let title_style = if task.is_completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let mut lines = vec![Line::from(vec![
        Span::styled("▌ ", Style::default().fg(color)),
        Span::styled(task.title.as_str(), title_style),
    ])];
    if !task.description.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("▌ ", Style::default().fg(color)),
            Span::styled(task.description.as_str(), Style::default().fg(Color::Gray)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("▌ ", Style::default().fg(color)),
        Span::raw(format!(
            "by {} at {}",
            task.author_name(),
            task.created_at_display()
        )),
    ]));
    lines.push(Line::from(vec![
        Span::styled("▌ ", Style::default().fg(color)),
        Span::raw("Priority: "),
        Span::styled(task.priority.title(), Style::default().fg(color)),
    ]));
    ListItem::new(lines)
}
