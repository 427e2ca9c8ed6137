use crate::app::{App, Focus};
use crate::editor::{EditorField, TaskEditor};
use crate::field::TextField;
use crate::requests::{Dispatcher, Response};
use crate::task_list::TaskListView;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::{io, time::Duration};
use tokio::sync::mpsc::UnboundedReceiver;

const TICK: Duration = Duration::from_millis(100);

/// Event loop: apply responses, send requests, draw, then wait briefly for a key.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    dispatcher: &Dispatcher,
    responses: &mut UnboundedReceiver<Response>,
) -> io::Result<()> {
    loop {
        while let Ok(response) = responses.try_recv() {
            app.apply(response);
        }
        dispatcher.dispatch_all(app.take_requests());

        terminal.draw(|f| draw(f, app))?;
        if app.should_quit() {
            return Ok(());
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(
        Line::from(Span::styled(
            " Todo List",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );
    if let Some(error) = &app.error {
        f.render_widget(
            Line::from(Span::styled(
                format!(" {error}"),
                Style::default().fg(Color::Red),
            )),
            chunks[1],
        );
    }

    let user_form = Line::from(
        [
            field_spans(
                "Username",
                &app.new_username,
                "Enter username",
                app.focus == Focus::Username,
            ),
            vec![Span::raw("  ")],
            field_spans(
                "Email",
                &app.new_email,
                "Enter email",
                app.focus == Focus::Email,
            ),
        ]
        .concat(),
    );
    f.render_widget(
        Paragraph::new(user_form).block(form_block("Add New User", is_user_form(app.focus))),
        chunks[2],
    );

    let author = app.selected_author_name().unwrap_or("Select user");
    let priority = format!("{} Priority", app.priority.title());
    let task_form = Line::from(
        [
            field_spans(
                "Title",
                &app.task_title,
                "Enter new task",
                app.focus == Focus::TaskTitle,
            ),
            vec![Span::raw("  ")],
            selector_spans("Author", author, app.focus == Focus::Author),
            vec![Span::raw("  ")],
            selector_spans("Priority", &priority, app.focus == Focus::Priority),
        ]
        .concat(),
    );
    f.render_widget(
        Paragraph::new(task_form).block(form_block("Add New Task", is_task_form(app.focus))),
        chunks[3],
    );

    TaskListView::new(&app.tasks, app.selected_task).render(
        f,
        chunks[4],
        Block::default()
            .title("Tasks")
            .border_style(focus_style(app.focus == Focus::Tasks)),
    );

    f.render_widget(footer(app.focus), chunks[5]);

    if let Some(editor) = &app.editor {
        draw_editor(f, editor);
    }
}

fn draw_editor(f: &mut Frame, editor: &TaskEditor) {
    let area = centered(f.area(), 60, 6);
    let title = if editor.is_editing() { "Edit Task" } else { "New Task" };
    let lines = vec![
        Line::from(field_spans(
            "Title",
            &editor.title,
            "Title",
            editor.focus == EditorField::Title,
        )),
        Line::from(field_spans(
            "Description",
            &editor.description,
            "Description",
            editor.focus == EditorField::Description,
        )),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(format!(" {}  ", editor.submit_label())),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel"),
        ]),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(focus_style(true)),
        ),
        area,
    );
}

fn field_spans<'a>(
    label: &'a str,
    field: &'a TextField,
    placeholder: &'a str,
    focused: bool,
) -> Vec<Span<'a>> {
    let value = if field.value().is_empty() {
        Span::styled(placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(field.value(), focus_style(focused))
    };
    let mut spans = vec![Span::raw(format!("{label}: ")), value];
    if focused {
        spans.push(Span::styled(
            "_",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    spans
}

fn selector_spans<'a>(label: &'a str, value: &str, focused: bool) -> Vec<Span<'a>> {
    vec![
        Span::raw(format!("{label}: ")),
        Span::styled(format!("< {value} >"), focus_style(focused)),
    ]
}

fn form_block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn is_user_form(focus: Focus) -> bool {
    matches!(focus, Focus::Username | Focus::Email)
}

fn is_task_form(focus: Focus) -> bool {
    matches!(focus, Focus::TaskTitle | Focus::Author | Focus::Priority)
}

fn footer(focus: Focus) -> Line<'static> {
    let hint = |key: &'static str, what: &'static str| {
        [
            Span::styled(
                key,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(what),
        ]
    };
    let mut spans = Vec::new();
    spans.extend(hint(" Tab", " next  "));
    spans.extend(hint("Esc", " quit  "));
    match focus {
        Focus::Tasks => {
            spans.extend(hint("↑/↓", " select  "));
            spans.extend(hint("Space", " toggle  "));
            spans.extend(hint("e", " edit  "));
            spans.extend(hint("d", " delete  "));
            spans.extend(hint("n", " new  "));
            spans.extend(hint("r", " refresh"));
        }
        Focus::Author | Focus::Priority => {
            spans.extend(hint("←/→", " choose  "));
            spans.extend(hint("Enter", " add task"));
        }
        Focus::TaskTitle => spans.extend(hint("Enter", " add task")),
        Focus::Username | Focus::Email => spans.extend(hint("Enter", " add user")),
    }
    Line::from(spans)
}

fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
