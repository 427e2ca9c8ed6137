use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc};
use todo_client::{
    api::HttpTodoApi, app::App, config::Config, logging, requests::Dispatcher, ui::run_app,
};
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    logging::init(&config.log_file)?;
    let api = HttpTodoApi::new(config.api_url)?;
    info!(api_url = %api.base_url(), "starting");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(Arc::new(api), tx);
    let mut app = App::new();
    app.mount();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = tokio::task::block_in_place(|| {
        run_app(&mut terminal, &mut app, &dispatcher, &mut rx)
    });

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "ui loop failed");
        return Err(err.into());
    }
    info!("bye");
    Ok(())
}
