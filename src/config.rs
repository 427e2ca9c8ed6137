use crate::api::DEFAULT_API_URL;
use clap::Parser;
use reqwest::Url;
use std::path::PathBuf;

/// Terminal client for the to-do backend.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-client", version)]
pub struct Config {
    /// Base URL of the backend.
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// Where log lines go; the terminal belongs to the UI.
    #[arg(long, env = "TODO_LOG_FILE", default_value = "todo-client.log")]
    pub log_file: PathBuf,
}
