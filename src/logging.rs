use std::{fs::OpenOptions, io, path::Path, sync::Mutex};
use tracing_subscriber::EnvFilter;

/// Sends `tracing` output to `path`, filtered by `RUST_LOG` (default `info`).
pub fn init(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(io::Error::other)
}
