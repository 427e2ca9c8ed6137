//! Terminal client for a small to-do REST backend.
//!
//! - [`app`]: the controller that owns all state
//! - [`api`]: HTTP adapter behind the [`api::TodoApi`] trait
//! - [`requests`]: request/response plumbing between the two
//! - [`ui`], [`task_list`], [`editor`]: rendering and input

pub mod api;
pub mod app;
pub mod config;
pub mod editor;
pub mod field;
pub mod logging;
pub mod requests;
pub mod task;
pub mod task_list;
pub mod ui;
