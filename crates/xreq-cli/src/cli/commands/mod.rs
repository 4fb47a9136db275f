//! CLI command handlers, one per file.

mod config;
mod send;

pub use config::run_config;
pub use send::{run_send, SendArgs};
