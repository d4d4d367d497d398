//! CLI module for kafkalite
//!
//! Provides the command-line interface for:
//! - create_topic / delete_topic / list_topics
//! - produce
//! - consume / consume_from_id
//! - last_id

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    consume, create_topic, delete_topic, last_id, list_topics, produce, resolve_config, run,
    run_cli, run_command,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_line, write_response, Output};
