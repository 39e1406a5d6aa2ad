//! Mode routing
//!
//! The server is the default mode; `fetch`, `lookup` and `config` are
//! one-shot commands that share the same configuration and services.

pub mod cli;
pub mod server;

pub use cli::{run_config_generate, run_fetch, run_lookup};
pub use server::run_server;

use crate::cli::{Commands, ConfigCommands};

/// Mode detection result
#[derive(Debug, PartialEq)]
pub enum Mode {
    Server,
    Fetch,
    Lookup(String),
    ConfigGenerate(Option<String>),
}

impl Mode {
    /// Whether the tracing subscriber should be installed for this mode
    pub fn needs_logging(&self) -> bool {
        !matches!(self, Mode::ConfigGenerate(_))
    }
}

/// Map the parsed subcommand to an execution mode (server when absent)
pub fn detect_mode(command: Option<Commands>) -> Mode {
    match command {
        None | Some(Commands::Serve) => Mode::Server,
        Some(Commands::Fetch) => Mode::Fetch,
        Some(Commands::Lookup { ip }) => Mode::Lookup(ip),
        Some(Commands::Config {
            action: ConfigCommands::Generate { output_path },
        }) => Mode::ConfigGenerate(output_path),
    }
}
