pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, FormatArg};
pub use handlers::{handle_command, write_report};
