//! The `notemail` command-line front end.
//!
//! Menu and chat loops run over any `BufRead`/`Write` pair so they can be
//! driven from tests as well as from the terminal.

pub mod app;
pub mod chat;
pub mod cli;
pub mod console;
pub mod menu;

pub use app::{load_config, run, run_command};
pub use cli::{Cli, CliCommand};
pub use console::Console;

/// Initialize logging with `env_logger`, honouring `RUST_LOG`.
///
/// Calling it more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}
