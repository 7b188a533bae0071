mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{handle_ingest, handle_migrate, handle_parse, handle_show, handle_validate};
