//! CLI module - argument parsing, prompts and subcommand runners

mod args;
pub mod classify;
mod prompts;
pub mod profile;
pub mod segment;

pub use args::*;
pub use classify::PersonaQuery;
pub use prompts::*;
