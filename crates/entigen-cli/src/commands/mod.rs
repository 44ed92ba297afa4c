//! Command handlers. Each translates parsed arguments into calls on the
//! core services and adapters, then reports through the `OutputManager`.

pub mod completions;
pub mod config;
pub mod download;
pub mod generate;
pub mod init;
pub mod types;
