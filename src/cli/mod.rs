pub mod app;
pub mod commands;
pub mod patterns;

pub use app::{Cli, Commands, LogLevel};
pub use patterns::build_pattern_groups;
