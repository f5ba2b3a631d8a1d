/// Posting findings as review comments
pub mod comment;
/// Configuration management commands
pub mod config_cmd;
