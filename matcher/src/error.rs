use thiserror::Error;

/// Failure to turn a raw model reply into JSON.
#[derive(Error, Debug)]
pub enum ReplyParseError {
    #[error("model reply was empty after stripping code fences")]
    Empty,

    #[error("model reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{0} environment variable not set")]
    Missing(&'static str),
}
