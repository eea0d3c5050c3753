use thiserror::Error;

#[derive(Error, Debug)]
pub enum JuError {
    /// The upstream CI server could not be reached or answered with a non-2xx status.
    #[error("{0}")]
    RemoteConnection(String),

    /// The upstream answered, but with a shape the adapter cannot normalize.
    #[error("Unexpected response: {0}")]
    Transform(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JuError {
    pub fn remote(prefix: &str, detail: impl std::fmt::Display) -> Self {
        Self::RemoteConnection(format!("{prefix} {detail}"))
    }
}

pub type Result<T> = std::result::Result<T, JuError>;
