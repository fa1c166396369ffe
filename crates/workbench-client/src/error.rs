use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    Http(Box<dyn std::error::Error + Send + Sync>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("workbench API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("environment error: {0}")]
    Env(#[from] envy::Error),

    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("session {0} has no merged audio")]
    MissingMergedAudio(String),

    #[error("query encoding error: {0}")]
    Query(String),

    #[error("invalid export file name: {0:?}")]
    InvalidFileName(String),

    #[error("export file name already used: {0}")]
    DuplicateFileName(String),
}
