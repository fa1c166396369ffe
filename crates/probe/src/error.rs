pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("fetch failed: {0}")]
    Fetch(BoxError),
    #[error("metadata load failed: {0}")]
    Load(BoxError),
    #[error("probe timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("unusable duration: {0}")]
    UnusableDuration(f64),
    #[error("object url is no longer registered: {0}")]
    ObjectUrlRevoked(String),
    #[error(transparent)]
    Decode(#[from] wb_audio_utils::Error),
    #[error("decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Returned when a probe batch is superseded before it settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("probe batch cancelled")]
pub struct Cancelled;
