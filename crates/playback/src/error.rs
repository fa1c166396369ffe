#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlayError {
    #[error("playback rejected: {0}")]
    Rejected(String),
    #[error("no player for this source")]
    Unavailable,
}
