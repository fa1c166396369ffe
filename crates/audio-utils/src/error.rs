#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Decoder(#[from] rodio::decoder::DecoderError),
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),
    #[error("unsupported channel count: {count}")]
    UnsupportedChannelCount { count: u16 },
    #[error("audio payload is empty")]
    Empty,
}
