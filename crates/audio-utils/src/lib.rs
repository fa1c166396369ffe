use std::io::Cursor;
use std::time::Duration;

use bytes::Bytes;

mod error;

pub use error::*;

pub use rodio::Source;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioMetadata {
    pub sample_rate: u32,
    pub channels: u16,
    pub duration: Duration,
}

impl AudioMetadata {
    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

pub fn source_from_bytes(bytes: Bytes) -> Result<rodio::Decoder<Cursor<Bytes>>, crate::Error> {
    if bytes.is_empty() {
        return Err(crate::Error::Empty);
    }
    let decoder = rodio::Decoder::new(Cursor::new(bytes))?;
    Ok(decoder)
}

/// Reads sample rate, channel count and playable duration from a decoded source.
///
/// Containers that do not advertise a length (raw MP3 streams without a Xing
/// header, for instance) are decoded to the end and measured by frame count.
pub fn metadata_from_source<S>(source: S) -> Result<AudioMetadata, crate::Error>
where
    S: Source,
{
    let sample_rate = source.sample_rate();
    if sample_rate == 0 {
        return Err(crate::Error::InvalidSampleRate(sample_rate));
    }

    let channels = source.channels();
    if channels == 0 {
        return Err(crate::Error::UnsupportedChannelCount { count: channels });
    }

    let duration = match source.total_duration() {
        Some(duration) => duration,
        None => {
            let samples = source.count();
            let frames = samples / channels as usize;
            tracing::trace!(frames, "duration_measured_by_decoding");
            Duration::from_secs_f64(frames as f64 / sample_rate as f64)
        }
    };

    Ok(AudioMetadata {
        sample_rate,
        channels,
        duration,
    })
}

pub fn audio_metadata_from_bytes(bytes: Bytes) -> Result<AudioMetadata, crate::Error> {
    metadata_from_source(source_from_bytes(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(sample_rate: u32, channels: u16, frames: usize) -> Bytes {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..frames * channels as usize {
                writer.write_sample(((i % 64) as i16 - 32) * 256).unwrap();
            }
            writer.finalize().unwrap();
        }
        Bytes::from(cursor.into_inner())
    }

    #[test]
    fn wav_duration_from_bytes() {
        let metadata = audio_metadata_from_bytes(wav_bytes(16_000, 1, 8_000)).unwrap();
        assert_eq!(metadata.sample_rate, 16_000);
        assert_eq!(metadata.channels, 1);
        assert!((metadata.duration_secs() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn stereo_duration_counts_frames_not_samples() {
        let metadata = audio_metadata_from_bytes(wav_bytes(22_050, 2, 44_100)).unwrap();
        assert_eq!(metadata.channels, 2);
        assert!((metadata.duration_secs() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(
            audio_metadata_from_bytes(Bytes::new()),
            Err(Error::Empty)
        ));
    }

    #[test]
    fn garbage_payload_is_rejected() {
        assert!(audio_metadata_from_bytes(Bytes::from_static(b"definitely not audio")).is_err());
    }
}
