use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{BoxError, Error, ObjectUrls};

/// Where a loader should read a clip from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Publicly reachable URL; the loader fetches it itself.
    Remote(String),
    /// `blob:` URL registered in [`ObjectUrls`].
    Local(String),
}

impl MediaSource {
    pub fn url(&self) -> &str {
        match self {
            Self::Remote(url) | Self::Local(url) => url,
        }
    }
}

/// Downloads raw audio. Implementations attach whatever credentials the
/// URL needs.
pub trait AudioFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Bytes, BoxError>> + Send;
}

impl<T: AudioFetcher> AudioFetcher for Arc<T> {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Bytes, BoxError>> + Send {
        (**self).fetch(url)
    }
}

/// Reads the playable duration, in seconds, of a clip.
pub trait MetadataLoader: Send + Sync {
    fn load_duration(&self, source: &MediaSource) -> impl Future<Output = Result<f64, Error>> + Send;
}

/// Default loader: pulls the payload (from the network or the object-URL
/// registry) and decodes it with rodio on the blocking pool.
///
/// A blocking decode cannot be interrupted. When the probe times out or its
/// batch is cancelled, a decode already on the pool runs to completion and
/// its result is dropped; the fetch before it is abandoned immediately.
pub struct RodioLoader<F> {
    fetcher: F,
    object_urls: ObjectUrls,
}

impl<F> RodioLoader<F> {
    pub fn new(fetcher: F, object_urls: ObjectUrls) -> Self {
        Self {
            fetcher,
            object_urls,
        }
    }
}

impl<F: AudioFetcher> MetadataLoader for RodioLoader<F> {
    async fn load_duration(&self, source: &MediaSource) -> Result<f64, Error> {
        let bytes = match source {
            MediaSource::Remote(url) => self.fetcher.fetch(url).await.map_err(Error::Fetch)?,
            MediaSource::Local(url) => self
                .object_urls
                .resolve(url)
                .ok_or_else(|| Error::ObjectUrlRevoked(url.clone()))?,
        };

        let metadata =
            tokio::task::spawn_blocking(move || wb_audio_utils::audio_metadata_from_bytes(bytes))
                .await??;
        Ok(metadata.duration_secs())
    }
}
