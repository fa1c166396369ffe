use tokio_util::sync::CancellationToken;

use crate::{AudioFetcher, Cancelled, Error, MediaSource, MetadataLoader, ObjectUrls, ProbeConfig};

/// Measures per-line clip durations for timeline reconstruction.
///
/// Clips are probed one at a time so at most one download and one decode are
/// in flight. A failed or slow probe never fails the batch; it contributes
/// [`ProbeConfig::fallback_secs`] instead.
pub struct DurationProber<F, L> {
    config: ProbeConfig,
    fetcher: F,
    loader: L,
    object_urls: ObjectUrls,
}

impl<F: AudioFetcher, L: MetadataLoader> DurationProber<F, L> {
    pub fn new(config: ProbeConfig, fetcher: F, loader: L, object_urls: ObjectUrls) -> Self {
        Self {
            config,
            fetcher,
            loader,
            object_urls,
        }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn object_urls(&self) -> &ObjectUrls {
        &self.object_urls
    }

    /// Probes every URL in order and returns one estimate per URL.
    ///
    /// Nothing is returned for a cancelled batch. Cancellation drops the
    /// in-flight probe, which releases any object URL it registered.
    pub async fn probe_all(
        &self,
        urls: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<f64>, Cancelled> {
        let mut estimates = Vec::with_capacity(urls.len());

        for url in urls {
            let secs = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Cancelled),
                secs = self.probe_one(url) => secs,
            };
            estimates.push(secs);
        }

        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        tracing::info!(count = estimates.len(), "probe_batch_settled");
        Ok(estimates)
    }

    /// Duration of one clip in seconds, or the fallback on error or timeout.
    pub async fn probe_one(&self, url: &str) -> f64 {
        match self.measure(url).await {
            Ok(secs) => secs,
            Err(error) => {
                tracing::debug!(url, %error, "probe_fallback");
                self.config.fallback_secs
            }
        }
    }

    /// Like [`Self::probe_one`] but reports why a probe failed instead of
    /// substituting the fallback. Used for the merged track, whose length
    /// must stay unknown rather than be guessed.
    pub async fn measure(&self, url: &str) -> Result<f64, Error> {
        let secs = tokio::time::timeout(self.config.timeout, self.try_probe(url))
            .await
            .map_err(|_| Error::Timeout(self.config.timeout))??;

        if secs.is_finite() && secs > 0.0 {
            Ok(secs)
        } else {
            Err(Error::UnusableDuration(secs))
        }
    }

    async fn try_probe(&self, url: &str) -> Result<f64, Error> {
        if !self.config.requires_auth(url) {
            return self
                .loader
                .load_duration(&MediaSource::Remote(url.to_string()))
                .await;
        }

        let bytes = self.fetcher.fetch(url).await.map_err(Error::Fetch)?;
        let guard = self.object_urls.create(bytes);
        self.loader
            .load_duration(&MediaSource::Local(guard.url().to_string()))
            .await
    }
}
