use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{AudioFetcher, DurationProber, MetadataLoader};

/// Settled estimates for one probe batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimates {
    pub generation: u64,
    pub secs: Vec<f64>,
}

/// Owns the probe batch for whichever session is on screen.
///
/// Starting a new batch cancels the previous one. Results go out on a watch
/// channel and only the latest generation is ever published.
pub struct ProbeSession<F, L> {
    prober: Arc<DurationProber<F, L>>,
    current: Option<CancellationToken>,
    latest: Arc<AtomicU64>,
    tx: Arc<watch::Sender<Option<Estimates>>>,
}

impl<F, L> ProbeSession<F, L>
where
    F: AudioFetcher + 'static,
    L: MetadataLoader + 'static,
{
    pub fn new(prober: DurationProber<F, L>) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            prober: Arc::new(prober),
            current: None,
            latest: Arc::new(AtomicU64::new(0)),
            tx: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Estimates>> {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> Option<Estimates> {
        self.tx.borrow().clone()
    }

    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Cancels any running batch and starts probing `urls`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, urls: Vec<String>) -> u64 {
        self.cancel();

        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        self.current = Some(token.clone());

        let prober = self.prober.clone();
        let latest = self.latest.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            match prober.probe_all(&urls, &token).await {
                Ok(secs) => {
                    let published = tx.send_if_modified(|slot| {
                        if token.is_cancelled() || latest.load(Ordering::SeqCst) != generation {
                            return false;
                        }
                        *slot = Some(Estimates { generation, secs });
                        true
                    });
                    if !published {
                        tracing::debug!(generation, "probe_batch_superseded");
                    }
                }
                Err(_) => {
                    tracing::debug!(generation, "probe_batch_cancelled");
                }
            }
        });

        generation
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

impl<F, L> Drop for ProbeSession<F, L> {
    fn drop(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;

    use super::*;
    use crate::{BoxError, Error, MediaSource, ObjectUrls, ProbeConfig};

    struct EchoFetcher;

    impl AudioFetcher for EchoFetcher {
        async fn fetch(&self, url: &str) -> Result<Bytes, BoxError> {
            Ok(Bytes::from(url.to_string()))
        }
    }

    /// Each clip takes one second to "decode" and lasts as many seconds as
    /// the digit at the end of its name.
    struct DigitLoader {
        object_urls: ObjectUrls,
    }

    impl MetadataLoader for DigitLoader {
        async fn load_duration(&self, source: &MediaSource) -> Result<f64, Error> {
            let name = match source {
                MediaSource::Remote(url) => url.clone(),
                MediaSource::Local(url) => self
                    .object_urls
                    .resolve(url)
                    .map(|bytes| String::from_utf8_lossy(&bytes).to_string())
                    .ok_or_else(|| Error::ObjectUrlRevoked(url.clone()))?,
            };
            tokio::time::sleep(Duration::from_secs(1)).await;
            name.trim_end_matches(".mp3")
                .chars()
                .last()
                .and_then(|c| c.to_digit(10))
                .map(f64::from)
                .ok_or_else(|| Error::Load("no digit".into()))
        }
    }

    fn session() -> (ProbeSession<EchoFetcher, DigitLoader>, ObjectUrls) {
        let object_urls = ObjectUrls::new();
        let config = ProbeConfig::for_api("http://api.local/api/tts", Some("key"));
        let prober = DurationProber::new(
            config,
            EchoFetcher,
            DigitLoader {
                object_urls: object_urls.clone(),
            },
            object_urls.clone(),
        );
        (ProbeSession::new(prober), object_urls)
    }

    fn clips(session: &str, digits: &[u8]) -> Vec<String> {
        digits
            .iter()
            .map(|d| format!("http://api.local/api/tts/audio/{session}/line_{d}.mp3"))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_settled_batch() {
        let (mut session, object_urls) = session();
        let mut rx = session.subscribe();

        let generation = session.start(clips("a", &[2, 3, 1]));
        rx.changed().await.unwrap();

        assert_eq!(
            rx.borrow().clone(),
            Some(Estimates {
                generation,
                secs: vec![2.0, 3.0, 1.0],
            })
        );
        assert_eq!(object_urls.live(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_sessions_discards_previous_batch() {
        let (mut session, object_urls) = session();
        let mut rx = session.subscribe();

        let first = session.start(clips("a", &[2, 3, 1, 4, 5]));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let second = session.start(clips("b", &[7]));
        assert!(second > first);

        rx.changed().await.unwrap();
        let published = rx.borrow_and_update().clone().unwrap();
        assert_eq!(published.generation, second);
        assert_eq!(published.secs, vec![7.0]);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(object_urls.live(), 0);
        assert_eq!(object_urls.created(), object_urls.revoked());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_publication() {
        let (mut session, object_urls) = session();
        let rx = session.subscribe();

        session.start(clips("a", &[2, 3]));
        tokio::time::sleep(Duration::from_millis(500)).await;
        session.cancel();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(session.latest(), None);
        assert_eq!(object_urls.live(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_session_cancels_batch() {
        let (mut session, object_urls) = session();
        session.start(clips("a", &[2, 3]));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(object_urls.live(), 1);

        drop(session);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(object_urls.live(), 0);
    }
}
