use bytes::Bytes;
use wb_dialogue::{AudioClip, SessionSnapshot, SessionStatus, SessionSummary, file_name};
use wb_http_utils::{HttpClient, is_absolute, join_url};

use crate::error::Error;
use crate::types::{Envelope, Health, ListSessionsQuery, PreviewRequest};

/// Typed access to the dialogue workbench backend.
pub struct WorkbenchClient<C> {
    http: C,
    base: String,
}

impl<C: HttpClient> WorkbenchClient<C> {
    /// `base` must match the base the transport resolves relative paths
    /// against; it is used to build absolute audio URLs.
    pub fn new(http: C, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn get_session(&self, session_id: &str) -> Result<SessionSnapshot, Error> {
        let path = format!("/sessions/{}", urlencoding::encode(session_id));
        let bytes = self.http.get(&path).await.map_err(Error::Http)?;
        let envelope: Envelope<SessionSnapshot> = serde_json::from_slice(&bytes)?;
        let mut snapshot = envelope.into_result()?;
        snapshot.dialogue_list = std::mem::take(&mut snapshot.dialogue_list)
            .into_iter()
            .map(|item| item.normalized())
            .collect();
        Ok(snapshot)
    }

    pub async fn list_sessions(
        &self,
        status: Option<SessionStatus>,
        limit: Option<u32>,
    ) -> Result<Vec<SessionSummary>, Error> {
        let query = serde_html_form::to_string(ListSessionsQuery { status, limit })
            .map_err(|e| Error::Query(e.to_string()))?;
        let path = if query.is_empty() {
            "/sessions".to_string()
        } else {
            format!("/sessions?{query}")
        };

        let bytes = self.http.get(&path).await.map_err(Error::Http)?;
        let envelope: Envelope<Vec<SessionSummary>> = serde_json::from_slice(&bytes)?;
        envelope.into_result()
    }

    /// `true` only when the backend answers `{"status": "ok"}`.
    pub async fn health(&self) -> bool {
        match self.http.get("/health").await {
            Ok(bytes) => serde_json::from_slice::<Health>(&bytes).is_ok_and(|h| h.status == "ok"),
            Err(error) => {
                tracing::debug!(%error, "health_check_failed");
                false
            }
        }
    }

    /// Fetchable URL for a clip the backend reported as a server-side path.
    pub fn audio_url(&self, session_id: &str, path: &str) -> String {
        if is_absolute(path) {
            return path.to_string();
        }
        join_url(
            &self.base,
            &format!(
                "/audio/{}/{}",
                urlencoding::encode(session_id),
                urlencoding::encode(file_name(path))
            ),
        )
    }

    pub fn merged_audio_url(&self, session_id: &str) -> String {
        join_url(
            &self.base,
            &format!("/sessions/{}/merged-audio", urlencoding::encode(session_id)),
        )
    }

    pub fn clips(&self, snapshot: &SessionSnapshot) -> Vec<AudioClip> {
        snapshot.clips(|path| self.audio_url(&snapshot.session_id, path))
    }

    /// Merged-track URL, or [`Error::MissingMergedAudio`] before the backend
    /// has produced one.
    pub fn require_merged_audio(&self, snapshot: &SessionSnapshot) -> Result<String, Error> {
        match snapshot.merged_audio {
            Some(_) => Ok(self.merged_audio_url(&snapshot.session_id)),
            None => Err(Error::MissingMergedAudio(snapshot.session_id.clone())),
        }
    }

    pub async fn fetch_audio(&self, url: &str) -> Result<Bytes, Error> {
        let bytes = self.http.get(url).await.map_err(Error::Http)?;
        Ok(Bytes::from(bytes))
    }

    /// Synthesizes a one-off sample. Without `text` the server picks its
    /// default sample sentence.
    pub async fn preview_voice(&self, voice_id: &str, text: Option<&str>) -> Result<Bytes, Error> {
        let text = text.filter(|t| !t.trim().is_empty());
        let body = serde_json::to_vec(&PreviewRequest { voice_id, text })?;
        let bytes = self
            .http
            .post("/preview", body, "application/json")
            .await
            .map_err(Error::Http)?;
        Ok(Bytes::from(bytes))
    }
}

impl<C: HttpClient> wb_probe::AudioFetcher for WorkbenchClient<C> {
    async fn fetch(&self, url: &str) -> Result<Bytes, wb_probe::BoxError> {
        let bytes = self.http.get(url).await?;
        Ok(Bytes::from(bytes))
    }
}
