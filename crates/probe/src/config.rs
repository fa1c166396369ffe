use std::time::Duration;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_FALLBACK_SECS: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Base URL whose audio needs credentials. Set only when an API key is
    /// configured; clips under it are downloaded first and probed locally.
    pub authenticated_base: Option<String>,
    pub timeout: Duration,
    pub fallback_secs: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            authenticated_base: None,
            timeout: DEFAULT_PROBE_TIMEOUT,
            fallback_secs: DEFAULT_FALLBACK_SECS,
        }
    }
}

impl ProbeConfig {
    pub fn for_api(api_base: impl Into<String>, api_key: Option<&str>) -> Self {
        let has_key = api_key.is_some_and(|key| !key.trim().is_empty());
        Self {
            authenticated_base: has_key.then(|| api_base.into()),
            ..Self::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn fallback_secs(mut self, fallback_secs: f64) -> Self {
        self.fallback_secs = fallback_secs;
        self
    }

    pub fn requires_auth(&self, url: &str) -> bool {
        self.authenticated_base
            .as_deref()
            .is_some_and(|base| wb_http_utils::is_under(base, url))
    }
}
