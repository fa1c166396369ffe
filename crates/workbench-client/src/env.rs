use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::Error;

pub const ENV_PREFIX: &str = "WORKBENCH_";

fn default_api_base() -> String {
    "http://127.0.0.1:8766/api/tts".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Client settings from `WORKBENCH_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientEnv {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default, deserialize_with = "filter_empty")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientEnv {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientEnv {
    /// Reads `.env` from the working directory if present, then the process
    /// environment.
    pub fn load() -> Result<Self, Error> {
        let _ = dotenvy::dotenv();
        Ok(envy::prefixed(ENV_PREFIX).from_env()?)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_config(&self) -> wb_probe::ProbeConfig {
        wb_probe::ProbeConfig::for_api(self.api_base.clone(), self.api_key.as_deref())
    }
}

pub fn filter_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let env = ClientEnv::from_vars(vars(&[])).unwrap();
        assert_eq!(env.api_base, "http://127.0.0.1:8766/api/tts");
        assert_eq!(env.api_key, None);
        assert_eq!(env.timeout(), Duration::from_secs(30));
        assert!(env.probe_config().authenticated_base.is_none());
    }

    #[test]
    fn empty_key_means_no_key() {
        let env = ClientEnv::from_vars(vars(&[("WORKBENCH_API_KEY", "  ")])).unwrap();
        assert_eq!(env.api_key, None);
    }

    #[test]
    fn reads_prefixed_values() {
        let env = ClientEnv::from_vars(vars(&[
            ("WORKBENCH_API_BASE", "https://tts.example/api/tts"),
            ("WORKBENCH_API_KEY", "secret"),
            ("WORKBENCH_TIMEOUT_SECS", "5"),
            ("API_KEY", "ignored"),
        ]))
        .unwrap();

        assert_eq!(env.api_base, "https://tts.example/api/tts");
        assert_eq!(env.api_key.as_deref(), Some("secret"));
        assert_eq!(env.timeout_secs, 5);
        assert!(
            env.probe_config()
                .requires_auth("https://tts.example/api/tts/audio/s/a.mp3")
        );
    }

    #[test]
    fn rejects_bad_timeout() {
        assert!(ClientEnv::from_vars(vars(&[("WORKBENCH_TIMEOUT_SECS", "soon")])).is_err());
    }
}
