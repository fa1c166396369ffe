use crate::item::{DialogueItem, VoiceMapping};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Created,
    Analyzing,
    DialogueReady,
    Matching,
    VoiceReady,
    Synthesizing,
    Completed,
    Error,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Analyzing => "analyzing",
            Self::DialogueReady => "dialogue_ready",
            Self::Matching => "matching",
            Self::VoiceReady => "voice_ready",
            Self::Synthesizing => "synthesizing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Created,
            Self::Analyzing,
            Self::DialogueReady,
            Self::Matching,
            Self::VoiceReady,
            Self::Synthesizing,
            Self::Completed,
            Self::Error,
        ]
        .into_iter()
        .find(|status| status.as_str() == s)
        .ok_or_else(|| format!("unknown session status: {s}"))
    }
}

/// Full state of one pipeline session as the backend reports it.
///
/// `audio_files` and `merged_audio` are server-side paths; turn them into
/// fetchable URLs with the client's resolver before probing or playing.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct SessionSnapshot {
    pub session_id: String,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub user_input: Option<String>,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub dialogue_list: Vec<DialogueItem>,
    #[serde(default)]
    pub voice_mapping: Vec<VoiceMapping>,
    #[serde(default)]
    pub audio_files: Vec<String>,
    #[serde(default, deserialize_with = "crate::item::non_empty")]
    pub merged_audio: Option<String>,
    #[serde(default)]
    pub total_duration_ms: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl SessionSnapshot {
    /// Pairs dialogue items with their per-line audio by array position.
    pub fn clips(&self, resolve: impl Fn(&str) -> String) -> Vec<AudioClip> {
        self.dialogue_list
            .iter()
            .zip(&self.audio_files)
            .enumerate()
            .map(|(index, (_, path))| AudioClip {
                index,
                url: resolve(path),
            })
            .collect()
    }

    /// Merged-track length recorded at synthesis time, if any.
    pub fn merged_duration_secs(&self) -> Option<f64> {
        self.total_duration_ms
            .filter(|&ms| ms > 0)
            .map(|ms| ms as f64 / 1000.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct AudioClip {
    pub index: usize,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub user_input: Option<String>,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Last path segment of a server path, accepting either separator.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
