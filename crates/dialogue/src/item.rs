use serde::{Deserialize, Deserializer};

use crate::instruction::Instruction;

/// One scripted line: who says it, what they say, and how.
///
/// Items are ordered by `index`. `duration_ms` is only present once the line
/// has been synthesized; the backend strips it again whenever the script is
/// edited.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct DialogueItem {
    pub index: u32,
    pub character: String,
    pub text: String,
    #[serde(default)]
    pub character_desc: String,
    #[serde(
        default,
        deserialize_with = "instruction_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub instruction: Option<Instruction>,
    #[serde(
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub context: Option<String>,
    #[serde(
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub audio_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl DialogueItem {
    pub fn new(index: u32, character: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            index,
            character: character.into(),
            text: text.into(),
            character_desc: String::new(),
            instruction: None,
            context: None,
            audio_path: None,
            duration_ms: None,
        }
    }

    pub fn with_instruction(mut self, instruction: Instruction) -> Self {
        self.instruction = Some(instruction);
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Text as sent to synthesis: the directive tag followed by the line.
    pub fn full_text(&self) -> String {
        match &self.instruction {
            Some(instruction) => format!("{instruction}{}", self.text),
            None => self.text.clone(),
        }
    }

    /// Moves a `[#tag]` written at the start of `text` into `instruction`.
    /// An explicit instruction always wins over an inline one.
    pub fn normalized(mut self) -> Self {
        if self.instruction.is_none() {
            let (instruction, rest) = Instruction::split_prefix(&self.text);
            if let Some(instruction) = instruction {
                self.text = rest.to_string();
                self.instruction = Some(instruction);
            }
        }
        self
    }

    /// Stored synthesis duration in seconds, when a positive one is known.
    pub fn stored_duration_secs(&self) -> Option<f64> {
        self.duration_ms
            .filter(|&ms| ms > 0)
            .map(|ms| ms as f64 / 1000.0)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct VoiceMapping {
    pub character: String,
    pub voice_id: String,
    #[serde(default)]
    pub voice_name: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub preview_audio: String,
    #[serde(default)]
    pub preview_text: String,
}

fn instruction_or_none<'de, D>(deserializer: D) -> Result<Option<Instruction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Instruction::parse))
}

pub(crate) fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}
