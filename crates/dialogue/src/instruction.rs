use std::fmt;

/// Delivery directive attached to a line, written inline as `[#tag]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(into = "String", try_from = "String")]
pub struct Instruction(String);

impl Instruction {
    /// Accepts `[#tag]`, `#tag` or a bare `tag`. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let inner = match raw.strip_prefix("[#").and_then(|s| s.strip_suffix(']')) {
            Some(inner) => inner,
            None => raw.strip_prefix('#').unwrap_or(raw),
        };
        let inner = inner.trim();
        if inner.is_empty() {
            None
        } else {
            Some(Self(inner.to_string()))
        }
    }

    /// Splits a leading `[#tag]` off `text`, returning the tag and the rest.
    pub fn split_prefix(text: &str) -> (Option<Self>, &str) {
        let trimmed = text.trim_start();
        if !trimmed.starts_with("[#") {
            return (None, text);
        }
        match trimmed.find(']') {
            Some(end) => match Self::parse(&trimmed[..=end]) {
                Some(instruction) => (Some(instruction), trimmed[end + 1..].trim_start()),
                None => (None, text),
            },
            None => (None, text),
        }
    }

    pub fn tag(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[#{}]", self.0)
    }
}

impl From<Instruction> for String {
    fn from(value: Instruction) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Instruction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "instruction must not be blank".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_forms() {
        assert_eq!(Instruction::parse("[#sadly]").unwrap().tag(), "sadly");
        assert_eq!(Instruction::parse(" #whisper ").unwrap().tag(), "whisper");
        assert_eq!(Instruction::parse("用悲伤的语气说").unwrap().tag(), "用悲伤的语气说");
        assert!(Instruction::parse("").is_none());
        assert!(Instruction::parse("[# ]").is_none());
    }

    #[test]
    fn display_round_trips_bracketed_form() {
        let instruction = Instruction::parse("angry").unwrap();
        assert_eq!(instruction.to_string(), "[#angry]");
        assert_eq!(Instruction::parse(&instruction.to_string()), Some(instruction));
    }

    #[test]
    fn split_prefix_extracts_leading_tag() {
        let (instruction, rest) = Instruction::split_prefix("[#softly] Good night.");
        assert_eq!(instruction.unwrap().tag(), "softly");
        assert_eq!(rest, "Good night.");

        let (instruction, rest) = Instruction::split_prefix("No tag [#here]");
        assert!(instruction.is_none());
        assert_eq!(rest, "No tag [#here]");

        let (instruction, rest) = Instruction::split_prefix("[#unterminated");
        assert!(instruction.is_none());
        assert_eq!(rest, "[#unterminated");
    }
}
