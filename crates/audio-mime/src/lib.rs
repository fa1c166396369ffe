#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Flac,
    M4a,
    Webm,
    Aac,
}

impl AudioFormat {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "ogg" | "oga" => Some(Self::Ogg),
            "flac" => Some(Self::Flac),
            "m4a" | "mp4" => Some(Self::M4a),
            "webm" => Some(Self::Webm),
            "aac" => Some(Self::Aac),
            _ => None,
        }
    }

    /// Guesses the container from the leading bytes of a payload.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Some(Self::Wav),
            [b'I', b'D', b'3', ..] => Some(Self::Mp3),
            [b'O', b'g', b'g', b'S', ..] => Some(Self::Ogg),
            [b'f', b'L', b'a', b'C', ..] => Some(Self::Flac),
            [0x1A, 0x45, 0xDF, 0xA3, ..] => Some(Self::Webm),
            [_, _, _, _, b'f', b't', b'y', b'p', ..] => Some(Self::M4a),
            // ADTS sync word with layer bits zeroed
            [0xFF, second, ..] if second & 0xF6 == 0xF0 => Some(Self::Aac),
            [0xFF, second, ..] if second & 0xE0 == 0xE0 => Some(Self::Mp3),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::M4a => "m4a",
            Self::Webm => "webm",
            Self::Aac => "aac",
        }
    }

}

/// Returns `name` unchanged when it already has a known audio extension,
/// otherwise appends one guessed from `bytes`.
pub fn ensure_extension(name: &str, bytes: &[u8]) -> String {
    if AudioFormat::from_file_name(name).is_some() {
        return name.to_string();
    }
    let format = AudioFormat::sniff(bytes).unwrap_or(AudioFormat::Mp3);
    format!("{name}.{}", format.extension())
}
