/// Something that can be playing: the merged track or one line's clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(tag = "type", content = "index", rename_all = "snake_case")]
pub enum Source {
    Merged,
    Item(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    PlayingMerged,
    PlayingItem(usize),
}

impl PlaybackState {
    pub fn active(&self) -> Option<Source> {
        match self {
            Self::Idle => None,
            Self::PlayingMerged => Some(Source::Merged),
            Self::PlayingItem(index) => Some(Source::Item(*index)),
        }
    }

    pub fn is_active(&self, source: Source) -> bool {
        self.active() == Some(source)
    }
}

/// What a front-end needs to render the transcript list.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct HighlightView {
    pub highlighted: Option<usize>,
    /// Fraction of the highlighted line already played.
    pub progress: Option<f64>,
    pub active: Option<Source>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_source() {
        assert_eq!(PlaybackState::Idle.active(), None);
        assert_eq!(PlaybackState::PlayingMerged.active(), Some(Source::Merged));
        assert!(PlaybackState::PlayingItem(2).is_active(Source::Item(2)));
        assert!(!PlaybackState::PlayingItem(2).is_active(Source::Item(1)));
    }
}
