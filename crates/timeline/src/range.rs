/// Half-open `[start, end)` span in seconds within the merged track.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Fraction of the range elapsed at `t`, clamped to `[0, 1]`.
    /// Zero-length ranges report 0.
    pub fn progress_at(&self, t: f64) -> f64 {
        let len = self.len();
        if len <= 0.0 {
            return 0.0;
        }
        ((t - self.start) / len).clamp(0.0, 1.0)
    }
}

/// Active line and how far into it playback is.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct Position {
    pub index: usize,
    pub progress: f64,
}
