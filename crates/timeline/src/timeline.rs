use crate::range::{Position, TimeRange};

/// Silence assumed between clips when the merged length is unknown.
pub const DEFAULT_GAP_SECS: f64 = 0.5;

/// Reconstructed layout of every line inside the merged track.
///
/// Pure function of `(total, estimates)`: rebuild it whenever either changes
/// instead of patching it.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct Timeline {
    ranges: Vec<TimeRange>,
    gap: f64,
    scale: f64,
}

impl Timeline {
    /// `total` is the merged track length in seconds, `0` when not yet known.
    /// `estimates` holds one clip length per line, in order.
    ///
    /// With `n > 1` lines and a known total, the gap is whatever is left after
    /// the clips, spread evenly; otherwise [`DEFAULT_GAP_SECS`]. Clips and
    /// gaps are then scaled together so the layout spans exactly `[0, total]`.
    /// Without a total the raw estimates are laid out unscaled.
    ///
    /// The gap is assumed uniform. If synthesis inserts variable silence the
    /// layout drifts on long tracks; only per-line offsets from the backend
    /// would correct that.
    pub fn reconstruct(total: f64, estimates: &[f64]) -> Self {
        let total = non_negative(total);
        let n = estimates.len();
        let durations = estimates.iter().map(|&d| non_negative(d));

        let items_total: f64 = durations.clone().sum();
        let gap = if total > 0.0 && n > 1 {
            ((total - items_total) / (n - 1) as f64).max(0.0)
        } else {
            DEFAULT_GAP_SECS
        };

        let base_total = items_total + gap * n.saturating_sub(1) as f64;
        let scale = if total > 0.0 && base_total > 0.0 {
            total / base_total
        } else {
            1.0
        };

        let mut cursor = 0.0;
        let ranges = durations
            .enumerate()
            .map(|(i, d)| {
                let start = cursor;
                let end = start + d * scale;
                cursor = end;
                if i + 1 < n {
                    cursor += gap * scale;
                }
                TimeRange { start, end }
            })
            .collect();

        Self { ranges, gap, scale }
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    pub fn range(&self, index: usize) -> Option<TimeRange> {
        self.ranges.get(index).copied()
    }

    /// Unscaled inter-clip gap used for the layout.
    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Gap as it appears on the merged track.
    pub fn scaled_gap(&self) -> f64 {
        self.gap * self.scale
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// End of the last range, `0` when empty.
    pub fn end(&self) -> f64 {
        self.ranges.last().map_or(0.0, |r| r.end)
    }

    /// Maps a playback timestamp to the line being spoken.
    ///
    /// Inside a range: that line, with its progress. In the silence after a
    /// line: that line, fully spoken. Before the first range: line 0 at 0.
    /// At or past the final end: the last line at 1. `None` only when empty.
    pub fn locate(&self, t: f64) -> Option<Position> {
        let last = self.ranges.len().checked_sub(1)?;
        let t = if t.is_nan() { 0.0 } else { t };

        if t >= self.ranges[last].end {
            return Some(Position {
                index: last,
                progress: 1.0,
            });
        }

        let index = self
            .ranges
            .partition_point(|r| r.start <= t)
            .saturating_sub(1);
        let range = self.ranges[index];

        let progress = if t >= range.end {
            1.0
        } else {
            range.progress_at(t)
        };

        Some(Position { index, progress })
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
