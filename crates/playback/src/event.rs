use std::time::Duration;

use crate::Source;

/// How long a finished line stays highlighted before it is cleared.
pub const HIGHLIGHT_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PlayMerged,
    PlayItem(usize),
    Pause,
    /// Playback clock tick. `duration` is the source's own length when known.
    TimeUpdate {
        source: Source,
        time: f64,
        duration: f64,
    },
    Ended(Source),
    PlayRejected {
        source: Source,
        message: String,
    },
    HighlightGrace {
        index: usize,
        generation: u64,
    },
    /// Fresh per-line duration estimates, one per line.
    EstimatesUpdated(Vec<f64>),
    /// Length of the merged track once its metadata has loaded.
    MergedLoaded {
        duration: f64,
    },
}

/// Side effects requested by the controller, to be applied in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Pause(Source),
    Play(Source),
    ScrollIntoView(usize),
    ScheduleHighlightClear {
        index: usize,
        generation: u64,
        after: Duration,
    },
    Notify {
        source: Source,
        message: String,
    },
}
