use wb_timeline::Timeline;

use crate::{Effect, Event, HIGHLIGHT_GRACE, HighlightView, PlaybackState, Source};

/// Pure transition function for playback and highlighting.
///
/// Owns the mutual exclusion between the merged track and line players. It
/// never touches audio itself; every side effect comes back as an [`Effect`].
#[derive(Debug, Clone)]
pub struct Controller {
    state: PlaybackState,
    highlighted: Option<usize>,
    progress: Option<f64>,
    /// Bumped whenever something takes over the highlight, so stale grace
    /// timers can tell they lost.
    generation: u64,
    estimates: Vec<f64>,
    total: f64,
    timeline: Timeline,
}

impl Controller {
    /// `estimates` holds one clip length per line; `total` is the merged
    /// track length or `0` when not yet known.
    pub fn new(estimates: Vec<f64>, total: f64) -> Self {
        let timeline = Timeline::reconstruct(total, &estimates);
        Self {
            state: PlaybackState::Idle,
            highlighted: None,
            progress: None,
            generation: 0,
            estimates,
            total,
            timeline,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn item_count(&self) -> usize {
        self.estimates.len()
    }

    pub fn view(&self) -> HighlightView {
        HighlightView {
            highlighted: self.highlighted,
            progress: self.progress,
            active: self.state.active(),
        }
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::PlayMerged => self.play_merged(),
            Event::PlayItem(index) => self.play_item(index),
            Event::Pause => self.pause(),
            Event::TimeUpdate {
                source,
                time,
                duration,
            } => self.time_update(source, time, duration),
            Event::Ended(source) => self.ended(source),
            Event::PlayRejected { source, message } => self.rejected(source, message),
            Event::HighlightGrace { index, generation } => {
                self.grace_elapsed(index, generation);
                Vec::new()
            }
            Event::EstimatesUpdated(estimates) => {
                self.estimates = estimates;
                self.rebuild()
            }
            Event::MergedLoaded { duration } => self.set_total(duration),
        }
    }

    fn play_merged(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.state {
            PlaybackState::PlayingMerged => return effects,
            PlaybackState::PlayingItem(index) => effects.push(Effect::Pause(Source::Item(index))),
            PlaybackState::Idle => {}
        }

        self.state = PlaybackState::PlayingMerged;
        self.take_over(None);
        effects.push(Effect::Play(Source::Merged));
        effects
    }

    fn play_item(&mut self, index: usize) -> Vec<Effect> {
        if index >= self.item_count() {
            tracing::debug!(index, count = self.item_count(), "play_item_out_of_range");
            return Vec::new();
        }

        let mut effects = Vec::new();
        match self.state {
            PlaybackState::PlayingItem(current) if current == index => return effects,
            PlaybackState::PlayingItem(current) => {
                effects.push(Effect::Pause(Source::Item(current)))
            }
            PlaybackState::PlayingMerged => effects.push(Effect::Pause(Source::Merged)),
            PlaybackState::Idle => {}
        }

        self.state = PlaybackState::PlayingItem(index);
        self.take_over(Some(index));
        self.progress = Some(0.0);
        effects.push(Effect::Play(Source::Item(index)));
        effects
    }

    fn pause(&mut self) -> Vec<Effect> {
        match self.state.active() {
            Some(source) => {
                self.state = PlaybackState::Idle;
                vec![Effect::Pause(source)]
            }
            None => Vec::new(),
        }
    }

    fn time_update(&mut self, source: Source, time: f64, duration: f64) -> Vec<Effect> {
        if !self.state.is_active(source) {
            return Vec::new();
        }

        match source {
            Source::Merged => {
                if duration.is_finite() && duration > 0.0 && duration != self.total {
                    self.total = duration;
                    self.timeline = Timeline::reconstruct(self.total, &self.estimates);
                }

                let Some(position) = self.timeline.locate(time) else {
                    return Vec::new();
                };
                self.progress = Some(position.progress);

                if self.highlighted == Some(position.index) {
                    return Vec::new();
                }
                self.take_over(Some(position.index));
                vec![Effect::ScrollIntoView(position.index)]
            }
            Source::Item(_) => {
                if duration.is_finite() && duration > 0.0 {
                    self.progress = Some((time / duration).clamp(0.0, 1.0));
                }
                Vec::new()
            }
        }
    }

    fn ended(&mut self, source: Source) -> Vec<Effect> {
        if !self.state.is_active(source) {
            return Vec::new();
        }

        self.state = PlaybackState::Idle;
        self.progress = None;

        match source {
            Source::Merged => {
                self.take_over(None);
                Vec::new()
            }
            Source::Item(index) => vec![Effect::ScheduleHighlightClear {
                index,
                generation: self.generation,
                after: HIGHLIGHT_GRACE,
            }],
        }
    }

    fn rejected(&mut self, source: Source, message: String) -> Vec<Effect> {
        if self.state.is_active(source) {
            self.state = PlaybackState::Idle;
            self.progress = None;
            self.take_over(None);
        }
        vec![Effect::Notify { source, message }]
    }

    fn grace_elapsed(&mut self, index: usize, generation: u64) {
        if generation == self.generation && self.highlighted == Some(index) {
            self.highlighted = None;
        }
    }

    fn take_over(&mut self, highlighted: Option<usize>) {
        self.highlighted = highlighted;
        self.generation += 1;
    }

    fn set_total(&mut self, total: f64) -> Vec<Effect> {
        self.total = total;
        self.rebuild()
    }

    /// Rebuilds the timeline and stops a line player whose line is gone.
    fn rebuild(&mut self) -> Vec<Effect> {
        self.timeline = Timeline::reconstruct(self.total, &self.estimates);
        let count = self.estimates.len();

        if let PlaybackState::PlayingItem(index) = self.state
            && index >= count
        {
            self.state = PlaybackState::Idle;
            self.progress = None;
            self.take_over(None);
            return vec![Effect::Pause(Source::Item(index))];
        }

        if let Some(index) = self.highlighted
            && index >= count
        {
            self.take_over(None);
            self.progress = None;
        }
        Vec::new()
    }
}
