use std::collections::VecDeque;
use std::future::Future;

use tokio::sync::mpsc;

use crate::{Controller, Effect, Event, HighlightView, PlayError, Source};

/// One audio output the driver can start and stop.
pub trait Player: Send {
    fn play(&mut self) -> impl Future<Output = Result<(), PlayError>> + Send;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
}

/// Effects a front-end renders rather than the players.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    ScrollIntoView(usize),
    Notify { source: Source, message: String },
}

/// Applies [`Controller`] effects to a merged player and one player per line.
pub struct PlaybackDriver<P> {
    controller: Controller,
    merged: P,
    items: Vec<P>,
    timers_tx: mpsc::UnboundedSender<Event>,
    timers_rx: mpsc::UnboundedReceiver<Event>,
    ui: Vec<UiUpdate>,
}

impl<P: Player> PlaybackDriver<P> {
    pub fn new(controller: Controller, merged: P, items: Vec<P>) -> Self {
        let (timers_tx, timers_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            merged,
            items,
            timers_tx,
            timers_rx,
            ui: Vec::new(),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn view(&self) -> HighlightView {
        self.controller.view()
    }

    pub fn merged(&self) -> &P {
        &self.merged
    }

    pub fn item(&self, index: usize) -> Option<&P> {
        self.items.get(index)
    }

    pub fn player(&self, source: Source) -> Option<&P> {
        match source {
            Source::Merged => Some(&self.merged),
            Source::Item(index) => self.items.get(index),
        }
    }

    /// Feeds `event` through the controller and applies every resulting
    /// effect in order. Play failures are fed back as [`Event::PlayRejected`].
    pub async fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            for effect in self.controller.handle(event) {
                match effect {
                    Effect::Pause(source) => {
                        if let Some(player) = self.player_mut(source) {
                            player.pause();
                        }
                    }
                    Effect::Play(source) => {
                        let result = match self.player_mut(source) {
                            Some(player) => player.play().await,
                            None => Err(PlayError::Unavailable),
                        };
                        if let Err(error) = result {
                            queue.push_back(Event::PlayRejected {
                                source,
                                message: error.to_string(),
                            });
                        }
                    }
                    Effect::ScrollIntoView(index) => {
                        self.ui.push(UiUpdate::ScrollIntoView(index));
                    }
                    Effect::ScheduleHighlightClear {
                        index,
                        generation,
                        after,
                    } => {
                        let tx = self.timers_tx.clone();
                        tokio::spawn(async move {
                            tokio::time::sleep(after).await;
                            let _ = tx.send(Event::HighlightGrace { index, generation });
                        });
                    }
                    Effect::Notify { source, message } => {
                        tracing::warn!(?source, %message, "playback_failed");
                        self.ui.push(UiUpdate::Notify { source, message });
                    }
                }
            }
        }
    }

    /// Waits for the next grace timer and dispatches it.
    pub async fn fire_next_timer(&mut self) {
        if let Some(event) = self.timers_rx.recv().await {
            self.dispatch(event).await;
        }
    }

    pub fn take_ui_updates(&mut self) -> Vec<UiUpdate> {
        std::mem::take(&mut self.ui)
    }

    fn player_mut(&mut self, source: Source) -> Option<&mut P> {
        match source {
            Source::Merged => Some(&mut self.merged),
            Source::Item(index) => self.items.get_mut(index),
        }
    }
}
