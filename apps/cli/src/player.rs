use tokio::time::Instant;
use wb_playback::{PlayError, Player};

/// Stand-in audio element driven by the tokio clock.
pub struct ClockPlayer {
    duration: f64,
    speed: f64,
    position: f64,
    started: Option<Instant>,
}

impl ClockPlayer {
    pub fn new(duration: f64, speed: f64) -> Self {
        Self {
            duration,
            speed,
            position: 0.0,
            started: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn current_time(&self) -> f64 {
        let running = self
            .started
            .map(|started| started.elapsed().as_secs_f64() * self.speed)
            .unwrap_or(0.0);
        (self.position + running).min(self.duration)
    }

    pub fn has_ended(&self) -> bool {
        self.current_time() >= self.duration
    }
}

impl Player for ClockPlayer {
    async fn play(&mut self) -> Result<(), PlayError> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(PlayError::Rejected("no playable audio".into()));
        }
        if self.has_ended() {
            self.position = 0.0;
        }
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.position = self.current_time();
        self.started = None;
    }

    fn is_paused(&self) -> bool {
        self.started.is_none()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use approx::assert_relative_eq;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn advances_with_the_clock() {
        let mut player = ClockPlayer::new(4.0, 2.0);
        assert!(player.is_paused());
        player.play().await.unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_relative_eq!(player.current_time(), 2.0);

        player.pause();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_relative_eq!(player.current_time(), 2.0);

        player.play().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(player.has_ended());
        assert_relative_eq!(player.current_time(), 4.0);
    }

    #[tokio::test]
    async fn rejects_empty_audio() {
        let mut player = ClockPlayer::new(0.0, 1.0);
        assert!(matches!(player.play().await, Err(PlayError::Rejected(_))));
        assert!(player.is_paused());
    }
}
