use super::TimelineError;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Play head over a timeline of fixed duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackClock {
    state: PlaybackState,
    elapsed: f32,
    duration: f32,
}

impl PlaybackClock {
    pub fn new(duration: f32) -> Self {
        Self {
            state: PlaybackState::Stopped,
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_started(&self) -> bool {
        self.state != PlaybackState::Stopped
    }

    /// Fraction of the duration elapsed, within `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Starts or resumes. Playing from the end restarts at zero.
    pub fn play(&mut self) {
        if self.state == PlaybackState::Stopped && self.elapsed >= self.duration {
            self.elapsed = 0.0;
        }
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stops and rewinds to the start.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.elapsed = 0.0;
    }

    /// Advances the play head by `dt` seconds while playing.
    ///
    /// Returns whether time moved. Reaching the end stops playback with the
    /// play head left at the end.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.state != PlaybackState::Playing || !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.elapsed >= self.duration {
            self.state = PlaybackState::Stopped;
        }
        true
    }

    pub fn set_progress(&mut self, progress: f32) -> Result<(), TimelineError> {
        if !(0.0..=1.0).contains(&progress) {
            return Err(TimelineError::InvalidProgress { progress });
        }
        self.elapsed = self.duration * progress;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_only_while_playing() {
        let mut clock = PlaybackClock::new(4.0);
        assert!(!clock.advance(1.0));

        clock.play();
        assert!(clock.advance(1.0));
        assert_eq!(clock.progress(), 0.25);

        clock.pause();
        assert!(!clock.advance(1.0));
        assert_eq!(clock.state(), PlaybackState::Paused);

        clock.play();
        assert!(clock.advance(10.0));
        assert_eq!(clock.elapsed(), 4.0);
        assert_eq!(clock.state(), PlaybackState::Stopped);

        clock.play();
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn progress_is_validated() {
        let mut clock = PlaybackClock::new(2.0);
        clock.set_progress(0.5).unwrap();
        assert_eq!(clock.elapsed(), 1.0);
        assert!(clock.set_progress(1.5).is_err());
        assert!(clock.set_progress(f32::NAN).is_err());
        assert_eq!(clock.elapsed(), 1.0);
    }
}
