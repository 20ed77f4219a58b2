//! Playback of a simulation timeline.

use chrono::{NaiveDateTime, TimeDelta};

use discen_core::{PlaybackClock, PlaybackState, Timeline, TimelineError, TrackSample};

use crate::repository::SimulationDocument;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A loaded timeline and its play head.
#[derive(Clone, Debug)]
pub struct SimulationPlayer {
    timeline: Timeline,
    clock: PlaybackClock,
    start_time: Option<NaiveDateTime>,
}

impl SimulationPlayer {
    pub fn new(timeline: Timeline, start_time: Option<NaiveDateTime>) -> Self {
        let clock = PlaybackClock::new(timeline.duration);
        Self {
            timeline,
            clock,
            start_time,
        }
    }

    pub fn from_document(document: SimulationDocument) -> Result<Self, TimelineError> {
        let timeline = document.timeline.normalized()?;
        Ok(Self::new(timeline, document.start_time))
    }

    pub fn to_document(&self) -> SimulationDocument {
        SimulationDocument::new(self.timeline.clone(), self.start_time)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    pub fn state(&self) -> PlaybackState {
        self.clock.state()
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn is_started(&self) -> bool {
        self.clock.is_started()
    }

    pub fn progress(&self) -> f32 {
        self.clock.progress()
    }

    pub fn play(&mut self) {
        self.clock.play();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn advance(&mut self, dt: f32) -> bool {
        self.clock.advance(dt)
    }

    pub fn set_progress(&mut self, progress: f32) -> Result<(), TimelineError> {
        self.clock.set_progress(progress)
    }

    /// Bracketing keyframes of every tracked element at the play head.
    pub fn samples(&self) -> impl Iterator<Item = (&str, TrackSample<'_>)> {
        let time = self.clock.elapsed();
        self.timeline
            .elements()
            .filter_map(move |element| Some((element, self.timeline.sample(element, time)?)))
    }

    /// Start time plus elapsed playback, formatted as `%Y-%m-%d %H:%M:%S`.
    pub fn datetime_string(&self) -> Option<String> {
        let start = self.start_time?;
        let millis = (f64::from(self.clock.elapsed()) * 1000.0).round() as i64;
        let now = start.checked_add_signed(TimeDelta::try_milliseconds(millis)?)?;
        Some(now.format(DATETIME_FORMAT).to_string())
    }
}
