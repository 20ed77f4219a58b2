//! Simulation timelines and the playback clock.
//!
//! A [`Timeline`] holds keyframed transforms per element. The
//! [`PlaybackClock`] tracks the play head; sampling the timeline at the play
//! head yields the lerp directives a scene applies.
mod clock;
mod error;
mod timeline;

pub use clock::{PlaybackClock, PlaybackState};
pub use error::TimelineError;
pub use timeline::{Keyframe, Timeline, TrackSample};
