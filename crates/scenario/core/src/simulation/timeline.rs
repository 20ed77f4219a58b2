use std::collections::BTreeMap;

use super::TimelineError;
use crate::geometry::LocalTransformData;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyframe {
    /// Seconds from the start of the timeline.
    pub time: f32,
    pub transform: LocalTransformData,
}

/// Keyframes bracketing a point in time and the blend factor between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackSample<'a> {
    pub from: &'a LocalTransformData,
    pub to: &'a LocalTransformData,
    pub trim: f32,
}

/// Keyframed element transforms over a fixed duration.
///
/// Consecutive keyframes of a track may have different parents; playback
/// hands the element over with [`LocalTransformData::lerp_handoff`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeline {
    /// Length in seconds.
    pub duration: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tracks: BTreeMap<String, Vec<Keyframe>>,
}

impl Timeline {
    pub fn new(duration: f32) -> Result<Self, TimelineError> {
        check_duration(duration)?;
        Ok(Self {
            duration,
            tracks: BTreeMap::new(),
        })
    }

    /// Inserts a keyframe, keeping the track ordered by time. A keyframe at
    /// an existing time replaces it.
    pub fn add_keyframe(
        &mut self,
        element: &str,
        time: f32,
        transform: LocalTransformData,
    ) -> Result<(), TimelineError> {
        check_keyframe(element, time, &transform, self.duration)?;
        let track = self.tracks.entry(element.to_owned()).or_default();
        match track.binary_search_by(|frame| frame.time.total_cmp(&time)) {
            Ok(index) => track[index].transform = transform,
            Err(index) => track.insert(index, Keyframe { time, transform }),
        }
        Ok(())
    }

    /// Checks duration, keyframe ranges and transforms, and sorts every track.
    /// Of keyframes sharing a time the last one listed wins, as with
    /// [`Self::add_keyframe`]. Used after deserializing a timeline from disk.
    pub fn normalized(mut self) -> Result<Self, TimelineError> {
        check_duration(self.duration)?;
        for (element, track) in &mut self.tracks {
            for frame in track.iter() {
                check_keyframe(element, frame.time, &frame.transform, self.duration)?;
            }
            track.sort_by(|a, b| a.time.total_cmp(&b.time));
            track.dedup_by(|later, earlier| {
                if later.time == earlier.time {
                    std::mem::swap(later, earlier);
                    true
                } else {
                    false
                }
            });
        }
        self.tracks.retain(|_, track| !track.is_empty());
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    /// Bracketing keyframes of `element` at `time`.
    ///
    /// Before the first keyframe the first one is held (`trim = 0`); from the
    /// last keyframe on the last one is held (`trim = 1`).
    pub fn sample(&self, element: &str, time: f32) -> Option<TrackSample<'_>> {
        let track = self.tracks.get(element)?;
        let first = track.first()?;
        let last = track.last()?;

        if time <= first.time {
            return Some(TrackSample {
                from: &first.transform,
                to: &first.transform,
                trim: if track.len() == 1 { 1.0 } else { 0.0 },
            });
        }
        if time >= last.time {
            return Some(TrackSample {
                from: &last.transform,
                to: &last.transform,
                trim: 1.0,
            });
        }

        let next = track.partition_point(|frame| frame.time <= time);
        let (a, b) = (&track[next - 1], &track[next]);
        let span = b.time - a.time;
        Some(TrackSample {
            from: &a.transform,
            to: &b.transform,
            trim: ((time - a.time) / span).clamp(0.0, 1.0),
        })
    }
}

fn check_duration(duration: f32) -> Result<(), TimelineError> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(TimelineError::InvalidDuration { duration })
    }
}

fn check_keyframe(
    element: &str,
    time: f32,
    transform: &LocalTransformData,
    duration: f32,
) -> Result<(), TimelineError> {
    if element.is_empty() {
        return Err(TimelineError::EmptyElementId);
    }
    if !(0.0..=duration).contains(&time) {
        return Err(TimelineError::KeyframeOutOfRange {
            element: element.to_owned(),
            time,
            duration,
        });
    }
    if !transform.is_finite() {
        return Err(TimelineError::NonFiniteTransform {
            element: element.to_owned(),
            time,
        });
    }
    Ok(())
}
