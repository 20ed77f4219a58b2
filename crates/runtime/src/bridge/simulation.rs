//! Simulation lifecycle notifications.

#[derive(Clone, Copy, Debug, PartialEq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SimulationEvent {
    Loaded,
    Updated,
    Play,
    Pause,
    Stop,
    /// Progress in `[0, 1]` after the change.
    TimeChanged(f32),
}

pub trait SimulationListener: Send + Sync {
    fn on_event(&self, event: SimulationEvent);
}
