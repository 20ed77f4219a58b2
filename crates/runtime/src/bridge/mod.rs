//! Callback contract between the context and its host.
//!
//! The host registers observers on the context builder: a [`MessageSink`]
//! for framework messages, a [`SceneSync`] for the scene side of transform
//! synchronization and a [`SimulationListener`] for playback events. All of
//! them are invoked synchronously from the call that triggers them, and every
//! emission reports whether a listener received it ([`Delivery`]).

mod message;
mod registry;
mod scene;
mod simulation;

pub use message::{DisplayMessage, LogLevel, MessageSink, TracingSink};
pub use registry::{Delivery, ListenerRegistry};
pub use scene::{MirrorScene, SceneSync};
pub use simulation::{SimulationEvent, SimulationListener};
