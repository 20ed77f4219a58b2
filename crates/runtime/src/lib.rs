//! Host-facing runtime of the scenario framework.
//!
//! This crate wires the pure stores of `discen-core` to files and to a host
//! application:
//! - [`context`] owns the authoritative scenario, its lifecycle, the scene
//!   synchronization protocol and simulation playback
//! - [`session`] binds the experience engine to digital-system files and
//!   experience documents
//! - [`bridge`] defines the observer interfaces the host registers
//! - [`repository`] persists versioned JSON documents
pub mod api;
pub mod bridge;
pub mod config;
pub mod context;
pub mod repository;
pub mod session;
pub mod simulation;

pub use api::{Result, RuntimeError};
pub use bridge::{
    Delivery, DisplayMessage, ListenerRegistry, LogLevel, MessageSink, MirrorScene, SceneSync,
    SimulationEvent, SimulationListener, TracingSink,
};
pub use config::RuntimeConfig;
pub use context::{ContextBuilder, LifecycleState, ScenarioContext};
pub use repository::{
    DOCUMENT_VERSION, DocumentRepository, ExperienceDocument, FileRepository, InMemoryRepository,
    RepositoryError, ScenarioDocument, SimulationDocument,
};
pub use session::ExperienceSession;
pub use simulation::SimulationPlayer;
