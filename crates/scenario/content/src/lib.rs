//! Data-driven scenario content and loaders.
//!
//! This crate reads the data files a scenario project ships with:
//! - Digital system descriptions (RON or JSON)
//! - Simulation timelines (RON or JSON)
//! - Experience engine configuration (TOML)
//!
//! All loaders use discen-core types directly with serde for deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, DataFormat, LoadResult, SimulationLoader, SystemLoader,
};
