//! Experience / goal engine.
//!
//! A [`DigitalSystem`] describes entity types, entities and action rules.
//! [`XpEngine`] runs actions of that system against named goals, detects
//! revisited states and records the outcome of every action into the
//! current goal's [`Experience`].
mod action;
mod condition;
mod config;
mod engine;
mod error;
mod experience;
mod result;
mod rule;
mod state;
mod system;

pub use action::ActionData;
pub use condition::{EntityCondition, all_hold};
pub use config::XpConfig;
pub use engine::XpEngine;
pub use error::XpError;
pub use experience::{Experience, Goal, Transition};
pub use result::ActionResult;
pub use rule::{ActionRule, Effect, ParameterKind, ParameterSpec, Precondition};
pub use state::{StateKey, SystemState};
pub use system::{DigitalSystem, EntityTypeSchema, SystemEntity};
