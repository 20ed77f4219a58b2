//! Command implementations for the `discen` binary
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod inspect;
mod simulate;
mod train;

pub use inspect::Inspect;
pub use simulate::Simulate;
pub use train::Train;
