//! Shared constants and small value types used across the engine.

mod constants;
mod direction;

pub use constants::*;
pub use direction::*;
