//! Core data models for the pairing scheduler.

mod pairing;
mod player;
mod timeset;

pub use pairing::*;
pub use player::*;
pub use timeset::*;
