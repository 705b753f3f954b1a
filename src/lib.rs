//! # swisspair
//!
//! Swiss-style tournament pairing scheduler with minute-resolution
//! availability matching.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, availability bitsets, pairings)
//! - **roster**: Roster validation and rank ordering
//! - **engine**: The greedy pairing engine
//! - **report**: Pairing report model and rendering
//! - **loader**: Roster file tokenizer and parser
//! - **writer**: Updated roster file emission
//! - **config**: Run configuration and validation

pub mod config;
pub mod engine;
pub mod loader;
pub mod models;
pub mod report;
pub mod roster;
pub mod writer;

pub use models::*;
