//! Core data models for play-by-play scouting.

mod game;
mod play;
mod stats;

pub use game::*;
pub use play::*;
pub use stats::*;
