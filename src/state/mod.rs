//! State management module.
//!
//! A `GameSession` wraps the combo engine and derives everything the player
//! sees from it: levels, milestones, feedback, rank and game over.

pub mod session;
