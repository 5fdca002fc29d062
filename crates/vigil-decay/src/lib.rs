//! # vigil-decay
//!
//! Decay probability for memory entities through an injectable strategy.
//! Default strategy: logistic blend of days since last recall against
//! strength, emotional weight, and importance.
//! Days-until-critical inverts the same function by search.

pub mod horizon;
pub mod predictor;
pub mod strategy;

pub use predictor::DecayPredictor;
pub use strategy::LogisticBlend;
