//! # vigil-trends
//!
//! Per-subject score timelines. Summaries are computed on every read from the
//! points inside the requested window; nothing derived is cached.

pub mod direction;
pub mod tracker;

pub use direction::direction_by_thirds;
pub use tracker::TrendTracker;
