//! # vigil-scoring
//!
//! Turns questionnaire answers or raw clinical signals into a composite
//! score, classifies it into a risk tier, and attaches care recommendations.
//! Everything here is pure: no locks, no I/O.

pub mod aggregator;
pub mod classifier;
pub mod indicators;
pub mod model;
pub mod recommendations;
pub mod weights;

pub use aggregator::ScoreAggregator;
pub use classifier::{classify, urgency_for};
pub use indicators::{Indicator, IndicatorCatalog, Polarity};
pub use model::WeightedMeanModel;
pub use weights::WeightTable;
