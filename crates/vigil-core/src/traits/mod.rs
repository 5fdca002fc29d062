mod decay_strategy;
mod delivery;
mod score_model;
mod storage;

pub use decay_strategy::IDecayStrategy;
pub use delivery::IDeliveryChannel;
pub use score_model::IScoreModel;
pub use storage::{IVigilStorage, ScoreCommit};
