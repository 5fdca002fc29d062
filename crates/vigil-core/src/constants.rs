/// Vigil system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lowest accepted questionnaire response.
pub const MIN_RESPONSE: u8 = 1;

/// Highest accepted questionnaire response.
pub const MAX_RESPONSE: u8 = 5;

/// Composite score at or above which a result is `critical`.
pub const CRITICAL_THRESHOLD: f64 = 70.0;

/// Composite score at or above which a result is `high`.
pub const HIGH_THRESHOLD: f64 = 50.0;

/// Composite score at or above which a result is `moderate`.
pub const MODERATE_THRESHOLD: f64 = 30.0;

/// Sub-score at or above which an indicator counts as elevated.
pub const ELEVATED_INDICATOR_SCORE: f64 = 75.0;

/// Maximum number of anchor memories attached to an intervention.
pub const MAX_INTERVENTION_ANCHORS: usize = 3;

/// Days-until-critical at or below which a decay intervention is scheduled immediately.
pub const IMMEDIATE_HORIZON_DAYS: u32 = 7;

/// Projection offsets (days) reported on every decay prediction.
pub const DECAY_PROJECTION_DAYS: [u32; 3] = [30, 90, 180];

/// Upper bound on any configured delay or window in seconds (ten years).
pub const MAX_CONFIG_SPAN_SECS: u64 = 315_360_000;

/// Upper bound on any configured window or horizon in days (ten years).
pub const MAX_CONFIG_SPAN_DAYS: i64 = 3_650;
