// Single source of truth for all default values.

// --- Scoring ---
pub const DEFAULT_INDICATOR_WEIGHT: f64 = 1.0;

// --- Decay ---
pub const DEFAULT_RECOMMENDATION_THRESHOLD: f64 = 0.6;
pub const DEFAULT_CRITICAL_PROBABILITY: f64 = 0.85;
pub const DEFAULT_HORIZON_DAYS: u32 = 365;
pub const DEFAULT_LOGISTIC_INTERCEPT: f64 = -1.0;
pub const DEFAULT_LOGISTIC_DAY_RATE: f64 = 0.03;
pub const DEFAULT_LOGISTIC_STRENGTH_WEIGHT: f64 = 2.0;
pub const DEFAULT_LOGISTIC_EMOTIONAL_WEIGHT: f64 = 1.0;
pub const DEFAULT_LOGISTIC_IMPORTANCE_WEIGHT: f64 = 1.0;
pub const DEFAULT_DECAY_LEAD_SECS: u64 = 21_600; // 6 hours
pub const DEFAULT_RECALL_REINFORCEMENT: f64 = 0.1;

// --- Scheduler ---
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_BASE_SECS: u64 = 60;
pub const DEFAULT_BACKOFF_FACTOR: u32 = 2;
pub const DEFAULT_BACKOFF_CAP_SECS: u64 = 3_600;
pub const DEFAULT_DISPATCH_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_ASSESSMENT_LEAD_SECS: u64 = 3_600;
pub const DEFAULT_CONFIRMATION_WINDOW_SECS: u64 = 172_800; // 48 hours

// --- Trends ---
pub const DEFAULT_TREND_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_NOISE_MARGIN: f64 = 5.0;
pub const DEFAULT_TREND_RETENTION_DAYS: i64 = 365;

// --- Runtime ---
pub const DEFAULT_WORKER_COUNT: usize = 4;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_EVENT_BUFFER: usize = 256;

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "vigil.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
