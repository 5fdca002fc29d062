/// Input rejected before any state was touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("response for {indicator} out of range: {value} (expected 1-5)")]
    ResponseOutOfRange { indicator: String, value: u8 },

    #[error("unknown indicator: {indicator}")]
    UnknownIndicator { indicator: String },

    #[error("assessment has no responses")]
    EmptyAssessment,

    #[error("signal set has no features")]
    EmptySignalSet,

    #[error("weight for {indicator} must be finite and non-negative, got {weight}")]
    InvalidWeight { indicator: String, weight: f64 },

    #[error("answered indicators carry zero total weight")]
    ZeroTotalWeight,

    #[error("{field} out of range: {value} (expected 0.0-1.0)")]
    AttributeOutOfRange { field: String, value: f64 },

    #[error("window must be at least one day, got {days}")]
    InvalidWindow { days: i64 },

    #[error("score model returned {value}, outside 0.0-1.0")]
    ModelOutOfRange { value: f64 },
}
