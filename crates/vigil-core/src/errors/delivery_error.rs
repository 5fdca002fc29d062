/// Failures reported by (or about) the external delivery channel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeliveryError {
    #[error("channel rejected dispatch: {reason}")]
    Rejected { reason: String },

    #[error("channel unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("dispatch timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
}
