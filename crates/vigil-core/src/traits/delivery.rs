use async_trait::async_trait;

use crate::errors::DeliveryError;
use crate::models::Intervention;

/// The external notification channel. Returning `Ok` is the acknowledgement
/// that moves an intervention to `delivered`.
#[async_trait]
pub trait IDeliveryChannel: Send + Sync {
    async fn dispatch(&self, intervention: &Intervention) -> Result<(), DeliveryError>;
}
