use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::detection::AlertError;
use crate::models::FraudAlert;

pub const DEFAULT_ALERT_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivery channel for fraud alerts. The detector only looks at success or failure.
#[async_trait]
pub trait AlertSink: Send + Sync + 'static {
    async fn dispatch(&self, alert: &FraudAlert) -> Result<(), AlertError>;
}

/// Emits alerts as structured log events.
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn dispatch(&self, alert: &FraudAlert) -> Result<(), AlertError> {
        warn!(
            alert_id = %alert.alert_id,
            transaction_id = %alert.transaction_id,
            account_id = %alert.account_id,
            amount = %alert.amount,
            location = %alert.location,
            triggered_rules = ?alert.triggered_rules,
            model_flagged = alert.model_flagged,
            "ALERT: fraudulent activity detected"
        );

        Ok(())
    }
}
