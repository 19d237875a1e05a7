use std::sync::Arc;

use tokio::spawn;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::actors::ScreeningStats;
use crate::detection::FraudDetector;
use crate::models::TransactionRequest;
use crate::types::AccountId;

/// Serial worker for one account.
///
/// Requests for the same account are screened strictly one after another, so each one sees the
/// previous one already persisted. Dropping every handle closes the queue; the worker drains what
/// is left and then releases its guard.
#[derive(Clone)]
pub struct AccountActor {
    sender: mpsc::UnboundedSender<TransactionRequest>
}

impl AccountActor {
    /// Spawns a new actor and returns its handle.
    pub fn spawn(
        account_id: AccountId,
        detector: Arc<FraudDetector>,
        stats: Arc<ScreeningStats>,
        guard_sender: mpsc::Sender<()>
    ) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<TransactionRequest>();

        spawn(async move {
            while let Some(request) = receiver.recv().await {
                match detector.screen(request).await {
                    Ok(transaction) => {
                        debug!("Transaction [{}] for account [{}] screened with label [{}]", transaction.transaction_id, account_id, transaction.fraud_label.as_flag());
                        stats.record_screened(transaction.is_fraud());
                    },
                    Err(detection_error) => {
                        //NOTE: The request is not considered processed; a consumer backed by a broker would leave it uncommitted here
                        error!("{detection_error}");
                        stats.record_error(detection_error.class());
                    }
                }
            }

            drop(guard_sender);
        });

        Self { sender }
    }

    /// Queues a request. Returns `false` if the actor has already shut down.
    pub fn accept(&self, request: TransactionRequest) -> bool {
        self.sender.send(request).is_ok()
    }
}
