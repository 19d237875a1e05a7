use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::detection::{AlertError, AlertSink, DetectionError, FeatureExtractor, RiskModel, RiskSignal, RuleEngine, SignalError, DEFAULT_ALERT_TIMEOUT};
use crate::models::{FraudAlert, History, Transaction, TransactionRequest};
use crate::storage::TransactionStore;
use crate::types::{AccountId, Clock, FraudLabel};

/// Runs one transaction at a time through feature extraction, rules, the risk model,
/// labeling, alerting and persistence, in that order.
///
/// Collaborators are injected so the same detector can front an in-memory store in tests
/// and a real database in production.
pub struct FraudDetector {
    store: Arc<dyn TransactionStore>,
    risk_model: Arc<dyn RiskModel>,
    alerts: Arc<dyn AlertSink>,
    alert_timeout: Duration,
    clock: Arc<dyn Clock>,
    features: FeatureExtractor,
    rules: RuleEngine
}

impl FraudDetector {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        risk_model: Arc<dyn RiskModel>,
        alerts: Arc<dyn AlertSink>,
        clock: Arc<dyn Clock>
    ) -> Self {
        Self {
            store,
            risk_model,
            alerts,
            alert_timeout: DEFAULT_ALERT_TIMEOUT,
            clock,
            features: FeatureExtractor::default(),
            rules: RuleEngine::default()
        }
    }

    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_alert_timeout(mut self, alert_timeout: Duration) -> Self {
        self.alert_timeout = alert_timeout;
        self
    }

    pub fn with_feature_extractor(mut self, features: FeatureExtractor) -> Self {
        self.features = features;
        self
    }

    /// Evaluates, labels and persists a single transaction.
    ///
    /// # Errors
    /// Returns `DetectionError` if:
    /// - The account history cannot be read (never treated as an empty history).
    /// - The labeled transaction cannot be persisted.
    ///
    /// Risk model and alert failures are logged and do not fail the call. Alert delivery is bounded
    /// by the alert timeout so a stalled sink cannot hold back persistence.
    pub async fn screen(&self, request: TransactionRequest) -> Result<Transaction, DetectionError> {
        let now = self.clock.now();
        let mut transaction = Transaction::new(request, now);

        debug!(transaction_id = %transaction.transaction_id, account_id = %transaction.account_id, amount = %transaction.amount, "Transaction received");

        let history = self.store.list_by_account(&transaction.account_id).await
            .map_err(|source| DetectionError::history_unavailable(&transaction.account_id, source))?;

        let derived = self.features.extract(&transaction, &history, now);
        transaction.elapsed_time = derived.elapsed_time;
        transaction.frequency = derived.frequency;

        let previous_location = history.most_recent_prior(&transaction)
            .map(|prior| prior.location.as_str())
            .unwrap_or("");
        let verdict = self.rules.inspect(
            &transaction,
            history.transactions(),
            history.order(),
            previous_location,
            &transaction.location
        );

        let signal = self.query_risk_model(&transaction, now).await;
        let is_fraud = verdict.is_suspicious() || signal.is_fraud();

        if is_fraud {
            transaction.fraud_label = FraudLabel::Fraud;

            warn!(
                transaction_id = %transaction.transaction_id,
                account_id = %transaction.account_id,
                amount = %transaction.amount,
                triggered_rules = ?verdict.triggered(),
                model_flagged = signal.is_fraud(),
                "Transaction marked as fraudulent"
            );

            let alert = FraudAlert::new(&transaction, now)
                .with_triggered_rules(verdict.triggered())
                .with_model_flag(signal.is_fraud());

            if let Err(alert_error) = self.dispatch_alert(&alert).await {
                error!(transaction_id = %transaction.transaction_id, error = %alert_error, "Failed to dispatch fraud alert");
            }
        } else {
            transaction.fraud_label = FraudLabel::Legit;
        }

        self.store.insert(&transaction).await
            .map_err(|source| DetectionError::persist_failed(&transaction, source))?;

        debug!(
            transaction_id = %transaction.transaction_id,
            account_id = %transaction.account_id,
            fraud_label = transaction.fraud_label.as_flag(),
            "Transaction saved"
        );

        Ok(transaction)
    }

    pub async fn history(&self, account_id: &AccountId) -> Result<History, DetectionError> {
        self.store.list_by_account(account_id).await
            .map_err(|source| DetectionError::history_unavailable(account_id, source))
    }

    pub async fn transactions(&self) -> Result<History, DetectionError> {
        self.store.list_all().await.map_err(DetectionError::listing_unavailable)
    }

    async fn query_risk_model(&self, transaction: &Transaction, now: DateTime<Utc>) -> RiskSignal {
        let features = self.features.model_features(transaction, now);
        let prediction = self.risk_model.predict(&features).await;

        match &prediction {
            Err(SignalError::Disabled) => {}
            Err(signal_error) => {
                warn!(transaction_id = %transaction.transaction_id, error = %signal_error, "Risk model unavailable, continuing with rule verdict");
            }
            Ok(_) => {}
        }

        RiskSignal::from(&prediction)
    }

    async fn dispatch_alert(&self, alert: &FraudAlert) -> Result<(), AlertError> {
        timeout(self.alert_timeout, self.alerts.dispatch(alert)).await
            .map_err(|_| AlertError::TimedOut(self.alert_timeout))?
    }
}
