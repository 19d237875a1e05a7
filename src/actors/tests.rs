use super::{AccountActor, ScreeningReport, ScreeningStats};

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::detection::{DetectionError, DisabledRiskModel, FraudDetector, LogAlertSink};
use crate::models::{InputError, TransactionRequest};
use crate::storage::{MemoryStore, StoreError, TransactionStore};
use crate::types::{FraudLabel, SystemClock};

fn create_request(account_id: &str, amount: &str, location: &str) -> Result<TransactionRequest> {
    Ok(TransactionRequest::new(Decimal::from_str(amount)?, account_id, location))
}

fn create_detector(store: Arc<MemoryStore>) -> Arc<FraudDetector> {
    Arc::new(FraudDetector::new(store, Arc::new(DisabledRiskModel), Arc::new(LogAlertSink), Arc::new(SystemClock::new())))
}

#[tokio::test]
async fn test_actor_isolation_and_storage_persistence() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let detector = create_detector(store.clone());
    let stats = Arc::new(ScreeningStats::default());
    let (guard_sender, mut guard_receiver) = mpsc::channel::<()>(1);

    let actor_account_1 = AccountActor::spawn("1".to_string(), detector.clone(), stats.clone(), guard_sender.clone());
    let actor_account_2 = AccountActor::spawn("2".to_string(), detector.clone(), stats.clone(), guard_sender.clone());

    assert!(actor_account_1.accept(create_request("1", "100.0", "Lisbon")?));
    assert!(actor_account_2.accept(create_request("2", "200.0", "Porto")?));
    assert!(actor_account_1.accept(create_request("1", "50.0", "Lisbon")?));

    drop(actor_account_1);
    drop(actor_account_2);
    drop(guard_sender);
    let _ = guard_receiver.recv().await;

    assert_eq!(store.list_by_account(&"1".to_string()).await?.len(), 2);
    assert_eq!(store.list_by_account(&"2".to_string()).await?.len(), 1);
    assert_eq!(stats.report(), ScreeningReport { screened: 3, flagged: 1, rejected: 0, failed: 0 });

    Ok(())
}

#[tokio::test]
async fn test_actor_screens_its_queue_in_order() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let stats = Arc::new(ScreeningStats::default());
    let (guard_sender, mut guard_receiver) = mpsc::channel::<()>(1);

    let actor = AccountActor::spawn("1".to_string(), create_detector(store.clone()), stats, guard_sender);

    for amount in ["1.0", "2.0", "3.0"] {
        actor.accept(create_request("1", amount, "")?);
    }

    drop(actor);
    let _ = guard_receiver.recv().await;

    let history = store.list_by_account(&"1".to_string()).await?;
    let amounts: Vec<String> = history.chronological().map(|transaction| transaction.amount.to_string()).collect();
    let labels: Vec<FraudLabel> = history.chronological().map(|transaction| transaction.fraud_label).collect();
    let frequencies: Vec<u32> = history.chronological().map(|transaction| transaction.frequency).collect();

    assert_eq!(amounts, vec!["1.0", "2.0", "3.0"]);
    assert_eq!(labels, vec![FraudLabel::Legit, FraudLabel::Fraud, FraudLabel::Fraud]);
    assert_eq!(frequencies, vec![0, 1, 2]);

    Ok(())
}

#[test]
fn test_stats_count_flagged_rejected_and_failed_separately() {
    let stats = ScreeningStats::default();
    stats.record_screened(false);
    stats.record_screened(true);
    stats.record_error(InputError::MissingAccount.class());
    stats.record_error(DetectionError::listing_unavailable(StoreError::Unavailable("connection reset".to_string())).class());

    assert_eq!(stats.report(), ScreeningReport { screened: 2, flagged: 1, rejected: 1, failed: 1 });
}
