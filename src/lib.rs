//! Real-time transaction fraud screening.
//!
//! Each inbound transaction gets derived features from its account history, runs through a rule
//! engine and an optional external risk model, is labeled, alerted on when fraudulent, and is
//! persisted.

pub mod actors;
pub mod detection;
pub mod engine;
pub mod models;
pub mod settings;
pub mod storage;
pub mod types;

pub use detection::FraudDetector;
pub use engine::AsyncEngine;
pub use models::{Transaction, TransactionRequest};
pub use settings::Settings;
