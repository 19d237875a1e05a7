mod alert;
mod detector;
mod errors;
mod features;
mod rules;
mod signal;

pub use alert::{AlertSink, LogAlertSink, DEFAULT_ALERT_TIMEOUT};
pub use detector::FraudDetector;
pub use errors::{AlertError, DetectionError, SignalError};
pub use features::{DerivedFeatures, FeatureExtractor};
pub use rules::{RuleEngine, RuleVerdict, MAX_AMOUNT};
pub use signal::{DisabledRiskModel, HttpRiskModel, RiskModel, RiskSignal};
