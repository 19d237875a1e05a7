use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::detection::SignalError;

/// Outcome of consulting the external risk model. Only `Fraud` can change a label.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RiskSignal {
    Fraud,
    Legit,
    Unavailable
}

impl RiskSignal {
    pub fn is_fraud(self) -> bool {
        self == RiskSignal::Fraud
    }
}

impl From<&Result<bool, SignalError>> for RiskSignal {
    fn from(prediction: &Result<bool, SignalError>) -> Self {
        match prediction {
            Ok(true) => RiskSignal::Fraud,
            Ok(false) => RiskSignal::Legit,
            Err(_) => RiskSignal::Unavailable
        }
    }
}

/// Out-of-process classifier consulted as a secondary, best-effort verdict.
#[async_trait]
pub trait RiskModel: Send + Sync + 'static {
    /// Returns `true` when the model considers the feature vector fraudulent.
    async fn predict(&self, features: &[f64]) -> Result<bool, SignalError>;
}

/// Stand-in used when no model endpoint is configured.
pub struct DisabledRiskModel;

#[async_trait]
impl RiskModel for DisabledRiskModel {
    async fn predict(&self, _features: &[f64]) -> Result<bool, SignalError> {
        Err(SignalError::Disabled)
    }
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    features: &'a [f64]
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    fraud: u8
}

/// Risk model reached over HTTP: `POST {base_url}/predict` with `{"features": [..]}`,
/// answered by `{"fraud": 0|1}`. One attempt per call, bounded by the client timeout.
pub struct HttpRiskModel {
    client: reqwest::Client,
    endpoint: String
}

impl HttpRiskModel {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SignalError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SignalError::from_transport)?;

        Ok(Self {
            client,
            endpoint: format!("{}/predict", base_url.trim_end_matches('/'))
        })
    }

    #[cfg(test)]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RiskModel for HttpRiskModel {
    async fn predict(&self, features: &[f64]) -> Result<bool, SignalError> {
        let response = self.client.post(&self.endpoint)
            .json(&PredictionRequest { features })
            .send()
            .await
            .map_err(SignalError::from_transport)?;

        let status = response.status();

        if !status.is_success() {
            return Err(SignalError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(SignalError::from_transport)?;
        let prediction: PredictionResponse = serde_json::from_slice(&body)
            .map_err(|error| SignalError::Malformed(error.to_string()))?;

        match prediction.fraud {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SignalError::Malformed(format!("unexpected fraud flag {other}")))
        }
    }
}
