use std::time::Duration;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::detection::{FeatureExtractor, RuleEngine, MAX_AMOUNT};

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.toml";
pub const SETTINGS_PATH_VARIABLE: &str = "FRAUD_SENTINEL_CONFIG";
const ENVIRONMENT_PREFIX: &str = "FRAUD_SENTINEL";

/// Runtime configuration: built-in defaults, then an optional TOML file, then environment overrides
/// such as `FRAUD_SENTINEL__RISK_MODEL__URL`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rules: RuleSettings,
    pub risk_model: RiskModelSettings,
    pub alerts: AlertSettings,
    pub engine: EngineSettings
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    pub max_amount: Decimal,
    pub velocity_window_secs: u64,
    pub frequency_window_hours: u64
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskModelSettings {
    /// Base URL of the prediction service. Without one the model signal is always unavailable.
    pub url: Option<String>,
    pub timeout_ms: u64
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Upper bound on a single alert delivery. A late alert is logged and the transaction is still saved.
    pub timeout_ms: u64
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Capacity of the channel between the CSV reader and the dispatcher.
    pub backpressure: usize,
    /// Live account actors kept before the least recently used one is retired.
    pub actor_capacity: u64,
    /// Seconds an account actor may sit idle before it is retired.
    pub actor_idle_secs: u64
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            max_amount: MAX_AMOUNT,
            velocity_window_secs: 30,
            frequency_window_hours: 24
        }
    }
}

impl Default for RiskModelSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: 5_000
        }
    }
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            backpressure: 256,
            actor_capacity: 10_000,
            actor_idle_secs: 60
        }
    }
}

impl Settings {
    /// Loads settings from the path named by `FRAUD_SENTINEL_CONFIG`, or the default path.
    pub fn load() -> Result<Self> {
        let path = std::env::var(SETTINGS_PATH_VARIABLE).unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
        Self::load_from_path(&path)
    }

    /// A missing file is not an error; a malformed one is.
    pub fn load_from_path(path: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENVIRONMENT_PREFIX).prefix_separator("__").separator("__").try_parsing(true))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.engine.backpressure == 0 {
            anyhow::bail!("engine.backpressure must be greater than zero");
        }

        if self.alerts.timeout_ms == 0 {
            anyhow::bail!("alerts.timeout_ms must be greater than zero");
        }

        if self.risk_model.url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            anyhow::bail!("risk_model.url must not be blank when set");
        }

        Ok(())
    }
}

impl RuleSettings {
    pub fn rule_engine(&self) -> RuleEngine {
        RuleEngine::new(self.max_amount, TimeDelta::seconds(saturating_i64(self.velocity_window_secs)))
    }

    pub fn feature_extractor(&self) -> FeatureExtractor {
        FeatureExtractor::new(TimeDelta::hours(saturating_i64(self.frequency_window_hours)))
    }
}

impl RiskModelSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AlertSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl EngineSettings {
    pub fn actor_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.actor_idle_secs)
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
